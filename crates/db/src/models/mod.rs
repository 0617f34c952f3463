//! Entity models and DTOs, one module per table.

pub mod notification;
pub mod registration;
pub mod tour;
pub mod user;
