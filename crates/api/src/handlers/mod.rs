//! HTTP handlers, one module per resource.

pub mod auth;
pub mod notification;
pub mod registration;
pub mod tour;
