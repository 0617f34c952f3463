//! Shared domain types for the tourkit workspace.

pub mod error;
pub mod listing;
pub mod roles;
pub mod types;
