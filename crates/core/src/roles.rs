//! Role name constants carried in JWT claims and the `users.role` column.

/// Administrators may create, delay, and cancel tours and edit images.
pub const ROLE_ADMIN: &str = "admin";

/// Regular members may browse, search, and register for tours.
pub const ROLE_MEMBER: &str = "member";
