/// API route handlers
///
/// Organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Signup and signin
/// - `account`: Account lookups
/// - `task`: Task CRUD, assignment, status and priority
/// - `comment`: Task comments
/// - `pagination`: `page`/`size` query parameters shared by list endpoints

pub mod account;
pub mod auth;
pub mod comment;
pub mod health;
pub mod pagination;
pub mod task;
