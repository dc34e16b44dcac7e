//! # TaskApp Shared Library
//!
//! This crate contains the domain types, persistence and business rules used by
//! the TaskApp API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models, enums and pagination types
//! - `store`: Persistence port with PostgreSQL and in-memory adapters
//! - `auth`: Password hashing, JWT tokens and caller extraction
//! - `db`: Connection pool and migrations
//! - `services`: Permission-checked account, auth, task and comment operations
//! - `error`: Domain error taxonomy

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

/// Current version of the TaskApp shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
