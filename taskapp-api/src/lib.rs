//! # TaskApp API Server Library
//!
//! HTTP surface of TaskApp: configuration, router, handlers and the error
//! translator. Business rules live in `taskapp_shared::services`.
//!
//! ## Modules
//!
//! - `app`: Application state, router builder and JWT layer
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
