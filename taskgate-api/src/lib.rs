//! # Taskgate API
//!
//! HTTP binding for the Taskgate task service.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration from the environment
//! - `error`: Service error to HTTP response mapping
//! - `middleware`: Identity and admin gates as axum middleware
//! - `routes`: Route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
