//! # Taskgate Shared Library
//!
//! Domain types, stores, and the authorization/task-scoping core used by the
//! Taskgate API server.
//!
//! ## Module Organization
//!
//! - `models`: Users, companies, memberships and tasks
//! - `error`: Store and service error taxonomy
//! - `store`: Persistence traits plus in-memory and PostgreSQL backends
//! - `auth`: Passwords, tokens, identity resolution and the admin/membership gates
//! - `services`: Task scoping engine, registration and login
//! - `db`: PostgreSQL pool and migrations

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

/// Current version of the Taskgate shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
