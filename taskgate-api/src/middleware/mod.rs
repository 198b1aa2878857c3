/// Request middleware
///
/// - `auth`: resolves the bearer identity and enforces the admin gate

pub mod auth;
