/// PostgreSQL plumbing
///
/// - `pool`: connection pool construction and health checks
/// - `migrations`: embedded schema migrations
///
/// Only used when `DATABASE_URL` is configured; otherwise the API runs on
/// [`crate::store::MemoryStore`].

pub mod migrations;
pub mod pool;
