/// Route handlers
///
/// - `health`: liveness and database status
/// - `users`: registration
/// - `auth`: login
/// - `tasks`: company-scoped task CRUD
/// - `admin_tasks`: unscoped task CRUD for admins

pub mod admin_tasks;
pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;

use crate::error::{ApiError, ApiResult};
use serde::Serialize;
use taskgate_shared::models::Task;

/// `{"task": {...}}`
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub task: Task,
}

/// `{"tasks": [...]}`
#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
}

/// Parses a positive id from a path segment
pub(crate) fn parse_id(raw: &str, name: &str) -> ApiResult<i64> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::BadRequest(format!("{} is malformed", name)))
}
