/// Admin task endpoints
///
/// Reached only through the admin layer, so every handler receives an
/// unscoped [`AuthContext`]. Tasks are addressed by id alone.

use super::{parse_id, TaskListResponse, TaskResponse};
use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskgate_shared::auth::AuthContext;
use taskgate_shared::models::{CompanyId, TaskDraft};
use taskgate_shared::services::PageQuery;

/// Task draft plus the owning company, which admins must name explicitly
#[derive(Debug, Deserialize)]
pub struct AdminCreateTaskRequest {
    #[serde(default)]
    pub company_id: Option<CompanyId>,

    #[serde(flatten)]
    pub draft: TaskDraft,
}

/// `GET /api/v1/admin/tasks?limit=&offset=`
///
/// `limit` above the configured cap (20 by default) is rejected with 400.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<TaskListResponse>> {
    let tasks = state.tasks.list_tasks(&ctx, &page).await?;

    Ok(Json(TaskListResponse { tasks }))
}

/// `GET /api/v1/admin/tasks/:task_id`
pub async fn get_task(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(task_id): Path<String>,
) -> ApiResult<Json<TaskResponse>> {
    let task_id = parse_id(&task_id, "task_id")?;
    let task = state.tasks.get_task(&ctx, task_id).await?;

    Ok(Json(TaskResponse { task }))
}

/// `POST /api/v1/admin/tasks`
pub async fn create_task(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    payload: Result<Json<AdminCreateTaskRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    let Json(request) = payload?;
    let task = state
        .tasks
        .create_task(&ctx, request.company_id, request.draft)
        .await?;

    Ok((StatusCode::CREATED, Json(TaskResponse { task })))
}

/// `PUT /api/v1/admin/tasks/:task_id`
pub async fn update_task(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(task_id): Path<String>,
    payload: Result<Json<TaskDraft>, JsonRejection>,
) -> ApiResult<Json<TaskResponse>> {
    let task_id = parse_id(&task_id, "task_id")?;
    let Json(draft) = payload?;
    let task = state.tasks.update_task(&ctx, task_id, draft).await?;

    Ok(Json(TaskResponse { task }))
}

/// `DELETE /api/v1/admin/tasks/:task_id`
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(task_id): Path<String>,
) -> ApiResult<StatusCode> {
    let task_id = parse_id(&task_id, "task_id")?;
    state.tasks.delete_task(&ctx, task_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
