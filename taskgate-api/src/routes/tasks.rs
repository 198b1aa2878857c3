/// Company-scoped task endpoints
///
/// Each handler runs the membership gate for the path company before calling
/// the task service. Non-members and tasks of other companies both get 404.

use super::{parse_id, TaskListResponse, TaskResponse};
use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use taskgate_shared::auth::{AuthContext, Identity};
use taskgate_shared::models::TaskDraft;
use taskgate_shared::services::PageQuery;

async fn company_scope(
    state: &AppState,
    identity: Identity,
    company_id: &str,
) -> ApiResult<AuthContext> {
    let company_id = parse_id(company_id, "company_id")?;
    Ok(state.gate.authorize(identity, company_id).await?)
}

/// `GET /api/v1/companies/:company_id/tasks?limit=&offset=`
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(company_id): Path<String>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<TaskListResponse>> {
    let ctx = company_scope(&state, identity, &company_id).await?;
    let tasks = state.tasks.list_tasks(&ctx, &page).await?;

    Ok(Json(TaskListResponse { tasks }))
}

/// `GET /api/v1/companies/:company_id/tasks/:task_id`
pub async fn get_task(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path((company_id, task_id)): Path<(String, String)>,
) -> ApiResult<Json<TaskResponse>> {
    let ctx = company_scope(&state, identity, &company_id).await?;
    let task_id = parse_id(&task_id, "task_id")?;
    let task = state.tasks.get_task(&ctx, task_id).await?;

    Ok(Json(TaskResponse { task }))
}

/// `POST /api/v1/companies/:company_id/tasks`
pub async fn create_task(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(company_id): Path<String>,
    payload: Result<Json<TaskDraft>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    let ctx = company_scope(&state, identity, &company_id).await?;
    let Json(draft) = payload?;
    let task = state.tasks.create_task(&ctx, None, draft).await?;

    Ok((StatusCode::CREATED, Json(TaskResponse { task })))
}

/// `PUT /api/v1/companies/:company_id/tasks/:task_id`
pub async fn update_task(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path((company_id, task_id)): Path<(String, String)>,
    payload: Result<Json<TaskDraft>, JsonRejection>,
) -> ApiResult<Json<TaskResponse>> {
    let ctx = company_scope(&state, identity, &company_id).await?;
    let task_id = parse_id(&task_id, "task_id")?;
    let Json(draft) = payload?;
    let task = state.tasks.update_task(&ctx, task_id, draft).await?;

    Ok(Json(TaskResponse { task }))
}

/// `DELETE /api/v1/companies/:company_id/tasks/:task_id`
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path((company_id, task_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let ctx = company_scope(&state, identity, &company_id).await?;
    let task_id = parse_id(&task_id, "task_id")?;
    state.tasks.delete_task(&ctx, task_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
