/// Task endpoints
///
/// All routes require a bearer token; the caller is taken from the
/// request extensions populated by the JWT layer.
///
/// - `POST   /api/v1/task`                                  create
/// - `GET    /api/v1/task?page&size&status&priority`        list
/// - `PUT    /api/v1/task`                                  update title/description
/// - `GET    /api/v1/task/:id`                              read
/// - `DELETE /api/v1/task/:id`                              delete
/// - `POST   /api/v1/task/:id/assign/:account_id`           assign
/// - `POST   /api/v1/task/:id/unsign`                       unassign
/// - `POST   /api/v1/task/:id/change_status`                `{ "taskStatus": "RESOLVED" }`
/// - `POST   /api/v1/task/:id/change_priority`              `{ "taskPriority": "HIGH" }`
/// - `GET    /api/v1/task/author/:account_id?page&size`     by author
/// - `GET    /api/v1/task/assignee/:account_id?page&size`   by assignee

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskapp_shared::{
    auth::middleware::Caller,
    error::ServiceError,
    models::{
        page::Page,
        task::{Task, TaskPriority, TaskStatus},
    },
    services::TaskFilter,
};
use validator::Validate;

use super::pagination::{page_request, PageParams};
use crate::{app::AppState, error::ApiResult};

#[derive(Debug, Deserialize, Validate)]
pub struct TaskRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters"))]
    pub title: String,

    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TaskUpdateRequest {
    pub id: i64,

    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters"))]
    pub title: String,

    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    pub task_status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityRequest {
    pub task_priority: String,
}

/// Query of the task listing
#[derive(Debug, Default, Deserialize)]
pub struct TaskListParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub status: Option<String>,
    pub priority: Option<String>,
}

pub async fn create_task(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    payload: Result<Json<TaskRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let Json(req) = payload?;
    req.validate()?;

    let task = state
        .services
        .tasks
        .create(&req.title, &req.description, &caller)
        .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Lists tasks; `status` takes precedence over `priority`
pub async fn list_tasks(
    State(state): State<AppState>,
    params: Result<Query<TaskListParams>, QueryRejection>,
) -> ApiResult<Json<Page<Task>>> {
    let Query(params) = params?;
    let request = page_request(params.page, params.size)?;
    let filter = TaskFilter::from_params(params.status, params.priority);

    Ok(Json(state.services.tasks.read_all(filter, request).await?))
}

pub async fn update_task(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    payload: Result<Json<TaskUpdateRequest>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let Json(req) = payload?;
    req.validate()?;

    let task = state
        .services
        .tasks
        .update(req.id, &req.title, &req.description, &caller)
        .await?;

    Ok(Json(task))
}

pub async fn get_task(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Task>> {
    let Path(id) = id?;
    Ok(Json(state.services.tasks.read(id).await?))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    state.services.tasks.delete(id, &caller).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn assign_task(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ids: Result<Path<(i64, i64)>, PathRejection>,
) -> ApiResult<Json<Task>> {
    let Path((task_id, account_id)) = ids?;
    Ok(Json(state.services.tasks.assign(task_id, account_id, &caller).await?))
}

pub async fn unassign_task(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(task_id) = id?;
    state.services.tasks.unassign(task_id, &caller).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn change_status(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<StatusRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Path(task_id) = id?;
    let Json(req) = payload?;
    let status: TaskStatus = req.task_status.parse().map_err(ServiceError::from)?;

    state.services.tasks.change_status(task_id, status, &caller).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn change_priority(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<PriorityRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Path(task_id) = id?;
    let Json(req) = payload?;
    let priority: TaskPriority = req.task_priority.parse().map_err(ServiceError::from)?;

    state
        .services
        .tasks
        .change_priority(task_id, priority, &caller)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn tasks_by_author(
    State(state): State<AppState>,
    account_id: Result<Path<i64>, PathRejection>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<Page<Task>>> {
    let Path(account_id) = account_id?;
    let Query(params) = params?;

    let page = state
        .services
        .tasks
        .by_author(account_id, params.to_request()?)
        .await?;
    Ok(Json(page))
}

pub async fn tasks_by_assignee(
    State(state): State<AppState>,
    account_id: Result<Path<i64>, PathRejection>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<Page<Task>>> {
    let Path(account_id) = account_id?;
    let Query(params) = params?;

    let page = state
        .services
        .tasks
        .by_assignee(account_id, params.to_request()?)
        .await?;
    Ok(Json(page))
}
