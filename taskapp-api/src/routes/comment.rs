/// Comment endpoints
///
/// - `POST   /api/v1/comment/add/:task_id?text=`            add
/// - `GET    /api/v1/comment/task/:task_id?page&size`       by task
/// - `GET    /api/v1/comment/author/:account_id?page&size`  by author
/// - `DELETE /api/v1/comment/:id`                           delete (author only)

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskapp_shared::{
    auth::middleware::Caller,
    models::{comment::Comment, page::Page},
};

use super::pagination::PageParams;
use crate::{app::AppState, error::{ApiError, ApiResult}};

#[derive(Debug, Deserialize)]
pub struct AddCommentParams {
    pub text: String,
}

pub async fn add_comment(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    task_id: Result<Path<i64>, PathRejection>,
    params: Result<Query<AddCommentParams>, QueryRejection>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let Path(task_id) = task_id?;
    let Query(params) = params?;

    if params.text.trim().is_empty() {
        return Err(ApiError::BadRequest("Comment text must not be empty".to_string()));
    }

    let comment = state.services.comments.add(task_id, &params.text, &caller).await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn comments_by_task(
    State(state): State<AppState>,
    task_id: Result<Path<i64>, PathRejection>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<Page<Comment>>> {
    let Path(task_id) = task_id?;
    let Query(params) = params?;

    let page = state
        .services
        .comments
        .by_task(task_id, params.to_request()?)
        .await?;
    Ok(Json(page))
}

pub async fn comments_by_author(
    State(state): State<AppState>,
    account_id: Result<Path<i64>, PathRejection>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<Page<Comment>>> {
    let Path(account_id) = account_id?;
    let Query(params) = params?;

    let page = state
        .services
        .comments
        .by_author(account_id, params.to_request()?)
        .await?;
    Ok(Json(page))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    state.services.comments.delete(id, &caller).await?;
    Ok(StatusCode::NO_CONTENT)
}
