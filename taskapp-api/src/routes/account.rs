/// Account endpoints
use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use taskapp_shared::models::account::AccountInfo;

use crate::{app::AppState, error::ApiResult};

/// `GET /api/v1/account`
pub async fn list_accounts(State(state): State<AppState>) -> ApiResult<Json<Vec<AccountInfo>>> {
    Ok(Json(state.services.accounts.all().await?))
}

/// `GET /api/v1/account/:email`
pub async fn get_account(
    State(state): State<AppState>,
    email: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<AccountInfo>> {
    let Path(email) = email?;
    Ok(Json(state.services.accounts.by_email(&email).await?))
}
