//! Unlock notification routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use common::models::PendingToast;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::state::AppState;

/// Pending unlock toasts, oldest first
pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<PendingToast>>> {
    Ok(Json(state.gamification.pending_toasts().await?))
}

/// Dismiss one toast. Dismissing an unknown id is not an error.
pub async fn dismiss(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.gamification.dismiss_toast(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
