//! Activity tracking routes

use axum::{extract::State, Json};
use common::models::ToolbarAction;
use engine::TrackOutcome;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordCountRequest {
    pub word_count: u64,
}

#[derive(Deserialize)]
pub struct FormatRequest {
    pub action: String,
}

/// Report the document's current total word count
pub async fn words(
    State(state): State<Arc<AppState>>,
    Json(req): Json<WordCountRequest>,
) -> ApiResult<Json<TrackOutcome>> {
    debug!("Word count update: {}", req.word_count);
    Ok(Json(state.gamification.track_words(req.word_count).await?))
}

/// Report one toolbar formatting action
pub async fn format(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FormatRequest>,
) -> ApiResult<Json<TrackOutcome>> {
    let action: ToolbarAction = req.action.parse()?;
    Ok(Json(state.gamification.track_format(action).await?))
}

/// Report a document save
pub async fn save(
    State(state): State<Arc<AppState>>,
    Json(req): Json<WordCountRequest>,
) -> ApiResult<Json<TrackOutcome>> {
    Ok(Json(state.gamification.track_save(req.word_count).await?))
}
