//! State, progress and streak routes

use axum::{extract::State, Json};
use common::models::GamificationState;
use engine::streaks::CalendarCell;
use engine::ProgressSummary;
use serde::Serialize;
use std::sync::Arc;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ToggleResponse {
    pub enabled: bool,
}

/// Full persisted state
pub async fn state(State(state): State<Arc<AppState>>) -> ApiResult<Json<GamificationState>> {
    Ok(Json(state.gamification.state().await?))
}

/// Level, XP bar and streak summary
pub async fn summary(State(state): State<Arc<AppState>>) -> ApiResult<Json<ProgressSummary>> {
    Ok(Json(state.gamification.summary().await?))
}

/// Last 30 days of writing activity
pub async fn calendar(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<CalendarCell>>> {
    Ok(Json(state.gamification.calendar().await?))
}

/// Flip gamification on or off
pub async fn toggle(State(state): State<Arc<AppState>>) -> ApiResult<Json<ToggleResponse>> {
    let enabled = state.gamification.toggle_enabled().await?;
    Ok(Json(ToggleResponse { enabled }))
}
