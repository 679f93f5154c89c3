//! Achievement routes

use axum::{
    extract::{Query, State},
    Json,
};
use common::models::AchievementCategory;
use engine::achievements::AchievementView;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct BoardQuery {
    pub category: Option<AchievementCategory>,
}

/// Catalog joined with the user's progress
#[derive(Serialize)]
pub struct AchievementBoard {
    pub unlocked: usize,
    pub total: usize,
    pub achievements: Vec<AchievementView>,
}

/// List achievements, optionally for one category
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BoardQuery>,
) -> ApiResult<Json<AchievementBoard>> {
    let achievements = state.gamification.board(query.category).await?;
    let unlocked = achievements.iter().filter(|a| a.unlocked).count();

    Ok(Json(AchievementBoard {
        unlocked,
        total: achievements.len(),
        achievements,
    }))
}
