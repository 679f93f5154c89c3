//! API routes

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::state::AppState;

pub mod achievements;
pub mod health;
pub mod progress;
pub mod toasts;
pub mod track;

#[cfg(test)]
mod tests;

/// Build the API router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/state", get(progress::state))
        .route("/api/progress", get(progress::summary))
        .route("/api/streak/calendar", get(progress::calendar))
        .route("/api/achievements", get(achievements::list))
        .route("/api/track/words", post(track::words))
        .route("/api/track/format", post(track::format))
        .route("/api/track/save", post(track::save))
        .route("/api/toggle", post(progress::toggle))
        .route("/api/toasts", get(toasts::list))
        .route("/api/toasts/:id", delete(toasts::dismiss))
        .with_state(state)
}
