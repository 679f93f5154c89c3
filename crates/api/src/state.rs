//! Application state

use engine::GamificationHandle;

/// Shared application state
pub struct AppState {
    pub gamification: GamificationHandle,
}

impl AppState {
    pub fn new(gamification: GamificationHandle) -> Self {
        Self { gamification }
    }
}
