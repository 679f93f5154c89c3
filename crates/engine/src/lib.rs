//! Gamification engine: leveling, streaks, achievements and the event controller

pub mod achievements;
pub mod clock;
pub mod controller;
pub mod leveling;
pub mod service;
pub mod streaks;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{Gamification, ProgressSummary};
pub use service::{GamificationHandle, GamificationService, ServiceConfig, TrackOutcome};

#[cfg(test)]
mod controller_test;
