//! Gamification controller: turns writing activity into XP, levels,
//! achievements and streaks.

use std::time::Duration;

use common::models::{AchievementCategory, GamificationState, PendingToast, ToolbarAction};
use serde::Serialize;
use store::{KvStore, StateStore};
use tracing::{debug, info};
use uuid::Uuid;

use crate::achievements::{self, AchievementView, CATALOG};
use crate::clock::{Clock, SystemClock};
use crate::leveling::{compute_level, level_title, xp_in_current_level};
use crate::streaks::{self, CalendarCell};

/// How often ambient activity is credited
pub const ACCRUAL_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Active time credited per accrual tick
pub const ACTIVE_TICK_MS: u64 = 300_000;

/// Base XP per accrual tick
pub const TICK_XP: f64 = 5.0;

/// Base XP per formatting action
pub const FORMAT_XP: f64 = 10.0;

/// Words per XP point when typing
pub const WORDS_PER_XP: f64 = 10.0;

/// XP per ten words of a saved document
pub const SAVE_XP_PER_TEN_WORDS: f64 = 150.0;

/// Apply a streak multiplier and floor to whole XP
fn scaled_xp(base: f64, multiplier: f64) -> u64 {
    (base * multiplier).floor() as u64
}

/// Display summary of the user's progression
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub enabled: bool,
    pub level: u32,
    pub title: &'static str,
    pub total_xp: u64,
    pub xp_into_level: u64,
    pub xp_for_next_level: u64,
    pub percent: f64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub multiplier: f64,
    pub today_qualified: bool,
    pub unlocked_achievements: usize,
    pub total_achievements: usize,
}

/// Owns the live state and the pending toast queue.
///
/// Every tracked event runs the same pipeline: mutate stats, evaluate
/// achievements, add their rewards, recompute the level, persist, then queue
/// toasts. The new state replaces the old one only once it is complete.
pub struct Gamification<S, C = SystemClock> {
    state: GamificationState,
    pending_toasts: Vec<PendingToast>,
    last_word_count: u64,
    store: StateStore<S>,
    clock: C,
}

impl<S: KvStore> Gamification<S, SystemClock> {
    /// Load from the store (or default) using the wall clock
    pub fn init(store: StateStore<S>) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: KvStore, C: Clock> Gamification<S, C> {
    pub fn with_clock(store: StateStore<S>, clock: C) -> Self {
        let state = store.load();
        info!(
            "Gamification loaded: level {}, {} XP, {} achievements unlocked, enabled: {}",
            state.stats.level,
            state.stats.total_xp,
            state.unlocked_count(),
            state.enabled
        );
        Self {
            state,
            pending_toasts: Vec::new(),
            last_word_count: 0,
            store,
            clock,
        }
    }

    pub fn state(&self) -> &GamificationState {
        &self.state
    }

    pub fn pending_toasts(&self) -> &[PendingToast] {
        &self.pending_toasts
    }

    pub fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    /// Multiplier applied to the next XP grant
    pub fn multiplier(&self) -> f64 {
        streaks::streak_multiplier(self.state.streak.current_streak)
    }

    /// Record the document's current total word count.
    ///
    /// Only growth since the previous call is rewarded; shrinking is ignored.
    pub fn track_words(&mut self, current_word_count: u64) -> Vec<PendingToast> {
        if !self.state.enabled {
            return Vec::new();
        }
        let previous = std::mem::replace(&mut self.last_word_count, current_word_count);
        if current_word_count <= previous {
            debug!(
                "Word count {} -> {}, nothing to reward",
                previous, current_word_count
            );
            return Vec::new();
        }
        let delta = current_word_count - previous;
        let today = self.clock.today();

        self.apply("words", |state, multiplier| {
            state.stats.total_xp = state
                .stats
                .total_xp
                .saturating_add(scaled_xp(delta as f64 / WORDS_PER_XP, multiplier));
            state.stats.total_words_written = state.stats.total_words_written.saturating_add(delta);
            state.streak = streaks::update_streak_for_day(&state.streak, today, delta);
        })
    }

    /// Record one toolbar formatting action
    pub fn track_format(&mut self, action: ToolbarAction) -> Vec<PendingToast> {
        if !self.state.enabled {
            return Vec::new();
        }
        self.apply("format", |state, multiplier| {
            let count = state.stats.total_formats_used.entry(action).or_insert(0);
            *count = count.saturating_add(1);
            state.stats.total_xp = state
                .stats
                .total_xp
                .saturating_add(scaled_xp(FORMAT_XP, multiplier));
        })
    }

    /// Record a document save of `word_count` words
    pub fn track_save(&mut self, word_count: u64) -> Vec<PendingToast> {
        if !self.state.enabled {
            return Vec::new();
        }
        self.apply("save", |state, multiplier| {
            let base = (word_count as f64 / 10.0 * SAVE_XP_PER_TEN_WORDS).floor();
            state.stats.total_docs_saved = state.stats.total_docs_saved.saturating_add(1);
            state.stats.total_xp = state.stats.total_xp.saturating_add(scaled_xp(base, multiplier));
        })
    }

    /// Credit one accrual period of active time
    pub fn tick(&mut self) -> Vec<PendingToast> {
        if !self.state.enabled {
            return Vec::new();
        }
        self.apply("tick", |state, multiplier| {
            state.stats.total_time_active_ms =
                state.stats.total_time_active_ms.saturating_add(ACTIVE_TICK_MS);
            state.stats.total_xp = state
                .stats
                .total_xp
                .saturating_add(scaled_xp(TICK_XP, multiplier));
        })
    }

    /// Flip the enabled flag and persist it. Returns the new value.
    pub fn toggle_enabled(&mut self) -> bool {
        self.state.enabled = !self.state.enabled;
        info!(
            "Gamification {}",
            if self.state.enabled { "enabled" } else { "disabled" }
        );
        self.store.save(&self.state);
        self.state.enabled
    }

    /// Remove one toast. Returns false if it was already gone.
    pub fn dismiss_toast(&mut self, id: Uuid) -> bool {
        let before = self.pending_toasts.len();
        self.pending_toasts.retain(|t| t.id != id);
        self.pending_toasts.len() != before
    }

    pub fn summary(&self) -> ProgressSummary {
        let stats = &self.state.stats;
        let in_level = xp_in_current_level(stats.total_xp);
        ProgressSummary {
            enabled: self.state.enabled,
            level: stats.level,
            title: level_title(stats.level),
            total_xp: stats.total_xp,
            xp_into_level: in_level.current,
            xp_for_next_level: in_level.needed,
            percent: in_level.percent(),
            current_streak: self.state.streak.current_streak,
            longest_streak: self.state.streak.longest_streak,
            multiplier: self.multiplier(),
            today_qualified: streaks::today_qualified(&self.state.streak, self.clock.today()),
            unlocked_achievements: self.state.unlocked_count(),
            total_achievements: CATALOG.len(),
        }
    }

    pub fn calendar(&self) -> Vec<CalendarCell> {
        streaks::calendar(&self.state.streak, self.clock.today())
    }

    pub fn board(&self, category: Option<AchievementCategory>) -> Vec<AchievementView> {
        achievements::board(&self.state, category)
    }

    fn apply<F>(&mut self, event: &str, mutate: F) -> Vec<PendingToast>
    where
        F: FnOnce(&mut GamificationState, f64),
    {
        let multiplier = self.multiplier();
        let mut next = self.state.clone();
        mutate(&mut next, multiplier);
        next.stats.level = compute_level(next.stats.total_xp);

        let evaluation = achievements::check_achievements(&next, self.clock.now());
        next.achievements = evaluation.achievements;
        // Counters saturate rather than wrap
        next.stats.total_xp = next.stats.total_xp.saturating_add(evaluation.xp_gained);
        next.stats.level = compute_level(next.stats.total_xp);

        debug!(
            "Applied {} event: {} -> {} XP (x{})",
            event, self.state.stats.total_xp, next.stats.total_xp, multiplier
        );
        for def in &evaluation.newly_unlocked {
            info!("🏆 Achievement unlocked: {} (+{} XP)", def.id, def.xp_reward);
        }
        if next.stats.level > self.state.stats.level {
            info!(
                "⬆️ Level up: {} -> {} ({})",
                self.state.stats.level,
                next.stats.level,
                level_title(next.stats.level)
            );
        }

        self.state = next;
        self.store.save(&self.state);

        let toasts: Vec<PendingToast> = evaluation
            .newly_unlocked
            .into_iter()
            .map(PendingToast::new)
            .collect();
        self.pending_toasts.extend(toasts.iter().cloned());
        toasts
    }
}
