#[cfg(test)]
mod tests {
    use crate::achievements::defs;
    use crate::clock::{Clock, ManualClock};
    use crate::controller::*;
    use crate::leveling::compute_level;
    use chrono::{TimeZone, Utc};
    use common::config::DEFAULT_STORAGE_KEY;
    use common::models::{GamificationState, StreakState, ToolbarAction};
    use std::sync::Arc;
    use store::{KvStore, MemoryStore, StateStore};

    type TestController = Gamification<Arc<MemoryStore>, ManualClock>;

    fn start_clock() -> ManualClock {
        ManualClock::new(Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap())
    }

    fn controller_with(kv: Arc<MemoryStore>, clock: ManualClock) -> TestController {
        Gamification::with_clock(StateStore::new(kv), clock)
    }

    fn fresh() -> (TestController, Arc<MemoryStore>, ManualClock) {
        let kv = Arc::new(MemoryStore::new());
        let clock = start_clock();
        (controller_with(kv.clone(), clock.clone()), kv, clock)
    }

    fn seeded(state: &GamificationState) -> TestController {
        let kv = Arc::new(MemoryStore::new());
        StateStore::new(kv.clone()).save(state);
        controller_with(kv, start_clock())
    }

    fn assert_level_consistent(g: &TestController) {
        let stats = &g.state().stats;
        assert_eq!(stats.level, compute_level(stats.total_xp));
    }

    // trackWords
    #[test]
    fn test_first_200_words_unlock_first_words() {
        let (mut g, _, _) = fresh();
        let toasts = g.track_words(200);

        let stats = &g.state().stats;
        assert_eq!(stats.total_words_written, 200);
        assert_eq!(stats.total_xp, 120); // 20 for words + 100 reward
        assert_eq!(stats.level, compute_level(120));
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].achievement.id, defs::FIRST_WORDS);
        assert_eq!(g.pending_toasts().len(), 1);
    }

    #[test]
    fn test_word_delta_is_relative_to_last_call() {
        let (mut g, _, _) = fresh();
        g.track_words(100);
        g.track_words(150);

        assert_eq!(g.state().stats.total_words_written, 150);
        assert_eq!(g.state().stats.total_xp, 15); // 10 + 5
    }

    #[test]
    fn test_shrinking_document_is_not_penalized() {
        let (mut g, _, _) = fresh();
        g.track_words(120);
        let xp = g.state().stats.total_xp;

        assert!(g.track_words(80).is_empty());
        assert_eq!(g.state().stats.total_xp, xp);
        assert_eq!(g.state().stats.total_words_written, 120);

        // Growth is measured from the shrunken count
        g.track_words(100);
        assert_eq!(g.state().stats.total_words_written, 140);
    }

    #[test]
    fn test_small_deltas_floor_to_zero_xp() {
        let (mut g, _, _) = fresh();
        g.track_words(9);

        assert_eq!(g.state().stats.total_words_written, 9);
        assert_eq!(g.state().stats.total_xp, 0);
        assert_eq!(g.state().streak.days.len(), 1);
    }

    // trackFormat
    #[test]
    fn test_bold_move_unlocks_on_twentieth_use() {
        let (mut g, _, _) = fresh();
        for i in 1..20 {
            let toasts = g.track_format(ToolbarAction::Bold);
            assert!(toasts.is_empty(), "unlocked early at call {}", i);
        }
        let toasts = g.track_format(ToolbarAction::Bold);

        assert_eq!(g.state().stats.format_count(ToolbarAction::Bold), 20);
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].achievement.id, defs::BOLD_MOVE);
        assert_eq!(g.state().stats.total_xp, 20 * 10 + 100);
        assert_level_consistent(&g);
    }

    // trackSave
    #[test]
    fn test_save_grants_fifteen_xp_per_word() {
        let (mut g, _, _) = fresh();
        let toasts = g.track_save(100);

        assert_eq!(g.state().stats.total_docs_saved, 1);
        // 1500 for the save plus the 100 XP first-save reward
        assert_eq!(g.state().stats.total_xp, 1_600);
        assert_eq!(toasts[0].achievement.id, defs::FIRST_SAVE);
        assert_level_consistent(&g);
    }

    #[test]
    fn test_save_with_week_long_streak_doubles() {
        let mut state = GamificationState::default();
        state.stats.total_docs_saved = 1;
        state.streak = StreakState {
            current_streak: 7,
            longest_streak: 7,
            days: Vec::new(),
        };
        let mut g = seeded(&state);
        g.track_save(100);

        // Doubled save XP, then first-save and the 6-day streak reward
        assert_eq!(g.state().stats.total_xp, 3_000 + 100 + 300);
    }

    // Streaks through the controller
    #[test]
    fn test_three_day_streak_raises_multiplier() {
        let (mut g, _, clock) = fresh();
        g.track_words(60);
        clock.advance_days(1);
        g.track_words(120);
        clock.advance_days(1);
        g.track_words(180);

        assert_eq!(g.state().streak.current_streak, 3);
        assert!((g.multiplier() - 1.5).abs() < f64::EPSILON);

        let before = g.state().stats.total_xp;
        g.track_format(ToolbarAction::Italic);
        assert_eq!(g.state().stats.total_xp - before, 15);
    }

    #[test]
    fn test_words_on_same_day_accumulate() {
        let (mut g, _, _) = fresh();
        g.track_words(30);
        assert_eq!(g.state().streak.current_streak, 0);
        g.track_words(55);

        let streak = &g.state().streak;
        assert_eq!(streak.days.len(), 1);
        assert_eq!(streak.days[0].words_written, 55);
        assert_eq!(streak.current_streak, 1);
        assert!(g.summary().today_qualified);
    }

    // Periodic accrual
    #[test]
    fn test_tick_accrues_time_and_xp() {
        let (mut g, _, _) = fresh();
        for _ in 0..3 {
            assert!(g.tick().is_empty());
        }
        assert_eq!(g.state().stats.total_time_active_ms, 900_000);
        assert_eq!(g.state().stats.total_xp, 15);

        let toasts = g.tick();
        assert_eq!(toasts[0].achievement.id, defs::TIME_20_MIN);
        assert_eq!(g.state().stats.total_xp, 20 + 100);
    }

    // toggleEnabled
    #[test]
    fn test_disabled_tracking_is_a_no_op() {
        let (mut g, _, _) = fresh();
        assert!(!g.toggle_enabled());

        assert!(g.track_words(500).is_empty());
        assert!(g.track_format(ToolbarAction::Code).is_empty());
        assert!(g.track_save(500).is_empty());
        assert!(g.tick().is_empty());

        let state = g.state();
        assert_eq!(state.stats.total_xp, 0);
        assert_eq!(state.stats.total_words_written, 0);
        assert!(state.stats.total_formats_used.is_empty());
        assert!(state.streak.days.is_empty());
        assert!(state.achievements.is_empty());
    }

    #[test]
    fn test_words_typed_while_disabled_count_after_reenable() {
        let (mut g, _, _) = fresh();
        g.toggle_enabled();
        g.track_words(500);
        g.toggle_enabled();
        g.track_words(500);

        assert_eq!(g.state().stats.total_words_written, 500);
    }

    #[test]
    fn test_toggle_is_persisted() {
        let (mut g, kv, clock) = fresh();
        g.toggle_enabled();

        let reloaded = controller_with(kv, clock);
        assert!(!reloaded.is_enabled());
    }

    // dismissToast
    #[test]
    fn test_dismiss_toast_is_idempotent() {
        let (mut g, _, _) = fresh();
        let toasts = g.track_words(1_000);
        assert_eq!(toasts.len(), 2);

        assert!(g.dismiss_toast(toasts[0].id));
        assert!(!g.dismiss_toast(toasts[0].id));
        assert_eq!(g.pending_toasts().len(), 1);
        assert_eq!(g.pending_toasts()[0].id, toasts[1].id);
    }

    #[test]
    fn test_toast_ids_are_unique() {
        let (mut g, _, _) = fresh();
        let toasts = g.track_words(1_000);
        assert_ne!(toasts[0].id, toasts[1].id);
    }

    // Persistence
    #[test]
    fn test_every_mutation_is_written_through() {
        let (mut g, kv, clock) = fresh();
        g.track_words(250);
        g.track_format(ToolbarAction::Link);

        assert!(kv.get(DEFAULT_STORAGE_KEY).unwrap().is_some());
        let reloaded = controller_with(kv, clock);
        assert_eq!(reloaded.state(), g.state());
        // Toasts are not persisted
        assert!(reloaded.pending_toasts().is_empty());
    }

    #[test]
    fn test_reloaded_unlocks_are_not_granted_twice() {
        let (mut g, kv, clock) = fresh();
        g.track_words(200);
        let xp = g.state().stats.total_xp;

        let mut reloaded = controller_with(kv, clock);
        reloaded.track_format(ToolbarAction::Bold);
        assert_eq!(reloaded.state().stats.total_xp, xp + 10);
    }

    // Invariants
    #[test]
    fn test_counters_and_unlocks_are_monotonic() {
        let (mut g, _, clock) = fresh();
        let mut previous = g.state().clone();
        let words = [50u64, 300, 280, 900, 900, 1_500, 40, 2_000];

        for (i, &count) in words.iter().enumerate() {
            g.track_words(count);
            g.track_format(ToolbarAction::ALL[i % ToolbarAction::ALL.len()]);
            if i % 3 == 0 {
                g.track_save(count);
            }
            g.tick();
            if i % 2 == 1 {
                clock.advance_days(1);
            }

            let state = g.state();
            assert!(state.stats.total_xp >= previous.stats.total_xp);
            assert!(state.stats.total_words_written >= previous.stats.total_words_written);
            assert!(state.stats.total_docs_saved >= previous.stats.total_docs_saved);
            assert!(state.streak.longest_streak >= previous.streak.longest_streak);
            assert!(state.streak.longest_streak >= state.streak.current_streak);
            for old in previous.achievements.iter().filter(|a| a.is_unlocked()) {
                let now = state.progress(old.id()).unwrap();
                assert!(now.is_unlocked());
                assert_eq!(now.unlocked_at(), old.unlocked_at());
            }
            assert_level_consistent(&g);
            previous = state.clone();
        }
    }

    #[test]
    fn test_huge_save_saturates_instead_of_overflowing() {
        let (mut g, _, _) = fresh();
        let toasts = g.track_save(u64::MAX);

        assert_eq!(toasts[0].achievement.id, defs::FIRST_SAVE);
        assert_eq!(g.state().stats.total_xp, u64::MAX);
        assert_level_consistent(&g);

        g.track_format(ToolbarAction::Bold);
        g.tick();
        assert_eq!(g.state().stats.total_xp, u64::MAX);
        assert_level_consistent(&g);
    }

    #[test]
    fn test_counters_saturate_at_max() {
        let mut state = GamificationState::default();
        state.stats.total_words_written = u64::MAX - 5;
        state.stats.total_docs_saved = u64::MAX;
        state.stats.total_time_active_ms = u64::MAX - 1;
        state.stats.total_formats_used.insert(ToolbarAction::Ul, u64::MAX);
        let mut g = seeded(&state);

        g.track_words(100);
        g.track_save(0);
        g.tick();
        g.track_format(ToolbarAction::Ul);
        g.track_format(ToolbarAction::Ol);

        let stats = &g.state().stats;
        assert_eq!(stats.total_words_written, u64::MAX);
        assert_eq!(stats.total_docs_saved, u64::MAX);
        assert_eq!(stats.total_time_active_ms, u64::MAX);
        assert_eq!(stats.format_count(ToolbarAction::Ul), u64::MAX);
        assert_eq!(g.state().progress(defs::LIST_LOVER).unwrap().current(), u64::MAX);
    }

    // Summaries
    #[test]
    fn test_summary_reflects_state() {
        let (mut g, _, _) = fresh();
        g.track_words(200);
        let summary = g.summary();

        assert!(summary.enabled);
        assert_eq!(summary.total_xp, 120);
        assert_eq!(summary.level, 3);
        assert_eq!(summary.title, "Apprentice");
        assert_eq!(summary.xp_into_level, 38);
        assert_eq!(summary.xp_for_next_level, 44);
        assert_eq!(summary.current_streak, 1);
        assert_eq!(summary.unlocked_achievements, 1);
        assert_eq!(summary.total_achievements, 20);
        assert!(summary.today_qualified);
    }

    #[test]
    fn test_calendar_ends_today() {
        let (mut g, _, clock) = fresh();
        g.track_words(75);
        let cells = g.calendar();

        assert_eq!(cells.len(), 30);
        assert_eq!(cells[29].date, clock.today());
        assert_eq!(cells[29].words_written, 75);
    }
}
