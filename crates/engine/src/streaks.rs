//! Daily writing streaks over a trailing window

use chrono::{Days, Local, NaiveDate};
use common::models::{StreakDay, StreakState};
use serde::Serialize;

/// Words needed in one day for it to count toward a streak
pub const QUALIFYING_WORDS: u64 = 50;

/// Number of day records kept
pub const WINDOW_DAYS: usize = 30;

/// Add today's words using the local calendar day
pub fn update_streak_for_today(streak: &StreakState, words_added: u64) -> StreakState {
    update_streak_for_day(streak, Local::now().date_naive(), words_added)
}

/// Add `words_added` to `today`, trim the window and recount the streak
pub fn update_streak_for_day(
    streak: &StreakState,
    today: NaiveDate,
    words_added: u64,
) -> StreakState {
    let mut days = streak.days.clone();

    match days.iter_mut().find(|d| d.date == today) {
        Some(day) => {
            day.words_written = day.words_written.saturating_add(words_added);
            day.qualified = day.words_written >= QUALIFYING_WORDS;
        }
        None => days.push(StreakDay {
            date: today,
            words_written: words_added,
            qualified: words_added >= QUALIFYING_WORDS,
        }),
    }

    // Oldest first, so eviction drains from the front
    days.sort_by_key(|d| d.date);
    if days.len() > WINDOW_DAYS {
        let excess = days.len() - WINDOW_DAYS;
        days.drain(..excess);
    }

    let current_streak = count_current_streak(&days, today);

    StreakState {
        current_streak,
        longest_streak: streak.longest_streak.max(current_streak),
        days,
    }
}

/// Consecutive qualified days ending exactly on `today`
pub fn count_current_streak(days: &[StreakDay], today: NaiveDate) -> u32 {
    let mut sorted: Vec<&StreakDay> = days.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    let mut streak = 0u32;
    for day in sorted {
        if !day.qualified {
            break;
        }
        let expected = today.checked_sub_days(Days::new(u64::from(streak)));
        if Some(day.date) != expected {
            break;
        }
        streak += 1;
    }
    streak
}

/// XP multiplier earned by the current streak
pub fn streak_multiplier(streak: u32) -> f64 {
    match streak {
        7.. => 2.0,
        3..=6 => 1.5,
        1..=2 => 1.0,
        0 => 1.0,
    }
}

pub fn today_qualified(streak: &StreakState, today: NaiveDate) -> bool {
    streak.day(today).is_some_and(|d| d.qualified)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Inactive,
    Active,
    Qualified,
}

/// One square of the streak calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub words_written: u64,
    pub status: DayStatus,
}

/// The trailing `WINDOW_DAYS` calendar days ending on `today`, oldest first
pub fn calendar(streak: &StreakState, today: NaiveDate) -> Vec<CalendarCell> {
    (0..WINDOW_DAYS as u64)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .map(|date| match streak.day(date) {
            Some(day) => CalendarCell {
                date,
                words_written: day.words_written,
                status: if day.qualified {
                    DayStatus::Qualified
                } else {
                    DayStatus::Active
                },
            },
            None => CalendarCell {
                date,
                words_written: 0,
                status: DayStatus::Inactive,
            },
        })
        .collect()
}
