//! Achievement catalog and evaluation

use chrono::{DateTime, Utc};
use common::models::{
    AchievementCategory, AchievementDef, AchievementProgress, GamificationState, MeasureContext,
    ToolbarAction,
};
use serde::Serialize;

/// Achievement ids
pub mod defs {
    // Writing
    pub const FIRST_WORDS: &str = "first-words";
    pub const WORDSMITH: &str = "wordsmith";
    pub const NOVELIST: &str = "novelist";
    pub const PROLIFIC: &str = "prolific";
    pub const MARATHON: &str = "marathon";

    // Markdown
    pub const BOLD_MOVE: &str = "bold-move";
    pub const HEADING_MASTER: &str = "heading-master";
    pub const LINK_BUILDER: &str = "link-builder";
    pub const CODE_NINJA: &str = "code-ninja";
    pub const LIST_LOVER: &str = "list-lover";
    pub const FORMAT_EXPLORER: &str = "format-explorer";

    // Productivity
    pub const FIRST_SAVE: &str = "first-save";
    pub const SAVER: &str = "saver";
    pub const TIME_20_MIN: &str = "time-10";
    pub const TIME_2_HOURS: &str = "time-60";
    pub const STREAK_6: &str = "streak-3";
    pub const STREAK_14: &str = "streak-7";

    // Special
    pub const FORMAT_MASTER: &str = "format-master";
    pub const PERFECTIONIST: &str = "perfectionist";
    pub const ACE: &str = "brave-ace";
}

/// Measurement functions paired with catalog entries
mod measure {
    use super::*;

    pub fn total_words(ctx: &MeasureContext<'_>) -> u64 {
        ctx.stats.total_words_written
    }

    pub fn bold(ctx: &MeasureContext<'_>) -> u64 {
        ctx.stats.format_count(ToolbarAction::Bold)
    }

    pub fn headings(ctx: &MeasureContext<'_>) -> u64 {
        [ToolbarAction::H1, ToolbarAction::H2, ToolbarAction::H3]
            .into_iter()
            .map(|a| ctx.stats.format_count(a))
            .fold(0, u64::saturating_add)
    }

    pub fn links(ctx: &MeasureContext<'_>) -> u64 {
        ctx.stats.format_count(ToolbarAction::Link)
    }

    pub fn code(ctx: &MeasureContext<'_>) -> u64 {
        ctx.stats.format_count(ToolbarAction::Code)
    }

    pub fn lists(ctx: &MeasureContext<'_>) -> u64 {
        ctx.stats
            .format_count(ToolbarAction::Ul)
            .saturating_add(ctx.stats.format_count(ToolbarAction::Ol))
    }

    pub fn distinct_formats(ctx: &MeasureContext<'_>) -> u64 {
        ctx.stats.distinct_formats_used()
    }

    pub fn docs_saved(ctx: &MeasureContext<'_>) -> u64 {
        ctx.stats.total_docs_saved
    }

    pub fn active_ms(ctx: &MeasureContext<'_>) -> u64 {
        ctx.stats.total_time_active_ms
    }

    pub fn current_streak(ctx: &MeasureContext<'_>) -> u64 {
        u64::from(ctx.streak.current_streak)
    }

    /// Per-document edit counts are not tracked, so this never progresses
    pub fn edits_per_document(_ctx: &MeasureContext<'_>) -> u64 {
        0
    }

    /// 1 once every other catalog entry is unlocked
    pub fn all_others_unlocked(ctx: &MeasureContext<'_>) -> u64 {
        let all = CATALOG.iter().filter(|d| d.id != defs::ACE).all(|d| {
            ctx.achievements
                .iter()
                .any(|a| a.id() == d.id && a.is_unlocked())
        });
        u64::from(all)
    }
}

/// The fixed catalog, in evaluation order
pub static CATALOG: &[AchievementDef] = &[
    AchievementDef {
        id: defs::FIRST_WORDS,
        name: "First Words",
        description: "Write your first 200 words",
        icon: "✏️",
        category: AchievementCategory::Writing,
        target: 200,
        xp_reward: 100,
        measure: measure::total_words,
    },
    AchievementDef {
        id: defs::WORDSMITH,
        name: "Wordsmith",
        description: "Write 1,000 words in total",
        icon: "📝",
        category: AchievementCategory::Writing,
        target: 1_000,
        xp_reward: 200,
        measure: measure::total_words,
    },
    AchievementDef {
        id: defs::NOVELIST,
        name: "Novelist",
        description: "Write 5,000 words in total",
        icon: "📖",
        category: AchievementCategory::Writing,
        target: 5_000,
        xp_reward: 500,
        measure: measure::total_words,
    },
    AchievementDef {
        id: defs::PROLIFIC,
        name: "Prolific",
        description: "Write 10,000 words in total",
        icon: "🏆",
        category: AchievementCategory::Writing,
        target: 10_000,
        xp_reward: 1_000,
        measure: measure::total_words,
    },
    AchievementDef {
        id: defs::MARATHON,
        name: "Marathoner",
        description: "Write 20,000 words in total",
        icon: "🏅",
        category: AchievementCategory::Writing,
        target: 20_000,
        xp_reward: 2_000,
        measure: measure::total_words,
    },
    AchievementDef {
        id: defs::BOLD_MOVE,
        name: "Bold Move",
        description: "Use bold 20 times",
        icon: "🅱️",
        category: AchievementCategory::Markdown,
        target: 20,
        xp_reward: 100,
        measure: measure::bold,
    },
    AchievementDef {
        id: defs::HEADING_MASTER,
        name: "Heading Master",
        description: "Use headings 40 times",
        icon: "📋",
        category: AchievementCategory::Markdown,
        target: 40,
        xp_reward: 200,
        measure: measure::headings,
    },
    AchievementDef {
        id: defs::LINK_BUILDER,
        name: "Link Builder",
        description: "Insert 30 links",
        icon: "🔗",
        category: AchievementCategory::Markdown,
        target: 30,
        xp_reward: 200,
        measure: measure::links,
    },
    AchievementDef {
        id: defs::CODE_NINJA,
        name: "Code Ninja",
        description: "Use code blocks 20 times",
        icon: "💻",
        category: AchievementCategory::Markdown,
        target: 20,
        xp_reward: 200,
        measure: measure::code,
    },
    AchievementDef {
        id: defs::LIST_LOVER,
        name: "List Lover",
        description: "Create 40 lists",
        icon: "📃",
        category: AchievementCategory::Markdown,
        target: 40,
        xp_reward: 200,
        measure: measure::lists,
    },
    AchievementDef {
        id: defs::FORMAT_EXPLORER,
        name: "Format Explorer",
        description: "Use 10 different formatting types",
        icon: "🎨",
        category: AchievementCategory::Markdown,
        target: 10,
        xp_reward: 300,
        measure: measure::distinct_formats,
    },
    AchievementDef {
        id: defs::FIRST_SAVE,
        name: "First Save",
        description: "Save your first document",
        icon: "💾",
        category: AchievementCategory::Productivity,
        target: 1,
        xp_reward: 100,
        measure: measure::docs_saved,
    },
    AchievementDef {
        id: defs::SAVER,
        name: "Keeper",
        description: "Save 20 documents",
        icon: "🗄️",
        category: AchievementCategory::Productivity,
        target: 20,
        xp_reward: 400,
        measure: measure::docs_saved,
    },
    AchievementDef {
        id: defs::TIME_20_MIN,
        name: "20 Minutes",
        description: "Spend 20 minutes editing",
        icon: "⏱️",
        category: AchievementCategory::Productivity,
        target: 1_200_000,
        xp_reward: 100,
        measure: measure::active_ms,
    },
    AchievementDef {
        id: defs::TIME_2_HOURS,
        name: "2 Hours",
        description: "Spend 2 hours editing",
        icon: "🕐",
        category: AchievementCategory::Productivity,
        target: 7_200_000,
        xp_reward: 400,
        measure: measure::active_ms,
    },
    AchievementDef {
        id: defs::STREAK_6,
        name: "6-Day Streak",
        description: "Keep a 6-day writing streak",
        icon: "🔥",
        category: AchievementCategory::Productivity,
        target: 6,
        xp_reward: 300,
        measure: measure::current_streak,
    },
    AchievementDef {
        id: defs::STREAK_14,
        name: "14-Day Streak",
        description: "Keep a 14-day writing streak",
        icon: "🔥",
        category: AchievementCategory::Productivity,
        target: 14,
        xp_reward: 1_000,
        measure: measure::current_streak,
    },
    AchievementDef {
        id: defs::FORMAT_MASTER,
        name: "Explorer",
        description: "Use every formatting button",
        icon: "🎨",
        category: AchievementCategory::Special,
        target: 10,
        xp_reward: 300,
        measure: measure::distinct_formats,
    },
    AchievementDef {
        id: defs::PERFECTIONIST,
        name: "Perfectionist",
        description: "Edit a document more than 100 times",
        icon: "🎯",
        category: AchievementCategory::Special,
        target: 100,
        xp_reward: 500,
        measure: measure::edits_per_document,
    },
    AchievementDef {
        id: defs::ACE,
        name: "Ace",
        description: "Unlock every other achievement",
        icon: "🚀",
        category: AchievementCategory::Special,
        target: 1,
        xp_reward: 2_000,
        measure: measure::all_others_unlocked,
    },
];

/// Look up a catalog entry by id
pub fn find(id: &str) -> Option<&'static AchievementDef> {
    CATALOG.iter().find(|d| d.id == id)
}

/// Result of one evaluation pass
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub achievements: Vec<AchievementProgress>,
    pub newly_unlocked: Vec<&'static AchievementDef>,
    /// Sum of rewards for everything unlocked in this pass
    pub xp_gained: u64,
}

/// Recompute every achievement's progress and detect new unlocks.
///
/// Runs in catalog order; later entries see the records already updated by
/// earlier ones in the same pass.
pub fn check_achievements(state: &GamificationState, now: DateTime<Utc>) -> Evaluation {
    let mut achievements = state.achievements.clone();
    let mut newly_unlocked = Vec::new();
    let mut xp_gained = 0u64;

    for def in CATALOG {
        let value = def.measure(&MeasureContext {
            stats: &state.stats,
            streak: &state.streak,
            achievements: &achievements,
        });
        let reached = value >= def.target;

        let unlocked_now = match achievements.iter_mut().find(|a| a.id() == def.id) {
            Some(progress) => {
                progress.set_current(value);
                reached && progress.unlock(now)
            }
            None => {
                let mut progress = AchievementProgress::new(def.id, value);
                let unlocked = reached && progress.unlock(now);
                achievements.push(progress);
                unlocked
            }
        };

        if unlocked_now {
            newly_unlocked.push(def);
            xp_gained = xp_gained.saturating_add(def.xp_reward);
        }
    }

    Evaluation {
        achievements,
        newly_unlocked,
        xp_gained,
    }
}

/// A catalog entry joined with the user's progress
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementView {
    #[serde(flatten)]
    pub def: &'static AchievementDef,
    pub current: u64,
    pub unlocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<DateTime<Utc>>,
}

/// Every catalog entry with progress, optionally limited to one category
pub fn board(
    state: &GamificationState,
    category: Option<AchievementCategory>,
) -> Vec<AchievementView> {
    CATALOG
        .iter()
        .filter(|d| category.map_or(true, |c| d.category == c))
        .map(|def| match state.progress(def.id) {
            Some(progress) => AchievementView {
                def,
                current: progress.current(),
                unlocked: progress.is_unlocked(),
                unlocked_at: progress.unlocked_at(),
            },
            None => AchievementView {
                def,
                current: 0,
                unlocked: false,
                unlocked_at: None,
            },
        })
        .collect()
}
