//! Domain models

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// Schema tag written with every persisted state. Not used for migration.
pub const STATE_VERSION: u32 = 1;

/// A toolbar formatting action
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolbarAction {
    Bold,
    Italic,
    H1,
    H2,
    H3,
    Ul,
    Ol,
    Code,
    Link,
    Image,
}

impl ToolbarAction {
    pub const ALL: [ToolbarAction; 10] = [
        ToolbarAction::Bold,
        ToolbarAction::Italic,
        ToolbarAction::H1,
        ToolbarAction::H2,
        ToolbarAction::H3,
        ToolbarAction::Ul,
        ToolbarAction::Ol,
        ToolbarAction::Code,
        ToolbarAction::Link,
        ToolbarAction::Image,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolbarAction::Bold => "bold",
            ToolbarAction::Italic => "italic",
            ToolbarAction::H1 => "h1",
            ToolbarAction::H2 => "h2",
            ToolbarAction::H3 => "h3",
            ToolbarAction::Ul => "ul",
            ToolbarAction::Ol => "ol",
            ToolbarAction::Code => "code",
            ToolbarAction::Link => "link",
            ToolbarAction::Image => "image",
        }
    }
}

impl fmt::Display for ToolbarAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolbarAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolbarAction::ALL
            .into_iter()
            .find(|a| a.as_str() == s.to_lowercase())
            .ok_or_else(|| Error::UnknownAction(s.to_string()))
    }
}

/// Cumulative writing counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_words_written: u64,
    pub total_time_active_ms: u64,
    pub total_docs_saved: u64,
    /// Absent key means the action was never used
    pub total_formats_used: BTreeMap<ToolbarAction, u64>,
    #[serde(rename = "totalXP")]
    pub total_xp: u64,
    pub level: u32,
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            total_words_written: 0,
            total_time_active_ms: 0,
            total_docs_saved: 0,
            total_formats_used: BTreeMap::new(),
            total_xp: 0,
            level: 1,
        }
    }
}

impl UserStats {
    /// Usage count of one formatting action
    pub fn format_count(&self, action: ToolbarAction) -> u64 {
        self.total_formats_used.get(&action).copied().unwrap_or(0)
    }

    /// Number of distinct formatting actions used at least once
    pub fn distinct_formats_used(&self) -> u64 {
        self.total_formats_used.values().filter(|&&c| c > 0).count() as u64
    }
}

/// Words written on one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakDay {
    pub date: NaiveDate,
    pub words_written: u64,
    pub qualified: bool,
}

/// Consecutive-day tracking over a trailing window
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakState {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub days: Vec<StreakDay>,
}

impl StreakState {
    pub fn day(&self, date: NaiveDate) -> Option<&StreakDay> {
        self.days.iter().find(|d| d.date == date)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    Writing,
    Markdown,
    Productivity,
    Special,
}

impl AchievementCategory {
    pub const ALL: [AchievementCategory; 4] = [
        AchievementCategory::Writing,
        AchievementCategory::Markdown,
        AchievementCategory::Productivity,
        AchievementCategory::Special,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AchievementCategory::Writing => "Writing",
            AchievementCategory::Markdown => "Markdown",
            AchievementCategory::Productivity => "Productivity",
            AchievementCategory::Special => "Special",
        }
    }
}

/// Everything an achievement may measure itself against
pub struct MeasureContext<'a> {
    pub stats: &'a UserStats,
    pub streak: &'a StreakState,
    /// Progress records evaluated so far in the current pass
    pub achievements: &'a [AchievementProgress],
}

/// Computes an achievement's current value
pub type Measure = fn(&MeasureContext<'_>) -> u64;

/// An achievement definition
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: AchievementCategory,
    pub target: u64,
    pub xp_reward: u64,
    #[serde(skip)]
    pub measure: Measure,
}

impl AchievementDef {
    pub fn measure(&self, ctx: &MeasureContext<'_>) -> u64 {
        (self.measure)(ctx)
    }
}

impl fmt::Debug for AchievementDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AchievementDef")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("target", &self.target)
            .field("xp_reward", &self.xp_reward)
            .finish_non_exhaustive()
    }
}

/// Whether an achievement has been unlocked, and when
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockStatus {
    Locked,
    Unlocked { at: DateTime<Utc> },
}

/// A user's progress toward one achievement.
///
/// The status can only move from `Locked` to `Unlocked`; there is no way back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ProgressRecord", into = "ProgressRecord")]
pub struct AchievementProgress {
    id: String,
    current: u64,
    status: UnlockStatus,
}

impl AchievementProgress {
    pub fn new(id: impl Into<String>, current: u64) -> Self {
        Self {
            id: id.into(),
            current,
            status: UnlockStatus::Locked,
        }
    }

    pub fn unlocked(id: impl Into<String>, current: u64, at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            current,
            status: UnlockStatus::Unlocked { at },
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn status(&self) -> UnlockStatus {
        self.status
    }

    pub fn is_unlocked(&self) -> bool {
        matches!(self.status, UnlockStatus::Unlocked { .. })
    }

    pub fn unlocked_at(&self) -> Option<DateTime<Utc>> {
        match self.status {
            UnlockStatus::Unlocked { at } => Some(at),
            UnlockStatus::Locked => None,
        }
    }

    pub fn set_current(&mut self, value: u64) {
        self.current = value;
    }

    /// Unlock at `at`. Returns false if it was already unlocked.
    pub fn unlock(&mut self, at: DateTime<Utc>) -> bool {
        match self.status {
            UnlockStatus::Unlocked { .. } => false,
            UnlockStatus::Locked => {
                self.status = UnlockStatus::Unlocked { at };
                true
            }
        }
    }
}

/// Wire shape of [`AchievementProgress`]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgressRecord {
    id: String,
    current: u64,
    unlocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unlocked_at: Option<DateTime<Utc>>,
}

impl From<ProgressRecord> for AchievementProgress {
    fn from(record: ProgressRecord) -> Self {
        let status = match (record.unlocked, record.unlocked_at) {
            (true, Some(at)) => UnlockStatus::Unlocked { at },
            // Older blobs may omit the timestamp; keep the unlock, stamp the epoch
            (true, None) => UnlockStatus::Unlocked {
                at: DateTime::<Utc>::default(),
            },
            (false, _) => UnlockStatus::Locked,
        };
        Self {
            id: record.id,
            current: record.current,
            status,
        }
    }
}

impl From<AchievementProgress> for ProgressRecord {
    fn from(progress: AchievementProgress) -> Self {
        Self {
            unlocked: progress.is_unlocked(),
            unlocked_at: progress.unlocked_at(),
            id: progress.id,
            current: progress.current,
        }
    }
}

/// A queued unlock notification. Never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct PendingToast {
    pub id: Uuid,
    pub achievement: &'static AchievementDef,
}

impl PendingToast {
    pub fn new(achievement: &'static AchievementDef) -> Self {
        Self {
            id: Uuid::new_v4(),
            achievement,
        }
    }
}

/// The root aggregate persisted as a single blob
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamificationState {
    pub enabled: bool,
    pub version: u32,
    pub stats: UserStats,
    pub achievements: Vec<AchievementProgress>,
    pub streak: StreakState,
}

impl Default for GamificationState {
    fn default() -> Self {
        Self {
            enabled: true,
            version: STATE_VERSION,
            stats: UserStats::default(),
            achievements: Vec::new(),
            streak: StreakState::default(),
        }
    }
}

impl GamificationState {
    pub fn progress(&self, id: &str) -> Option<&AchievementProgress> {
        self.achievements.iter().find(|a| a.id() == id)
    }

    pub fn unlocked_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.is_unlocked()).count()
    }
}
