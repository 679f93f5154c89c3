//! XP curve and level titles

use serde::Serialize;

/// XP needed to leave level 1
pub const BASE_LEVEL_XP: f64 = 40.0;

/// Each level costs this much more than the previous one
pub const LEVEL_GROWTH: f64 = 1.05;

/// XP still to spend inside the current level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct XpInLevel {
    pub current: u64,
    pub needed: u64,
}

impl XpInLevel {
    /// Progress bar fill, capped at 100
    pub fn percent(&self) -> f64 {
        if self.needed == 0 {
            return 100.0;
        }
        (self.current as f64 / self.needed as f64 * 100.0).min(100.0)
    }
}

/// XP required to advance from `level` to `level + 1`
pub fn xp_for_level(level: u32) -> u64 {
    let exponent = f64::from(level.saturating_sub(1));
    // Saturates to u64::MAX once the curve leaves f64 range
    (BASE_LEVEL_XP * LEVEL_GROWTH.powf(exponent)).floor() as u64
}

fn walk(total_xp: u64) -> (u32, XpInLevel) {
    let mut level = 1u32;
    let mut remaining = total_xp;
    let mut needed = xp_for_level(level);
    while remaining >= needed {
        remaining -= needed;
        level += 1;
        needed = xp_for_level(level);
    }
    (
        level,
        XpInLevel {
            current: remaining,
            needed,
        },
    )
}

/// Level reached after spending `total_xp` greedily from level 1
pub fn compute_level(total_xp: u64) -> u32 {
    walk(total_xp).0
}

/// Position inside the current level, for progress bars
pub fn xp_in_current_level(total_xp: u64) -> XpInLevel {
    walk(total_xp).1
}

pub fn level_title(level: u32) -> &'static str {
    match level {
        1500.. => "Grand Master",
        600..=1499 => "Legend",
        250..=599 => "Master",
        130..=249 => "Author",
        50..=129 => "Writer",
        _ => "Apprentice",
    }
}
