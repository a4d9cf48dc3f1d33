//! Player level and rank derived from total XP

use crate::ProgressionConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Player level computed from total earned XP
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Level(pub u32);

impl Level {
    /// Level for the given XP: `floor(xp / xp_per_level) + 1`
    pub fn from_xp(xp: u64, config: &ProgressionConfig) -> Self {
        let per_level = config.xp_per_level.max(1);
        let level = (xp / per_level).saturating_add(1);
        Self(u32::try_from(level).unwrap_or(u32::MAX))
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Rank reached at this level
    pub fn rank(&self) -> Rank {
        Rank::for_level(*self)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Level {}", self.0)
    }
}

/// Percentage of the way through the current level, in `[0, 100)`
pub fn level_progress(xp: u64, config: &ProgressionConfig) -> f64 {
    let per_level = config.xp_per_level.max(1);
    (xp % per_level) as f64 / per_level as f64 * 100.0
}

/// Character stage unlocked by level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Novice,
    Apprentice,
    Warrior,
    Master,
}

impl Rank {
    pub fn for_level(level: Level) -> Self {
        match level.0 {
            20.. => Rank::Master,
            10.. => Rank::Warrior,
            5.. => Rank::Apprentice,
            _ => Rank::Novice,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::Novice => "novice",
            Rank::Apprentice => "apprentice",
            Rank::Warrior => "warrior",
            Rank::Master => "master",
        }
    }
}
