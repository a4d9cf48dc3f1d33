//! Achievement badges

use serde::{Deserialize, Serialize};

/// Inputs a badge rule is evaluated against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeStats {
    pub total_xp: u64,
    pub streak: u32,
    pub skills_count: usize,
}

/// Unlock condition of a badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BadgeRule {
    TotalXpAtLeast(u64),
    StreakAtLeast(u32),
    SkillsAtLeast(usize),
}

impl BadgeRule {
    pub fn holds(&self, stats: &BadgeStats) -> bool {
        match *self {
            BadgeRule::TotalXpAtLeast(xp) => stats.total_xp >= xp,
            BadgeRule::StreakAtLeast(days) => stats.streak >= days,
            BadgeRule::SkillsAtLeast(count) => stats.skills_count >= count,
        }
    }
}

/// A badge definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub rule: BadgeRule,
}

const CATALOG: &[Badge] = &[
    Badge {
        id: "novice",
        name: "Novice Forger",
        description: "Earn your first 100 XP",
        rule: BadgeRule::TotalXpAtLeast(100),
    },
    Badge {
        id: "apprentice",
        name: "Apprentice",
        description: "Reach 1,000 XP",
        rule: BadgeRule::TotalXpAtLeast(1_000),
    },
    Badge {
        id: "expert",
        name: "Skill Master",
        description: "Reach 10,000 XP",
        rule: BadgeRule::TotalXpAtLeast(10_000),
    },
    Badge {
        id: "streak_3",
        name: "Heating Up",
        description: "Maintain a 3-day streak",
        rule: BadgeRule::StreakAtLeast(3),
    },
    Badge {
        id: "streak_7",
        name: "On Fire",
        description: "Maintain a 7-day streak",
        rule: BadgeRule::StreakAtLeast(7),
    },
    Badge {
        id: "polymath",
        name: "Polymath",
        description: "Start 3 different skills",
        rule: BadgeRule::SkillsAtLeast(3),
    },
];

impl Badge {
    /// All known badges
    pub fn catalog() -> &'static [Badge] {
        CATALOG
    }

    pub fn find(id: &str) -> Option<&'static Badge> {
        CATALOG.iter().find(|b| b.id == id)
    }
}

/// Add every earned badge missing from `unlocked`; returns the new ids in catalog order
///
/// Badges are never revoked.
pub fn unlock_earned(stats: &BadgeStats, unlocked: &mut Vec<String>) -> Vec<&'static str> {
    let mut fresh = Vec::new();
    for badge in CATALOG {
        if unlocked.iter().any(|id| id == badge.id) {
            continue;
        }
        if badge.rule.holds(stats) {
            unlocked.push(badge.id.to_string());
            fresh.push(badge.id);
        }
    }
    fresh
}
