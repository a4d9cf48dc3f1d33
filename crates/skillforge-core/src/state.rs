//! Application state
//!
//! `AppState` is the explicit replacement for a process-wide store. The tree
//! collection sits behind an `Arc` and is copy-on-write: every tree mutation
//! edits a private clone of the affected tree and swaps it in only once the
//! whole operation succeeded. A reader holding a [`AppState::snapshot`] never
//! observes a partially cascaded tree.

use crate::badge::{self, BadgeStats};
use crate::progression::{self, Level, Rank};
use crate::{
    CategoryStats, CompletionReport, EngineConfig, Node, NodeId, NodePatch, Result,
    SkillCollection, SkillTree, Streak, StreakChange,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Display profile of the local user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    /// Avatar class, e.g. "warrior", "mage", "rogue"
    pub avatar: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "SkillForger".to_string(),
            avatar: "warrior".to_string(),
        }
    }
}

/// Partial profile update; absent fields are kept
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub avatar: Option<String>,
}

fn default_level_seen() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

/// The complete user state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    skills: Arc<SkillCollection>,
    /// Tree currently open in the UI
    #[serde(skip)]
    active_tree: Option<String>,
    /// Bumped on every effective mutation
    #[serde(skip)]
    version: u64,
    #[serde(default = "default_level_seen")]
    pub last_level_seen: u32,
    #[serde(default, rename = "userProfile")]
    pub profile: UserProfile,
    /// Stored as top-level `streak` and `lastLoginDate` keys
    #[serde(flatten)]
    pub streak: Streak,
    #[serde(default)]
    pub unlocked_badges: Vec<String>,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    #[serde(default)]
    pub joined_clubs: Vec<String>,
    #[serde(skip)]
    config: EngineConfig,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            skills: Arc::default(),
            active_tree: None,
            version: 0,
            last_level_seen: default_level_seen(),
            profile: UserProfile::default(),
            streak: Streak::default(),
            unlocked_badges: Vec::new(),
            sound_enabled: true,
            joined_clubs: Vec::new(),
            config: EngineConfig::default(),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a specific configuration
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace the configuration (it is not persisted with the state)
    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config;
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn skills(&self) -> &SkillCollection {
        &self.skills
    }

    /// Immutable view of the collection; later mutations never alter it
    pub fn snapshot(&self) -> Arc<SkillCollection> {
        Arc::clone(&self.skills)
    }

    pub fn tree(&self, name: &str) -> Result<&SkillTree> {
        self.skills.require(name)
    }

    fn bump(&mut self) {
        self.version += 1;
    }

    fn commit_tree(&mut self, tree: SkillTree) {
        Arc::make_mut(&mut self.skills).put(tree);
        self.bump();
    }

    // ---- tree collection ----

    /// Append a tree unless the name is taken; returns whether it was added
    pub fn add_tree(&mut self, tree: SkillTree) -> bool {
        if self.skills.contains(&tree.name) {
            debug!(tree = %tree.name, "tree already exists, not added");
            return false;
        }
        info!(tree = %tree.name, nodes = tree.node_count(), "tree added");
        Arc::make_mut(&mut self.skills).add_tree(tree);
        self.bump();
        true
    }

    /// Store a tree, replacing any tree with the same name wholesale
    pub fn import_tree(&mut self, tree: SkillTree) -> Result<()> {
        tree.validate()?;
        let replaced = self.skills.contains(&tree.name);
        info!(tree = %tree.name, replaced, "tree imported");
        Arc::make_mut(&mut self.skills).import_tree(tree)?;
        self.bump();
        Ok(())
    }

    pub fn remove_tree(&mut self, name: &str) -> Option<SkillTree> {
        if !self.skills.contains(name) {
            return None;
        }
        let removed = Arc::make_mut(&mut self.skills).remove_tree(name);
        if self.active_tree.as_deref() == Some(name) {
            self.active_tree = None;
        }
        self.bump();
        removed
    }

    pub fn set_active_tree(&mut self, name: &str) -> Result<()> {
        self.skills.require(name)?;
        self.active_tree = Some(name.to_string());
        Ok(())
    }

    pub fn active_tree(&self) -> Option<&SkillTree> {
        self.active_tree
            .as_deref()
            .and_then(|name| self.skills.get(name))
    }

    // ---- tree operations ----

    /// Complete a node and apply the cascade, under the configured container policy
    pub fn complete_node(&mut self, tree_name: &str, id: &NodeId) -> Result<CompletionReport> {
        let mut tree = self.skills.require(tree_name)?.clone();
        let report = tree.complete_node_with(id, self.config.container_policy)?;
        if report.changed() {
            info!(
                tree = tree_name,
                node = %id,
                xp = report.xp_awarded,
                cascade = report.completed.len() - 1,
                "node completed"
            );
            self.commit_tree(tree);
        }
        Ok(report)
    }

    pub fn update_node_notes(
        &mut self,
        tree_name: &str,
        id: &NodeId,
        notes: impl Into<String>,
    ) -> Result<()> {
        self.merge_node(tree_name, id, NodePatch::new().notes(notes))
    }

    /// Shallow-merge fields into a node; no cascade
    pub fn merge_node(&mut self, tree_name: &str, id: &NodeId, patch: NodePatch) -> Result<()> {
        let mut tree = self.skills.require(tree_name)?.clone();
        tree.merge_node(id, patch)?;
        debug!(tree = tree_name, node = %id, "node merged");
        self.commit_tree(tree);
        Ok(())
    }

    pub fn find_node_with_depth(&self, tree_name: &str, id: &NodeId) -> Result<(&Node, usize)> {
        self.skills
            .require(tree_name)?
            .find_node_with_depth(id)
            .ok_or_else(|| crate::Error::NodeNotFound(id.clone()))
    }

    // ---- queries ----

    pub fn total_xp(&self) -> u64 {
        self.skills.total_xp()
    }

    pub fn category_breakdown(&self) -> Vec<CategoryStats> {
        self.skills.category_breakdown()
    }

    pub fn level(&self) -> Level {
        Level::from_xp(self.total_xp(), &self.config.progression)
    }

    /// Percentage of the way through the current level
    pub fn level_progress(&self) -> f64 {
        progression::level_progress(self.total_xp(), &self.config.progression)
    }

    pub fn rank(&self) -> Rank {
        self.level().rank()
    }

    // ---- progression ----

    /// Return the current level if it is above the last level seen, and record it
    pub fn observe_level(&mut self) -> Option<Level> {
        let level = self.level();
        if level.value() > self.last_level_seen {
            info!(level = level.value(), "level up");
            self.last_level_seen = level.value();
            self.bump();
            Some(level)
        } else {
            None
        }
    }

    pub fn check_streak(&mut self, now: DateTime<Utc>) -> StreakChange {
        let change = self.streak.check_in(now);
        if change != StreakChange::Unchanged {
            debug!(count = self.streak.count, ?change, "streak updated");
            self.bump();
        }
        change
    }

    /// Unlock every badge whose rule now holds; returns the new badge ids
    pub fn check_badges(&mut self) -> Vec<&'static str> {
        let stats = BadgeStats {
            total_xp: self.total_xp(),
            streak: self.streak.count,
            skills_count: self.skills.len(),
        };
        let fresh = badge::unlock_earned(&stats, &mut self.unlocked_badges);
        if !fresh.is_empty() {
            info!(badges = ?fresh, "badges unlocked");
            self.bump();
        }
        fresh
    }

    // ---- profile and settings ----

    pub fn update_profile(&mut self, update: ProfileUpdate) {
        if let Some(name) = update.name {
            self.profile.name = name;
        }
        if let Some(avatar) = update.avatar {
            self.profile.avatar = avatar;
        }
        self.bump();
    }

    /// Flip the sound setting and return the new value
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.bump();
        self.sound_enabled
    }

    /// Join a club; returns false if already a member
    pub fn join_club(&mut self, club_id: impl Into<String>) -> bool {
        let club_id = club_id.into();
        if self.joined_clubs.contains(&club_id) {
            return false;
        }
        self.joined_clubs.push(club_id);
        self.bump();
        true
    }

    /// Leave a club; returns false if not a member
    pub fn leave_club(&mut self, club_id: &str) -> bool {
        let before = self.joined_clubs.len();
        self.joined_clubs.retain(|id| id != club_id);
        let left = self.joined_clubs.len() != before;
        if left {
            self.bump();
        }
        left
    }

    /// Drop all user data, keeping the configuration
    pub fn reset(&mut self) {
        let config = std::mem::take(&mut self.config);
        let version = self.version + 1;
        *self = Self::with_config(config);
        self.version = version;
        info!("state reset");
    }
}
