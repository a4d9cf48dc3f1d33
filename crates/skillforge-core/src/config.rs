//! Engine configuration
//!
//! Every field has a default, so a partial RON file (or none at all) is valid:
//!
//! ```ron
//! (
//!     progression: (xp_per_level: 500),
//!     container_policy: Reject,
//! )
//! ```

use serde::{Deserialize, Serialize};

/// How `complete_node` treats a direct call on a node that has children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContainerPolicy {
    /// Refuse with `Error::ContainerNode`; containers complete only through their children
    #[default]
    Reject,
    /// Complete the container and run the regular cascade (children and sibling unlock)
    Cascade,
}

/// Level curve settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionConfig {
    /// XP needed per level; level 1 starts at 0 XP
    #[serde(default = "default_xp_per_level")]
    pub xp_per_level: u64,
}

fn default_xp_per_level() -> u64 {
    1000
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            xp_per_level: default_xp_per_level(),
        }
    }
}

/// Root configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub progression: ProgressionConfig,
    /// Category assigned when neither the request nor the payload names one
    #[serde(default = "crate::tree::default_category")]
    pub default_category: String,
    /// Deepest nesting accepted from generated payloads
    #[serde(default = "default_max_tree_depth")]
    pub max_tree_depth: usize,
    #[serde(default)]
    pub container_policy: ContainerPolicy,
}

fn default_max_tree_depth() -> usize {
    8
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            progression: ProgressionConfig::default(),
            default_category: crate::tree::default_category(),
            max_tree_depth: default_max_tree_depth(),
            container_policy: ContainerPolicy::default(),
        }
    }
}
