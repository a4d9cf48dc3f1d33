//! Skillforge Core - Progress engine for gamified skill trees
//!
//! This crate provides the core types and operations for skillforge:
//! - Recursive skill tree model (`SkillTree`, `Node`)
//! - Node status machine with unlock cascades (`SkillTree::complete_node`)
//! - XP aggregation across trees and categories
//! - Progression: levels, ranks, badges and daily streaks
//! - `AppState`, the explicit application state with a copy-on-write collection
//!
//! ## Status machine
//!
//! Every node is `locked`, `available` or `completed`. Statuses only move
//! forward. Completing a leaf unlocks its children and its next sibling, and
//! a container completes once all of its children are completed, which in
//! turn unlocks the container's next sibling, up the ancestor chain.
//!
//! ```
//! use skillforge_core::{Node, NodeId, SkillTree, Status, Tier};
//!
//! let mut tree = SkillTree::new("Rust", "Systems programming");
//! tree.branches.push(Node::new("basics", "Basics", Tier::Basic, 100));
//! tree.branches.push(Node::new("traits", "Traits", Tier::Intermediate, 200));
//! tree.seed_availability();
//!
//! let report = tree.complete_node(&NodeId::new("basics")).unwrap();
//! assert!(report.changed());
//! assert_eq!(tree.find_node(&NodeId::new("traits")).unwrap().status, Status::Available);
//! assert_eq!(tree.earned_xp(), 100);
//! ```

pub mod badge;
mod collection;
mod config;
mod error;
mod identity;
mod node;
pub mod progression;
mod state;
mod status;
pub mod streak;
mod tree;

pub use badge::{Badge, BadgeRule, BadgeStats};
pub use collection::{CategoryStats, SkillCollection};
pub use config::{ContainerPolicy, EngineConfig, ProgressionConfig};
pub use error::{Error, Result};
pub use identity::NodeId;
pub use node::{Node, NodeIter, NodePatch, QuizQuestion, Resource, ResourceKind};
pub use progression::{Level, Rank};
pub use state::{AppState, ProfileUpdate, UserProfile};
pub use status::{Status, Tier};
pub use streak::{Streak, StreakChange};
pub use tree::{seed_branches, CompletionReport, SkillTree, StatusBoard};
