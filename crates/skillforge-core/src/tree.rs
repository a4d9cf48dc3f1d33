//! Skill trees and the progress engine
//!
//! Completion runs as a single recursive descent over the ordered branch
//! lists. The target is located depth-first; on the way back up each level
//! re-evaluates its parent, so unlocking and ancestor completion happen in
//! one pass without back-pointers.

use crate::config::ContainerPolicy;
use crate::node::{find_mut, find_with_depth, NodeIter};
use crate::{Error, Node, NodeId, NodePatch, Result, Status};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub(crate) fn default_category() -> String {
    "Other".to_string()
}

/// One user-created learning goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillTree {
    /// Unique within a collection; acts as the primary key
    #[serde(rename = "skillName", alias = "name")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_category")]
    pub category: String,
    /// Target XP for the whole tree (informational)
    #[serde(default)]
    pub total_xp: u64,
    /// Root-level nodes in unlock order
    #[serde(default)]
    pub branches: Vec<Node>,
}

/// What a `complete_node` call changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionReport {
    /// The node the caller asked to complete
    pub target: NodeId,
    /// Nodes that transitioned into `completed`, target first, then ancestors
    pub completed: Vec<NodeId>,
    /// Nodes that transitioned from `locked` to `available`
    pub unlocked: Vec<NodeId>,
    /// XP awarded by this call
    pub xp_awarded: u64,
}

impl CompletionReport {
    fn new(target: &NodeId) -> Self {
        Self {
            target: target.clone(),
            ..Default::default()
        }
    }

    /// Whether any node changed status
    pub fn changed(&self) -> bool {
        !self.completed.is_empty()
    }
}

/// Nodes of a tree grouped by status, in pre-order
#[derive(Debug, Default)]
pub struct StatusBoard<'a> {
    pub available: Vec<&'a Node>,
    pub completed: Vec<&'a Node>,
    pub locked: Vec<&'a Node>,
}

enum Search {
    Missing,
    Found,
}

impl SkillTree {
    /// Create an empty tree in the default category
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            category: default_category(),
            total_xp: 0,
            branches: Vec::new(),
        }
    }

    /// Set the category (builder style)
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Iterate all nodes in depth-first pre-order
    pub fn iter(&self) -> NodeIter<'_> {
        NodeIter::over(&self.branches)
    }

    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Look up a node by id (first match in pre-order)
    pub fn find_node(&self, id: &NodeId) -> Option<&Node> {
        self.find_node_with_depth(id).map(|(node, _)| node)
    }

    /// Look up a node and its 1-based depth (root-level nodes have depth 1)
    pub fn find_node_with_depth(&self, id: &NodeId) -> Option<(&Node, usize)> {
        find_with_depth(&self.branches, id, 1)
    }

    /// Maximum depth over all branches; zero for an empty tree
    pub fn depth(&self) -> usize {
        self.branches.iter().map(Node::depth).max().unwrap_or(0)
    }

    /// Mark a leaf node completed and run the unlock cascade
    ///
    /// Containers are rejected with [`Error::ContainerNode`]. Completing an
    /// already-completed node returns an unchanged report.
    pub fn complete_node(&mut self, id: &NodeId) -> Result<CompletionReport> {
        self.complete_node_with(id, ContainerPolicy::Reject)
    }

    /// Mark a node completed under the given container policy
    ///
    /// Either the whole cascade is applied or, on error, nothing changes.
    pub fn complete_node_with(
        &mut self,
        id: &NodeId,
        policy: ContainerPolicy,
    ) -> Result<CompletionReport> {
        let mut report = CompletionReport::new(id);
        match complete_in(&mut self.branches, id, policy, &mut report)? {
            Search::Missing => Err(Error::NodeNotFound(id.clone())),
            Search::Found => {
                debug!(
                    tree = %self.name,
                    node = %id,
                    completed = report.completed.len(),
                    unlocked = report.unlocked.len(),
                    xp = report.xp_awarded,
                    "node completion applied"
                );
                Ok(report)
            }
        }
    }

    /// Replace a node's notes; no cascade
    pub fn update_node_notes(&mut self, id: &NodeId, notes: impl Into<String>) -> Result<()> {
        self.merge_node(id, NodePatch::new().notes(notes))
    }

    /// Shallow-merge fields into a node in place; no cascade
    pub fn merge_node(&mut self, id: &NodeId, patch: NodePatch) -> Result<()> {
        patch.validate()?;
        let node =
            find_mut(&mut self.branches, id).ok_or_else(|| Error::NodeNotFound(id.clone()))?;
        patch.apply(node);
        Ok(())
    }

    /// XP earned from completed nodes in this tree
    pub fn earned_xp(&self) -> u64 {
        self.iter().map(Node::earned_xp).sum()
    }

    /// Earned XP as a rounded percentage of `total_xp` (0 when the target is 0)
    pub fn progress_percent(&self) -> u32 {
        percent(self.earned_xp(), self.total_xp)
    }

    /// Number of nodes with the given status
    pub fn count_status(&self, status: Status) -> usize {
        self.iter().filter(|n| n.status == status).count()
    }

    /// Group nodes by status (kanban columns)
    pub fn status_board(&self) -> StatusBoard<'_> {
        let mut board = StatusBoard::default();
        for node in self.iter() {
            match node.status {
                Status::Available => board.available.push(node),
                Status::Completed => board.completed.push(node),
                Status::Locked => board.locked.push(node),
            }
        }
        board
    }

    /// Reset every node to `locked` and open the first leaf
    ///
    /// Applied to freshly generated trees: afterwards exactly one node is
    /// `available` (none if the tree is empty).
    pub fn seed_availability(&mut self) {
        seed_branches(&mut self.branches, true);
    }

    /// Check the minimal shape required to store the tree
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("skill tree name is empty".to_string()));
        }
        self.iter().try_for_each(Node::validate)
    }
}

/// Lock every node in `nodes`, then open the first leaf when `open` is set
///
/// The first leaf is found by descending the first-child chain.
pub fn seed_branches(nodes: &mut [Node], open: bool) {
    lock_all(nodes);
    if !open {
        return;
    }
    let mut cursor = nodes.first_mut();
    while let Some(node) = cursor {
        if node.is_leaf() {
            node.status = Status::Available;
            break;
        }
        cursor = node.children.first_mut();
    }
}

fn lock_all(nodes: &mut [Node]) {
    for node in nodes {
        node.status = Status::Locked;
        node.awarded_xp = None;
        lock_all(&mut node.children);
    }
}

pub(crate) fn percent(earned: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    ((earned as f64 / total as f64) * 100.0).round() as u32
}

fn complete_in(
    siblings: &mut [Node],
    id: &NodeId,
    policy: ContainerPolicy,
    report: &mut CompletionReport,
) -> Result<Search> {
    for i in 0..siblings.len() {
        if siblings[i].id == *id {
            let node = &mut siblings[i];
            if node.status.is_completed() {
                return Ok(Search::Found);
            }
            if node.is_container() && policy == ContainerPolicy::Reject {
                return Err(Error::ContainerNode(id.clone()));
            }
            mark_completed(node, report);
            for child in node.children.iter_mut() {
                unlock(child, report);
            }
            unlock_next(siblings, i, report);
            return Ok(Search::Found);
        }

        if siblings[i].is_container() {
            if let Search::Found = complete_in(&mut siblings[i].children, id, policy, report)? {
                let parent = &mut siblings[i];
                if report.changed()
                    && parent.all_children_completed()
                    && !parent.status.is_completed()
                {
                    mark_completed(parent, report);
                    unlock_next(siblings, i, report);
                }
                return Ok(Search::Found);
            }
        }
    }
    Ok(Search::Missing)
}

fn mark_completed(node: &mut Node, report: &mut CompletionReport) {
    node.status = Status::Completed;
    node.awarded_xp = Some(node.xp_reward);
    report.xp_awarded += u64::from(node.xp_reward);
    report.completed.push(node.id.clone());
}

fn unlock(node: &mut Node, report: &mut CompletionReport) {
    if node.status.is_locked() {
        node.status = Status::Available;
        report.unlocked.push(node.id.clone());
    }
}

fn unlock_next(siblings: &mut [Node], index: usize, report: &mut CompletionReport) {
    if let Some(next) = siblings.get_mut(index + 1) {
        unlock(next, report);
    }
}
