//! Recursive node type and depth-first traversal

use crate::{Error, NodeId, Result, Status, Tier};
use serde::{Deserialize, Serialize};

/// Kind of a learning resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum ResourceKind {
    Video,
    Article,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Video => "video",
            ResourceKind::Article => "article",
        }
    }
}

impl TryFrom<String> for ResourceKind {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" => Ok(ResourceKind::Video),
            "article" => Ok(ResourceKind::Article),
            _ => Err(format!("unknown resource type: {}", s)),
        }
    }
}

impl From<ResourceKind> for &'static str {
    fn from(kind: ResourceKind) -> Self {
        kind.as_str()
    }
}

/// A learning resource attached to a node by content generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
}

impl Resource {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation("resource title is empty".to_string()));
        }
        Ok(())
    }
}

/// A multiple-choice quiz question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: usize,
}

impl QuizQuestion {
    /// A question needs text, at least one option, and an answer among them
    pub fn validate(&self) -> Result<()> {
        if self.question.trim().is_empty() {
            return Err(Error::Validation("quiz question is empty".to_string()));
        }
        if self.options.is_empty() {
            return Err(Error::Validation(format!(
                "quiz question '{}' has no options",
                self.question
            )));
        }
        if self.correct_index >= self.options.len() {
            return Err(Error::Validation(format!(
                "quiz question '{}': correctIndex {} is out of range for {} options",
                self.question,
                self.correct_index,
                self.options.len()
            )));
        }
        Ok(())
    }
}

/// One unit of a skill tree; may contain nested child nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub level: Tier,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objectives: Vec<String>,
    /// XP granted on the transition into `completed`
    pub xp_reward: u32,
    /// XP frozen at completion time; later `xp_reward` edits do not change it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub awarded_xp: Option<u32>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<Resource>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz: Option<Vec<QuizQuestion>>,
    /// Ordered children; sibling order defines the unlock chain
    #[serde(default, rename = "branches", alias = "children")]
    pub children: Vec<Node>,
}

impl Node {
    /// Create a locked leaf node
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, level: Tier, xp_reward: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            level,
            status: Status::Locked,
            description: String::new(),
            objectives: Vec::new(),
            xp_reward,
            awarded_xp: None,
            notes: String::new(),
            resources: None,
            quiz: None,
            children: Vec::new(),
        }
    }

    /// Set the status (builder style)
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Set the description (builder style)
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the children (builder style)
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// A childless node, completed only by direct user action
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// A node with children, completed only when all of them are
    pub fn is_container(&self) -> bool {
        !self.children.is_empty()
    }

    /// Whether every child is completed; false for leaves
    pub fn all_children_completed(&self) -> bool {
        self.is_container() && self.children.iter().all(|c| c.status.is_completed())
    }

    /// XP this node contributes to the aggregate (zero unless completed)
    pub fn earned_xp(&self) -> u64 {
        if self.status.is_completed() {
            u64::from(self.awarded_xp.unwrap_or(self.xp_reward))
        } else {
            0
        }
    }

    /// Iterate this node and all descendants in depth-first pre-order
    pub fn iter(&self) -> NodeIter<'_> {
        NodeIter { stack: vec![self] }
    }

    /// Check this node's own fields (not its children)
    pub fn validate(&self) -> Result<()> {
        if self.id.is_blank() {
            return Err(Error::Validation(format!("node '{}' has an empty id", self.name)));
        }
        if self.name.trim().is_empty() {
            return Err(Error::Validation(format!("node {} has an empty name", self.id)));
        }
        let in_node = |e: Error| match e {
            Error::Validation(message) => Error::Validation(format!("node {}: {}", self.id, message)),
            other => other,
        };
        for resource in self.resources.iter().flatten() {
            resource.validate().map_err(in_node)?;
        }
        for question in self.quiz.iter().flatten() {
            question.validate().map_err(in_node)?;
        }
        Ok(())
    }

    /// Maximum depth of this subtree (a leaf has depth 1)
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Node::depth).max().unwrap_or(0)
    }
}

/// Depth-first pre-order iterator over nodes
pub struct NodeIter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> NodeIter<'a> {
    pub(crate) fn over(nodes: &'a [Node]) -> Self {
        Self {
            stack: nodes.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// First match in pre-order, with its 1-based depth
pub(crate) fn find_with_depth<'a>(
    nodes: &'a [Node],
    id: &NodeId,
    depth: usize,
) -> Option<(&'a Node, usize)> {
    for node in nodes {
        if node.id == *id {
            return Some((node, depth));
        }
        if let Some(found) = find_with_depth(&node.children, id, depth + 1) {
            return Some(found);
        }
    }
    None
}

pub(crate) fn find_mut<'a>(nodes: &'a mut [Node], id: &NodeId) -> Option<&'a mut Node> {
    for node in nodes.iter_mut() {
        if node.id == *id {
            return Some(node);
        }
        if let Some(found) = find_mut(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}

/// Fields to shallow-merge into an existing node
///
/// `id` and `status` are deliberately absent: a merge never moves a node
/// through the status machine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub objectives: Option<Vec<String>>,
    pub notes: Option<String>,
    pub xp_reward: Option<u32>,
    pub resources: Option<Vec<Resource>>,
    pub quiz: Option<Vec<QuizQuestion>>,
    pub children: Option<Vec<Node>>,
}

impl NodePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn children(mut self, children: Vec<Node>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn resources(mut self, resources: Vec<Resource>) -> Self {
        self.resources = Some(resources);
        self
    }

    pub fn quiz(mut self, quiz: Vec<QuizQuestion>) -> Self {
        self.quiz = Some(quiz);
        self
    }

    pub fn xp_reward(mut self, xp_reward: u32) -> Self {
        self.xp_reward = Some(xp_reward);
        self
    }

    /// Check if the patch carries no fields
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the same rules a stored tree must satisfy
    pub fn validate(&self) -> Result<()> {
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(Error::Validation("patch sets an empty name".to_string()));
        }
        for resource in self.resources.iter().flatten() {
            resource.validate()?;
        }
        for question in self.quiz.iter().flatten() {
            question.validate()?;
        }
        for child in self.children.iter().flatten() {
            for node in child.iter() {
                node.validate()?;
            }
        }
        Ok(())
    }

    /// Merge the present fields into `node`
    pub fn apply(self, node: &mut Node) {
        if let Some(name) = self.name {
            node.name = name;
        }
        if let Some(description) = self.description {
            node.description = description;
        }
        if let Some(objectives) = self.objectives {
            node.objectives = objectives;
        }
        if let Some(notes) = self.notes {
            node.notes = notes;
        }
        if let Some(xp_reward) = self.xp_reward {
            node.xp_reward = xp_reward;
        }
        if let Some(resources) = self.resources {
            node.resources = Some(resources);
        }
        if let Some(quiz) = self.quiz {
            node.quiz = Some(quiz);
        }
        if let Some(children) = self.children {
            node.children = children;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Node> {
        vec![
            Node::new("a", "A", Tier::Basic, 100).with_children(vec![
                Node::new("a1", "A1", Tier::Basic, 10),
                Node::new("a2", "A2", Tier::Basic, 20)
                    .with_children(vec![Node::new("a2x", "A2x", Tier::Advanced, 5)]),
            ]),
            Node::new("b", "B", Tier::Intermediate, 200),
        ]
    }

    #[test]
    fn test_preorder_iteration() {
        let nodes = sample();
        let ids: Vec<&str> = NodeIter::over(&nodes).map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "a1", "a2", "a2x", "b"]);
    }

    #[test]
    fn test_find_with_depth() {
        let nodes = sample();
        let (node, depth) = find_with_depth(&nodes, &NodeId::new("a2x"), 1).unwrap();
        assert_eq!(node.name, "A2x");
        assert_eq!(depth, 3);
        assert_eq!(find_with_depth(&nodes, &NodeId::new("b"), 1).unwrap().1, 1);
        assert!(find_with_depth(&nodes, &NodeId::new("zzz"), 1).is_none());
    }

    #[test]
    fn test_find_first_match_wins() {
        let mut nodes = sample();
        nodes[1].children.push(Node::new("a1", "Duplicate", Tier::Basic, 1));
        let (node, depth) = find_with_depth(&nodes, &NodeId::new("a1"), 1).unwrap();
        assert_eq!(node.name, "A1");
        assert_eq!(depth, 2);
        assert_eq!(find_mut(&mut nodes, &NodeId::new("a1")).unwrap().name, "A1");
    }

    #[test]
    fn test_earned_xp_prefers_awarded() {
        let mut node = Node::new("n", "N", Tier::Basic, 50);
        assert_eq!(node.earned_xp(), 0);
        node.status = Status::Completed;
        assert_eq!(node.earned_xp(), 50);
        node.awarded_xp = Some(40);
        node.xp_reward = 999;
        assert_eq!(node.earned_xp(), 40);
    }

    #[test]
    fn test_leaf_never_reports_all_children_completed() {
        let leaf = Node::new("n", "N", Tier::Basic, 1);
        assert!(leaf.is_leaf());
        assert!(!leaf.all_children_completed());
    }

    #[test]
    fn test_patch_is_shallow() {
        let mut node = Node::new("n", "N", Tier::Basic, 1).with_description("old");
        node.notes = "keep me".to_string();
        NodePatch::new()
            .description("new")
            .children(vec![Node::new("c", "C", Tier::Basic, 2)])
            .apply(&mut node);
        assert_eq!(node.description, "new");
        assert_eq!(node.notes, "keep me");
        assert_eq!(node.children.len(), 1);
        assert!(NodePatch::new().is_empty());
    }

    #[test]
    fn test_quiz_validation() {
        let mut question = QuizQuestion {
            question: "Only choice?".to_string(),
            options: vec!["yes".to_string()],
            correct_index: 0,
        };
        assert!(question.validate().is_ok());
        question.correct_index = 1;
        assert!(matches!(question.validate(), Err(Error::Validation(_))));
        question.options.clear();
        question.correct_index = 0;
        assert!(question.validate().is_err());
    }

    #[test]
    fn test_patch_validation() {
        let bad_quiz = QuizQuestion {
            question: "?".to_string(),
            options: vec!["a".to_string(), "b".to_string()],
            correct_index: 5,
        };
        assert!(NodePatch::new().quiz(vec![bad_quiz]).validate().is_err());
        let blank_child = Node::new("c", "C", Tier::Basic, 1)
            .with_children(vec![Node::new(" ", "Nested", Tier::Basic, 1)]);
        assert!(NodePatch::new().children(vec![blank_child]).validate().is_err());
        let titleless = Resource {
            title: String::new(),
            url: None,
            search_query: None,
            kind: ResourceKind::Video,
        };
        assert!(NodePatch::new().resources(vec![titleless]).validate().is_err());
        assert!(NodePatch::new().notes("").validate().is_ok());
    }

    #[test]
    fn test_children_alias_on_deserialize() {
        let json = r#"{"id":"x","name":"X","level":"basic","xpReward":5,
            "children":[{"id":"y","name":"Y","level":"Basic","xpReward":1,"status":"AVAILABLE"}]}"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(node.status, Status::Locked);
        assert_eq!(node.children[0].status, Status::Available);
        assert_eq!(node.depth(), 2);
        let out = serde_json::to_string(&node).unwrap();
        assert!(out.contains("\"branches\""));
        assert!(out.contains("\"xpReward\":5"));
    }

    #[test]
    fn test_resource_kind_as_string() {
        let resource: Resource =
            serde_json::from_str(r#"{"title":"Docs","type":"Article","url":"https://doc.rust-lang.org"}"#)
                .unwrap();
        assert_eq!(resource.kind, ResourceKind::Article);
        let out = serde_json::to_string(&resource).unwrap();
        assert!(out.contains("\"type\":\"article\""));
        assert!(serde_json::from_str::<Resource>(r#"{"title":"x","type":"podcast"}"#).is_err());
    }
}
