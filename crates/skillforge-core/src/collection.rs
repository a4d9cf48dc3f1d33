//! A user's collection of skill trees

use crate::tree::percent;
use crate::{Error, Result, SkillTree};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// XP totals for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub name: String,
    /// Sum of the trees' `total_xp` targets
    pub total: u64,
    /// Sum of XP earned from completed nodes
    pub earned: u64,
    /// `round(100 * earned / total)`, 0 when `total` is 0
    pub percent: u32,
}

/// Skill trees keyed by name, in insertion order
///
/// Serializes as a plain list of trees.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<SkillTree>", into = "Vec<SkillTree>")]
pub struct SkillCollection {
    trees: IndexMap<String, SkillTree>,
}

impl SkillCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.trees.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&SkillTree> {
        self.trees.get(name)
    }

    /// Get a tree or fail with `TreeNotFound`
    pub fn require(&self, name: &str) -> Result<&SkillTree> {
        self.get(name)
            .ok_or_else(|| Error::TreeNotFound(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillTree> {
        self.trees.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.trees.keys().map(String::as_str)
    }

    /// Append a tree unless one with the same name exists
    ///
    /// Returns `false` (and changes nothing) on a name collision.
    pub fn add_tree(&mut self, tree: SkillTree) -> bool {
        if self.trees.contains_key(&tree.name) {
            return false;
        }
        self.trees.insert(tree.name.clone(), tree);
        true
    }

    /// Validate and store a tree, replacing any tree with the same name wholesale
    ///
    /// A replaced tree keeps its position in the collection.
    pub fn import_tree(&mut self, tree: SkillTree) -> Result<()> {
        tree.validate()?;
        self.trees.insert(tree.name.clone(), tree);
        Ok(())
    }

    /// Store a tree under its name without validation
    pub(crate) fn put(&mut self, tree: SkillTree) {
        self.trees.insert(tree.name.clone(), tree);
    }

    pub fn remove_tree(&mut self, name: &str) -> Option<SkillTree> {
        self.trees.shift_remove(name)
    }

    /// Sum of earned XP across every tree
    pub fn total_xp(&self) -> u64 {
        self.iter().map(SkillTree::earned_xp).sum()
    }

    /// Target and earned XP grouped by category, in first-seen order
    pub fn category_breakdown(&self) -> Vec<CategoryStats> {
        let mut buckets: IndexMap<&str, (u64, u64)> = IndexMap::new();
        for tree in self.iter() {
            let bucket = buckets.entry(tree.category.as_str()).or_default();
            bucket.0 += tree.total_xp;
            bucket.1 += tree.earned_xp();
        }
        buckets
            .into_iter()
            .map(|(name, (total, earned))| CategoryStats {
                name: name.to_string(),
                total,
                earned,
                percent: percent(earned, total),
            })
            .collect()
    }
}

impl From<Vec<SkillTree>> for SkillCollection {
    fn from(trees: Vec<SkillTree>) -> Self {
        let mut collection = Self::new();
        for tree in trees {
            collection.put(tree);
        }
        collection
    }
}

impl From<SkillCollection> for Vec<SkillTree> {
    fn from(collection: SkillCollection) -> Self {
        collection.trees.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Node, NodeId, Status, Tier};

    fn tree(name: &str, category: &str, total_xp: u64, done_xp: u32) -> SkillTree {
        let mut tree = SkillTree::new(name, "").with_category(category);
        tree.total_xp = total_xp;
        tree.branches = vec![
            Node::new("done", "Done", Tier::Basic, done_xp).with_status(Status::Completed),
            Node::new("todo", "Todo", Tier::Basic, 1000).with_status(Status::Available),
        ];
        tree
    }

    #[test]
    fn test_add_tree_keeps_existing() {
        let mut collection = SkillCollection::new();
        assert!(collection.add_tree(tree("Rust", "Coding", 100, 10)));
        assert!(!collection.add_tree(tree("Rust", "Coding", 999, 99)));
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.require("Rust").unwrap().total_xp, 100);
    }

    #[test]
    fn test_import_replaces_wholesale() {
        let mut collection = SkillCollection::new();
        collection.add_tree(tree("Rust", "Coding", 100, 10));
        collection.add_tree(tree("Piano", "Music", 100, 10));

        let mut fresh = tree("Rust", "Coding", 500, 0);
        fresh.branches[0].status = Status::Locked;
        collection.import_tree(fresh.clone()).unwrap();

        assert_eq!(collection.len(), 2);
        assert_eq!(collection.names().collect::<Vec<_>>(), vec!["Rust", "Piano"]);
        let stored = collection.require("Rust").unwrap();
        assert_eq!(stored, &fresh);
        assert_eq!(
            stored.find_node(&NodeId::new("done")).unwrap().status,
            Status::Locked
        );
    }

    #[test]
    fn test_import_rejects_invalid() {
        let mut collection = SkillCollection::new();
        let result = collection.import_tree(SkillTree::new("", ""));
        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(collection.is_empty());
    }

    #[test]
    fn test_total_xp() {
        let mut collection = SkillCollection::new();
        collection.add_tree(tree("Rust", "Coding", 100, 10));
        collection.add_tree(tree("Go", "Coding", 100, 25));
        assert_eq!(collection.total_xp(), 35);
    }

    #[test]
    fn test_category_breakdown() {
        let mut collection = SkillCollection::new();
        collection.add_tree(tree("Rust", "Coding", 100, 10));
        collection.add_tree(tree("Piano", "Music", 0, 40));
        collection.add_tree(tree("Go", "Coding", 300, 90));

        let stats = collection.category_breakdown();
        assert_eq!(
            stats,
            vec![
                CategoryStats {
                    name: "Coding".to_string(),
                    total: 400,
                    earned: 100,
                    percent: 25,
                },
                CategoryStats {
                    name: "Music".to_string(),
                    total: 0,
                    earned: 40,
                    percent: 0,
                },
            ]
        );
    }

    #[test]
    fn test_serializes_as_list() {
        let mut collection = SkillCollection::new();
        collection.add_tree(tree("Rust", "Coding", 100, 10));
        let json = serde_json::to_string(&collection).unwrap();
        assert!(json.starts_with('['));
        let back: SkillCollection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, collection);
    }
}
