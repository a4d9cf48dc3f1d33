//! Skill tree and subtree payload schemas

use super::node::{convert_all, RawNode};
use super::{required, xp_value, RawXp, Rules};
use crate::error::{Error, Result};
use serde::Deserialize;
use skillforge_core::SkillTree;

/// A full tree document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTree {
    #[serde(default, alias = "name")]
    pub skill_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub total_xp: Option<RawXp>,
    #[serde(default, alias = "children")]
    pub branches: Option<Vec<RawNode>>,
}

impl RawTree {
    /// Validate into a core tree
    ///
    /// A missing `totalXp` falls back to the sum of all node rewards.
    pub fn into_tree(self, fallback_category: &str, rules: &Rules) -> Result<SkillTree> {
        let name = required(self.skill_name, "skillName")?;
        let raw_branches = self
            .branches
            .ok_or_else(|| Error::MissingField("branches".to_string()))?;
        let branches = convert_all(raw_branches, "branches", 1, rules)?;

        let category = self
            .category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| fallback_category.to_string());

        let mut tree = SkillTree::new(name, self.description.unwrap_or_default())
            .with_category(category);
        tree.branches = branches;
        tree.total_xp = match self.total_xp {
            Some(xp) => xp_value(xp, u64::MAX, "totalXp")?,
            None => tree.iter().map(|n| u64::from(n.xp_reward)).sum(),
        };
        Ok(tree)
    }
}

/// Children generated for an existing node
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSubtree {
    #[serde(default, alias = "children")]
    pub branches: Option<Vec<RawNode>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: Rules = Rules {
        max_depth: Some(8),
        keep_progress: false,
    };

    #[test]
    fn test_tree_defaults() {
        let raw: RawTree = serde_json::from_str(
            r#"{"name":"Chess","branches":[
                {"id":"a","name":"Openings","level":"Basic","xpReward":100},
                {"id":"b","name":"Endgames","level":"Advanced","xpReward":250}]}"#,
        )
        .unwrap();
        let tree = raw.into_tree("Other", &RULES).unwrap();
        assert_eq!(tree.name, "Chess");
        assert_eq!(tree.category, "Other");
        assert_eq!(tree.total_xp, 350);
        assert_eq!(tree.branches.len(), 2);
    }

    #[test]
    fn test_tree_requires_name_and_branches() {
        let raw: RawTree = serde_json::from_str(r#"{"skillName":" ","branches":[]}"#).unwrap();
        assert!(matches!(
            raw.into_tree("Other", &RULES),
            Err(Error::MissingField(ref f)) if f == "skillName"
        ));
        let raw: RawTree = serde_json::from_str(r#"{"skillName":"Go"}"#).unwrap();
        assert!(matches!(
            raw.into_tree("Other", &RULES),
            Err(Error::MissingField(ref f)) if f == "branches"
        ));
    }

    #[test]
    fn test_payload_category_wins_over_fallback() {
        let raw: RawTree = serde_json::from_str(
            r#"{"skillName":"Go","category":"Coding","totalXp":10,"branches":[]}"#,
        )
        .unwrap();
        let tree = raw.into_tree("Other", &RULES).unwrap();
        assert_eq!(tree.category, "Coding");
        assert_eq!(tree.total_xp, 10);
    }
}
