//! Node payload schema

use super::content::{RawQuiz, RawResource};
use super::{required, reward_value, RawXp, Rules};
use crate::error::{Error, Result};
use serde::Deserialize;
use skillforge_core::{Node, NodeId, Status, Tier};

/// A node as it arrives from a generator or an import file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNode {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub objectives: Option<Vec<String>>,
    #[serde(default)]
    pub xp_reward: Option<RawXp>,
    #[serde(default)]
    pub awarded_xp: Option<RawXp>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub resources: Option<Vec<RawResource>>,
    #[serde(default)]
    pub quiz: Option<Vec<RawQuiz>>,
    #[serde(default, alias = "children")]
    pub branches: Option<Vec<RawNode>>,
}

impl RawNode {
    /// Validate into a core node; `depth` is 1 for root-level nodes
    pub fn into_node(self, path: &str, depth: usize, rules: &Rules) -> Result<Node> {
        if let Some(max_depth) = rules.max_depth.filter(|max| depth > *max) {
            return Err(Error::InvalidSchema(format!(
                "{}: nesting deeper than {} levels",
                path, max_depth
            )));
        }

        let id = required(self.id, &format!("{}.id", path))?;
        let name = required(self.name, &format!("{}.name", path))?;
        let level = required(self.level, &format!("{}.level", path))?;
        let level: Tier = level
            .parse()
            .map_err(|e| Error::InvalidSchema(format!("{}.level: {}", path, e)))?;
        let xp_reward = match self.xp_reward {
            Some(xp) => reward_value(xp, &format!("{}.xpReward", path))?,
            None => return Err(Error::MissingField(format!("{}.xpReward", path))),
        };

        let (status, awarded_xp) = if rules.keep_progress {
            let status = self
                .status
                .as_deref()
                .map(Status::parse_or_locked)
                .unwrap_or_default();
            let awarded = match self.awarded_xp {
                Some(xp) if status.is_completed() => {
                    Some(reward_value(xp, &format!("{}.awardedXp", path))?)
                }
                _ => None,
            };
            (status, awarded)
        } else {
            (Status::Locked, None)
        };

        let resources = self
            .resources
            .map(|list| {
                list.into_iter()
                    .enumerate()
                    .map(|(i, r)| r.into_resource(&format!("{}.resources[{}]", path, i)))
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?;
        let quiz = self
            .quiz
            .map(|list| {
                list.into_iter()
                    .enumerate()
                    .map(|(i, q)| q.into_question(&format!("{}.quiz[{}]", path, i)))
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?;

        let children = self
            .branches
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, child)| {
                child.into_node(&format!("{}.branches[{}]", path, i), depth + 1, rules)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Node {
            id: NodeId::new(id),
            name,
            level,
            status,
            description: self.description.unwrap_or_default(),
            objectives: self.objectives.unwrap_or_default(),
            xp_reward,
            awarded_xp,
            notes: self.notes.unwrap_or_default(),
            resources,
            quiz,
            children,
        })
    }
}

/// Convert a list of raw nodes, tagging errors with `prefix[i]`
pub(crate) fn convert_all(
    nodes: Vec<RawNode>,
    prefix: &str,
    depth: usize,
    rules: &Rules,
) -> Result<Vec<Node>> {
    nodes
        .into_iter()
        .enumerate()
        .map(|(i, node)| node.into_node(&format!("{}[{}]", prefix, i), depth, rules))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENERATE: Rules = Rules {
        max_depth: Some(3),
        keep_progress: false,
    };
    const IMPORT: Rules = Rules {
        max_depth: None,
        keep_progress: true,
    };

    fn parse(json: &str) -> RawNode {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_generated_node_is_locked() {
        let raw = parse(
            r#"{"id":"n1","name":"Ownership","level":"basic","status":"completed",
                "xpReward":120,"awardedXp":120,"description":"Moves and borrows"}"#,
        );
        let node = raw.into_node("branches[0]", 1, &GENERATE).unwrap();
        assert_eq!(node.status, Status::Locked);
        assert_eq!(node.awarded_xp, None);
        assert_eq!(node.level, Tier::Basic);
        assert_eq!(node.xp_reward, 120);
    }

    #[test]
    fn test_import_keeps_progress() {
        let raw = parse(
            r#"{"id":"n1","name":"Ownership","level":"Basic","status":"Completed",
                "xpReward":150,"awardedXp":100}"#,
        );
        let node = raw.into_node("branches[0]", 1, &IMPORT).unwrap();
        assert_eq!(node.status, Status::Completed);
        assert_eq!(node.awarded_xp, Some(100));
    }

    #[test]
    fn test_unknown_status_becomes_locked() {
        let raw = parse(r#"{"id":"n","name":"N","level":"Basic","status":"wip","xpReward":1}"#);
        assert_eq!(raw.into_node("n", 1, &IMPORT).unwrap().status, Status::Locked);
    }

    #[test]
    fn test_missing_field_reports_path() {
        let raw = parse(
            r#"{"id":"a","name":"A","level":"Basic","xpReward":10,
                "children":[{"id":"b","level":"Basic","xpReward":5}]}"#,
        );
        let err = raw.into_node("branches[2]", 1, &GENERATE).unwrap_err();
        assert!(matches!(err, Error::MissingField(ref p) if p == "branches[2].branches[0].name"));
    }

    #[test]
    fn test_rejects_bad_tier_and_negative_xp() {
        let raw = parse(r#"{"id":"a","name":"A","level":"Legendary","xpReward":10}"#);
        assert!(matches!(
            raw.into_node("x", 1, &GENERATE),
            Err(Error::InvalidSchema(_))
        ));
        let raw = parse(r#"{"id":"a","name":"A","level":"Basic","xpReward":-5}"#);
        assert!(matches!(
            raw.into_node("x", 1, &GENERATE),
            Err(Error::InvalidSchema(_))
        ));
    }

    #[test]
    fn test_depth_limit() {
        let raw = parse(
            r#"{"id":"a","name":"A","level":"Basic","xpReward":1,"branches":[
                {"id":"b","name":"B","level":"Basic","xpReward":1,"branches":[
                    {"id":"c","name":"C","level":"Basic","xpReward":1,"branches":[
                        {"id":"d","name":"D","level":"Basic","xpReward":1}]}]}]}"#,
        );
        let err = raw.clone().into_node("a", 1, &GENERATE).unwrap_err();
        assert!(err.to_string().contains("deeper than 3"));
        let relaxed = Rules {
            max_depth: Some(4),
            ..GENERATE
        };
        assert_eq!(raw.clone().into_node("a", 1, &relaxed).unwrap().depth(), 4);
        assert_eq!(raw.into_node("a", 1, &IMPORT).unwrap().depth(), 4);
    }
}
