//! Payload loader
//!
//! Turns untrusted JSON (generator output, shared trees) and RON files into
//! validated core types. Nothing here touches engine state.

use crate::error::{Error, Result};
use crate::generator::ContentKind;
use crate::schema::node::convert_all;
use crate::schema::{RawContent, RawSubtree, RawTree, Rules};
use ron::extensions::Extensions;
use skillforge_core::{seed_branches, EngineConfig, Node, NodePatch, QuizQuestion, Resource, SkillTree};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

const TUTORIAL_HEADING: &str = "\n\n## Tutorial\n";

/// Validated study content for one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Resources(Vec<Resource>),
    Quiz(Vec<QuizQuestion>),
    Tutorial(String),
}

impl Content {
    /// The merge this content makes into `node`
    ///
    /// A tutorial is appended to the existing description under a heading.
    pub fn into_patch(self, node: &Node) -> NodePatch {
        match self {
            Content::Resources(resources) => NodePatch::new().resources(resources),
            Content::Quiz(quiz) => NodePatch::new().quiz(quiz),
            Content::Tutorial(text) => NodePatch::new().description(format!(
                "{}{}{}",
                node.description, TUTORIAL_HEADING, text
            )),
        }
    }
}

/// Loader for tree payloads
#[derive(Debug, Clone, Default)]
pub struct Loader {
    config: EngineConfig,
}

impl Loader {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generated payloads are depth-limited; imports of stored trees are not
    fn rules(&self, keep_progress: bool) -> Rules {
        Rules {
            max_depth: (!keep_progress).then_some(self.config.max_tree_depth),
            keep_progress,
        }
    }

    /// Parse a freshly generated tree
    ///
    /// Category precedence is `category`, then the payload's own, then the
    /// configured default. All progress in the payload is discarded and the
    /// first leaf is opened.
    pub fn parse_tree(&self, json: &str, category: Option<&str>) -> Result<SkillTree> {
        let raw: RawTree = serde_json::from_str(strip_fences(json))?;
        let mut tree = raw.into_tree(&self.config.default_category, &self.rules(false))?;
        if let Some(category) = category.filter(|c| !c.trim().is_empty()) {
            tree.category = category.to_string();
        }
        tree.seed_availability();
        tree.validate()?;
        debug!(tree = %tree.name, nodes = tree.node_count(), "generated tree parsed");
        Ok(tree)
    }

    /// Parse generated children for `parent`, found at `parent_depth`
    ///
    /// The first leaf is opened only when the parent itself is reachable.
    pub fn parse_subtree(&self, json: &str, parent: &Node, parent_depth: usize) -> Result<Vec<Node>> {
        let raw: RawSubtree = serde_json::from_str(strip_fences(json))?;
        let branches = raw
            .branches
            .ok_or_else(|| Error::MissingField("branches".to_string()))?;
        let mut children = convert_all(branches, "branches", parent_depth + 1, &self.rules(false))?;
        if children.is_empty() {
            warn!(node = %parent.id, "generated subtree is empty");
        }
        seed_branches(&mut children, !parent.status.is_locked());
        Ok(children)
    }

    /// Parse generated study content of the given kind
    pub fn parse_content(&self, json: &str, kind: ContentKind) -> Result<Content> {
        let raw: RawContent = serde_json::from_str(strip_fences(json))?;
        let missing = || Error::MissingField(kind.as_str().to_string());
        match kind {
            ContentKind::Resources => {
                let resources = raw
                    .resources
                    .ok_or_else(missing)?
                    .into_iter()
                    .enumerate()
                    .map(|(i, r)| r.into_resource(&format!("resources[{}]", i)))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Content::Resources(resources))
            }
            ContentKind::Quiz => {
                let quiz = raw
                    .quiz
                    .ok_or_else(missing)?
                    .into_iter()
                    .enumerate()
                    .map(|(i, q)| q.into_question(&format!("quiz[{}]", i)))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Content::Quiz(quiz))
            }
            ContentKind::Tutorial => {
                let text = raw
                    .tutorial
                    .filter(|t| !t.trim().is_empty())
                    .ok_or_else(missing)?;
                Ok(Content::Tutorial(text))
            }
        }
    }

    /// Parse a shared JSON tree, keeping its statuses and awarded XP
    pub fn import_str(&self, json: &str) -> Result<SkillTree> {
        let raw: RawTree = serde_json::from_str(strip_fences(json))?;
        self.finish_import(raw)
    }

    /// Parse a RON tree, keeping its statuses and awarded XP
    pub fn import_ron_str(&self, content: &str) -> Result<SkillTree> {
        let raw: RawTree = ron::Options::default()
            .with_default_extension(Extensions::IMPLICIT_SOME)
            .from_str(content)?;
        self.finish_import(raw)
    }

    fn finish_import(&self, raw: RawTree) -> Result<SkillTree> {
        let tree = raw.into_tree(&self.config.default_category, &self.rules(true))?;
        tree.validate()?;
        debug!(tree = %tree.name, nodes = tree.node_count(), "tree imported");
        Ok(tree)
    }

    /// Load a single `.json` or `.ron` tree file
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<SkillTree> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => self.import_str(&content),
            Some("ron") => self.import_ron_str(&content),
            _ => Err(Error::InvalidSchema(format!(
                "unsupported tree file: {:?}",
                path
            ))),
        }
    }

    /// Load every tree file under a directory, recursively, in path order
    pub fn load_directory(&self, path: impl AsRef<Path>) -> Result<Vec<SkillTree>> {
        let path = path.as_ref();

        if !path.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Not a directory: {:?}", path),
            )));
        }

        let mut entries = fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        entries.sort();

        let mut trees = Vec::new();
        for file_path in entries {
            if file_path.is_dir() {
                trees.extend(self.load_directory(&file_path)?);
            } else if matches!(
                file_path.extension().and_then(|e| e.to_str()),
                Some("json") | Some("ron")
            ) {
                trees.push(self.load_file(&file_path)?);
            }
        }
        Ok(trees)
    }

    /// Parse an engine configuration from RON
    pub fn load_config_str(content: &str) -> Result<EngineConfig> {
        Ok(ron::from_str(content)?)
    }

    /// Load an engine configuration file
    pub fn load_config_file(path: impl AsRef<Path>) -> Result<EngineConfig> {
        let content = fs::read_to_string(path)?;
        Self::load_config_str(&content)
    }
}

/// Drop a Markdown code fence around a generated payload
fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
