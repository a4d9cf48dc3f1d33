//! Export a skill tree to various formats

use crate::{Error, Result};
use skillforge_core::{Node, SkillTree, Status};
use std::fmt::Write as _;
use std::io::Write;

/// Export format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Pretty JSON; the shareable import format
    Json,
    /// RON format (Rust Object Notation)
    Ron,
    /// Human-readable outline with status markers
    Text,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Ron => "ron",
            ExportFormat::Text => "txt",
        }
    }
}

/// Exporter for one tree
pub struct Exporter<'a> {
    tree: &'a SkillTree,
}

impl<'a> Exporter<'a> {
    pub fn new(tree: &'a SkillTree) -> Self {
        Self { tree }
    }

    /// Export to a string in the specified format
    pub fn export(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Json => self.to_json(),
            ExportFormat::Ron => self.to_ron(),
            ExportFormat::Text => Ok(self.to_text()),
        }
    }

    /// Export to a writer
    pub fn export_to<W: Write>(&self, writer: &mut W, format: ExportFormat) -> Result<()> {
        let content = self.export(format)?;
        writer.write_all(content.as_bytes())?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self.tree).map_err(|e| Error::Serialization(e.to_string()))
    }

    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self.tree, ron::ser::PrettyConfig::default())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Outline: `[x]` completed, `[ ]` available, `[-]` locked
    pub fn to_text(&self) -> String {
        let tree = self.tree;
        let mut output = String::new();

        let _ = writeln!(output, "=== {} ===", tree.name);
        let _ = writeln!(output, "Category: {}", tree.category);
        if !tree.description.is_empty() {
            let _ = writeln!(output, "{}", tree.description);
        }
        let _ = writeln!(
            output,
            "Progress: {} / {} XP ({}%)",
            tree.earned_xp(),
            tree.total_xp,
            tree.progress_percent()
        );
        let _ = writeln!(
            output,
            "Nodes: {} completed, {} available, {} locked",
            tree.count_status(Status::Completed),
            tree.count_status(Status::Available),
            tree.count_status(Status::Locked)
        );
        output.push('\n');

        for node in &tree.branches {
            write_node(&mut output, node, 0);
        }
        output
    }
}

fn marker(status: Status) -> &'static str {
    match status {
        Status::Completed => "[x]",
        Status::Available => "[ ]",
        Status::Locked => "[-]",
    }
}

fn write_node(output: &mut String, node: &Node, indent: usize) {
    let pad = "  ".repeat(indent);
    let _ = writeln!(
        output,
        "{}{} {} ({}, {} XP)",
        pad,
        marker(node.status),
        node.name,
        node.level,
        node.xp_reward
    );
    if !node.notes.is_empty() {
        let _ = writeln!(output, "{}      note: {}", pad, node.notes);
    }
    for child in &node.children {
        write_node(output, child, indent + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Loader;
    use skillforge_core::{
        EngineConfig, NodeId, NodePatch, QuizQuestion, Resource, ResourceKind, Tier,
    };

    fn create_test_tree() -> SkillTree {
        let mut tree = SkillTree::new("Rust", "Systems programming").with_category("Coding");
        tree.total_xp = 400;
        let mut basics = Node::new("basics", "Basics", Tier::Basic, 100).with_children(vec![
            Node::new("vars", "Variables", Tier::Basic, 50),
            Node::new("fns", "Functions", Tier::Basic, 50),
        ]);
        basics.children[0].resources = Some(vec![Resource {
            title: "The Book".to_string(),
            url: Some("https://doc.rust-lang.org/book".to_string()),
            search_query: None,
            kind: ResourceKind::Article,
        }]);
        basics.children[1].quiz = Some(vec![QuizQuestion {
            question: "Keyword for functions?".to_string(),
            options: vec!["fn".to_string(), "def".to_string()],
            correct_index: 0,
        }]);
        tree.branches.push(basics);
        tree.branches.push(Node::new("traits", "Traits", Tier::Intermediate, 200));
        tree.seed_availability();
        tree.complete_node(&NodeId::new("vars")).unwrap();
        tree.update_node_notes(&NodeId::new("vars"), "let vs let mut").unwrap();
        tree
    }

    #[test]
    fn test_json_round_trip() {
        let tree = create_test_tree();
        let json = Exporter::new(&tree).to_json().unwrap();
        assert!(json.contains("\"skillName\": \"Rust\""));
        assert!(json.contains("\"awardedXp\": 50"));

        let imported = Loader::new(EngineConfig::default()).import_str(&json).unwrap();
        assert_eq!(imported, tree);
    }

    #[test]
    fn test_ron_round_trip() {
        let tree = create_test_tree();
        let ron = Exporter::new(&tree).to_ron().unwrap();
        let imported = Loader::new(EngineConfig::default())
            .import_ron_str(&ron)
            .unwrap();
        assert_eq!(imported, tree);
    }

    /// Round-trip through both formats with the default engine config
    fn assert_reimports(tree: &SkillTree) {
        let loader = Loader::new(EngineConfig::default());
        let exporter = Exporter::new(tree);
        assert_eq!(&loader.import_str(&exporter.to_json().unwrap()).unwrap(), tree);
        assert_eq!(&loader.import_ron_str(&exporter.to_ron().unwrap()).unwrap(), tree);
    }

    #[test]
    fn test_large_total_xp_reimports() {
        let mut tree = create_test_tree();
        tree.total_xp = 5_000_000_000;
        assert_reimports(&tree);
    }

    #[test]
    fn test_single_option_quiz_reimports() {
        let mut tree = create_test_tree();
        tree.merge_node(
            &NodeId::new("traits"),
            NodePatch::new().quiz(vec![QuizQuestion {
                question: "Is Rust memory safe?".to_string(),
                options: vec!["yes".to_string()],
                correct_index: 0,
            }]),
        )
        .unwrap();
        assert_reimports(&tree);
    }

    #[test]
    fn test_tree_deeper_than_generation_limit_reimports() {
        let depth = EngineConfig::default().max_tree_depth + 1;
        let mut chain = Node::new(format!("n{}", depth), "Leaf", Tier::Advanced, 10);
        for level in (1..depth).rev() {
            chain = Node::new(format!("n{}", level), format!("Level {}", level), Tier::Basic, 10)
                .with_children(vec![chain]);
        }
        let mut tree = SkillTree::new("Deep", "Nested topics").with_category("Coding");
        tree.total_xp = 90;
        tree.branches.push(chain);
        tree.seed_availability();
        tree.complete_node(&NodeId::new(format!("n{}", depth))).unwrap();
        assert_eq!(tree.depth(), depth);
        assert_reimports(&tree);
    }

    #[test]
    fn test_text_outline() {
        let tree = create_test_tree();
        let text = Exporter::new(&tree).to_text();
        assert!(text.starts_with("=== Rust ===\n"));
        assert!(text.contains("Progress: 50 / 400 XP (13%)"));
        assert!(text.contains("[-] Basics (Basic, 100 XP)"));
        assert!(text.contains("  [x] Variables (Basic, 50 XP)"));
        assert!(text.contains("note: let vs let mut"));
        assert!(text.contains("  [ ] Functions"));
        assert!(text.contains("[-] Traits"));
    }

    #[test]
    fn test_export_to_writer() {
        let tree = create_test_tree();
        let mut buffer = Vec::new();
        Exporter::new(&tree)
            .export_to(&mut buffer, ExportFormat::Json)
            .unwrap();
        let json = String::from_utf8(buffer).unwrap();
        assert_eq!(json, Exporter::new(&tree).to_json().unwrap());
        assert_eq!(ExportFormat::Ron.extension(), "ron");
    }
}
