//! Skill Walkthrough
//!
//! Forges a skill tree from canned generator payloads, works through it node
//! by node, expands and enriches a node along the way, then persists the
//! resulting state.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use skillforge_core::{AppState, Node, NodeId, SkillTree, Status, StreakChange};
use skillforge_db::Store;
use skillforge_ingest::{
    ContentKind, ContentRequest, Error as IngestError, ExportFormat, Exporter, Forge, Loader,
    SubtreeRequest, TreeGenerator, TreeRequest,
};
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "skill_walkthrough")]
#[command(about = "Forge a skill tree from fixture payloads and work through it")]
struct Cli {
    /// Directory holding generator payloads (tree.json, subtree.json, ...)
    #[arg(short, long, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures"))]
    fixtures: PathBuf,

    /// Engine configuration (RON); defaults apply when absent
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Persist state to this database file instead of memory
    #[arg(long)]
    db: Option<PathBuf>,

    /// Skill to forge
    #[arg(long, default_value = "Rust")]
    skill: String,

    /// Category requested for the generated tree
    #[arg(long)]
    category: Option<String>,

    /// Node to expand with a generated subtree once it is reachable
    #[arg(long, default_value = "ownership")]
    expand: String,

    /// Format of the final export
    #[arg(long, value_enum, default_value_t = Format::Text)]
    export: Format,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Ron,
    Text,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => ExportFormat::Json,
            Format::Ron => ExportFormat::Ron,
            Format::Text => ExportFormat::Text,
        }
    }
}

/// Serves generator output from files in a directory
struct FixtureGenerator {
    dir: PathBuf,
}

impl FixtureGenerator {
    fn read(&self, name: &str) -> skillforge_ingest::Result<String> {
        let path = self.dir.join(name);
        fs::read_to_string(&path)
            .map_err(|e| IngestError::Upstream(format!("{}: {}", path.display(), e)))
    }
}

impl TreeGenerator for FixtureGenerator {
    fn generate_tree(&self, _request: &TreeRequest) -> skillforge_ingest::Result<String> {
        self.read("tree.json")
    }

    fn generate_subtree(&self, _request: &SubtreeRequest) -> skillforge_ingest::Result<String> {
        self.read("subtree.json")
    }

    fn generate_content(&self, request: &ContentRequest) -> skillforge_ingest::Result<String> {
        self.read(&format!("{}.json", request.kind.as_str()))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("=== Skillforge Walkthrough ===\n");

    let config = match &cli.config {
        Some(path) => Loader::load_config_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Default::default(),
    };
    let store = match &cli.db {
        Some(path) => Store::open(path)?,
        None => Store::in_memory()?,
    };
    let mut state = store.load_state_with(config.clone());

    match state.check_streak(Utc::now()) {
        StreakChange::Unchanged => {}
        change => println!("Streak {:?}: {} day(s)", change, state.streak.count),
    }

    let loader = Loader::new(config);
    let generator = FixtureGenerator {
        dir: cli.fixtures.clone(),
    };
    let forge = Forge::new(&generator, &loader);

    let request = TreeRequest::new(cli.skill.clone(), cli.category.as_deref());
    let tree_name = match forge.create_tree(&mut state, &request) {
        Ok(name) => name,
        Err(IngestError::DuplicateTree(name)) => {
            info!(tree = %name, "tree already forged, continuing");
            name
        }
        Err(e) => return Err(e).context("forging tree"),
    };
    state.set_active_tree(&tree_name)?;
    print_board(state.tree(&tree_name)?);

    let expand_id = NodeId::new(cli.expand.as_str());
    let mut expanded = false;

    while let Some(id) = next_leaf(state.tree(&tree_name)?) {
        if !expanded && is_available(state.tree(&tree_name)?, &expand_id) {
            expand_and_enrich(&forge, &mut state, &tree_name, &expand_id)?;
            expanded = true;
            continue;
        }

        let report = state.complete_node(&tree_name, &id)?;
        println!(
            "Completed {} (+{} XP){}{}",
            id,
            report.xp_awarded,
            if report.completed.len() > 1 {
                format!(", cascade: {}", join(&report.completed[1..]))
            } else {
                String::new()
            },
            if report.unlocked.is_empty() {
                String::new()
            } else {
                format!(", unlocked: {}", join(&report.unlocked))
            },
        );

        if let Some(level) = state.observe_level() {
            println!("  LEVEL UP! Now {} ({:?})", level, state.rank());
        }
        for badge in state.check_badges() {
            println!("  Badge unlocked: {}", badge);
        }
    }

    println!("\n=== Summary ===\n");
    println!("Total XP: {}", state.total_xp());
    println!(
        "Level: {} ({:?}), {:.0}% to next",
        state.level(),
        state.rank(),
        state.level_progress()
    );
    for stats in state.category_breakdown() {
        println!(
            "  {}: {} / {} XP ({}%)",
            stats.name, stats.earned, stats.total, stats.percent
        );
    }

    println!("\n=== Export ===\n");
    let tree = state.tree(&tree_name)?;
    println!("{}", Exporter::new(tree).export(cli.export.into())?);

    store.save_state(&state)?;
    if let Some(saved_at) = store.saved_at()? {
        println!("State saved at {}", saved_at.to_rfc3339());
    }

    Ok(())
}

fn expand_and_enrich(
    forge: &Forge<'_, FixtureGenerator>,
    state: &mut AppState,
    tree_name: &str,
    id: &NodeId,
) -> Result<()> {
    let count = forge.expand_node(state, tree_name, id)?;
    println!("\nExpanded {} into {} nodes", id, count);

    // containers only complete through their children
    if let Err(e) = state.complete_node(tree_name, id) {
        println!("Cannot complete {} directly: {}", id, e);
    }

    let first = state
        .tree(tree_name)?
        .find_node(id)
        .and_then(|node| node.children.first())
        .map(|child| child.id.clone());
    if let Some(child) = first {
        for kind in [ContentKind::Resources, ContentKind::Quiz, ContentKind::Tutorial] {
            forge.enrich_node(state, tree_name, &child, kind)?;
        }
        let (node, depth) = state.find_node_with_depth(tree_name, &child)?;
        println!(
            "Enriched {} (depth {}): {} resources, {} quiz questions",
            node.name,
            depth,
            node.resources.as_ref().map_or(0, Vec::len),
            node.quiz.as_ref().map_or(0, Vec::len)
        );
        state.update_node_notes(tree_name, &child, "Re-read the chapter on moves")?;
    }
    println!();
    print_board(state.tree(tree_name)?);
    Ok(())
}

fn next_leaf(tree: &SkillTree) -> Option<NodeId> {
    tree.status_board()
        .available
        .into_iter()
        .find(|node| node.is_leaf())
        .map(|node| node.id.clone())
}

fn is_available(tree: &SkillTree, id: &NodeId) -> bool {
    tree.find_node(id)
        .is_some_and(|node| node.status == Status::Available)
}

fn print_board(tree: &SkillTree) {
    let board = tree.status_board();
    let names = |nodes: &[&Node]| {
        nodes.iter().map(|n| n.name.as_str()).collect::<Vec<_>>().join(", ")
    };
    println!("{} [{}]", tree.name, tree.category);
    println!("  available: {}", names(&board.available));
    println!("  completed: {}", names(&board.completed));
    println!("  locked:    {}\n", names(&board.locked));
}

fn join(ids: &[NodeId]) -> String {
    ids.iter().map(NodeId::as_str).collect::<Vec<_>>().join(", ")
}
