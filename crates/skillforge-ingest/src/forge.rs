//! Generation flows against application state
//!
//! Each flow performs every fallible step (lookup, generation, parsing,
//! validation) before its single mutation of [`AppState`], so an error
//! always leaves the state exactly as it was.

use crate::error::{Error, Result};
use crate::generator::{ContentKind, ContentRequest, SubtreeRequest, TreeGenerator, TreeRequest};
use crate::loader::Loader;
use skillforge_core::{AppState, NodeId, NodePatch};
use tracing::{info, warn};

/// Drives a [`TreeGenerator`] through a [`Loader`]
pub struct Forge<'a, G: TreeGenerator + ?Sized> {
    generator: &'a G,
    loader: &'a Loader,
}

impl<'a, G: TreeGenerator + ?Sized> Forge<'a, G> {
    pub fn new(generator: &'a G, loader: &'a Loader) -> Self {
        Self { generator, loader }
    }

    /// Generate a new tree and add it; returns the tree's name
    ///
    /// A name that is already taken is an error; existing trees are never
    /// replaced by generation.
    pub fn create_tree(&self, state: &mut AppState, request: &TreeRequest) -> Result<String> {
        if request.skill.trim().is_empty() {
            return Err(Error::MissingField("skill".to_string()));
        }
        let text = self.generator.generate_tree(request).map_err(|e| {
            warn!(skill = %request.skill, error = %e, "tree generation failed");
            e
        })?;
        let tree = self.loader.parse_tree(&text, request.category.as_deref())?;
        let name = tree.name.clone();
        if !state.add_tree(tree) {
            return Err(Error::DuplicateTree(name));
        }
        info!(tree = %name, "tree forged");
        Ok(name)
    }

    /// Replace a node's children with a generated subtree; returns the child count
    pub fn expand_node(&self, state: &mut AppState, tree_name: &str, id: &NodeId) -> Result<usize> {
        let children = {
            let tree = state.tree(tree_name)?;
            let (node, depth) = state.find_node_with_depth(tree_name, id)?;
            let request = SubtreeRequest {
                skill: tree.name.clone(),
                node_name: node.name.clone(),
                node_description: node.description.clone(),
            };
            let text = self.generator.generate_subtree(&request)?;
            self.loader.parse_subtree(&text, node, depth)?
        };
        let count = children.len();
        state.merge_node(tree_name, id, NodePatch::new().children(children))?;
        info!(tree = tree_name, node = %id, children = count, "node expanded");
        Ok(count)
    }

    /// Generate study content of `kind` and merge it into a node
    pub fn enrich_node(
        &self,
        state: &mut AppState,
        tree_name: &str,
        id: &NodeId,
        kind: ContentKind,
    ) -> Result<()> {
        let patch = {
            let tree = state.tree(tree_name)?;
            let (node, _) = state.find_node_with_depth(tree_name, id)?;
            let request = ContentRequest {
                skill: tree.name.clone(),
                node_name: node.name.clone(),
                node_description: node.description.clone(),
                kind,
            };
            let text = self.generator.generate_content(&request)?;
            self.loader.parse_content(&text, kind)?.into_patch(node)
        };
        state.merge_node(tree_name, id, patch)?;
        info!(tree = tree_name, node = %id, kind = kind.as_str(), "node enriched");
        Ok(())
    }
}
