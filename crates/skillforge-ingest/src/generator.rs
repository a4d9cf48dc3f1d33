//! The seam to the text-generation backend
//!
//! Generators return raw text; everything they produce is validated by the
//! [`Loader`](crate::Loader) before it can touch engine state.

use crate::error::Result;

/// Request for a brand-new tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRequest {
    pub skill: String,
    /// Requested category; overrides whatever the payload says
    pub category: Option<String>,
}

impl TreeRequest {
    pub fn new(skill: impl Into<String>, category: Option<&str>) -> Self {
        Self {
            skill: skill.into(),
            category: category.map(str::to_string),
        }
    }
}

/// Request for the children of an existing node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtreeRequest {
    pub skill: String,
    pub node_name: String,
    pub node_description: String,
}

/// Kind of study content to generate for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Resources,
    Quiz,
    Tutorial,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Resources => "resources",
            ContentKind::Quiz => "quiz",
            ContentKind::Tutorial => "tutorial",
        }
    }
}

/// Request for study content on an existing node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRequest {
    pub skill: String,
    pub node_name: String,
    pub node_description: String,
    pub kind: ContentKind,
}

/// A backend that turns requests into JSON text
///
/// Failures are reported as [`Error::Upstream`](crate::Error::Upstream).
pub trait TreeGenerator {
    fn generate_tree(&self, request: &TreeRequest) -> Result<String>;

    fn generate_subtree(&self, request: &SubtreeRequest) -> Result<String>;

    fn generate_content(&self, request: &ContentRequest) -> Result<String>;
}

impl<G: TreeGenerator + ?Sized> TreeGenerator for &G {
    fn generate_tree(&self, request: &TreeRequest) -> Result<String> {
        (**self).generate_tree(request)
    }

    fn generate_subtree(&self, request: &SubtreeRequest) -> Result<String> {
        (**self).generate_subtree(request)
    }

    fn generate_content(&self, request: &ContentRequest) -> Result<String> {
        (**self).generate_content(request)
    }
}
