//! Identity type for tree nodes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node within its owning tree
///
/// Ids are assigned by the generator and are only unique per tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Create a new node ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether the ID is empty or whitespace
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let id = NodeId::new("rust_basics");
        assert_eq!(id.as_str(), "rust_basics");
        assert_eq!(format!("{}", id), "rust_basics");
        assert!(id == *"rust_basics");
    }

    #[test]
    fn test_blank_id() {
        assert!(NodeId::new("  ").is_blank());
        assert!(!NodeId::new("a").is_blank());
    }

    #[test]
    fn test_default_id_is_blank() {
        assert!(NodeId::default().is_blank());
        assert_eq!(crate::CompletionReport::default().target, NodeId::default());
    }
}
