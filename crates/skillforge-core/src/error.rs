//! Error types for skillforge-core

use crate::NodeId;
use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Skill tree not found: {0}")]
    TreeNotFound(String),

    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// The node has children; it completes only once all of them are completed.
    #[error("Node {0} is a container and cannot be completed directly")]
    ContainerNode(NodeId),

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl Error {
    /// Whether this error is a lookup miss (tree or node)
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::TreeNotFound(_) | Error::NodeNotFound(_))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
