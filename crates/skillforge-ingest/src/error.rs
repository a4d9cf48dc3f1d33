//! Error types for skillforge-ingest

use thiserror::Error;

/// Ingestion error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Core error: {0}")]
    Core(#[from] skillforge_core::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Duplicate tree: {0}")]
    DuplicateTree(String),

    /// The generation backend failed or returned nothing usable
    #[error("Generation failed: {0}")]
    Upstream(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Malformed input: bad shape, missing fields, unparsable text
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::Json(_)
                | Error::Ron(_)
                | Error::InvalidSchema(_)
                | Error::MissingField(_)
                | Error::Core(skillforge_core::Error::Validation(_))
        )
    }

    /// Failure of the generation collaborator itself
    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::Upstream(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Core(e) if e.is_not_found())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
