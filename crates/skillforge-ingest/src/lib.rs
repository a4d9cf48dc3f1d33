//! Skillforge Ingest - Generation boundary, import and export
//!
//! Everything that crosses into the engine from outside goes through here:
//! - **Loader**: validates untrusted JSON/RON payloads into core types
//! - **TreeGenerator**: the seam to the text-generation backend
//! - **Forge**: create, expand and enrich trees without ever half-applying
//! - **Exporter**: shareable JSON, RON, and a plain-text outline
//!
//! # Example
//!
//! ```rust,ignore
//! use skillforge_core::AppState;
//! use skillforge_ingest::{Exporter, Forge, Loader, TreeRequest};
//!
//! let mut state = AppState::new();
//! let loader = Loader::new(state.config().clone());
//! let forge = Forge::new(&my_generator, &loader);
//!
//! let name = forge.create_tree(&mut state, &TreeRequest::new("Rust", Some("Coding")))?;
//! let json = Exporter::new(state.tree(&name)?).to_json()?;
//! ```

mod error;
mod exporter;
mod forge;
mod generator;
mod loader;
mod schema;

pub use error::{Error, Result};
pub use exporter::{ExportFormat, Exporter};
pub use forge::Forge;
pub use generator::{ContentKind, ContentRequest, SubtreeRequest, TreeGenerator, TreeRequest};
pub use loader::{Content, Loader};
