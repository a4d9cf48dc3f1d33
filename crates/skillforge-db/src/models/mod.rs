//! Database models for persistent storage.

mod snapshot;

pub use snapshot::*;
