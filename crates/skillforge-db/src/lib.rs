//! Skillforge DB - Persistence layer using native_db
//!
//! The whole application state is stored as one JSON document under a fixed
//! key, next to the time it was written. Loading never fails the caller:
//! a missing or unreadable document yields the empty default state.

mod error;
mod models;
mod store;

pub use error::{Error, Result};
pub use models::STORAGE_KEY;
pub use store::Store;
