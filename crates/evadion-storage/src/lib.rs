//! Evadion Storage Layer
//!
//! Synchronous key-value persistence for the session snapshot, bookmarks and
//! history. Every operation is fallible; callers decide whether a failure
//! matters (for browser state it never does).

mod database;
mod error;
mod migrations;
mod store;
pub mod transfer;

pub use database::Database;
pub use error::StorageError;
pub use store::{KeyValueStore, MemoryStore};

pub type Result<T> = std::result::Result<T, StorageError>;
