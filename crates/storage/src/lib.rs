//! Progress and goal storage for goalcast.
//!
//! This crate provides the store trait the analytics layer reads from,
//! with a JSON-file implementation and an in-memory one.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_storage;
pub mod memory;
pub mod sample;

pub use trait_::{monday_of, ProgressStore, Result, StorageError, RECENT_GOALS_LIMIT};
pub use json_storage::JsonStore;
pub use memory::MemoryStore;
pub use sample::generate_history;
