//! Storage layer for LifeTrack.
//!
//! Keyed JSON collections on top of sled: one tree per collection, values
//! are `serde_json` documents.

mod collection;
mod config;
mod engine;

pub use collection::{decode, encode, id_key, Collection};
pub use config::StorageConfig;
pub use engine::Store;
