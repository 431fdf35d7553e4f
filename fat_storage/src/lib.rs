//! # FAT Storage
//!
//! This crate implements the persistence layer of the FAT simulator.
//!
//! ## Philosophy
//!
//! **Everything is a whole-document write.**
//!
//! No incremental updates, no journaling, no partial writes:
//! - The FAT table is one JSON document, rewritten in full on every mutation
//! - Each content block is one independent JSON file, rewritten wholesale
//! - A file's content is never patched; modification replaces its entire chain
//!
//! ## Design
//!
//! - **BlockStore**: reads and writes fixed-size content blocks, one file per
//!   block, named deterministically from the owning file's name and the
//!   block's position in the chain
//! - **ChainCodec**: splits content into a linked block chain and reassembles
//!   it by traversal, tolerating broken chains
//! - **TableStore**: loads and saves the ordered list of file entries
//!
//! The layer assumes a single writer. Two callers mutating the table
//! concurrently will lose one side's update (last writer wins); the intended
//! caller is one interactive session.

use thiserror::Error;

pub mod block_store;
pub mod chain;
pub mod table;

pub use block_store::{Block, BlockRef, BlockStore, BLOCK_SIZE};
pub use chain::ChainCodec;
pub use table::{FileEntry, TableStore};

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum StoreError {
    /// Host filesystem access failed
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted record could not be parsed or written as JSON
    #[error("malformed persisted record: {0}")]
    Malformed(#[from] serde_json::Error),
}
