//! Fixed-size content blocks persisted as independent records
//!
//! Each block is one JSON file holding its payload, a reference to the next
//! block in the chain (or none), and an explicit end-of-chain flag. There is
//! no transactional grouping across blocks.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Number of content bytes per block
///
/// Part of the on-disk format: implementations sharing state must agree.
pub const BLOCK_SIZE: usize = 20;

/// Opaque reference to a persisted block
///
/// Internally a host path, but callers only obtain refs from the store and
/// hand them back for traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRef(PathBuf);

impl BlockRef {
    /// Creates a reference from a raw path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Returns the referenced path
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for BlockRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// One persisted chunk of file content
///
/// `is_last` is redundant with `next_ref` being none, but both are persisted
/// and must stay consistent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Content slice, at most [`BLOCK_SIZE`] bytes
    pub payload: String,
    /// Reference to the next block in the chain
    pub next_ref: Option<BlockRef>,
    /// End-of-chain flag
    pub is_last: bool,
}

/// Reads and writes blocks inside one blocks directory
#[derive(Debug)]
pub struct BlockStore {
    blocks_dir: PathBuf,
}

impl BlockStore {
    /// Opens a store rooted at `blocks_dir`, creating the directory if missing
    pub fn create(blocks_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let blocks_dir = blocks_dir.into();
        fs::create_dir_all(&blocks_dir)?;
        Ok(Self { blocks_dir })
    }

    /// Deterministic reference for a file's block at a chain position
    pub fn block_ref(&self, name: &str, index: usize) -> BlockRef {
        BlockRef(self.blocks_dir.join(format!("{}_block{}.json", name, index)))
    }

    /// Writes one block and returns its reference
    pub fn write_block(
        &self,
        name: &str,
        index: usize,
        payload: &str,
        next_ref: Option<BlockRef>,
        is_last: bool,
    ) -> Result<BlockRef, StoreError> {
        let block = Block {
            payload: payload.to_string(),
            next_ref,
            is_last,
        };
        let reference = self.block_ref(name, index);
        fs::write(reference.as_path(), serde_json::to_string_pretty(&block)?)?;
        Ok(reference)
    }

    /// Reads a block, returning `Ok(None)` when the referenced file is gone
    ///
    /// Missing blocks are a tolerated state (the chain codec stops there);
    /// unreadable or malformed files are real errors.
    pub fn read_block(&self, reference: &BlockRef) -> Result<Option<Block>, StoreError> {
        let data = match fs::read_to_string(reference.as_path()) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&data)?))
    }

    /// Removes every persisted block belonging to `name`, best effort
    ///
    /// Removal failures are swallowed: orphan blocks are unreachable and do
    /// not affect any chain the table still points at.
    pub fn delete_blocks_for(&self, name: &str) {
        let prefix = format!("{}_block", name);
        let entries = match fs::read_dir(&self.blocks_dir) {
            Ok(entries) => entries,
            Err(_) => return,
        };
        for entry in entries.flatten() {
            if entry.file_name().to_string_lossy().starts_with(&prefix) {
                let _ = fs::remove_file(entry.path());
            }
        }
    }
}
