//! The FAT table: one ordered list of file entries, persisted whole
//!
//! Every mutation in the engine is load, mutate in memory, save. The save
//! rewrites the entire document; there is no partial update and no
//! versioning.

use crate::block_store::BlockRef;
use crate::StoreError;
use roles::{Capability, Permissions, Role};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// One record in the FAT table, unique by name across the whole namespace
///
/// Entries are never physically removed: soft deletion keeps the record and
/// its blocks, hidden from active listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Unique identifier, also among trashed entries
    pub name: String,
    /// Reference to the first block of the content chain
    pub head_block_ref: BlockRef,
    /// Soft-deleted flag
    pub trashed: bool,
    /// Byte length of the content at last write
    pub size: u64,
    /// Creation timestamp
    pub created_at: String,
    /// Last content modification, if any
    pub modified_at: Option<String>,
    /// Soft-deletion timestamp while trashed
    pub deleted_at: Option<String>,
    /// Role that created the file; immutable
    pub owner: Role,
    /// Grants for non-owner roles
    pub permissions: Permissions,
}

impl FileEntry {
    /// Checks whether `role` may exercise `capability` on this file
    ///
    /// The owner is fully authorized regardless of the permission map.
    pub fn authorizes(&self, role: &Role, capability: Capability) -> bool {
        role == &self.owner || self.permissions.allows(role, capability)
    }
}

/// Loads and saves the persisted table document
#[derive(Debug)]
pub struct TableStore {
    path: PathBuf,
}

impl TableStore {
    /// Opens the table at `path`, writing an empty one on first use
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if !path.exists() {
            fs::write(&path, serde_json::to_string_pretty(&Vec::<FileEntry>::new())?)?;
        }
        Ok(Self { path })
    }

    /// Loads the full ordered entry list
    pub fn load(&self) -> Result<Vec<FileEntry>, StoreError> {
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Replaces the whole persisted table with `entries`
    pub fn save(&self, entries: &[FileEntry]) -> Result<(), StoreError> {
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}
