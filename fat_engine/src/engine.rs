//! The file engine façade
//!
//! Combines the table store and chain codec into the file lifecycle:
//! create, read, modify, soft-delete, restore, listings, metadata lookup
//! and owner-gated permission assignment.

use crate::error::EngineError;
use chrono::Local;
use fat_storage::{BlockStore, ChainCodec, FileEntry, StoreError, TableStore};
use roles::{Capability, CapabilitySet, Permissions, Role};
use std::fs;
use std::path::Path;

/// File name of the persisted FAT table inside the data directory
pub const TABLE_FILE_NAME: &str = "fat_table.json";

/// Subdirectory of the data directory holding the block files
pub const BLOCKS_DIR_NAME: &str = "blocks";

/// The file engine
///
/// Holds no session state; every operation receives the acting role and
/// performs one load-mutate-save cycle over the table.
#[derive(Debug)]
pub struct FileEngine {
    table: TableStore,
    codec: ChainCodec,
}

impl FileEngine {
    /// Opens an engine rooted at `data_dir`, creating the layout on first use
    ///
    /// The layout is fixed: `fat_table.json` plus a `blocks/` subdirectory.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir)?;
        let table = TableStore::create(data_dir.join(TABLE_FILE_NAME))?;
        let store = BlockStore::create(data_dir.join(BLOCKS_DIR_NAME))?;
        Ok(Self {
            table,
            codec: ChainCodec::new(store),
        })
    }

    /// Names of all active files, in table order
    pub fn list_active(&self) -> Result<Vec<String>, EngineError> {
        let entries = self.table.load()?;
        Ok(entries
            .into_iter()
            .filter(|entry| !entry.trashed)
            .map(|entry| entry.name)
            .collect())
    }

    /// Full entries of all trashed files, in table order
    pub fn list_trashed(&self) -> Result<Vec<FileEntry>, EngineError> {
        let entries = self.table.load()?;
        Ok(entries.into_iter().filter(|entry| entry.trashed).collect())
    }

    /// Entry for `name` regardless of trashed state, if any
    pub fn get_metadata(&self, name: &str) -> Result<Option<FileEntry>, EngineError> {
        let entries = self.table.load()?;
        Ok(entries.into_iter().find(|entry| entry.name == name))
    }

    /// Creates a new file owned by `owner`
    ///
    /// The name must be unused by every entry, trashed ones included. The
    /// owner's capability set in the permission map is seeded from
    /// `initial_permissions`; the owner is fully authorized either way.
    pub fn create(
        &self,
        name: &str,
        content: &str,
        owner: &Role,
        initial_permissions: CapabilitySet,
    ) -> Result<(), EngineError> {
        let mut entries = self.table.load()?;
        if entries.iter().any(|entry| entry.name == name) {
            return Err(EngineError::DuplicateName(name.to_string()));
        }

        let head = self.codec.encode(content, name)?;
        entries.push(FileEntry {
            name: name.to_string(),
            head_block_ref: head,
            trashed: false,
            size: content.len() as u64,
            created_at: now(),
            modified_at: None,
            deleted_at: None,
            owner: owner.clone(),
            permissions: Permissions::seeded(owner.clone(), initial_permissions),
        });
        self.table.save(&entries)?;
        Ok(())
    }

    /// Returns the full content of an active file
    pub fn read(&self, name: &str, role: &Role) -> Result<String, EngineError> {
        let entries = self.table.load()?;
        let entry = entries
            .iter()
            .find(|entry| entry.name == name && !entry.trashed)
            .ok_or_else(|| EngineError::NotFound(name.to_string()))?;
        if !entry.authorizes(role, Capability::Read) {
            return Err(EngineError::PermissionDenied {
                name: name.to_string(),
                role: role.clone(),
                capability: Capability::Read,
            });
        }
        Ok(self.codec.decode(&entry.head_block_ref)?)
    }

    /// Replaces the content of an active file
    ///
    /// The old chain is removed wholesale (best effort) and a new one is
    /// written; `size` and `modified_at` are updated with it.
    pub fn modify(&self, name: &str, new_content: &str, role: &Role) -> Result<(), EngineError> {
        let mut entries = self.table.load()?;
        let entry = entries
            .iter_mut()
            .find(|entry| entry.name == name && !entry.trashed)
            .ok_or_else(|| EngineError::NotFound(name.to_string()))?;
        if !entry.authorizes(role, Capability::Write) {
            return Err(EngineError::PermissionDenied {
                name: name.to_string(),
                role: role.clone(),
                capability: Capability::Write,
            });
        }

        self.codec.store().delete_blocks_for(name);
        entry.head_block_ref = self.codec.encode(new_content, name)?;
        entry.size = new_content.len() as u64;
        entry.modified_at = Some(now());
        self.table.save(&entries)?;
        Ok(())
    }

    /// Moves an active file to the trash
    ///
    /// Trashing an already-trashed file fails; this is not a no-op.
    pub fn soft_delete(&self, name: &str) -> Result<(), EngineError> {
        let mut entries = self.table.load()?;
        let entry = entries
            .iter_mut()
            .find(|entry| entry.name == name && !entry.trashed)
            .ok_or_else(|| EngineError::NotFound(name.to_string()))?;
        entry.trashed = true;
        entry.deleted_at = Some(now());
        self.table.save(&entries)?;
        Ok(())
    }

    /// Brings a trashed file back to the active listing
    pub fn restore(&self, name: &str) -> Result<(), EngineError> {
        let mut entries = self.table.load()?;
        let entry = entries
            .iter_mut()
            .find(|entry| entry.name == name && entry.trashed)
            .ok_or_else(|| EngineError::NotFound(name.to_string()))?;
        entry.trashed = false;
        entry.deleted_at = None;
        self.table.save(&entries)?;
        Ok(())
    }

    /// Sets or revokes the capability set granted to `target`
    ///
    /// Domain outcomes are reported as `(success, message)` rather than
    /// through [`EngineError`]: an absent entry or a non-owner requester
    /// returns `(false, ..)`. An empty capability set removes `target` from
    /// the map entirely. `Err` is reserved for storage faults.
    pub fn assign_permissions(
        &self,
        name: &str,
        requester: &Role,
        target: &Role,
        capabilities: CapabilitySet,
    ) -> Result<(bool, String), EngineError> {
        let mut entries = self.table.load()?;
        let entry = match entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry,
            None => return Ok((false, format!("file '{}' not found", name))),
        };
        if requester != &entry.owner {
            return Ok((
                false,
                "only the owner can assign or revoke permissions".to_string(),
            ));
        }

        if capabilities.is_empty() {
            entry.permissions.remove(target);
        } else {
            entry.permissions.insert(target.clone(), capabilities);
        }
        self.table.save(&entries)?;
        Ok((true, "permissions updated".to_string()))
    }
}

/// Second-granularity local timestamp, sortable as a string
fn now() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    fn engine() -> (FileEngine, TempDir) {
        let dir = tempdir().unwrap();
        let engine = FileEngine::open(dir.path()).unwrap();
        (engine, dir)
    }

    fn admin() -> Role {
        Role::new("admin")
    }

    fn guest() -> Role {
        Role::new("guest")
    }

    fn caps(list: &[Capability]) -> CapabilitySet {
        list.iter().copied().collect()
    }

    #[test]
    fn test_open_creates_layout() {
        let dir = tempdir().unwrap();
        let _engine = FileEngine::open(dir.path().join("data")).unwrap();

        assert!(dir.path().join("data").join(TABLE_FILE_NAME).is_file());
        assert!(dir.path().join("data").join(BLOCKS_DIR_NAME).is_dir());
    }

    #[test]
    fn test_create_and_list_active() {
        let (engine, _dir) = engine();

        engine
            .create("notes", "hello world", &admin(), CapabilitySet::new())
            .unwrap();

        assert_eq!(engine.list_active().unwrap(), vec!["notes"]);
        assert!(engine.list_trashed().unwrap().is_empty());
    }

    #[test]
    fn test_create_duplicate_name_fails() {
        let (engine, _dir) = engine();

        engine
            .create("notes", "a", &admin(), CapabilitySet::new())
            .unwrap();
        let err = engine
            .create("notes", "b", &admin(), CapabilitySet::new())
            .unwrap_err();
        assert!(matches!(err, EngineError::DuplicateName(name) if name == "notes"));
    }

    #[test]
    fn test_create_duplicate_of_trashed_name_fails() {
        let (engine, _dir) = engine();

        engine
            .create("notes", "a", &admin(), CapabilitySet::new())
            .unwrap();
        engine.soft_delete("notes").unwrap();

        let err = engine
            .create("notes", "b", &admin(), CapabilitySet::new())
            .unwrap_err();
        assert!(matches!(err, EngineError::DuplicateName(_)));
    }

    #[test]
    fn test_owner_reads_without_explicit_grant() {
        let (engine, _dir) = engine();

        engine
            .create("notes", "hello world", &admin(), CapabilitySet::new())
            .unwrap();
        assert_eq!(engine.read("notes", &admin()).unwrap(), "hello world");
    }

    #[test]
    fn test_read_without_grant_is_denied() {
        let (engine, _dir) = engine();

        engine
            .create("notes", "secret", &admin(), CapabilitySet::new())
            .unwrap();
        let err = engine.read("notes", &guest()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::PermissionDenied {
                capability: Capability::Read,
                ..
            }
        ));
    }

    #[test]
    fn test_grant_then_revoke_read() {
        let (engine, _dir) = engine();

        engine
            .create("notes", "hello world", &admin(), CapabilitySet::new())
            .unwrap();

        let (ok, _) = engine
            .assign_permissions("notes", &admin(), &guest(), caps(&[Capability::Read]))
            .unwrap();
        assert!(ok);
        assert_eq!(engine.read("notes", &guest()).unwrap(), "hello world");

        // Revocation by empty capability set removes the role entirely
        let (ok, _) = engine
            .assign_permissions("notes", &admin(), &guest(), CapabilitySet::new())
            .unwrap();
        assert!(ok);
        assert!(matches!(
            engine.read("notes", &guest()),
            Err(EngineError::PermissionDenied { .. })
        ));

        let entry = engine.get_metadata("notes").unwrap().unwrap();
        assert!(entry.permissions.get(&guest()).is_none());
    }

    #[test]
    fn test_assign_permissions_requires_owner() {
        let (engine, _dir) = engine();

        engine
            .create("notes", "x", &admin(), CapabilitySet::new())
            .unwrap();
        let (ok, message) = engine
            .assign_permissions("notes", &guest(), &guest(), caps(&[Capability::Read]))
            .unwrap();
        assert!(!ok);
        assert!(message.contains("owner"));
    }

    #[test]
    fn test_assign_permissions_unknown_file_is_soft_failure() {
        let (engine, _dir) = engine();

        let (ok, message) = engine
            .assign_permissions("ghost", &admin(), &guest(), caps(&[Capability::Read]))
            .unwrap();
        assert!(!ok);
        assert!(message.contains("ghost"));
    }

    #[test]
    fn test_assign_permissions_works_on_trashed_entry() {
        let (engine, _dir) = engine();

        engine
            .create("notes", "x", &admin(), CapabilitySet::new())
            .unwrap();
        engine.soft_delete("notes").unwrap();

        // Lookup ignores trashed state for permission assignment
        let (ok, _) = engine
            .assign_permissions("notes", &admin(), &guest(), caps(&[Capability::Read]))
            .unwrap();
        assert!(ok);
    }

    #[test]
    fn test_modify_replaces_content() {
        let (engine, _dir) = engine();

        engine
            .create("notes", &"a".repeat(41), &admin(), CapabilitySet::new())
            .unwrap();
        engine.modify("notes", "short", &admin()).unwrap();

        assert_eq!(engine.read("notes", &admin()).unwrap(), "short");

        let entry = engine.get_metadata("notes").unwrap().unwrap();
        assert_eq!(entry.size, 5);
        assert!(entry.modified_at.is_some());
    }

    #[test]
    fn test_modify_removes_stale_blocks() {
        let (engine, dir) = engine();

        engine
            .create("notes", &"a".repeat(41), &admin(), CapabilitySet::new())
            .unwrap();
        engine.modify("notes", "short", &admin()).unwrap();

        // The 41-byte chain had blocks 0..=2; only block 0 survives the rewrite
        let blocks = dir.path().join(BLOCKS_DIR_NAME);
        assert!(blocks.join("notes_block0.json").is_file());
        assert!(!blocks.join("notes_block1.json").exists());
        assert!(!blocks.join("notes_block2.json").exists());
    }

    #[test]
    fn test_modify_requires_write() {
        let (engine, _dir) = engine();

        engine
            .create("notes", "x", &admin(), CapabilitySet::new())
            .unwrap();
        engine
            .assign_permissions("notes", &admin(), &guest(), caps(&[Capability::Read]))
            .unwrap();

        let err = engine.modify("notes", "y", &guest()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::PermissionDenied {
                capability: Capability::Write,
                ..
            }
        ));

        // A write grant makes the same call succeed
        engine
            .assign_permissions(
                "notes",
                &admin(),
                &guest(),
                caps(&[Capability::Read, Capability::Write]),
            )
            .unwrap();
        engine.modify("notes", "y", &guest()).unwrap();
        assert_eq!(engine.read("notes", &guest()).unwrap(), "y");
    }

    #[test]
    fn test_soft_delete_and_restore_cycle() {
        let (engine, _dir) = engine();

        engine
            .create("notes", "x", &admin(), CapabilitySet::new())
            .unwrap();
        engine.soft_delete("notes").unwrap();

        assert!(engine.list_active().unwrap().is_empty());
        let trashed = engine.list_trashed().unwrap();
        assert_eq!(trashed.len(), 1);
        assert_eq!(trashed[0].name, "notes");
        assert!(trashed[0].deleted_at.is_some());

        engine.restore("notes").unwrap();
        assert_eq!(engine.list_active().unwrap(), vec!["notes"]);
        assert!(engine.list_trashed().unwrap().is_empty());

        let entry = engine.get_metadata("notes").unwrap().unwrap();
        assert!(!entry.trashed);
        assert_eq!(entry.deleted_at, None);
    }

    #[test]
    fn test_soft_delete_twice_fails() {
        let (engine, _dir) = engine();

        engine
            .create("notes", "x", &admin(), CapabilitySet::new())
            .unwrap();
        engine.soft_delete("notes").unwrap();

        let err = engine.soft_delete("notes").unwrap_err();
        assert!(matches!(err, EngineError::NotFound(name) if name == "notes"));
    }

    #[test]
    fn test_restore_requires_trashed_entry() {
        let (engine, _dir) = engine();

        engine
            .create("notes", "x", &admin(), CapabilitySet::new())
            .unwrap();
        assert!(matches!(
            engine.restore("notes"),
            Err(EngineError::NotFound(_))
        ));
        assert!(matches!(
            engine.restore("ghost"),
            Err(EngineError::NotFound(_))
        ));
    }

    #[test]
    fn test_read_trashed_file_is_not_found() {
        let (engine, _dir) = engine();

        engine
            .create("notes", "x", &admin(), CapabilitySet::new())
            .unwrap();
        engine.soft_delete("notes").unwrap();

        assert!(matches!(
            engine.read("notes", &admin()),
            Err(EngineError::NotFound(_))
        ));
        assert!(matches!(
            engine.modify("notes", "y", &admin()),
            Err(EngineError::NotFound(_))
        ));
    }

    #[test]
    fn test_get_metadata_sees_trashed_entries() {
        let (engine, _dir) = engine();

        engine
            .create("notes", "x", &admin(), CapabilitySet::new())
            .unwrap();
        engine.soft_delete("notes").unwrap();

        let entry = engine.get_metadata("notes").unwrap().unwrap();
        assert!(entry.trashed);
        assert!(engine.get_metadata("ghost").unwrap().is_none());
    }

    #[test]
    fn test_zero_length_file_round_trip() {
        let (engine, _dir) = engine();

        engine
            .create("empty", "", &admin(), CapabilitySet::new())
            .unwrap();
        assert_eq!(engine.read("empty", &admin()).unwrap(), "");

        let entry = engine.get_metadata("empty").unwrap().unwrap();
        assert_eq!(entry.size, 0);
    }

    #[test]
    fn test_created_entry_metadata() {
        let (engine, _dir) = engine();

        engine
            .create("notes", "hello", &admin(), caps(&[Capability::Read]))
            .unwrap();

        let entry = engine.get_metadata("notes").unwrap().unwrap();
        assert_eq!(entry.owner, admin());
        assert_eq!(entry.size, 5);
        assert!(!entry.trashed);
        assert_eq!(entry.modified_at, None);
        assert_eq!(entry.deleted_at, None);
        assert!(!entry.created_at.is_empty());
        // The owner's set is seeded but not load-bearing for authorization
        assert_eq!(entry.permissions.get(&admin()), Some(&caps(&[Capability::Read])));
    }

    #[test]
    fn test_reopen_sees_persisted_state() {
        let dir = tempdir().unwrap();

        {
            let engine = FileEngine::open(dir.path()).unwrap();
            engine
                .create("notes", "persists", &admin(), CapabilitySet::new())
                .unwrap();
        }

        let engine = FileEngine::open(dir.path()).unwrap();
        assert_eq!(engine.list_active().unwrap(), vec!["notes"]);
        assert_eq!(engine.read("notes", &admin()).unwrap(), "persists");
    }
}
