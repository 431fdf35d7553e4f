//! Errors surfaced by file engine operations

use fat_storage::StoreError;
use roles::{Capability, Role};
use thiserror::Error;

/// Errors that can occur during file engine operations
///
/// Each failure is terminal for its single operation; the table write is the
/// last step of every mutation, so nothing needs rolling back.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A file with this name already exists, active or trashed
    #[error("a file named '{0}' already exists")]
    DuplicateName(String),

    /// No entry with this name in the state the operation requires
    #[error("file '{0}' not found")]
    NotFound(String),

    /// The acting role is not the owner and lacks the required capability
    #[error("role '{role}' has no {capability} permission on '{name}'")]
    PermissionDenied {
        name: String,
        role: Role,
        capability: Capability,
    },

    /// Underlying persistence failure
    #[error(transparent)]
    Store(#[from] StoreError),
}
