//! # Roles
//!
//! This crate provides the role and capability primitives for the FAT
//! simulator.
//!
//! ## Philosophy
//!
//! - **Roles are names, not sessions**: every engine operation receives the
//!   acting role explicitly; nothing is held between calls
//! - **Capabilities are data**: a grant is an entry in a persisted map, not
//!   a token or an ACL engine
//! - **Ownership is implicit authority**: the owner never needs an entry in
//!   the permission map
//!
//! ## Core Concepts
//!
//! - `Role`: identifier for an acting principal ("admin", "guest", ...)
//! - `Capability`: one grantable right, `Read` or `Write`
//! - `Permissions`: the per-file map from role to granted capability set

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Identifier for an acting role
///
/// Roles are plain strings supplied by the caller on every operation.
/// They carry no authority by themselves; authority comes from file
/// ownership or from an entry in a file's permission map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Role(String);

impl Role {
    /// Creates a role from a name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the role name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A grantable capability on a file
///
/// Serialized as `"read"` / `"write"` inside the persisted permission map.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    /// Can read file content
    Read,
    /// Can rewrite file content
    Write,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Read => write!(f, "read"),
            Capability::Write => write!(f, "write"),
        }
    }
}

/// A set of capabilities, as granted to one role
pub type CapabilitySet = BTreeSet<Capability>;

/// Per-file permission map: role name to granted capability set
///
/// The owner of a file is fully authorized whether or not it appears here;
/// callers check ownership before consulting this map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions(BTreeMap<Role, CapabilitySet>);

impl Permissions {
    /// Creates an empty permission map
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Creates a map with a single seeded entry
    pub fn seeded(role: Role, capabilities: CapabilitySet) -> Self {
        let mut map = BTreeMap::new();
        map.insert(role, capabilities);
        Self(map)
    }

    /// Replaces the capability set for a role
    pub fn insert(&mut self, role: Role, capabilities: CapabilitySet) {
        self.0.insert(role, capabilities);
    }

    /// Removes a role from the map entirely
    ///
    /// Returns true if the role had an entry.
    pub fn remove(&mut self, role: &Role) -> bool {
        self.0.remove(role).is_some()
    }

    /// Returns the capability set granted to a role, if any
    pub fn get(&self, role: &Role) -> Option<&CapabilitySet> {
        self.0.get(role)
    }

    /// Checks whether a role has been granted a capability
    pub fn allows(&self, role: &Role, capability: Capability) -> bool {
        self.0
            .get(role)
            .map(|caps| caps.contains(&capability))
            .unwrap_or(false)
    }

    /// Number of roles with entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no role has an entry
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
