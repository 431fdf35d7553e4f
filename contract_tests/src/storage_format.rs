//! On-disk format contract tests
//!
//! These tests pin the persisted layout: the table document, the block
//! naming scheme, the per-record field names and the block size. They read
//! raw JSON on purpose; the format must survive internal refactors.

/// Stable data-directory layout
#[allow(dead_code)]
const TABLE_FILE: &str = "fat_table.json";
#[allow(dead_code)]
const BLOCKS_DIR: &str = "blocks";

/// Stable per-record field names
#[allow(dead_code)]
const ENTRY_FIELDS: [&str; 9] = [
    "name",
    "head_block_ref",
    "trashed",
    "size",
    "created_at",
    "modified_at",
    "deleted_at",
    "owner",
    "permissions",
];
#[allow(dead_code)]
const BLOCK_FIELDS: [&str; 3] = ["payload", "next_ref", "is_last"];
