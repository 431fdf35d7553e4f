//! # FAT Engine
//!
//! This crate provides the file engine of the FAT simulator: the façade that
//! combines the block store, chain codec and FAT table into file lifecycle
//! operations with role-based permission enforcement.
//!
//! ## Philosophy
//!
//! - **No session state**: the acting role is passed on every call
//! - **Whole-table mutations**: every operation loads the table, mutates one
//!   entry in memory, and saves the table back in full
//! - **Soft deletion only**: entries and their blocks are never physically
//!   removed from the table; content blocks are replaced wholesale on modify
//! - **Single writer**: two concurrent callers can lose one side's update
//!   (last writer wins); the intended caller is one interactive session
//!
//! ## Errors
//!
//! Lifecycle operations report failures through [`EngineError`]. Permission
//! assignment instead reports domain outcomes as a `(bool, message)` pair,
//! keeping both reporting conventions of the original system.

pub mod engine;
pub mod error;

pub use engine::{FileEngine, BLOCKS_DIR_NAME, TABLE_FILE_NAME};
pub use error::EngineError;
