//! # Persisted-State Contract Tests
//!
//! This crate provides "golden" tests for the on-disk format of the FAT
//! simulator to ensure it doesn't drift accidentally over time.
//!
//! ## Philosophy
//!
//! - **The format is the contract**: implementations sharing a data
//!   directory must agree on field names, block naming and block size
//! - **Tests read raw JSON**: assertions go through `serde_json::Value`,
//!   not through the crate's own types, so renames cannot hide
//! - **End-to-end flows stay end-to-end**: the full create/deny/grant/read
//!   scenario runs against a real data directory
//!
//! ## Structure
//!
//! - `storage_format`: table and block file layout, field names, block
//!   size, timestamp shape
//! - `engine_flow`: the complete permission-granting scenario

pub mod engine_flow;
pub mod storage_format;
