//! End-to-end engine flow
//!
//! The complete scenario: create a file, watch a stranger get denied, grant
//! read access, read through the granted role, then walk the trash cycle.
