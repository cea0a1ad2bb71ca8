//! Domain types and pure logic for the Narrata audiobook backend.
//!
//! Everything in this crate is side-effect free: artifact key parsing and
//! grouping, pipeline command construction, and status-document transition
//! detection. I/O lives in the sibling crates (`narrata-storage`,
//! `narrata-pipeline`, `narrata-db`).

pub mod artifacts;
pub mod command;
pub mod error;
pub mod pronunciation;
pub mod status;
pub mod types;
