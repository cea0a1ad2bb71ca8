//! Active-version records for storyboard slots.
//!
//! The legacy convention recovered "which version is active" from `_sbsave`
//! renames in object storage. Here it is an explicit row per
//! `(project, chapter, chunk, kind)` slot instead.

use narrata_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `storyboard_versions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StoryboardVersion {
    pub id: DbId,
    pub project_id: DbId,
    pub chapter: i32,
    pub chunk: i32,
    /// `image` or `audio`.
    pub kind: String,
    /// Storage key of the artifact currently active for this slot.
    pub active_key: String,
    pub updated_at: Timestamp,
}

/// DTO for activating an artifact version.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivateVersion {
    pub chapter: i32,
    pub chunk: i32,
    pub kind: String,
    pub key: String,
}
