//! Project entity model and DTOs.

use narrata_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub user_id: String,
    /// Display name shown in project lists.
    pub name: String,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub cover_path: Option<String>,
    pub epub_path: String,
    /// `validation` or `production`.
    pub mode: String,
    /// Selected narration voice, once the user has picked one.
    pub voice: Option<String>,
    /// Pronunciation dictionary handed to the pipeline, if any.
    pub dictionary_name: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a freshly uploaded EPUB.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub user_id: String,
    pub name: String,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub cover_path: Option<String>,
    pub epub_path: String,
    /// Defaults to `validation` if omitted.
    pub mode: Option<String>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub cover_path: Option<String>,
    pub mode: Option<String>,
    pub voice: Option<String>,
    pub dictionary_name: Option<String>,
}
