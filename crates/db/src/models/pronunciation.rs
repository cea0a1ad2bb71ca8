//! Pronunciation correction model and DTOs.

use narrata_core::pronunciation::Correction;
use narrata_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A pronunciation correction row, scoped to one project.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Pronunciation {
    pub id: DbId,
    pub project_id: DbId,
    pub original_name: String,
    pub corrected_spelling: String,
    pub ipa: String,
    pub created_at: Timestamp,
}

impl From<Pronunciation> for Correction {
    fn from(row: Pronunciation) -> Self {
        Self {
            original_name: row.original_name,
            corrected_spelling: row.corrected_spelling,
            ipa: row.ipa,
        }
    }
}

/// An entry in the cross-project master dictionary for a user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MasterDictionaryEntry {
    pub original_name: String,
    pub corrected_spelling: String,
    pub ipa: String,
}
