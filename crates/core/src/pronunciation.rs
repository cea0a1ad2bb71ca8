//! Pronunciation correction wire type.
//!
//! The same triple travels three ways: into the `pronunciations` table,
//! into the `pronunciation-corrections.json` document the pipeline reads
//! from object storage, and into the external dictionary API as a rule.
//! Field names are camelCase on the wire, matching what the pipeline
//! expects in the corrections document.

use serde::{Deserialize, Serialize};

/// One pronunciation override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Correction {
    /// The name or word as it appears in the book.
    pub original_name: String,
    /// Respelling the narrator should read instead.
    pub corrected_spelling: String,
    /// IPA transcription for engines that accept phonemes directly.
    pub ipa: String,
}
