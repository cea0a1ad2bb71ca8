//! The small JSON documents stored next to a project's artifacts:
//! `project_status.json` (written by the pipeline, read here) and
//! `pronunciation-corrections.json` (written here, read by the pipeline).

use narrata_core::artifacts::{corrections_key, status_key};
use narrata_core::pronunciation::Correction;
use narrata_core::status::ProjectStatus;
use narrata_core::types::DbId;

use crate::store::{ObjectStore, StorageError};

/// Read a project's status document.
///
/// A missing document is not an error: the pipeline has simply not started
/// yet, so every stage reports `not_started`.
pub async fn read_status(
    store: &dyn ObjectStore,
    user_id: &str,
    project_id: DbId,
) -> Result<ProjectStatus, StorageError> {
    let key = status_key(user_id, project_id);
    match store.get(&key).await {
        Ok(bytes) => {
            serde_json::from_slice(&bytes).map_err(|e| StorageError::InvalidDocument {
                key,
                message: e.to_string(),
            })
        }
        Err(StorageError::NotFound(_)) => Ok(ProjectStatus::default()),
        Err(e) => Err(e),
    }
}

/// Overwrite a project's corrections document.
pub async fn write_corrections(
    store: &dyn ObjectStore,
    user_id: &str,
    project_id: DbId,
    corrections: &[Correction],
) -> Result<(), StorageError> {
    let key = corrections_key(user_id, project_id);
    let body = serde_json::to_vec_pretty(corrections).map_err(|e| {
        StorageError::InvalidDocument {
            key: key.clone(),
            message: e.to_string(),
        }
    })?;
    store.put(&key, body).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryObjectStore;
    use narrata_core::status::{STATUS_COMPLETED, STATUS_NOT_STARTED};

    #[tokio::test]
    async fn missing_status_document_defaults_to_not_started() {
        let store = MemoryObjectStore::new();
        let status = read_status(&store, "u1", 7).await.unwrap();
        assert_eq!(status.ebook_prep, STATUS_NOT_STARTED);
        assert_eq!(status.audiobook, STATUS_NOT_STARTED);
    }

    #[tokio::test]
    async fn status_document_is_parsed() {
        let store = MemoryObjectStore::new();
        store
            .put(
                "u1/7/project_status.json",
                br#"{"ebook_prep": "completed", "storyboard": "in_progress"}"#.to_vec(),
            )
            .await
            .unwrap();

        let status = read_status(&store, "u1", 7).await.unwrap();
        assert_eq!(status.ebook_prep, STATUS_COMPLETED);
        assert_eq!(status.proofing, STATUS_NOT_STARTED);
    }

    #[tokio::test]
    async fn garbage_status_document_is_an_error() {
        let store = MemoryObjectStore::new();
        store
            .put("u1/7/project_status.json", b"not json".to_vec())
            .await
            .unwrap();

        assert!(matches!(
            read_status(&store, "u1", 7).await,
            Err(StorageError::InvalidDocument { .. })
        ));
    }

    #[tokio::test]
    async fn corrections_roundtrip_in_camel_case() {
        let store = MemoryObjectStore::new();
        let corrections = vec![Correction {
            original_name: "Siobhan".into(),
            corrected_spelling: "Shiv-awn".into(),
            ipa: "ʃɪˈvɔːn".into(),
        }];

        write_corrections(&store, "u1", 7, &corrections).await.unwrap();

        // The pipeline reads camelCase field names.
        let raw = store.get("u1/7/pronunciation-corrections.json").await.unwrap();
        let text = String::from_utf8(raw.clone()).unwrap();
        assert!(text.contains("originalName"));
        assert!(text.contains("correctedSpelling"));

        let parsed: Vec<Correction> = serde_json::from_slice(&raw).unwrap();
        assert_eq!(parsed, corrections);
    }
}
