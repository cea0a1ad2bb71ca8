//! Handlers for pronunciation corrections and the master dictionary.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use narrata_core::pronunciation::Correction;
use narrata_core::types::DbId;
use narrata_db::models::pronunciation::{MasterDictionaryEntry, Pronunciation};
use narrata_db::repositories::PronunciationRepo;
use narrata_lexicon::Rule;
use narrata_storage::documents;

use crate::error::AppResult;
use crate::handlers::project::find_project;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/projects/{id}/pronunciations
pub async fn list(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Pronunciation>>> {
    find_project(&state, id).await?;
    let rows = PronunciationRepo::list_by_project(&state.pool, id).await?;
    Ok(Json(rows))
}

/// PUT /api/v1/projects/{id}/pronunciations
///
/// Replaces the project's correction set. The rows and the storage-side
/// corrections document are authoritative and must both succeed; mirroring
/// into the external dictionary API is best-effort, since the pipeline
/// re-reads the document on its next run anyway.
pub async fn replace(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(corrections): Json<Vec<Correction>>,
) -> AppResult<Json<Vec<Pronunciation>>> {
    let project = find_project(&state, id).await?;

    let previous = PronunciationRepo::list_by_project(&state.pool, id).await?;
    let rows = PronunciationRepo::replace_for_project(&state.pool, id, &corrections).await?;

    documents::write_corrections(state.store.as_ref(), &project.user_id, project.id, &corrections)
        .await?;

    let old_names: Vec<String> = previous.into_iter().map(|p| p.original_name).collect();
    if !old_names.is_empty() {
        if let Err(e) = state.lexicon.remove_rules(&old_names).await {
            tracing::warn!(project_id = id, error = %e, "Failed to remove old dictionary rules");
        }
    }
    let rules: Vec<Rule> = corrections.iter().map(Rule::from).collect();
    if !rules.is_empty() {
        if let Err(e) = state.lexicon.add_rules(&rules).await {
            tracing::warn!(project_id = id, error = %e, "Failed to push dictionary rules");
        }
    }

    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
pub struct MasterDictionaryQuery {
    pub user_id: String,
}

/// GET /api/v1/dictionary?user_id=...
pub async fn master_dictionary(
    State(state): State<AppState>,
    Query(query): Query<MasterDictionaryQuery>,
) -> AppResult<Json<DataResponse<Vec<MasterDictionaryEntry>>>> {
    let entries = PronunciationRepo::master_dictionary(&state.pool, &query.user_id).await?;
    Ok(Json(DataResponse { data: entries }))
}
