//! Handlers for project status and storyboard resources.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use narrata_core::artifacts::{self, parse_key, ParsedArtifact, StoryboardItem};
use narrata_core::error::CoreError;
use narrata_core::status::ProjectStatus;
use narrata_core::types::DbId;
use narrata_db::models::storyboard_version::{ActivateVersion, StoryboardVersion};
use narrata_db::repositories::StoryboardVersionRepo;
use narrata_storage::documents;

use crate::error::{AppError, AppResult};
use crate::handlers::project::find_project;
use crate::response::DataResponse;
use crate::state::AppState;

/// A storyboard item plus the explicitly tracked active versions.
#[derive(Debug, Serialize)]
pub struct StoryboardEntry {
    #[serde(flatten)]
    pub item: StoryboardItem,
    /// Active image key: the version record if one exists, otherwise the
    /// first image slot's current key.
    pub active_image: Option<String>,
    /// Active audio key, same resolution order.
    pub active_audio: Option<String>,
}

/// GET /api/v1/projects/{id}/status
pub async fn get_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectStatus>>> {
    let project = find_project(&state, id).await?;
    let status = documents::read_status(state.store.as_ref(), &project.user_id, project.id).await?;
    Ok(Json(DataResponse { data: status }))
}

/// GET /api/v1/projects/{id}/storyboard
pub async fn get_storyboard(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<StoryboardEntry>>>> {
    let project = find_project(&state, id).await?;

    let prefix = artifacts::project_prefix(&project.user_id, project.id);
    let keys = state.lister.list_keys(&prefix).await?;
    let items = artifacts::group_keys(&keys);

    let versions = StoryboardVersionRepo::list_by_project(&state.pool, project.id).await?;
    let mut active: HashMap<(i32, i32, &str), &str> = HashMap::new();
    for v in &versions {
        active.insert((v.chapter, v.chunk, v.kind.as_str()), v.active_key.as_str());
    }

    let entries = items
        .into_iter()
        .map(|item| {
            // Slots past i32::MAX cannot have a version record.
            let slot = i32::try_from(item.chapter)
                .ok()
                .zip(i32::try_from(item.chunk).ok());
            let lookup = |kind: &'static str| {
                slot.and_then(|(ch, cu)| active.get(&(ch, cu, kind)))
                    .map(|k| k.to_string())
            };
            let active_image = lookup("image")
                .or_else(|| item.images.first().and_then(|s| s.current.clone()));
            let active_audio = lookup("audio")
                .or_else(|| item.audio.first().and_then(|s| s.current.clone()));
            StoryboardEntry {
                item,
                active_image,
                active_audio,
            }
        })
        .collect();

    Ok(Json(DataResponse { data: entries }))
}

/// POST /api/v1/projects/{id}/storyboard/activate
///
/// Marks an artifact key as the active version for its slot. Gated by the
/// busy-set so the same slot cannot be activated twice concurrently.
pub async fn activate(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ActivateVersion>,
) -> AppResult<Json<StoryboardVersion>> {
    let project = find_project(&state, id).await?;
    validate_activation(&project.user_id, project.id, &input)?;

    let busy_key = format!(
        "{}:{}:{}:{}",
        project.id, input.chapter, input.chunk, input.kind
    );
    let _guard = state.busy.try_acquire(&busy_key).ok_or_else(|| {
        AppError::Busy(format!(
            "An activation for chapter {} chunk {} is already in flight",
            input.chapter, input.chunk
        ))
    })?;

    let version = StoryboardVersionRepo::set_active(
        &state.pool,
        project.id,
        input.chapter,
        input.chunk,
        &input.kind,
        &input.key,
    )
    .await?;

    tracing::info!(
        project_id = project.id,
        chapter = input.chapter,
        chunk = input.chunk,
        kind = %input.kind,
        key = %input.key,
        "Activated storyboard version",
    );

    Ok(Json(version))
}

/// The submitted key must live under the project prefix, match the
/// artifact grammar, and agree with the slot being activated.
fn validate_activation(user_id: &str, project_id: DbId, input: &ActivateVersion) -> AppResult<()> {
    let prefix = artifacts::project_prefix(user_id, project_id);
    if !input.key.starts_with(&prefix) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Key does not belong to project {project_id}"
        ))));
    }

    let parsed = parse_key(&input.key).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "Key does not match the artifact naming convention: {}",
            input.key
        )))
    })?;

    let matches_slot = match (&parsed, input.kind.as_str()) {
        (ParsedArtifact::Image { chapter, chunk, .. }, "image")
        | (ParsedArtifact::Audio { chapter, chunk, .. }, "audio") => {
            i32::try_from(*chapter).is_ok_and(|c| c == input.chapter)
                && i32::try_from(*chunk).is_ok_and(|c| c == input.chunk)
        }
        _ => false,
    };

    if matches_slot {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Validation(format!(
            "Key {} is not a {} artifact for chapter {} chunk {}",
            input.key, input.kind, input.chapter, input.chunk
        ))))
    }
}
