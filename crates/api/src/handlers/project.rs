//! Handlers for the `/projects` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use narrata_core::artifacts::project_prefix;
use narrata_core::error::CoreError;
use narrata_core::types::DbId;
use narrata_db::models::project::{CreateProject, Project, UpdateProject};
use narrata_db::repositories::ProjectRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Restrict the listing to one user's projects.
    pub user_id: Option<String>,
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    if let Some(mode) = &input.mode {
        validate_mode(mode)?;
    }
    let project = ProjectRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Project>>> {
    let projects = match &query.user_id {
        Some(user_id) => ProjectRepo::list_by_user(&state.pool, user_id).await?,
        None => ProjectRepo::list(&state.pool).await?,
    };
    Ok(Json(projects))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    let project = find_project(&state, id).await?;
    Ok(Json(project))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<Project>> {
    if let Some(mode) = &input.mode {
        validate_mode(mode)?;
    }
    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(project))
}

/// DELETE /api/v1/projects/{id}
///
/// Removes the project's artifacts from object storage first, then the
/// database rows (pronunciations and storyboard versions cascade). If the
/// storage cleanup fails the rows stay, so a retry can finish the job.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let project = find_project(&state, id).await?;

    let prefix = project_prefix(&project.user_id, project.id);
    let removed = state.store.delete_prefix(&prefix).await?;
    tracing::info!(project_id = id, removed, "Deleted project artifacts");

    ProjectRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Load a project or map its absence to a 404.
pub(crate) async fn find_project(state: &AppState, id: DbId) -> AppResult<Project> {
    ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
}

fn validate_mode(mode: &str) -> AppResult<()> {
    if matches!(mode, "validation" | "production") {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Validation(format!(
            "Invalid mode '{mode}'. Must be one of: validation, production"
        ))))
    }
}
