//! Handler for triggering remote pipeline stages.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use narrata_core::command::{Mode, RunParams};
use narrata_core::status::Stage;
use narrata_core::types::DbId;
use narrata_pipeline::{watch_stage, CommandOutput, WatcherConfig};

use crate::error::{AppError, AppResult};
use crate::handlers::project::find_project;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RunStageRequest {
    /// Which stage's completion to watch for.
    pub stage: Stage,
    /// Chunk limit override; defaults by project mode.
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct RunStageResponse {
    pub stage: Stage,
    /// Raw output of the submitted command.
    pub output: CommandOutput,
}

/// POST /api/v1/projects/{id}/pipeline/run
///
/// Builds the pipeline command from the project's settings, submits it to
/// the remote execution server, and spawns a completion watcher for the
/// requested stage. The command call itself is not retried; a failure maps
/// straight to a 502.
pub async fn run_stage(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RunStageRequest>,
) -> AppResult<Json<RunStageResponse>> {
    let project = find_project(&state, id).await?;

    let voice = project.voice.clone().ok_or_else(|| {
        AppError::BadRequest("Select a narration voice before running the pipeline".into())
    })?;

    let mode = match project.mode.as_str() {
        "production" => Mode::Production,
        _ => Mode::Validation,
    };
    let limit = input.limit.unwrap_or(match mode {
        Mode::Validation => state.config.validation_chunk_limit,
        // 0 means "no limit" to the pipeline.
        Mode::Production => 0,
    });

    let epub_filename = project
        .epub_path
        .rsplit('/')
        .next()
        .unwrap_or(&project.epub_path)
        .to_string();

    let params = RunParams {
        epub_filename,
        user_id: project.user_id.clone(),
        project_id: project.id,
        author: project.author.clone(),
        title: project.title.clone(),
        voice,
        dictionary: project.dictionary_name.clone(),
        limit,
        mode,
    };

    let command = params.to_command();
    tracing::info!(project_id = project.id, stage = ?input.stage, "Submitting pipeline command");

    let output = state.pipeline.run_command(&command).await?;

    // Fire-and-forget: watch for the stage to finish so the completion (or
    // the timeout) lands in the logs even if no client is still polling.
    let store = Arc::clone(&state.store);
    let cancel = state.watcher_cancel.clone();
    let user_id = project.user_id.clone();
    let project_id = project.id;
    let stage = input.stage;
    tokio::spawn(async move {
        let outcome = watch_stage(
            store,
            &user_id,
            project_id,
            stage,
            &WatcherConfig::default(),
            &cancel,
        )
        .await;
        tracing::info!(project_id, ?stage, ?outcome, "Stage watch ended");
    });

    Ok(Json(RunStageResponse {
        stage: input.stage,
        output,
    }))
}
