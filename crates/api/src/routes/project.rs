//! Route definitions for the `/projects` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{project, pronunciation, run, storyboard};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                            -> list
/// POST   /                            -> create
/// GET    /{id}                        -> get_by_id
/// PUT    /{id}                        -> update
/// DELETE /{id}                        -> delete
///
/// GET    /{id}/status                 -> get_status
/// GET    /{id}/storyboard             -> get_storyboard
/// POST   /{id}/storyboard/activate    -> activate
/// POST   /{id}/pipeline/run           -> run_stage
/// GET    /{id}/pronunciations         -> list corrections
/// PUT    /{id}/pronunciations         -> replace corrections
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{id}/status", get(storyboard::get_status))
        .route("/{id}/storyboard", get(storyboard::get_storyboard))
        .route("/{id}/storyboard/activate", post(storyboard::activate))
        .route("/{id}/pipeline/run", post(run::run_stage))
        .route(
            "/{id}/pronunciations",
            get(pronunciation::list).put(pronunciation::replace),
        )
}
