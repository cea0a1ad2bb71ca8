pub mod dictionary;
pub mod health;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                              list, create
/// /projects/{id}                         get, update, delete
/// /projects/{id}/status                  pipeline status document (GET)
/// /projects/{id}/storyboard              grouped artifacts (GET)
/// /projects/{id}/storyboard/activate     set active version (POST)
/// /projects/{id}/pipeline/run            trigger a stage (POST)
/// /projects/{id}/pronunciations          list, replace (GET, PUT)
///
/// /dictionary                            master dictionary (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/dictionary", dictionary::router())
}
