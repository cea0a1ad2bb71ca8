//! Route definitions for the master pronunciation dictionary.

use axum::routing::get;
use axum::Router;

use crate::handlers::pronunciation;
use crate::state::AppState;

/// Routes mounted at `/dictionary`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(pronunciation::master_dictionary))
}
