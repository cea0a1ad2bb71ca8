use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use narrata_lexicon::LexiconClient;
use narrata_pipeline::PipelineClient;
use narrata_storage::{BackoffLister, ObjectStore};

use crate::busy::BusySet;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: narrata_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Artifact object store.
    pub store: Arc<dyn ObjectStore>,
    /// Backoff-guarded listing front for the store.
    pub lister: Arc<BackoffLister>,
    /// Remote pipeline command client.
    pub pipeline: Arc<PipelineClient>,
    /// External pronunciation-dictionary client.
    pub lexicon: Arc<LexiconClient>,
    /// Busy-set gating duplicate per-item actions.
    pub busy: Arc<BusySet>,
    /// Cancelled at shutdown to stop in-flight stage watchers.
    pub watcher_cancel: CancellationToken,
}
