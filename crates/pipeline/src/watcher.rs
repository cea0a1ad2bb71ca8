//! Stage-completion watcher.
//!
//! Submitting a pipeline command returns as soon as the remote server has
//! accepted it; the actual work finishes minutes later, signalled only by
//! the pipeline overwriting `project_status.json` in object storage. After
//! triggering a stage the API spawns [`watch_stage`], which polls that
//! document every five seconds until the stage reaches a terminal status,
//! the ten-minute cap expires, or shutdown cancels it.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use narrata_core::status::{Stage, StatusTracker};
use narrata_core::types::DbId;
use narrata_storage::documents::read_status;
use narrata_storage::ObjectStore;

/// Tunable parameters for the completion watcher.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Interval between status document reads.
    pub poll_interval: Duration,
    /// Give up after this long without a terminal status.
    pub timeout: Duration,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            timeout: Duration::from_secs(600),
        }
    }
}

/// How a watch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// The stage reported `completed`.
    Completed,
    /// The stage reported `failed`.
    Failed,
    /// The cap expired before the stage reached a terminal status. The
    /// pipeline may still be working; the client keeps polling on its own.
    TimedOut,
    /// Shutdown cancelled the watch.
    Cancelled,
}

/// Poll a project's status document until `stage` finishes.
///
/// Read failures are tolerated: a transient storage error logs a warning
/// and the next tick retries. Only the timeout, cancellation, or a
/// terminal status end the watch.
pub async fn watch_stage(
    store: Arc<dyn ObjectStore>,
    user_id: &str,
    project_id: DbId,
    stage: Stage,
    config: &WatcherConfig,
    cancel: &CancellationToken,
) -> StageOutcome {
    let deadline = tokio::time::Instant::now() + config.timeout;
    let mut tracker = StatusTracker::new();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(project_id, ?stage, "Stage watch cancelled");
                return StageOutcome::Cancelled;
            }
            _ = tokio::time::sleep_until(deadline) => {
                tracing::warn!(project_id, ?stage, "Stage watch timed out");
                return StageOutcome::TimedOut;
            }
            result = read_status(store.as_ref(), user_id, project_id) => {
                match result {
                    Ok(status) => {
                        let changed = tracker.observe(&status);
                        if !changed.is_empty() {
                            tracing::info!(project_id, ?changed, "Pipeline status changed");
                        }
                        if status.stage_terminal(stage) {
                            let outcome = if status.stage_completed(stage) {
                                StageOutcome::Completed
                            } else {
                                StageOutcome::Failed
                            };
                            tracing::info!(project_id, ?stage, ?outcome, "Stage watch finished");
                            return outcome;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(project_id, ?stage, error = %e, "Status read failed, retrying");
                    }
                }
            }
        }

        tokio::select! {
            _ = cancel.cancelled() => return StageOutcome::Cancelled,
            _ = tokio::time::sleep_until(deadline) => return StageOutcome::TimedOut,
            _ = tokio::time::sleep(config.poll_interval) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use narrata_core::status::STATUS_FAILED;
    use narrata_storage::MemoryObjectStore;

    fn config() -> WatcherConfig {
        WatcherConfig::default()
    }

    async fn put_status(store: &MemoryObjectStore, body: &str) {
        store
            .put("u1/7/project_status.json", body.as_bytes().to_vec())
            .await
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn completed_stage_ends_the_watch() {
        let store = Arc::new(MemoryObjectStore::new());
        put_status(&store, r#"{"ebook_prep": "completed"}"#).await;

        let cancel = CancellationToken::new();
        let outcome = watch_stage(
            store,
            "u1",
            7,
            Stage::EbookPrep,
            &config(),
            &cancel,
        )
        .await;
        assert_eq!(outcome, StageOutcome::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_stage_reports_failure() {
        let store = Arc::new(MemoryObjectStore::new());
        put_status(&store, &format!(r#"{{"storyboard": "{STATUS_FAILED}"}}"#)).await;

        let cancel = CancellationToken::new();
        let outcome = watch_stage(
            store,
            "u1",
            7,
            Stage::Storyboard,
            &config(),
            &cancel,
        )
        .await;
        assert_eq!(outcome, StageOutcome::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn watch_times_out_when_stage_never_finishes() {
        let store = Arc::new(MemoryObjectStore::new());
        put_status(&store, r#"{"audiobook": "in_progress"}"#).await;

        let cancel = CancellationToken::new();
        let outcome = watch_stage(
            store,
            "u1",
            7,
            Stage::Audiobook,
            &config(),
            &cancel,
        )
        .await;
        assert_eq!(outcome, StageOutcome::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_the_watch() {
        let store = Arc::new(MemoryObjectStore::new());

        let cancel = CancellationToken::new();
        cancel.cancel();
        let outcome = watch_stage(
            store,
            "u1",
            7,
            Stage::Proofing,
            &config(),
            &cancel,
        )
        .await;
        assert_eq!(outcome, StageOutcome::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn stage_completing_mid_watch_is_detected() {
        let store = Arc::new(MemoryObjectStore::new());
        put_status(&store, r#"{"proofing": "in_progress"}"#).await;

        let cancel = CancellationToken::new();
        let watcher = tokio::spawn({
            let store = Arc::clone(&store);
            let cancel = cancel.clone();
            async move {
                watch_stage(store, "u1", 7, Stage::Proofing, &config(), &cancel).await
            }
        });

        // Let a few polls go by before the pipeline reports completion.
        tokio::time::sleep(Duration::from_secs(12)).await;
        put_status(&store, r#"{"proofing": "completed"}"#).await;

        assert_eq!(watcher.await.unwrap(), StageOutcome::Completed);
    }
}
