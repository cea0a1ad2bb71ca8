//! Project status documents and transition detection.
//!
//! The remote pipeline overwrites `project_status.json` under the project
//! prefix as it works; each stage carries a free-ish status string. This
//! module gives the document a typed shape and detects transitions between
//! successive reads so that one change triggers exactly one refresh of
//! derived state.

use serde::{Deserialize, Serialize};

/// Pipeline stages, in production order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    EbookPrep,
    Storyboard,
    Proofing,
    Audiobook,
}

impl Stage {
    /// All stages in production order.
    pub const ALL: [Stage; 4] = [
        Stage::EbookPrep,
        Stage::Storyboard,
        Stage::Proofing,
        Stage::Audiobook,
    ];
}

/// Stage status a freshly created project reports before the pipeline has
/// written anything.
pub const STATUS_NOT_STARTED: &str = "not_started";

/// Stage status the pipeline writes while a stage is running.
pub const STATUS_IN_PROGRESS: &str = "in_progress";

/// Stage status the pipeline writes when a stage finishes successfully.
pub const STATUS_COMPLETED: &str = "completed";

/// Stage status the pipeline writes when a stage fails.
pub const STATUS_FAILED: &str = "failed";

/// The `project_status.json` document: one status string per stage.
///
/// Missing fields deserialize to `not_started` so partially written
/// documents (the pipeline writes stages as it reaches them) still parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStatus {
    #[serde(default = "not_started")]
    pub ebook_prep: String,
    #[serde(default = "not_started")]
    pub storyboard: String,
    #[serde(default = "not_started")]
    pub proofing: String,
    #[serde(default = "not_started")]
    pub audiobook: String,
}

fn not_started() -> String {
    STATUS_NOT_STARTED.to_string()
}

impl Default for ProjectStatus {
    fn default() -> Self {
        Self {
            ebook_prep: not_started(),
            storyboard: not_started(),
            proofing: not_started(),
            audiobook: not_started(),
        }
    }
}

impl ProjectStatus {
    /// Status string for one stage.
    pub fn stage(&self, stage: Stage) -> &str {
        match stage {
            Stage::EbookPrep => &self.ebook_prep,
            Stage::Storyboard => &self.storyboard,
            Stage::Proofing => &self.proofing,
            Stage::Audiobook => &self.audiobook,
        }
    }

    /// Whether the given stage has finished successfully.
    pub fn stage_completed(&self, stage: Stage) -> bool {
        self.stage(stage) == STATUS_COMPLETED
    }

    /// Whether the given stage has reached a terminal status.
    pub fn stage_terminal(&self, stage: Stage) -> bool {
        matches!(self.stage(stage), STATUS_COMPLETED | STATUS_FAILED)
    }
}

/// Detects status transitions between successive document reads.
///
/// `observe` returns the stages whose status changed since the previous
/// observation. The first observation reports changes relative to the
/// all-`not_started` baseline, so a project already mid-pipeline triggers a
/// refresh on first read. An unchanged document returns an empty list,
/// which is what keeps a 5-second poll from causing a refresh storm.
#[derive(Debug, Default)]
pub struct StatusTracker {
    last: Option<ProjectStatus>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new document and return the stages that changed.
    pub fn observe(&mut self, current: &ProjectStatus) -> Vec<Stage> {
        let baseline = self.last.take().unwrap_or_default();
        let changed = Stage::ALL
            .into_iter()
            .filter(|&s| baseline.stage(s) != current.stage(s))
            .collect();
        self.last = Some(current.clone());
        changed
    }
}
