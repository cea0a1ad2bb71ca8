//! Repository for the `storyboard_versions` table.

use narrata_core::types::DbId;
use sqlx::PgPool;

use crate::models::storyboard_version::StoryboardVersion;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, chapter, chunk, kind, active_key, updated_at";

/// Tracks which artifact version is active per storyboard slot.
pub struct StoryboardVersionRepo;

impl StoryboardVersionRepo {
    /// Set the active artifact for a slot, inserting or replacing the
    /// existing record.
    pub async fn set_active(
        pool: &PgPool,
        project_id: DbId,
        chapter: i32,
        chunk: i32,
        kind: &str,
        active_key: &str,
    ) -> Result<StoryboardVersion, sqlx::Error> {
        let query = format!(
            "INSERT INTO storyboard_versions (project_id, chapter, chunk, kind, active_key)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT ON CONSTRAINT uq_storyboard_versions_slot
             DO UPDATE SET active_key = EXCLUDED.active_key, updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StoryboardVersion>(&query)
            .bind(project_id)
            .bind(chapter)
            .bind(chunk)
            .bind(kind)
            .bind(active_key)
            .fetch_one(pool)
            .await
    }

    /// List all active-version records for a project.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<StoryboardVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM storyboard_versions
             WHERE project_id = $1
             ORDER BY chapter, chunk, kind"
        );
        sqlx::query_as::<_, StoryboardVersion>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}
