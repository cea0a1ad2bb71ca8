//! Repository for the `pronunciations` table.

use narrata_core::pronunciation::Correction;
use narrata_core::types::DbId;
use sqlx::PgPool;

use crate::models::pronunciation::{MasterDictionaryEntry, Pronunciation};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, original_name, corrected_spelling, ipa, created_at";

/// Provides access to per-project corrections and the derived master
/// dictionary.
pub struct PronunciationRepo;

impl PronunciationRepo {
    /// List a project's corrections ordered by original name.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Pronunciation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pronunciations WHERE project_id = $1 ORDER BY original_name"
        );
        sqlx::query_as::<_, Pronunciation>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Replace a project's correction set atomically.
    ///
    /// Deletes the existing rows and inserts the new set inside one
    /// transaction, returning the stored rows.
    pub async fn replace_for_project(
        pool: &PgPool,
        project_id: DbId,
        corrections: &[Correction],
    ) -> Result<Vec<Pronunciation>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM pronunciations WHERE project_id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;

        let insert = format!(
            "INSERT INTO pronunciations (project_id, original_name, corrected_spelling, ipa)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let mut rows = Vec::with_capacity(corrections.len());
        for c in corrections {
            let row = sqlx::query_as::<_, Pronunciation>(&insert)
                .bind(project_id)
                .bind(&c.original_name)
                .bind(&c.corrected_spelling)
                .bind(&c.ipa)
                .fetch_one(&mut *tx)
                .await?;
            rows.push(row);
        }

        tx.commit().await?;
        Ok(rows)
    }

    /// The master dictionary: every distinct correction across all of a
    /// user's projects, latest entry winning per original name.
    pub async fn master_dictionary(
        pool: &PgPool,
        user_id: &str,
    ) -> Result<Vec<MasterDictionaryEntry>, sqlx::Error> {
        sqlx::query_as::<_, MasterDictionaryEntry>(
            "SELECT DISTINCT ON (p.original_name)
                 p.original_name, p.corrected_spelling, p.ipa
             FROM pronunciations p
             JOIN projects pr ON pr.id = p.project_id
             WHERE pr.user_id = $1
             ORDER BY p.original_name, p.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
