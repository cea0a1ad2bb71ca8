//! Repository for the `projects` table.

use narrata_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, name, title, author, description, cover_path, epub_path, \
                       mode, voice, dictionary_name, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    ///
    /// If `mode` is `None` in the input, defaults to `validation`.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (user_id, name, title, author, description, cover_path, epub_path, mode)
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, 'validation'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.user_id)
            .bind(&input.name)
            .bind(&input.title)
            .bind(&input.author)
            .bind(&input.description)
            .bind(&input.cover_path)
            .bind(&input.epub_path)
            .bind(&input.mode)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all projects for a user, most recently created first.
    pub async fn list_by_user(pool: &PgPool, user_id: &str) -> Result<Vec<Project>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM projects WHERE user_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List all projects ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                title = COALESCE($3, title),
                author = COALESCE($4, author),
                description = COALESCE($5, description),
                cover_path = COALESCE($6, cover_path),
                mode = COALESCE($7, mode),
                voice = COALESCE($8, voice),
                dictionary_name = COALESCE($9, dictionary_name)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.title)
            .bind(&input.author)
            .bind(&input.description)
            .bind(&input.cover_path)
            .bind(&input.mode)
            .bind(&input.voice)
            .bind(&input.dictionary_name)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a project by ID. Returns `true` if a row was removed.
    ///
    /// Pronunciations and storyboard versions cascade at the schema level;
    /// object-storage cleanup is the caller's responsibility and happens
    /// before the row goes away.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
