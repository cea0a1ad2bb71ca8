mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use serde_json::json;
use sqlx::PgPool;

use narrata_core::artifacts::project_prefix;
use narrata_core::pronunciation::Correction;
use narrata_db::models::project::{CreateProject, Project};
use narrata_db::repositories::{ProjectRepo, PronunciationRepo, StoryboardVersionRepo};
use narrata_storage::{MemoryObjectStore, ObjectStore};

use common::{body_json, build_test_app, build_test_app_with_store, delete, get, send_json};

async fn seed_project(pool: &PgPool, user_id: &str) -> Project {
    ProjectRepo::create(
        pool,
        &CreateProject {
            user_id: user_id.to_string(),
            name: "Dune".to_string(),
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            description: None,
            cover_path: None,
            epub_path: format!("uploads/{user_id}/dune.epub"),
            mode: None,
        },
    )
    .await
    .unwrap()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_and_fetch_project(pool: PgPool) {
    let app = build_test_app(pool);

    let response = send_json(
        app.clone(),
        Method::POST,
        "/api/v1/projects",
        json!({
            "user_id": "u1",
            "name": "Dune",
            "title": "Dune",
            "author": "Frank Herbert",
            "epub_path": "uploads/u1/dune.epub"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = body_json(response).await;
    assert_eq!(created["mode"], "validation");
    let id = created["id"].as_i64().unwrap();

    let response = get(app, &format!("/api/v1/projects/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched["name"], "Dune");
    assert_eq!(fetched["voice"], serde_json::Value::Null);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_rejects_invalid_mode(pool: PgPool) {
    let app = build_test_app(pool);

    let response = send_json(
        app,
        Method::POST,
        "/api/v1/projects",
        json!({
            "user_id": "u1",
            "name": "Dune",
            "title": "Dune",
            "author": "Frank Herbert",
            "epub_path": "uploads/u1/dune.epub",
            "mode": "turbo"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn fetching_a_missing_project_returns_404(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(app, "/api/v1/projects/9999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_changes_only_the_given_fields(pool: PgPool) {
    let project = seed_project(&pool, "u1").await;
    let app = build_test_app(pool);

    let response = send_json(
        app,
        Method::PUT,
        &format!("/api/v1/projects/{}", project.id),
        json!({ "voice": "en-GB-aria", "mode": "production" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await;
    assert_eq!(updated["voice"], "en-GB-aria");
    assert_eq!(updated["mode"], "production");
    assert_eq!(updated["author"], "Frank Herbert");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_filters_by_user(pool: PgPool) {
    seed_project(&pool, "u1").await;
    seed_project(&pool, "u1").await;
    seed_project(&pool, "u2").await;
    let app = build_test_app(pool);

    let response = get(app.clone(), "/api/v1/projects?user_id=u1").await;
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 2);

    let response = get(app, "/api/v1/projects").await;
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 3);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_removes_artifacts_and_rows(pool: PgPool) {
    let project = seed_project(&pool, "u1").await;
    let other = seed_project(&pool, "u2").await;

    // Rows that hang off the project and must go with it.
    PronunciationRepo::replace_for_project(
        &pool,
        project.id,
        &[Correction {
            original_name: "Chani".to_string(),
            corrected_spelling: "CHAH-nee".to_string(),
            ipa: "ˈtʃɑːni".to_string(),
        }],
    )
    .await
    .unwrap();
    StoryboardVersionRepo::set_active(
        &pool,
        project.id,
        1,
        1,
        "image",
        &format!("u1/{}/chapter1_1_image1.jpg", project.id),
    )
    .await
    .unwrap();

    // Stored artifacts under the project prefix, plus one foreign object
    // that must survive.
    let store = Arc::new(MemoryObjectStore::new());
    let prefix = project_prefix(&project.user_id, project.id);
    for name in ["chapter1_1_image1.jpg", "chapter1_1_audio1.mp3", "project_status.json"] {
        store.put(&format!("{prefix}{name}"), vec![1]).await.unwrap();
    }
    let foreign_key = format!(
        "{}chapter1_1_image1.jpg",
        project_prefix(&other.user_id, other.id)
    );
    store.put(&foreign_key, vec![1]).await.unwrap();

    let app = build_test_app_with_store(pool.clone(), Arc::clone(&store));
    let response = delete(app.clone(), &format!("/api/v1/projects/{}", project.id)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Storage: the project's objects are gone, the other project's remain.
    assert!(store.list_keys(&prefix).await.unwrap().is_empty());
    assert_eq!(store.len().await, 1);
    store.get(&foreign_key).await.unwrap();

    // Database: project and dependents are gone.
    assert!(ProjectRepo::find_by_id(&pool, project.id)
        .await
        .unwrap()
        .is_none());
    assert!(PronunciationRepo::list_by_project(&pool, project.id)
        .await
        .unwrap()
        .is_empty());
    assert!(StoryboardVersionRepo::list_by_project(&pool, project.id)
        .await
        .unwrap()
        .is_empty());

    let response = get(app, &format!("/api/v1/projects/{}", project.id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
