use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use narrata_api::busy::BusySet;
use narrata_api::config::ServerConfig;
use narrata_api::router::build_app_router;
use narrata_api::state::AppState;
use narrata_lexicon::LexiconClient;
use narrata_pipeline::PipelineClient;
use narrata_storage::{BackoffConfig, BackoffLister, ObjectStore, S3ObjectStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "narrata_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = narrata_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    narrata_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    narrata_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Object storage ---
    let store: Arc<dyn ObjectStore> =
        Arc::new(S3ObjectStore::from_env(config.storage_bucket.clone()).await);
    let lister = Arc::new(BackoffLister::new(
        Arc::clone(&store),
        BackoffConfig::default(),
    ));
    tracing::info!(bucket = %config.storage_bucket, "Object store ready");

    // --- External clients ---
    let pipeline = Arc::new(PipelineClient::new(config.pipeline_url.clone()));
    let lexicon = Arc::new(LexiconClient::new(
        config.dictionary_url.clone(),
        config.master_dictionary_id.clone(),
    ));
    tracing::info!(pipeline_url = %config.pipeline_url, "External clients created");

    // --- App state ---
    let watcher_cancel = tokio_util::sync::CancellationToken::new();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        store,
        lister,
        pipeline,
        lexicon,
        busy: Arc::new(BusySet::new()),
        watcher_cancel: watcher_cancel.clone(),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // Stop in-flight stage watchers; they hold no external resources, so
    // cancellation alone is enough.
    watcher_cancel.cancel();

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
