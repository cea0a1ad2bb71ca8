/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Base URL of the remote pipeline command server.
    pub pipeline_url: String,
    /// S3 bucket holding project artifacts.
    pub storage_bucket: String,
    /// Base URL of the external pronunciation-dictionary API.
    pub dictionary_url: String,
    /// Fixed master dictionary resource id.
    pub master_dictionary_id: String,
    /// Chunk limit applied to validation-mode pipeline runs (default: `5`).
    pub validation_chunk_limit: u32,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                    |
    /// |--------------------------|----------------------------|
    /// | `HOST`                   | `0.0.0.0`                  |
    /// | `PORT`                   | `3000`                     |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`  | `30`                       |
    /// | `PIPELINE_URL`           | `http://localhost:8000`    |
    /// | `STORAGE_BUCKET`         | `narrata-artifacts`        |
    /// | `DICTIONARY_URL`         | `http://localhost:8100`    |
    /// | `MASTER_DICTIONARY_ID`   | `master`                   |
    /// | `VALIDATION_CHUNK_LIMIT` | `5`                        |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let pipeline_url =
            std::env::var("PIPELINE_URL").unwrap_or_else(|_| "http://localhost:8000".into());

        let storage_bucket =
            std::env::var("STORAGE_BUCKET").unwrap_or_else(|_| "narrata-artifacts".into());

        let dictionary_url =
            std::env::var("DICTIONARY_URL").unwrap_or_else(|_| "http://localhost:8100".into());

        let master_dictionary_id =
            std::env::var("MASTER_DICTIONARY_ID").unwrap_or_else(|_| "master".into());

        let validation_chunk_limit: u32 = std::env::var("VALIDATION_CHUNK_LIMIT")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("VALIDATION_CHUNK_LIMIT must be a valid u32");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            pipeline_url,
            storage_bucket,
            dictionary_url,
            master_dictionary_id,
            validation_chunk_limit,
        }
    }
}
