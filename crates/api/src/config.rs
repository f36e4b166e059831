/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `15`).
    pub request_timeout_secs: u64,
    /// Number of job-queue workers (default: available parallelism).
    pub queue_workers: usize,
    /// How long the queue waits for workers to drain on shutdown, in seconds
    /// (default: `60`). Exceeding it is fatal.
    pub shutdown_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `HOST`                 | `0.0.0.0`               |
    /// | `PORT`                 | `8080`                  |
    /// | `CORS_ORIGINS`         | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS` | `15`                    |
    /// | `MAX_QUEUE_WORKERS`    | available parallelism   |
    /// | `SHUTDOWN_WAIT`        | `60`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "15".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let queue_workers: usize = match std::env::var("MAX_QUEUE_WORKERS") {
            Ok(value) => value.parse().expect("MAX_QUEUE_WORKERS must be a valid usize"),
            Err(_) => default_worker_count(),
        };

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_WAIT")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("SHUTDOWN_WAIT must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            queue_workers,
            shutdown_timeout_secs,
        }
    }
}

/// Default worker count: one per available processor.
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
}
