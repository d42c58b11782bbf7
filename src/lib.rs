//! Taskdeck Web Server
//!
//! A session-authenticated user and task-board application backed by a
//! flat-file JSON record store.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod server;
pub mod session;
pub mod state;
pub mod store;
pub mod templates;

// Re-export main types
pub use server::TaskdeckServer;
pub use state::AppState;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Create the main application router
///
/// Every page request flows through the fallback dispatcher, which resolves
/// the route key against the static route table. Static assets are served
/// directly.
pub fn create_app(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    let mut router = Router::new();

    // Static file serving
    if let Some(dir) = static_dir {
        router = router.nest_service("/static", ServeDir::new(dir));
    }

    router
        // All registered routes dispatch through the route table
        .fallback(handlers::dispatch)
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1MB max body size
        .with_state(state)
}

/// Configuration for the web server
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Enable development mode
    pub dev_mode: bool,
    /// Directory holding the JSON table files
    pub data_dir: String,
    /// Base path under which the application is deployed ("" for root)
    pub base_path: String,
    /// Static files directory
    pub static_dir: Option<String>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            dev_mode: false,
            data_dir: "data".to_string(),
            base_path: String::new(),
            static_dir: None,
        }
    }
}

impl WebConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("TASKDECK_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("TASKDECK_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            dev_mode: std::env::var("TASKDECK_DEV_MODE")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            data_dir: std::env::var("TASKDECK_DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            base_path: std::env::var("TASKDECK_BASE_PATH").unwrap_or_default(),
            static_dir: std::env::var("TASKDECK_STATIC_DIR").ok(),
        }
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Error types for the web server
#[derive(thiserror::Error, Debug)]
pub enum WebError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Password hashing error: {0}")]
    Password(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;

/// Initialize logging for the web server
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskdeck=debug,tower_http=debug,axum=debug".into()),
        )
        .init();
}
