//! Taskdeck Web Server
//!
//! Main web server implementation using Axum.

use std::time::Duration;

use axum::serve;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::{create_app, AppState, WebConfig, WebError, WebResult};

/// Main Taskdeck web server
pub struct TaskdeckServer {
    config: WebConfig,
    state: AppState,
}

impl TaskdeckServer {
    /// Create a new Taskdeck server
    pub fn new(config: WebConfig) -> WebResult<Self> {
        let state = AppState::new(config.clone())?;

        Ok(Self { config, state })
    }

    /// Start the web server
    pub async fn start(self) -> WebResult<()> {
        let address = self.config.address();

        info!("🚀 Starting Taskdeck Web Server");
        info!("📍 Server address: http://{}", address);
        info!("🔧 Development mode: {}", self.config.dev_mode);

        // Create the application
        let app = create_app(self.state.clone());

        // Create TCP listener
        let listener = TcpListener::bind(&address).await.map_err(WebError::Io)?;

        info!("✅ Server listening on http://{}", address);

        // Start cleanup task for expired sessions
        let sessions = self.state.sessions.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(3600)); // Every hour
            loop {
                interval.tick().await;
                sessions.sweep_expired();
            }
        });

        // Start the server
        if let Err(e) = serve(listener, app).await {
            error!("❌ Server error: {}", e);
            return Err(WebError::Io(e));
        }

        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &WebConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Builder for TaskdeckServer
pub struct TaskdeckServerBuilder {
    config: WebConfig,
}

impl TaskdeckServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self {
            config: WebConfig::default(),
        }
    }

    /// Set the server host
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Enable development mode
    pub fn dev_mode(mut self, dev_mode: bool) -> Self {
        self.config.dev_mode = dev_mode;
        self
    }

    /// Set the data directory for table files
    pub fn data_dir<S: Into<String>>(mut self, data_dir: S) -> Self {
        self.config.data_dir = data_dir.into();
        self
    }

    /// Set the deployment base path
    pub fn base_path<S: Into<String>>(mut self, base_path: S) -> Self {
        self.config.base_path = base_path.into();
        self
    }

    /// Set static files directory
    pub fn static_dir<S: Into<String>>(mut self, static_dir: S) -> Self {
        self.config.static_dir = Some(static_dir.into());
        self
    }

    /// Build the server
    pub fn build(self) -> WebResult<TaskdeckServer> {
        TaskdeckServer::new(self.config)
    }
}

impl Default for TaskdeckServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to start a server with environment configuration
pub async fn start_server() -> WebResult<()> {
    let config = WebConfig::from_env();
    let server = TaskdeckServer::new(config)?;
    server.start().await
}
