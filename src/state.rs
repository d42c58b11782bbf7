//! Application state shared across handlers

use std::sync::Arc;

use crate::models::{TaskModel, UserModel};
use crate::routes::RouteTable;
use crate::session::SessionStore;
use crate::store::JsonStore;
use crate::{WebConfig, WebResult};

/// Shared application state: configuration, record store, sessions and the
/// static route table
#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: WebConfig,
    /// Flat-file record store (exclusive owner of the table files)
    pub store: Arc<JsonStore>,
    /// Session registry (exclusive owner of session state)
    pub sessions: SessionStore,
    /// Fixed route table
    pub routes: Arc<RouteTable>,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: WebConfig) -> WebResult<Self> {
        let store = Arc::new(JsonStore::new(config.data_dir.as_str())?);
        let routes = Arc::new(RouteTable::new(&config.base_path));
        let sessions = SessionStore::new();

        tracing::info!(
            "Application state initialized (data dir: {}, base path: {:?})",
            config.data_dir,
            routes.base_path()
        );

        Ok(Self {
            config,
            store,
            sessions,
            routes,
        })
    }

    /// User model bound to this state's store
    pub fn users(&self) -> UserModel {
        UserModel::new(self.store.clone())
    }

    /// Task model bound to this state's store
    pub fn tasks(&self) -> TaskModel {
        TaskModel::new(self.store.clone())
    }

    /// Deployment base path ("" when served at the root)
    pub fn base_path(&self) -> &str {
        self.routes.base_path()
    }

    /// Base-path-prefixed redirect target
    pub fn url(&self, path: &str) -> String {
        self.routes.url(path)
    }
}
