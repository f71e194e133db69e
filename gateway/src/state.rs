use std::sync::Arc;

use reqwest_middleware::ClientWithMiddleware;
use warehouse_connector::{Connector, Error};

use crate::config::Config;

/// Shared by every request: immutable configuration and the HTTP connection pool.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    http: ClientWithMiddleware,
}

impl AppState {
    pub fn new(config: Config, http: ClientWithMiddleware) -> Self {
        Self {
            config: Arc::new(config),
            http,
        }
    }

    /// Builds a fresh connector for `project_id`. Credentials are resolved on every call.
    pub async fn connector(&self, project_id: &str) -> Result<Connector, Error> {
        let warehouse = &self.config.warehouse;
        let config = warehouse.connector_config(self.http.clone());
        match (&warehouse.credentials_path, warehouse.anonymous) {
            (Some(path), _) => Connector::connect(project_id, Some(path.as_path()), config).await,
            (None, true) => Ok(Connector::new(project_id, config.anonymous())),
            (None, false) => Ok(Connector::new(project_id, config.with_auth().await?)),
        }
    }
}
