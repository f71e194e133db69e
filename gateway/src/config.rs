//! Gateway configuration.
//!
//! Layered, later sources win:
//! - built-in defaults
//! - `gateway.toml` (or the file named by `GATEWAY_CONFIG`), optional
//! - environment variables with the `GATEWAY_` prefix, `__` separating sections
//! - the bare `PORT` and `NAME` variables
//!
//! ```toml
//! [http]
//! port = 8080
//!
//! [warehouse]
//! credentials_path = ".keys/service-account.json"
//! location = "EU"
//! ```
//!
//! ```bash
//! GATEWAY_WAREHOUSE__ENDPOINT=http://localhost:9050
//! GATEWAY_WAREHOUSE__ANONYMOUS=true
//! ```

use std::path::PathBuf;
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Serialize};
use warehouse_connector::ConnectorConfig;

pub const DEFAULT_CONFIG_FILE: &str = "gateway.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub greeting: GreetingConfig,
    #[serde(default)]
    pub warehouse: WarehouseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GreetingConfig {
    /// Who `GET /` says hello to.
    pub name: String,
}

impl Default for GreetingConfig {
    fn default() -> Self {
        Self {
            name: "World".to_string(),
        }
    }
}

/// How each request reaches the warehouse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseConfig {
    /// Service account key. Without it application default credentials are used,
    /// unless `anonymous` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials_path: Option<PathBuf>,
    pub endpoint: String,
    /// Send no Authorization header. Only useful against an emulator.
    #[serde(default)]
    pub anonymous: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub query_timeout_ms: u64,
    pub poll_interval_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i64>,
    /// Log raw warehouse responses.
    #[serde(default)]
    pub debug: bool,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            credentials_path: None,
            endpoint: "https://bigquery.googleapis.com".to_string(),
            anonymous: false,
            location: None,
            query_timeout_ms: 10_000,
            poll_interval_ms: 1_000,
            max_results: None,
            debug: false,
        }
    }
}

impl WarehouseConfig {
    /// Connector settings sharing `http` as the connection pool. Authentication is left unset.
    pub fn connector_config(&self, http: ClientWithMiddleware) -> ConnectorConfig {
        ConnectorConfig {
            http,
            bigquery_endpoint: self.endpoint.clone(),
            token_source_provider: None,
            location: self.location.clone(),
            query_timeout: Duration::from_millis(self.query_timeout_ms),
            max_results: self.max_results,
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            debug: self.debug,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, ignored when `RUST_LOG` is set.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads from the default locations.
    pub fn load() -> Result<Self, figment::Error> {
        let path = std::env::var("GATEWAY_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::figment(path).extract()
    }

    pub fn figment(path: impl Into<PathBuf>) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.into()))
            .merge(Env::prefixed("GATEWAY_").ignore(&["CONFIG"]).split("__"))
            .merge(Env::raw().only(&["PORT"]).map(|_| "http.port".into()))
            .merge(Env::raw().only(&["NAME"]).map(|_| "greeting.name".into()))
    }
}
