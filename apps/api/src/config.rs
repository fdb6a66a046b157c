//! API configuration module.
//!
//! Configuration is layered: built-in defaults, then an optional
//! `busdesk.toml` in the working directory, then `BUSDESK_*` environment
//! variables (`BUSDESK_JWT_SECRET`, `BUSDESK_HTTP_PORT`, ...).

use std::net::SocketAddr;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Interface the HTTP server binds to
    pub bind_addr: String,

    /// HTTP server port
    pub http_port: u16,

    /// SQLite database file
    pub database_path: String,

    /// Connection pool size
    pub max_connections: u32,

    /// Secret used to verify (and, for the seed tool, sign) bearer tokens
    pub jwt_secret: String,

    /// Lifetime of tokens minted by the seed tool
    pub token_lifetime_secs: i64,

    /// Default `tracing` filter; `RUST_LOG` wins when set
    pub log_filter: String,

    /// Sender address on outgoing email
    pub mail_from: String,

    /// Ledger page size when `limit` is not sent
    pub default_page_size: u32,

    /// Largest ledger page a client may ask for
    pub max_page_size: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            bind_addr: "0.0.0.0".to_string(),
            http_port: 8080,
            database_path: "busdesk.db".to_string(),
            max_connections: 5,
            jwt_secret: "busdesk-dev-secret-change-in-production".to_string(),
            token_lifetime_secs: 3600,
            log_filter: "busdesk_api=info,busdesk_db=info,tower_http=info".to_string(),
            mail_from: "no-reply@busdesk.local".to_string(),
            default_page_size: busdesk_core::DEFAULT_PAGE_SIZE,
            max_page_size: busdesk_core::MAX_PAGE_SIZE,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from defaults, `busdesk.toml` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(Config::try_from(&ApiConfig::default())?)
            .add_source(File::with_name("busdesk").required(false))
            .add_source(Environment::with_prefix("BUSDESK").try_parsing(true))
            .build()?;

        let config: ApiConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingRequired("jwt_secret".to_string()));
        }
        if self.max_page_size == 0 {
            return Err(ConfigError::InvalidValue("max_page_size".to_string()));
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(ConfigError::InvalidValue("default_page_size".to_string()));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.http_port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue("bind_addr".to_string()))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}
