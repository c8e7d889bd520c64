//! Server configuration loaded from the environment

use std::path::PathBuf;

use ::config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Which store backend the server runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Directory holding the browser front-end
    pub static_dir: PathBuf,
    /// Store backend selection
    pub store_backend: StoreBackend,
}

impl ServerConfig {
    /// Load the configuration from environment variables
    ///
    /// # Environment Variables
    /// - `HOST`: Interface to bind (default: "0.0.0.0")
    /// - `PORT`: Port to listen on (default: 3000)
    /// - `STATIC_DIR`: Front-end directory (default: "public")
    /// - `STORE_BACKEND`: `postgres` or `memory` (default: "postgres")
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000_i64)?
            .set_default("static_dir", "public")?
            .set_default("store_backend", "postgres")?
            .add_source(Environment::default())
            .build()?
            .try_deserialize()
    }

    /// Socket address string to bind the listener to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
