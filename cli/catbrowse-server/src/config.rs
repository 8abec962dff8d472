//! Layered service configuration.
//!
//! Values are read from built-in defaults, then an optional TOML file and
//! finally `CATBROWSE_*` environment variables, e.g.
//! `CATBROWSE_UPSTREAM__API_KEY` sets `upstream.api_key`.

use std::collections::HashMap;
use std::env;
use std::net::SocketAddr;
use std::path::Path;

use catbrowse_catalog::UpstreamConfig;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "catbrowse.toml";
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:4300";
const ENV_PREFIX: &str = "CATBROWSE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read configuration")]
    Read(#[from] config::ConfigError),
    #[error("'auth.token_secret' must not be empty")]
    EmptyTokenSecret,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    pub auth: AuthConfig,
}

#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared secret the bearer tokens are signed with.
    pub token_secret: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"<redacted>")
            .finish()
    }
}

impl ServerConfig {
    /// Read the configuration from `path`, or from [DEFAULT_CONFIG_FILE] in
    /// the working directory if present, and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(path, env::vars().collect())
    }

    /// Like [ServerConfig::load] but with an explicit set of environment
    /// variables.
    pub fn load_from(
        path: Option<&Path>,
        vars: HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => {
                debug!(?path, "reading config file");
                File::from(path).format(FileFormat::Toml).required(true)
            },
            None => File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false),
        };

        let config: ServerConfig = Config::builder()
            .set_default("listen_addr", DEFAULT_LISTEN_ADDR)?
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .source(Some(vars))
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        if config.auth.token_secret.trim().is_empty() {
            return Err(ConfigError::EmptyTokenSecret);
        }
        Ok(config)
    }
}
