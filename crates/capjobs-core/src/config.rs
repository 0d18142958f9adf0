//! Configuration for capjobs.
//!
//! [`Config::load`] layers a `.env` file in the working directory, then the
//! process environment, on top of the embedded defaults below. `DUMP_DB_URI`,
//! `DUMP_DB_NAME` and `VALID_KEYWORDS` have no default; loading fails if any
//! of them is unset or blank.
//! [`Config::from_env_map`] does the same from an explicit map (useful in
//! tests).

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::keywords::KeywordRegistry;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
bind_addr              = "0.0.0.0:8000"
index_html             = "index.html"
rate_limit_requests    = 5
rate_limit_window_secs = 60
"#;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("no valid keywords configured")]
    NoKeywords,

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("failed to read .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
}

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Fully validated application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub rate_limit: RateLimitSettings,
    pub keywords: KeywordRegistry,
}

/// Where the scraped dataset lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// MongoDB connection string (`DUMP_DB_URI`).
    pub uri: String,
    /// Database holding one collection per keyword (`DUMP_DB_NAME`).
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// HTML file served on `/`, read on every request.
    pub index_html: PathBuf,
}

/// Fixed-window quota applied per client address on rate-limited routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSettings {
    pub requests: u32,
    pub window: Duration,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            requests: 5,
            window: Duration::from_secs(60),
        }
    }
}

/// Flat shape of the layered sources before validation. Environment keys are
/// lowercased by the `config` crate, so `DUMP_DB_URI` lands in `dump_db_uri`.
#[derive(Debug, Deserialize)]
struct RawConfig {
    dump_db_uri: Option<String>,
    dump_db_name: Option<String>,
    valid_keywords: Option<String>,
    bind_addr: String,
    index_html: PathBuf,
    rate_limit_requests: u32,
    rate_limit_window_secs: u64,
}

impl Config {
    /// Load from `./.env` and the process environment on top of the built-in
    /// defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(".env"))
    }

    /// Like [`Config::load`] with an explicit dotenv path. A missing file is
    /// skipped; process variables win over the file.
    pub fn load_from(dotenv: &Path) -> Result<Self, ConfigError> {
        let mut vars = match dotenvy::from_path_iter(dotenv) {
            Ok(iter) => iter.collect::<Result<Vec<_>, _>>()?,
            Err(e) if e.not_found() => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        vars.extend(
            std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        );
        Self::from_env_map(vars)
    }

    /// Load from an explicit variable map instead of the process environment.
    pub fn from_env_map<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: config::Map<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::from_environment(config::Environment::default().source(Some(map)))
    }

    fn from_environment(env: config::Environment) -> Result<Self, ConfigError> {
        let raw: RawConfig = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(env)
            .build()?
            .try_deserialize()?;

        raw.validate()
    }
}

impl RawConfig {
    fn validate(self) -> Result<Config, ConfigError> {
        let uri = required(self.dump_db_uri, "DUMP_DB_URI")?;
        let name = required(self.dump_db_name, "DUMP_DB_NAME")?;
        let keywords = KeywordRegistry::parse(&required(self.valid_keywords, "VALID_KEYWORDS")?)?;

        let bind_addr = self
            .bind_addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        if self.rate_limit_requests == 0 {
            return Err(ConfigError::Invalid {
                var: "RATE_LIMIT_REQUESTS",
                reason: "must be greater than 0".into(),
            });
        }
        if self.rate_limit_window_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "RATE_LIMIT_WINDOW_SECS",
                reason: "must be greater than 0".into(),
            });
        }

        Ok(Config {
            database: DatabaseConfig { uri, name },
            server: ServerConfig {
                bind_addr,
                index_html: self.index_html,
            },
            rate_limit: RateLimitSettings {
                requests: self.rate_limit_requests,
                window: Duration::from_secs(self.rate_limit_window_secs),
            },
            keywords,
        })
    }
}

fn required(value: Option<String>, var: &'static str) -> Result<String, ConfigError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(var)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
