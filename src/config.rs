//! Server configuration loaded from the environment (and `.env`).

use std::env;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TYPST_BIN: &str = "typst";
const DEFAULT_CACHE_TTL_SECS: u64 = 10 * 60;
const DEFAULT_MAX_CONNECTIONS: u32 = 20;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value '{value}'")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Falls back to the in-memory store when unset.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub typst_bin: String,
    pub template_cache_ttl: Duration,
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            typst_bin: DEFAULT_TYPST_BIN.to_string(),
            template_cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            allowed_origins: vec!["http://localhost:5173".to_string()],
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from any variable source; `from_env` uses the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let value = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Self {
            database_url: value("DATABASE_URL"),
            max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                value("DATABASE_MAX_CONNECTIONS"),
                defaults.max_connections,
            )?,
            host: value("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", value("PORT"), defaults.port)?,
            typst_bin: value("TYPST_BIN").unwrap_or(defaults.typst_bin),
            template_cache_ttl: Duration::from_secs(parse_or(
                "TEMPLATE_CACHE_TTL_SECS",
                value("TEMPLATE_CACHE_TTL_SECS"),
                DEFAULT_CACHE_TTL_SECS,
            )?),
            allowed_origins: value("ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or(defaults.allowed_origins),
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        None => Ok(default),
    }
}
