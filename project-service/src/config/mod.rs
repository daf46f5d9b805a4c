//! Configuration for project-service.

use serde::Deserialize;
use service_core::config::{self as core_config, get_env, get_optional_env, is_production};
use service_core::error::AppError;

/// Photos allowed per project unless configured otherwise.
pub const DEFAULT_MAX_PHOTOS: usize = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub database: DatabaseConfig,
    pub uploads: UploadConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub max_photos_per_project: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_photos_per_project: DEFAULT_MAX_PHOTOS,
        }
    }
}

impl ProjectConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let is_prod = is_production();

        Ok(ProjectConfig {
            common,
            service_name: get_env("SERVICE_NAME", Some("project-service"), is_prod)?,
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            otlp_endpoint: get_optional_env("OTLP_ENDPOINT"),
            database: DatabaseConfig {
                url: get_env("DATABASE_URL", None, is_prod)?,
                max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 10, is_prod)?,
                min_connections: parse_env("DATABASE_MIN_CONNECTIONS", 1, is_prod)?,
            },
            uploads: UploadConfig {
                max_photos_per_project: parse_env(
                    "MAX_PHOTOS_PER_PROJECT",
                    DEFAULT_MAX_PHOTOS,
                    is_prod,
                )?,
            },
        })
    }
}

fn parse_env<T>(key: &str, default: T, is_prod: bool) -> Result<T, AppError>
where
    T: std::str::FromStr + ToString,
{
    let raw = get_env(key, Some(&default.to_string()), is_prod)?;
    raw.trim().parse().map_err(|_| {
        AppError::ConfigError(anyhow::anyhow!("{} must be a number, got '{}'", key, raw))
    })
}
