//! Deployment settings read from the environment (and `.env`).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub const CATALOG_PATH_ENV_VAR: &str = "RECIPE_CATALOG_PATH";
pub const SOLVER_TIMEOUT_ENV_VAR: &str = "RECIPE_SOLVER_TIMEOUT_MS";
pub const LOG_LEVEL_ENV_VAR: &str = "RECIPE_LOG_LEVEL";

pub const DEFAULT_CATALOG_PATH: &str = "data/catalog.csv";
pub const DEFAULT_SOLVER_TIMEOUT_MS: u64 = 5_000;
pub const MIN_SOLVER_TIMEOUT_MS: u64 = 100;
pub const MAX_SOLVER_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub catalog_path: PathBuf,
    pub solver_timeout: Duration,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            solver_timeout: Duration::from_millis(DEFAULT_SOLVER_TIMEOUT_MS),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Keeps the solver budget within a fixed ceiling.
pub fn clamp_timeout_ms(ms: u64) -> Duration {
    Duration::from_millis(ms.clamp(MIN_SOLVER_TIMEOUT_MS, MAX_SOLVER_TIMEOUT_MS))
}

impl Settings {
    /// Loads `.env` if present, then reads the environment.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut settings = Settings::default();
        if let Some(path) = lookup(CATALOG_PATH_ENV_VAR).filter(|p| !p.trim().is_empty()) {
            settings.catalog_path = PathBuf::from(path.trim());
        }
        if let Some(raw) = lookup(SOLVER_TIMEOUT_ENV_VAR) {
            let ms: u64 = raw
                .trim()
                .parse()
                .with_context(|| {
                    format!("{} must be milliseconds, got '{}'", SOLVER_TIMEOUT_ENV_VAR, raw)
                })?;
            settings.solver_timeout = clamp_timeout_ms(ms);
        }
        if let Some(level) = lookup(LOG_LEVEL_ENV_VAR).filter(|l| !l.trim().is_empty()) {
            settings.log_level = level.trim().to_ascii_lowercase();
        }
        Ok(settings)
    }
}
