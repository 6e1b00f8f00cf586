//! Application configuration

mod app_config;
mod migration;

pub use app_config::AppConfig;
pub use migration::Migrate;

use anyhow::{anyhow, Result};
use std::path::PathBuf;

/// Platform data directory for a default deployment.
pub fn default_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join("rondas"))
        .ok_or_else(|| anyhow!("could not determine platform data directory"))
}
