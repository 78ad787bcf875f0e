//! Configuration loading and database URL resolution

use crate::{Error, Result};
use std::path::PathBuf;
use tracing::info;

/// Database URL resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. `DATABASE_URL` environment variable
/// 3. TOML config file (`database_url` key)
/// 4. Compiled default under the platform data directory (fallback)
pub fn resolve_database_url(cli_arg: Option<&str>) -> Result<String> {
    // Priority 1: Command-line argument
    if let Some(url) = cli_arg {
        info!("Database URL taken from command line");
        return Ok(url.to_string());
    }

    // Priority 2: Environment variable
    if let Ok(url) = std::env::var("DATABASE_URL") {
        if !url.trim().is_empty() {
            info!("Database URL taken from DATABASE_URL environment variable");
            return Ok(url);
        }
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = locate_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(url) = config.get("database_url").and_then(|v| v.as_str()) {
                    info!("Database URL taken from {}", config_path.display());
                    return Ok(url.to_string());
                }
            }
        }
    }

    // Priority 4: Compiled default
    let url = default_database_url()?;
    info!("Database URL not configured, using default: {}", url);
    Ok(url)
}

/// Get default configuration file path for the platform
fn locate_config_file() -> Result<PathBuf> {
    let user_config = dirs::config_dir()
        .map(|d| d.join("kokkai").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

    if user_config.exists() {
        return Ok(user_config);
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/kokkai/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config(format!(
        "Config file not found: {}",
        user_config.display()
    )))
}

/// SQLite URL under the platform data directory, creating the directory if missing
fn default_database_url() -> Result<String> {
    let data_dir = dirs::data_local_dir()
        .map(|d| d.join("kokkai"))
        .ok_or_else(|| Error::Config("Could not determine data directory".to_string()))?;

    std::fs::create_dir_all(&data_dir)?;

    Ok(format!(
        "sqlite://{}?mode=rwc",
        data_dir.join("kokkai.db").display()
    ))
}
