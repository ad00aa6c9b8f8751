//! Application settings from config.toml
//!
//! The file is optional; a missing file yields the defaults. Environment
//! variables and command line flags take precedence over anything here.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Settings read from config.toml
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Database URL (e.g. `sqlite://tfh_ledger.sqlite?mode=rwc`)
    pub database_url: Option<String>,
    /// Default tracing filter when `RUST_LOG` is unset (e.g. `"info"`)
    pub log_filter: Option<String>,
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns `Error::Config` if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Loading configuration from {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })
}

/// Like [`load_config`], but a missing file gives `AppConfig::default()`.
pub fn load_optional_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    if path.as_ref().exists() {
        load_config(path)
    } else {
        Ok(AppConfig::default())
    }
}
