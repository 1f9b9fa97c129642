use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

/// Optional configuration file inside the task directory
pub const CONFIG_FILE: &str = "tasklane.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse tasklane.toml: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Read `tasklane.toml` from `dir`. A missing file yields the defaults.
pub fn read_config(dir: &Path) -> Result<Config, ConfigError> {
    let path = dir.join(CONFIG_FILE);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("no {} found, using defaults", CONFIG_FILE);
            return Ok(Config::default());
        }
        Err(source) => return Err(ConfigError::ReadError { path, source }),
    };
    Ok(toml::from_str(&text)?)
}
