//! Optional TOML config file
//!
//! Keys mirror the long flags:
//! ```toml
//! path = "src"
//! extension = "rs,toml"
//! recursive = true
//! delay = 300
//! command = "cargo test"
//! silence = false
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use watchrun_core::RawInputs;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Load inputs from a config file
pub fn load(path: &Path) -> Result<RawInputs, SettingsError> {
    let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let inputs = parse(&text).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), ?inputs, "Loaded config file");
    Ok(inputs)
}

pub fn parse(text: &str) -> Result<RawInputs, toml::de::Error> {
    toml::from_str(text)
}
