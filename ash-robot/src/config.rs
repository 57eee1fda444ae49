//! Configuration loading
//!
//! Lookup order: explicit `--config` path, then `config/robot.toml` in the
//! working directory, then the document compiled into the binary.

use std::fs;
use std::path::{Path, PathBuf};

use ash_core::config::RobotConfig;
use thiserror::Error;
use tracing::info;

/// Default configuration shipped with the binary
pub const DEFAULT_CONFIG: &str = include_str!("../../config/robot.toml");

/// Working-directory config location
pub const LOCAL_CONFIG: &str = "config/robot.toml";

/// Placeholder left in example env files
const API_KEY_PLACEHOLDER: &str = "your_api_key_here";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration in {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Where the configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Builtin,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Builtin => f.write_str("built-in defaults"),
        }
    }
}

/// Parse a TOML document
pub fn parse(text: &str, origin: &str) -> Result<RobotConfig, ConfigError> {
    toml::from_str(text).map_err(|source| ConfigError::Parse {
        origin: origin.to_string(),
        source,
    })
}

/// Resolve and load the configuration
///
/// An explicit path must exist. The working-directory file is optional.
pub fn load(explicit: Option<&Path>, workdir: &Path) -> Result<(RobotConfig, ConfigSource), ConfigError> {
    let candidate = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => Some(workdir.join(LOCAL_CONFIG)).filter(|p| p.is_file()),
    };

    let (config, source) = match candidate {
        Some(path) => {
            let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            let config = parse(&text, &path.display().to_string())?;
            (config, ConfigSource::File(path))
        }
        None => (parse(DEFAULT_CONFIG, "built-in defaults")?, ConfigSource::Builtin),
    };

    info!(source = %source, "Configuration loaded");
    Ok((config, source))
}

/// Normalize an API key value; blanks and the example placeholder count as unset
pub fn api_key(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != API_KEY_PLACEHOLDER)
}
