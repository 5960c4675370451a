use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use log::debug;
use thiserror::Error;

use crate::bencode::DEFAULT_MAX_DEPTH;

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "rusbit.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub peer_id_prefix: String,
    pub listen_port: u16,
    pub numwant: u32,
    pub request_timeout: u64, // seconds
    pub max_depth: usize,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            peer_id_prefix: "-RB0001-".to_string(),
            listen_port: 6881,
            numwant: 50,
            request_timeout: 10,
            max_depth: DEFAULT_MAX_DEPTH,
            user_agent: concat!("rusbit-announce/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    /// Loads configuration.
    ///
    /// An explicit `path` must exist. Without one, `rusbit.toml` in the
    /// working directory is used if present, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    debug!("no {} found, using default config", DEFAULT_CONFIG_PATH);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&contents)?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str("numwant = 80\nmax_depth = 16\n").unwrap();
        assert_eq!(config.numwant, 80);
        assert_eq!(config.max_depth, 16);
        assert_eq!(config.listen_port, 6881);
        assert_eq!(config.peer_id_prefix, "-RB0001-");
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let config = Config::default();
        let text = toml::to_string(&config).unwrap();
        assert_eq!(toml::from_str::<Config>(&text).unwrap(), config);
    }

    #[test]
    fn test_bad_toml() {
        assert!(toml::from_str::<Config>("listen_port = \"not a port\"").is_err());
    }

    #[test]
    fn test_request_timeout_duration() {
        let config = Config {
            request_timeout: 3,
            ..Config::default()
        };
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
    }
}
