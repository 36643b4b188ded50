//! Configuration file for the dock client
//!
//! Optional TOML file at `~/.config/as111/config.toml`. Every field has a
//! default, so a missing file or a partial one is fine. Command-line flags are
//! applied on top by the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use as111_dock::SessionOptions;
use as111_transport::protocol::{rfcomm, timing};
use as111_transport::PrinterConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// RFCOMM channel the dock listens on
    #[serde(default = "default_channel")]
    pub channel: u8,
    /// Response timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Reject responses with a bad checksum
    #[serde(default)]
    pub validate_checksum: bool,
    /// Diagnostic output (request/response flow and raw frames)
    #[serde(default)]
    pub debug: bool,
    /// Show raw frames in hex instead of decimal
    #[serde(default)]
    pub hex_dump: bool,
}

fn default_channel() -> u8 {
    rfcomm::DEFAULT_CHANNEL
}
fn default_timeout_ms() -> u64 {
    timing::RESPONSE_TIMEOUT_MS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channel: default_channel(),
            timeout_ms: default_timeout_ms(),
            validate_checksum: false,
            debug: false,
            hex_dump: false,
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("as111")
            .join("config.toml")
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Session settings derived from this config
    ///
    /// Raw frames are only logged in debug mode.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            channel: self.channel,
            timeout: Duration::from_millis(self.timeout_ms),
            validate_checksum: self.validate_checksum,
            printer: self.debug.then(|| PrinterConfig {
                show_hex: self.hex_dump,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = Config::load(Path::new("/nonexistent/as111/config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.channel, 1);
        assert_eq!(config.timeout_ms, 2000);
    }

    #[test]
    fn test_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "validate_checksum = true\ntimeout_ms = 500").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert!(config.validate_checksum);
        assert_eq!(config.timeout_ms, 500);
        assert_eq!(config.channel, 1);
        assert!(!config.debug);
    }

    #[test]
    fn test_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "channel = \"one\"").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_session_options() {
        let config = Config {
            timeout_ms: 250,
            ..Config::default()
        };
        let options = config.session_options();
        assert_eq!(options.timeout, Duration::from_millis(250));
        assert!(options.printer.is_none());

        let config = Config {
            debug: true,
            hex_dump: true,
            ..Config::default()
        };
        let printer = config.session_options().printer.unwrap();
        assert!(printer.show_hex);
    }

    #[test]
    fn test_roundtrip() {
        let config = Config {
            channel: 3,
            ..Config::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
