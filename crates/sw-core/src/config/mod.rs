//! Configuration management for snapwatch
//!
//! Options come from two layers: an optional TOML file with a `[probe]`
//! table, and the command line. Both are collected as [`ProbeOptions`],
//! merged (command line wins) and validated once into an immutable
//! [`ProbeConfig`].

mod probe;
pub mod serde_utils;

pub use probe::{
    ConfigFile, ProbeConfig, ProbeOptions, Thresholds, DEFAULT_PORT, DEFAULT_SSH_PROGRAM,
    DEFAULT_SUBSYSTEM, SNAPSHOTS_DIR,
};

use crate::error::ConfigError;
use std::path::Path;
use std::time::Duration;

/// Load configuration from a file
pub fn load_config<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Parse a human-readable, non-negative duration such as `24h` or `1h 30m`
pub fn parse_duration(value: &str) -> Result<Duration, humantime::DurationError> {
    humantime::parse_duration(value.trim())
}

/// Parse the value of a duration option, naming the option on failure
pub fn parse_duration_option(option: &'static str, value: &str) -> Result<Duration, ConfigError> {
    parse_duration(value).map_err(|e| ConfigError::InvalidDuration {
        option,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("24h").unwrap(), Duration::from_secs(86400));
        assert_eq!(parse_duration("1h 30m").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_duration(" 90s ").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("0s").unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_negative_duration_names_option() {
        let err = parse_duration_option("warning", "-1h").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDuration { option: "warning", .. }));
        assert!(err.to_string().contains("'warning'"));
        assert!(err.to_string().contains("'-1h'"));
    }

    #[test]
    fn test_bare_number_is_rejected() {
        assert!(parse_duration_option("critical", "48").is_err());
    }
}
