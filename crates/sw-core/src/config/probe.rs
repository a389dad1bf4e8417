//! Probe configuration

use serde::Deserialize;
use std::time::Duration;

use super::serde_utils::opt_duration_human;
use crate::error::ConfigError;

/// Default ssh port
pub const DEFAULT_PORT: &str = "22";

/// Default remote shell program
pub const DEFAULT_SSH_PROGRAM: &str = "ssh";

/// Default file-transfer subsystem requested from the remote shell
pub const DEFAULT_SUBSYSTEM: &str = "sftp";

/// Directory under the repository root that holds one file per snapshot
pub const SNAPSHOTS_DIR: &str = "snapshots";

/// Age limits for the latest snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// Ages strictly above this are at least WARNING
    pub warning: Duration,
    /// Ages strictly above this are CRITICAL
    pub critical: Duration,
}

impl Thresholds {
    /// Create a new threshold pair
    pub fn new(warning: Duration, critical: Duration) -> Self {
        Self { warning, critical }
    }
}

/// Validated configuration for a single probe run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Age thresholds
    pub thresholds: Thresholds,
    /// Path of the restic repository on the remote host
    pub repository: String,
    /// Remote host to connect to
    pub host: String,
    /// Login user on the remote host
    pub user: String,
    /// Remote ssh port
    pub port: String,
    /// Remote shell program to spawn
    pub ssh_program: String,
    /// Extra `-o` options handed to the remote shell
    pub ssh_options: Vec<String>,
    /// Subsystem requested with `-s`
    pub subsystem: String,
    /// Deadline for opening the session and listing snapshots
    pub timeout: Option<Duration>,
}

impl ProbeConfig {
    /// Remote path of the snapshots directory
    pub fn snapshots_path(&self) -> String {
        format!("{}/{}", self.repository.trim_end_matches('/'), SNAPSHOTS_DIR)
    }
}

/// Unvalidated option layer, as read from a config file or the command line
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeOptions {
    #[serde(with = "opt_duration_human")]
    pub warning: Option<Duration>,
    #[serde(with = "opt_duration_human")]
    pub critical: Option<Duration>,
    pub repository: Option<String>,
    pub host: Option<String>,
    pub user: Option<String>,
    pub port: Option<String>,
    pub ssh_program: Option<String>,
    pub ssh_options: Vec<String>,
    pub subsystem: Option<String>,
    #[serde(with = "opt_duration_human")]
    pub timeout: Option<Duration>,
}

impl ProbeOptions {
    /// Layer `overrides` on top of `self`; set values in `overrides` win
    pub fn merge(self, overrides: ProbeOptions) -> ProbeOptions {
        ProbeOptions {
            warning: overrides.warning.or(self.warning),
            critical: overrides.critical.or(self.critical),
            repository: overrides.repository.or(self.repository),
            host: overrides.host.or(self.host),
            user: overrides.user.or(self.user),
            port: overrides.port.or(self.port),
            ssh_program: overrides.ssh_program.or(self.ssh_program),
            ssh_options: if overrides.ssh_options.is_empty() {
                self.ssh_options
            } else {
                overrides.ssh_options
            },
            subsystem: overrides.subsystem.or(self.subsystem),
            timeout: overrides.timeout.or(self.timeout),
        }
    }

    /// Check required options and apply defaults.
    ///
    /// Options are checked in a fixed order so the first missing one is the
    /// one reported.
    pub fn validate(self) -> Result<ProbeConfig, ConfigError> {
        let warning = self.warning.ok_or(ConfigError::MissingOption("warning"))?;
        let critical = self.critical.ok_or(ConfigError::MissingOption("critical"))?;
        let repository = required(self.repository, "repository")?;
        let host = required(self.host, "host")?;
        let user = required(self.user, "user")?;
        let port = non_empty(self.port, DEFAULT_PORT, "port")?;
        let ssh_program = non_empty(self.ssh_program, DEFAULT_SSH_PROGRAM, "ssh-program")?;
        let subsystem = non_empty(self.subsystem, DEFAULT_SUBSYSTEM, "subsystem")?;

        Ok(ProbeConfig {
            thresholds: Thresholds::new(warning, critical),
            repository,
            host,
            user,
            port,
            ssh_program,
            ssh_options: self.ssh_options,
            subsystem,
            timeout: self.timeout,
        })
    }
}

fn required(value: Option<String>, option: &'static str) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::MissingOption(option)),
    }
}

fn non_empty(
    value: Option<String>,
    default: &str,
    option: &'static str,
) -> Result<String, ConfigError> {
    match value {
        Some(v) if v.is_empty() => Err(ConfigError::EmptyOption(option)),
        Some(v) => Ok(v),
        None => Ok(default.to_string()),
    }
}

/// On-disk config file layout
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub probe: ProbeOptions,
}
