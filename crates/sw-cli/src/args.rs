//! Command-line arguments
//!
//! Every probe option is optional at the clap level so that a config file
//! can supply it; required options are enforced afterwards by
//! [`ProbeOptions::validate`], which names the missing option.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use sw_core::config::{load_config, parse_duration_option, ConfigFile, ProbeOptions};
use sw_core::error::ConfigError;
use sw_core::ProbeConfig;

#[derive(Parser, Debug)]
#[command(name = "snapwatch")]
#[command(author, version, about = "Check the age of the latest restic snapshot over SFTP")]
pub struct Cli {
    /// Path to a TOML configuration file with a [probe] table
    #[arg(short, long, env = "SNAPWATCH_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Return WARNING if the latest snapshot is older than this (e.g. 24h)
    #[arg(long, value_name = "DURATION", allow_hyphen_values = true)]
    pub warning: Option<String>,

    /// Return CRITICAL if the latest snapshot is older than this (e.g. 48h)
    #[arg(long, value_name = "DURATION", allow_hyphen_values = true)]
    pub critical: Option<String>,

    /// Path to the restic repository on the SFTP host
    #[arg(long, value_name = "PATH")]
    pub repository: Option<String>,

    /// SSH host used for the SFTP connection
    #[arg(long)]
    pub host: Option<String>,

    /// SSH user used for the SFTP connection
    #[arg(long)]
    pub user: Option<String>,

    /// SSH port used for the SFTP connection [default: 22]
    #[arg(long)]
    pub port: Option<String>,

    /// SSH client program to spawn [default: ssh]
    #[arg(long, value_name = "PROGRAM")]
    pub ssh_program: Option<String>,

    /// Extra option passed to the SSH client as `-o OPTION` (repeatable)
    #[arg(long = "ssh-option", value_name = "OPTION")]
    pub ssh_options: Vec<String>,

    /// Subsystem requested from the SSH server [default: sftp]
    #[arg(long, value_name = "NAME")]
    pub subsystem: Option<String>,

    /// Give up with UNKNOWN if connecting and listing take longer than this
    #[arg(long, value_name = "DURATION", allow_hyphen_values = true)]
    pub timeout: Option<String>,

    /// Enable verbose output on stderr
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Options given on the command line, durations parsed
    pub fn options(&self) -> Result<ProbeOptions, ConfigError> {
        Ok(ProbeOptions {
            warning: duration_option("warning", self.warning.as_deref())?,
            critical: duration_option("critical", self.critical.as_deref())?,
            repository: self.repository.clone(),
            host: self.host.clone(),
            user: self.user.clone(),
            port: self.port.clone(),
            ssh_program: self.ssh_program.clone(),
            ssh_options: self.ssh_options.clone(),
            subsystem: self.subsystem.clone(),
            timeout: duration_option("timeout", self.timeout.as_deref())?,
        })
    }

    /// Build the final configuration: config file first, command line on top
    pub fn resolve(&self) -> Result<ProbeConfig> {
        let file_options = match &self.config {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                load_config::<ConfigFile>(path)?.probe
            }
            None => ProbeOptions::default(),
        };

        let config = file_options.merge(self.options()?).validate()?;
        Ok(config)
    }
}

fn duration_option(
    option: &'static str,
    value: Option<&str>,
) -> Result<Option<std::time::Duration>, ConfigError> {
    value.map(|v| parse_duration_option(option, v)).transpose()
}
