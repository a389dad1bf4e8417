//! Core error types for snapwatch
//!
//! Every variant here ends up as an `UNKNOWN` verdict whose message is the
//! error's `Display` text, so the wording is part of the output contract.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required option was not given on the command line or in the config file
    #[error("the option '{0}' needs to be set")]
    MissingOption(&'static str),

    /// Option was given but is empty
    #[error("the option '{0}' must not be empty")]
    EmptyOption(&'static str),

    /// Duration value could not be parsed
    #[error("invalid value '{value}' for the option '{option}': {reason}")]
    InvalidDuration {
        option: &'static str,
        value: String,
        reason: String,
    },

    /// Config file not found
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors raised while bringing up or tearing down the remote session
#[derive(Error, Debug)]
pub enum TransportError {
    /// The remote shell program could not be started
    #[error(transparent)]
    Spawn(std::io::Error),

    /// A standard stream of the child was not captured
    #[error("failed to acquire {0} of the remote shell")]
    Pipe(&'static str),

    /// The file-transfer subprotocol handshake failed
    #[error("{0}")]
    Handshake(String),

    /// Closing the file-transfer session failed
    #[error("{0}")]
    Close(String),

    /// Waiting on the remote shell failed
    #[error("failed to reap remote shell: {0}")]
    Reap(#[source] std::io::Error),

    /// The configured deadline expired
    #[error("timed out")]
    TimedOut,
}

/// Directory listing errors reported by the remote side
#[derive(Error, Debug)]
pub enum ListingError {
    /// The remote refused or failed to enumerate the directory
    #[error("failed to list {path}: {message}")]
    Remote { path: String, message: String },

    /// An entry carried no modification time
    #[error("entry '{name}' in {path} has no modification time")]
    MissingModTime { path: String, name: String },
}
