//! sw-core: Core types, configuration and freshness evaluation for snapwatch
//!
//! This crate holds everything that does not depend on how the remote
//! repository is reached: the verdict model, threshold evaluation, snapshot
//! selection, configuration, and the probe that ties them together behind
//! the [`traits::Transport`] seam.

pub mod config;
pub mod error;
pub mod evaluator;
pub mod probe;
pub mod snapshot;
pub mod time;
pub mod traits;
pub mod types;

pub use config::{ProbeConfig, Thresholds};
pub use error::{ConfigError, ListingError, TransportError};
pub use probe::Probe;
pub use types::{DirectoryEntry, Status, Verdict};
