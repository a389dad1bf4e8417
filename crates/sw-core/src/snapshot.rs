//! Snapshot selection
//!
//! A restic repository keeps one file per snapshot under `snapshots/`. Only
//! the modification times matter here; file names are ignored.

use std::time::{Duration, SystemTime};

use thiserror::Error;

use crate::error::ListingError;
use crate::traits::RemoteSession;
use crate::types::DirectoryEntry;

/// Why no usable snapshot age could be produced
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// The snapshots directory is empty
    #[error("no snapshots found")]
    NoSnapshots,

    /// The newest snapshot is dated after `now`
    #[error("latest snapshot is in the future")]
    InFuture,

    /// The directory could not be listed
    #[error(transparent)]
    Listing(#[from] ListingError),
}

/// Age of the most recent entry in `snapshots_path`, measured against `now`.
pub async fn latest_snapshot_age<S>(
    session: &S,
    snapshots_path: &str,
    now: SystemTime,
) -> Result<Duration, SnapshotError>
where
    S: RemoteSession,
{
    let entries = session.read_dir(snapshots_path).await?;
    tracing::debug!("Listed {} entries in {}", entries.len(), snapshots_path);
    latest_entry_age(&entries, now)
}

/// Pick the newest entry and compute its age.
///
/// When several entries share the newest timestamp, whichever one
/// `max_by_key` settles on is used; their ages are identical.
pub fn latest_entry_age(
    entries: &[DirectoryEntry],
    now: SystemTime,
) -> Result<Duration, SnapshotError> {
    let latest = entries
        .iter()
        .filter(|e| e.name != "." && e.name != "..")
        .max_by_key(|e| e.modified)
        .ok_or(SnapshotError::NoSnapshots)?;

    tracing::debug!("Latest snapshot is {}", latest.name);

    now.duration_since(latest.modified).map_err(|_| SnapshotError::InFuture)
}
