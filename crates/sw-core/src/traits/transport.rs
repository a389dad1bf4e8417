//! Transport traits
//!
//! The probe only needs two capabilities from the remote side: open a
//! session, and list a directory through it. How the bytes travel is the
//! implementor's business.

use async_trait::async_trait;
use tokio::time::Instant;

use crate::config::ProbeConfig;
use crate::error::{ListingError, TransportError};
use crate::types::DirectoryEntry;

/// Opens file-transfer sessions to the configured host
#[async_trait]
pub trait Transport: Send + Sync {
    /// The session type produced by this transport
    type Session: RemoteSession;

    /// Open a session.
    ///
    /// Implementations must release everything they acquired before
    /// returning an error. When `deadline` is set and passes during the
    /// handshake, return [`TransportError::TimedOut`].
    async fn open(
        &self,
        config: &ProbeConfig,
        deadline: Option<Instant>,
    ) -> Result<Self::Session, TransportError>;
}

/// An open file-transfer session
#[async_trait]
pub trait RemoteSession: Send + Sync {
    /// List the entries of a remote directory, excluding `.` and `..`
    async fn read_dir(&self, path: &str) -> Result<Vec<DirectoryEntry>, ListingError>;

    /// Close the session gracefully and release the underlying channel
    async fn close(self) -> Result<(), TransportError>;

    /// Tear the session down without talking to the remote side.
    ///
    /// Used after a deadline expired, when a graceful close could block.
    async fn abort(self) -> Result<(), TransportError>;
}
