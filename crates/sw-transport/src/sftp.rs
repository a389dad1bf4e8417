//! SFTP session over the remote shell pipe

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use russh_sftp::client::SftpSession;
use tokio::time::Instant;

use sw_core::config::ProbeConfig;
use sw_core::error::{ListingError, TransportError};
use sw_core::traits::{RemoteSession, Transport};
use sw_core::types::DirectoryEntry;

use crate::remote_shell::{spawn_remote_shell, ChildGuard};

/// Opens SFTP sessions by spawning the configured ssh client
#[derive(Debug, Clone, Copy, Default)]
pub struct SftpTransport;

impl SftpTransport {
    /// Create a new SFTP transport
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for SftpTransport {
    type Session = SftpRemoteSession;

    async fn open(
        &self,
        config: &ProbeConfig,
        deadline: Option<Instant>,
    ) -> Result<SftpRemoteSession, TransportError> {
        let (child, pipe) = spawn_remote_shell(config).await?;

        let handshake = SftpSession::new(pipe);
        let opened = match deadline {
            Some(deadline) => match tokio::time::timeout_at(deadline, handshake).await {
                Ok(result) => result.map_err(|e| TransportError::Handshake(e.to_string())),
                Err(_) => Err(TransportError::TimedOut),
            },
            None => handshake
                .await
                .map_err(|e| TransportError::Handshake(e.to_string())),
        };

        match opened {
            Ok(sftp) => {
                tracing::debug!("SFTP session established with {}", config.host);
                Ok(SftpRemoteSession { sftp, child })
            }
            Err(e) => {
                tracing::debug!("SFTP handshake failed: {}", e);
                child.kill().await;
                Err(e)
            }
        }
    }
}

/// An SFTP session together with the ssh process carrying it
pub struct SftpRemoteSession {
    sftp: SftpSession,
    child: ChildGuard,
}

#[async_trait]
impl RemoteSession for SftpRemoteSession {
    async fn read_dir(&self, path: &str) -> Result<Vec<DirectoryEntry>, ListingError> {
        let entries = self
            .sftp
            .read_dir(path)
            .await
            .map_err(|e| ListingError::Remote {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        entries
            .filter(|entry| !is_dot_entry(&entry.file_name()))
            .map(|entry| to_directory_entry(path, entry.file_name(), entry.metadata().mtime))
            .collect()
    }

    async fn close(self) -> Result<(), TransportError> {
        let SftpRemoteSession { sftp, child } = self;

        let closed = sftp
            .close()
            .await
            .map_err(|e| TransportError::Close(e.to_string()));
        // Dropping the session closes the child's stdin, which ends ssh
        drop(sftp);

        let reaped = child.reap().await;
        closed.and(reaped)
    }

    async fn abort(self) -> Result<(), TransportError> {
        let SftpRemoteSession { sftp, child } = self;
        drop(sftp);
        child.kill().await;
        Ok(())
    }
}

fn is_dot_entry(name: &str) -> bool {
    name == "." || name == ".."
}

/// Convert a listed name and its SFTP `mtime` (seconds since the epoch)
fn to_directory_entry(
    path: &str,
    name: String,
    mtime: Option<u32>,
) -> Result<DirectoryEntry, ListingError> {
    let Some(mtime) = mtime else {
        return Err(ListingError::MissingModTime {
            path: path.to_string(),
            name,
        });
    };
    let modified: SystemTime = UNIX_EPOCH + Duration::from_secs(u64::from(mtime));
    Ok(DirectoryEntry::new(name, modified))
}
