//! Core domain types

use std::cmp::Ordering;
use std::fmt;
use std::time::SystemTime;

/// Health status of a repository, in monitoring-plugin terms
///
/// `Ok < Warning < Critical` by severity. `Unknown` means the state could not
/// be determined and is not comparable with the other three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Latest snapshot is recent enough
    Ok,
    /// Latest snapshot is older than the warning threshold
    Warning,
    /// Latest snapshot is older than the critical threshold, or missing
    Critical,
    /// Freshness could not be determined
    Unknown,
}

impl Status {
    /// Process exit code for this status (0, 1, 2, 3)
    pub fn exit_code(self) -> u8 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Critical => 2,
            Status::Unknown => 3,
        }
    }

    fn severity(self) -> Option<u8> {
        match self {
            Status::Unknown => None,
            other => Some(other.exit_code()),
        }
    }
}

impl PartialOrd for Status {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.severity(), other.severity()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ if self == other => Some(Ordering::Equal),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ok => write!(f, "OK"),
            Status::Warning => write!(f, "WARNING"),
            Status::Critical => write!(f, "CRITICAL"),
            Status::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Outcome of one probe run: a status plus the human-readable message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub status: Status,
    pub message: String,
}

impl Verdict {
    /// Create a new verdict
    pub fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Verdict for anything that prevented the age from being determined
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(Status::Unknown, message)
    }

    /// Verdict for a critical domain condition
    pub fn critical(message: impl Into<String>) -> Self {
        Self::new(Status::Critical, message)
    }

    /// Process exit code for this verdict
    pub fn exit_code(&self) -> u8 {
        self.status.exit_code()
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

/// One entry of a remote directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// File name, without the directory part
    pub name: String,
    /// Last modification time reported by the remote
    pub modified: SystemTime,
}

impl DirectoryEntry {
    /// Create a new directory entry
    pub fn new(name: impl Into<String>, modified: SystemTime) -> Self {
        Self {
            name: name.into(),
            modified,
        }
    }
}
