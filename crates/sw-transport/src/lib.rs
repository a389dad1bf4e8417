//! sw-transport: SFTP over a spawned ssh subprocess
//!
//! Authentication and encryption are left entirely to the system `ssh`
//! client. This crate starts it with the `sftp` subsystem, joins its
//! standard streams into one [`DuplexPipe`], and runs an SFTP client over
//! that pipe.

pub mod duplex;
pub mod remote_shell;
pub mod sftp;

pub use duplex::DuplexPipe;
pub use remote_shell::{remote_shell_args, spawn_remote_shell, ChildGuard};
pub use sftp::{SftpRemoteSession, SftpTransport};
