//! Remote shell subprocess
//!
//! Starts the ssh client with a subsystem request instead of an interactive
//! shell. The child's stderr is inherited so ssh diagnostics (host key
//! prompts, authentication failures) reach the operator unchanged.

use std::process::Stdio;

use tokio::process::{Child, ChildStdin, ChildStdout, Command};

use sw_core::config::ProbeConfig;
use sw_core::error::TransportError;

use crate::duplex::DuplexPipe;

/// Pipe to and from a running remote shell
pub type RemoteShellPipe = DuplexPipe<ChildStdout, ChildStdin>;

/// Arguments for the remote shell program:
/// `<host> -l <user> -p <port> [-o <option>]... -s <subsystem>`
pub fn remote_shell_args(config: &ProbeConfig) -> Vec<String> {
    let mut args = vec![
        config.host.clone(),
        "-l".to_string(),
        config.user.clone(),
        "-p".to_string(),
        config.port.clone(),
    ];
    for option in &config.ssh_options {
        args.push("-o".to_string());
        args.push(option.clone());
    }
    args.push("-s".to_string());
    args.push(config.subsystem.clone());
    args
}

/// Spawn the remote shell and capture its stdin and stdout.
///
/// On failure nothing is left running: a child whose pipes could not be
/// taken is killed and reaped before the error is returned.
pub async fn spawn_remote_shell(
    config: &ProbeConfig,
) -> Result<(ChildGuard, RemoteShellPipe), TransportError> {
    let args = remote_shell_args(config);
    tracing::debug!("Spawning {} {}", config.ssh_program, args.join(" "));

    let mut child = Command::new(&config.ssh_program)
        .args(&args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .map_err(TransportError::Spawn)?;

    let stdin = child.stdin.take();
    let stdout = child.stdout.take();
    let guard = ChildGuard::new(child);

    match (stdout, stdin) {
        (Some(stdout), Some(stdin)) => Ok((guard, DuplexPipe::new(stdout, stdin))),
        (None, _) => {
            guard.kill().await;
            Err(TransportError::Pipe("stdout"))
        }
        (_, None) => {
            guard.kill().await;
            Err(TransportError::Pipe("stdin"))
        }
    }
}

/// Owns the remote shell process until it has been reaped
///
/// Consume it with [`ChildGuard::reap`] or [`ChildGuard::kill`]. A guard
/// dropped without either kills the process; the runtime then reaps it in
/// the background.
#[derive(Debug)]
pub struct ChildGuard {
    child: Option<Child>,
}

impl ChildGuard {
    /// Take ownership of a spawned child
    pub fn new(child: Child) -> Self {
        Self { child: Some(child) }
    }

    /// OS process id, if the process has not been reaped yet
    pub fn id(&self) -> Option<u32> {
        self.child.as_ref().and_then(Child::id)
    }

    /// Wait for the process to exit on its own
    pub async fn reap(mut self) -> Result<(), TransportError> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        let status = child.wait().await.map_err(TransportError::Reap)?;
        tracing::debug!("Remote shell exited with {}", status);
        Ok(())
    }

    /// Kill the process and wait for it
    pub async fn kill(mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };
        // Already-exited children make start_kill fail; wait still reaps them.
        if let Err(e) = child.start_kill() {
            tracing::debug!("Failed to signal remote shell: {}", e);
        }
        match child.wait().await {
            Ok(status) => tracing::debug!("Remote shell killed, exit status {}", status),
            Err(e) => tracing::warn!("Failed to reap remote shell: {}", e),
        }
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if let Some(child) = self.child.as_mut() {
            tracing::warn!("Remote shell dropped without being reaped, killing it");
            let _ = child.start_kill();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sw_core::config::ProbeOptions;
    use std::time::Duration;

    fn options() -> ProbeOptions {
        ProbeOptions {
            warning: Some(Duration::from_secs(3600)),
            critical: Some(Duration::from_secs(7200)),
            repository: Some("/srv/restic".into()),
            host: Some("backup.example.org".into()),
            user: Some("restic".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_args() {
        let config = options().validate().unwrap();
        assert_eq!(
            remote_shell_args(&config),
            ["backup.example.org", "-l", "restic", "-p", "22", "-s", "sftp"]
        );
    }

    #[test]
    fn test_args_with_options() {
        let config = ProbeOptions {
            port: Some("2222".into()),
            ssh_options: vec!["BatchMode=yes".into(), "ConnectTimeout=5".into()],
            ..options()
        }
        .validate()
        .unwrap();

        assert_eq!(
            remote_shell_args(&config),
            [
                "backup.example.org",
                "-l",
                "restic",
                "-p",
                "2222",
                "-o",
                "BatchMode=yes",
                "-o",
                "ConnectTimeout=5",
                "-s",
                "sftp"
            ]
        );
    }

    #[tokio::test]
    async fn test_spawn_failure_reports_os_error() {
        let config = ProbeOptions {
            ssh_program: Some("/nonexistent/snapwatch-ssh".into()),
            ..options()
        }
        .validate()
        .unwrap();

        let err = spawn_remote_shell(&config).await.unwrap_err();
        let TransportError::Spawn(io) = &err else {
            panic!("expected spawn error, got {:?}", err);
        };
        assert_eq!(io.kind(), std::io::ErrorKind::NotFound);
        assert_eq!(err.to_string(), io.to_string());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_spawned_child_is_reaped() {
        let config = ProbeOptions {
            ssh_program: Some("true".into()),
            ..options()
        }
        .validate()
        .unwrap();

        let (guard, pipe) = spawn_remote_shell(&config).await.unwrap();
        assert!(guard.id().is_some());
        drop(pipe);
        guard.reap().await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_kill_stops_running_child() {
        let child = Command::new("sleep").arg("30").spawn().unwrap();
        let guard = ChildGuard::new(child);

        tokio::time::timeout(Duration::from_secs(5), guard.kill())
            .await
            .unwrap();
    }
}
