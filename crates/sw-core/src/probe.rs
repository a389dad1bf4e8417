//! Probe orchestration
//!
//! One run opens a session, lists the snapshots directory, releases the
//! session and classifies the result. Every outcome, including failures, is
//! reported as a [`Verdict`].

use std::time::SystemTime;

use tokio::time::Instant;

use crate::config::ProbeConfig;
use crate::error::TransportError;
use crate::evaluator::evaluate;
use crate::snapshot::{latest_snapshot_age, SnapshotError};
use crate::traits::{RemoteSession, Transport};
use crate::types::Verdict;

/// A single freshness check against one repository
pub struct Probe<T> {
    transport: T,
    config: ProbeConfig,
    clock: fn() -> SystemTime,
}

impl<T: Transport> Probe<T> {
    /// Create a new probe using the system clock
    pub fn new(transport: T, config: ProbeConfig) -> Self {
        Self {
            transport,
            config,
            clock: SystemTime::now,
        }
    }

    /// Replace the clock used to age snapshots
    pub fn with_clock(mut self, clock: fn() -> SystemTime) -> Self {
        self.clock = clock;
        self
    }

    /// Get the probe configuration
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Run the check.
    ///
    /// Once a session is open it is released exactly once before this
    /// returns, whatever the outcome. A failure to release is logged and does
    /// not change the verdict.
    pub async fn run(&self) -> Verdict {
        let deadline = self.config.timeout.map(|t| Instant::now() + t);

        tracing::debug!(
            "Opening session to {}@{}:{}",
            self.config.user,
            self.config.host,
            self.config.port
        );
        let session = match self.transport.open(&self.config, deadline).await {
            Ok(session) => session,
            Err(e) => {
                tracing::debug!("Failed to open session: {}", e);
                return Verdict::unknown(e.to_string());
            }
        };

        let path = self.config.snapshots_path();
        let listing = latest_snapshot_age(&session, &path, (self.clock)());
        let listed = match deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, listing).await.ok(),
            None => Some(listing.await),
        };

        let released = if listed.is_some() {
            session.close().await
        } else {
            tracing::debug!("Deadline expired while listing {}", path);
            session.abort().await
        };
        if let Err(e) = released {
            tracing::warn!("Failed to release remote session: {}", e);
        }

        match listed {
            None => Verdict::unknown(TransportError::TimedOut.to_string()),
            Some(Ok(age)) => evaluate(age, &self.config.thresholds),
            Some(Err(e @ (SnapshotError::NoSnapshots | SnapshotError::InFuture))) => {
                Verdict::critical(e.to_string())
            }
            Some(Err(e @ SnapshotError::Listing(_))) => Verdict::unknown(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProbeOptions;
    use crate::error::ListingError;
    use crate::types::{DirectoryEntry, Status};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    const HOUR: Duration = Duration::from_secs(3600);

    fn fixed_now() -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
    }

    #[derive(Clone, Copy)]
    enum Listing {
        AgedBy(Duration),
        Empty,
        Future,
        Fails,
        Hangs,
    }

    #[derive(Default)]
    struct Counters {
        opens: AtomicUsize,
        closes: AtomicUsize,
        aborts: AtomicUsize,
    }

    impl Counters {
        fn releases(&self) -> usize {
            self.closes.load(Ordering::SeqCst) + self.aborts.load(Ordering::SeqCst)
        }
    }

    struct StubTransport {
        open_error: Option<&'static str>,
        listing: Listing,
        counters: Arc<Counters>,
    }

    struct StubSession {
        listing: Listing,
        counters: Arc<Counters>,
    }

    #[async_trait]
    impl Transport for StubTransport {
        type Session = StubSession;

        async fn open(
            &self,
            _config: &ProbeConfig,
            _deadline: Option<Instant>,
        ) -> Result<StubSession, TransportError> {
            self.counters.opens.fetch_add(1, Ordering::SeqCst);
            if let Some(message) = self.open_error {
                return Err(TransportError::Handshake(message.to_string()));
            }
            Ok(StubSession {
                listing: self.listing,
                counters: Arc::clone(&self.counters),
            })
        }
    }

    #[async_trait]
    impl RemoteSession for StubSession {
        async fn read_dir(&self, path: &str) -> Result<Vec<DirectoryEntry>, ListingError> {
            match self.listing {
                Listing::AgedBy(age) => Ok(vec![
                    DirectoryEntry::new("older", fixed_now() - age - HOUR),
                    DirectoryEntry::new("latest", fixed_now() - age),
                ]),
                Listing::Empty => Ok(vec![]),
                Listing::Future => Ok(vec![DirectoryEntry::new(
                    "skewed",
                    fixed_now() + Duration::from_secs(60),
                )]),
                Listing::Fails => Err(ListingError::Remote {
                    path: path.to_string(),
                    message: "permission denied".into(),
                }),
                Listing::Hangs => std::future::pending().await,
            }
        }

        async fn close(self) -> Result<(), TransportError> {
            self.counters.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn abort(self) -> Result<(), TransportError> {
            self.counters.aborts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn config() -> ProbeConfig {
        ProbeOptions {
            warning: Some(24 * HOUR),
            critical: Some(48 * HOUR),
            repository: Some("/srv/restic".into()),
            host: Some("backup.example.org".into()),
            user: Some("restic".into()),
            ..Default::default()
        }
        .validate()
        .unwrap()
    }

    fn probe(listing: Listing) -> (Probe<StubTransport>, Arc<Counters>) {
        probe_with(listing, None, config())
    }

    fn probe_with(
        listing: Listing,
        open_error: Option<&'static str>,
        config: ProbeConfig,
    ) -> (Probe<StubTransport>, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        let transport = StubTransport {
            open_error,
            listing,
            counters: Arc::clone(&counters),
        };
        (Probe::new(transport, config).with_clock(fixed_now), counters)
    }

    #[tokio::test]
    async fn test_recent_snapshot_is_ok() {
        let (probe, counters) = probe(Listing::AgedBy(HOUR));
        let verdict = probe.run().await;

        assert_eq!(verdict.status, Status::Ok);
        assert_eq!(verdict.message, "latest snapshot created 1h0m0s ago");
        assert_eq!(verdict.exit_code(), 0);
        assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stale_snapshot_is_warning() {
        let (probe, counters) = probe(Listing::AgedBy(30 * HOUR));
        let verdict = probe.run().await;

        assert_eq!(verdict.status, Status::Warning);
        assert_eq!(verdict.message, "latest snapshot created 30h0m0s ago");
        assert_eq!(verdict.exit_code(), 1);
        assert_eq!(counters.releases(), 1);
    }

    #[tokio::test]
    async fn test_old_snapshot_is_critical() {
        let (probe, counters) = probe(Listing::AgedBy(72 * HOUR));
        let verdict = probe.run().await;

        assert_eq!(verdict.status, Status::Critical);
        assert_eq!(verdict.exit_code(), 2);
        assert_eq!(counters.releases(), 1);
    }

    #[tokio::test]
    async fn test_empty_repository_is_critical() {
        let (probe, counters) = probe(Listing::Empty);
        let verdict = probe.run().await;

        assert_eq!(verdict, Verdict::critical("no snapshots found"));
        assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_repository_ignores_thresholds() {
        let mut config = config();
        config.thresholds.warning = Duration::from_secs(u32::MAX as u64);
        config.thresholds.critical = Duration::from_secs(u32::MAX as u64);
        let (probe, _) = probe_with(Listing::Empty, None, config);

        assert_eq!(probe.run().await.status, Status::Critical);
    }

    #[tokio::test]
    async fn test_future_snapshot_is_critical() {
        let (probe, counters) = probe(Listing::Future);
        let verdict = probe.run().await;

        assert_eq!(verdict, Verdict::critical("latest snapshot is in the future"));
        assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_listing_failure_is_unknown() {
        let (probe, counters) = probe(Listing::Fails);
        let verdict = probe.run().await;

        assert_eq!(verdict.status, Status::Unknown);
        assert_eq!(
            verdict.message,
            "failed to list /srv/restic/snapshots: permission denied"
        );
        assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_open_failure_is_unknown_with_error_text() {
        let (probe, counters) = probe_with(Listing::Empty, Some("Connection closed"), config());
        let verdict = probe.run().await;

        assert_eq!(verdict, Verdict::unknown("Connection closed"));
        assert_eq!(verdict.exit_code(), 3);
        assert_eq!(counters.opens.load(Ordering::SeqCst), 1);
        // nothing was opened, so nothing is released by the probe
        assert_eq!(counters.releases(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_listing_times_out_and_aborts() {
        let mut config = config();
        config.timeout = Some(Duration::from_secs(30));
        let (probe, counters) = probe_with(Listing::Hangs, None, config);
        let verdict = probe.run().await;

        assert_eq!(verdict, Verdict::unknown("timed out"));
        assert_eq!(counters.aborts.load(Ordering::SeqCst), 1);
        assert_eq!(counters.closes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_repeated_runs_release_once_each() {
        let cases = [
            Listing::AgedBy(HOUR),
            Listing::AgedBy(30 * HOUR),
            Listing::AgedBy(72 * HOUR),
            Listing::Empty,
            Listing::Future,
            Listing::Fails,
        ];

        for listing in cases {
            let (probe, counters) = probe(listing);
            for _ in 0..3 {
                probe.run().await;
            }
            assert_eq!(counters.opens.load(Ordering::SeqCst), 3);
            assert_eq!(counters.releases(), 3);
        }
    }
}
