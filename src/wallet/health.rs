//! Wallet health monitor
//!
//! Fixed-interval liveness probe against the active extension session. Runs
//! only while the wallet manager holds a live session (Connected or
//! Unhealthy); a probe timeout or error flips the manager to Unhealthy, the
//! next success flips it back. Probing pauses while the page is hidden and
//! fires immediately on visibility restore.

use crate::config::HealthConfig;
use crate::wallet::WalletConnectionManager;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Outcome of the most recent probe. Recomputed each cycle, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthStatus {
    pub healthy: bool,
    pub last_checked: DateTime<Utc>,
}

/// Probe task handle. Shut down explicitly at teardown; the task is also
/// aborted on drop so no timer outlives the owner.
pub struct HealthMonitor {
    status_rx: watch::Receiver<Option<HealthStatus>>,
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl HealthMonitor {
    pub fn spawn(
        manager: WalletConnectionManager,
        visibility: watch::Receiver<bool>,
        config: HealthConfig,
    ) -> Self {
        let (status_tx, status_rx) = watch::channel(None);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(run(manager, visibility, config, status_tx, shutdown_rx));
        Self {
            status_rx,
            shutdown_tx,
            handle,
        }
    }

    /// Subscribe to probe outcomes; `None` until the first probe runs.
    pub fn status(&self) -> watch::Receiver<Option<HealthStatus>> {
        self.status_rx.clone()
    }

    /// Stop the probe loop.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run(
    manager: WalletConnectionManager,
    mut visibility: watch::Receiver<bool>,
    config: HealthConfig,
    status_tx: watch::Sender<Option<HealthStatus>>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(Duration::from_millis(config.interval_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut visibility_open = true;

    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => break,
            changed = visibility.changed(), if visibility_open => {
                if changed.is_err() {
                    // Host signal source dropped; keep the last known value
                    visibility_open = false;
                    continue;
                }
                if *visibility.borrow() {
                    // Immediate probe on visibility restore
                    probe_once(&manager, &config, &status_tx).await;
                    ticker.reset();
                }
            }
            _ = ticker.tick() => {
                if *visibility.borrow() {
                    probe_once(&manager, &config, &status_tx).await;
                }
            }
        }
    }
}

async fn probe_once(
    manager: &WalletConnectionManager,
    config: &HealthConfig,
    status_tx: &watch::Sender<Option<HealthStatus>>,
) {
    // No live session, nothing to probe
    let Some(session) = manager.session() else {
        return;
    };

    let timeout = Duration::from_millis(config.timeout_ms);
    let healthy = matches!(
        tokio::time::timeout(timeout, session.ping()).await,
        Ok(Ok(()))
    );
    status_tx.send_replace(Some(HealthStatus {
        healthy,
        last_checked: Utc::now(),
    }));

    if healthy {
        manager.mark_healthy();
    } else {
        debug!("Wallet liveness probe failed");
        manager.mark_unhealthy();
    }
}
