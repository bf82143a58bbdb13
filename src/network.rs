//! Network status monitor
//!
//! Combines push online/offline events from the host with a fixed-interval
//! HTTP reachability probe. Purely advisory: the UI renders banners from
//! this; the wallet and RPC managers detect their own failures.

use crate::config::NetworkProbeConfig;
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Advisory connectivity snapshot published on every event or probe.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkStatus {
    pub is_online: bool,
    /// A probe is currently in flight
    pub is_connecting: bool,
    pub last_checked: DateTime<Utc>,
}

/// Reachability check, behind a trait so tests can script outcomes.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn check(&self) -> Result<()>;
}

/// HEAD request against the configured probe endpoint. Any response counts
/// as reachable; only a transport error means offline.
pub struct HttpProber {
    client: reqwest::Client,
    url: String,
}

impl HttpProber {
    pub fn new(config: &NetworkProbeConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.probe_url.clone(),
        }
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn check(&self) -> Result<()> {
        self.client
            .head(&self.url)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| Error::Network(e.to_string()))
    }
}

/// Probe task handle; shut down explicitly, aborted on drop.
pub struct NetworkStatusMonitor {
    status_rx: watch::Receiver<NetworkStatus>,
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl NetworkStatusMonitor {
    pub fn spawn(
        prober: Arc<dyn Prober>,
        config: NetworkProbeConfig,
        online: watch::Receiver<bool>,
        visibility: watch::Receiver<bool>,
    ) -> Self {
        let (status_tx, status_rx) = watch::channel(NetworkStatus {
            is_online: *online.borrow(),
            is_connecting: false,
            last_checked: Utc::now(),
        });
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(run(
            prober,
            config,
            online,
            visibility,
            status_tx,
            shutdown_rx,
        ));
        Self {
            status_rx,
            shutdown_tx,
            handle,
        }
    }

    /// Subscribe to connectivity snapshots.
    pub fn status(&self) -> watch::Receiver<NetworkStatus> {
        self.status_rx.clone()
    }

    /// Stop the probe loop.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

impl Drop for NetworkStatusMonitor {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run(
    prober: Arc<dyn Prober>,
    config: NetworkProbeConfig,
    mut online: watch::Receiver<bool>,
    mut visibility: watch::Receiver<bool>,
    status_tx: watch::Sender<NetworkStatus>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(Duration::from_millis(config.interval_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut online_open = true;
    let mut visibility_open = true;

    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => break,
            changed = online.changed(), if online_open => {
                if changed.is_err() {
                    online_open = false;
                    continue;
                }
                // Push events publish immediately; an offline event does not
                // wait for a probe to confirm
                let is_online = *online.borrow();
                debug!(is_online, "Connectivity push event");
                status_tx.send_replace(NetworkStatus {
                    is_online,
                    is_connecting: false,
                    last_checked: Utc::now(),
                });
                if is_online && *visibility.borrow() {
                    probe_once(&*prober, &config, &status_tx).await;
                    ticker.reset();
                }
            }
            changed = visibility.changed(), if visibility_open => {
                if changed.is_err() {
                    visibility_open = false;
                    continue;
                }
                if *visibility.borrow() {
                    probe_once(&*prober, &config, &status_tx).await;
                    ticker.reset();
                }
            }
            _ = ticker.tick() => {
                if *visibility.borrow() {
                    probe_once(&*prober, &config, &status_tx).await;
                }
            }
        }
    }
}

async fn probe_once(
    prober: &dyn Prober,
    config: &NetworkProbeConfig,
    status_tx: &watch::Sender<NetworkStatus>,
) {
    let previous = status_tx.borrow().is_online;
    status_tx.send_replace(NetworkStatus {
        is_online: previous,
        is_connecting: true,
        last_checked: Utc::now(),
    });

    let timeout = Duration::from_millis(config.timeout_ms);
    let reachable = matches!(
        tokio::time::timeout(timeout, prober.check()).await,
        Ok(Ok(()))
    );
    status_tx.send_replace(NetworkStatus {
        is_online: reachable,
        is_connecting: false,
        last_checked: Utc::now(),
    });
}
