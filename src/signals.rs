//! Host signals: page visibility and online/offline
//!
//! Browser push callbacks become explicit subscriptions. The host shell owns
//! one `HostSignals` and forwards visibility / connectivity events into it;
//! monitors subscribe through watch receivers and release them on shutdown,
//! so nothing is registered twice and teardown is a single drop.

use tokio::sync::watch;

/// Publisher side of the host signals. Created once per application session.
#[derive(Debug)]
pub struct HostSignals {
    visibility_tx: watch::Sender<bool>,
    online_tx: watch::Sender<bool>,
}

impl HostSignals {
    /// New signal source; the page starts visible and online.
    pub fn new() -> Self {
        let (visibility_tx, _) = watch::channel(true);
        let (online_tx, _) = watch::channel(true);
        Self {
            visibility_tx,
            online_tx,
        }
    }

    /// Forward a page visibility change.
    pub fn set_visible(&self, visible: bool) {
        self.visibility_tx.send_replace(visible);
    }

    /// Forward a browser online/offline event.
    pub fn set_online(&self, online: bool) {
        self.online_tx.send_replace(online);
    }

    /// Subscribe to visibility changes.
    pub fn visibility(&self) -> watch::Receiver<bool> {
        self.visibility_tx.subscribe()
    }

    /// Subscribe to online/offline changes.
    pub fn online(&self) -> watch::Receiver<bool> {
        self.online_tx.subscribe()
    }
}

impl Default for HostSignals {
    fn default() -> Self {
        Self::new()
    }
}
