//! RPC provider connection manager
//!
//! Owns the alloy client used for contract reads/writes. The client is
//! created lazily by [`ProviderConnectionManager::get_provider`], verified
//! with one bounded `eth_chainId` round trip, and memoized until
//! `disconnect()` tears it down. Concurrent first calls share a single
//! setup attempt, so exactly one transport is ever live. Failed requests
//! are never retried here; recovery is an explicit disconnect +
//! get_provider by the caller.

use crate::{Error, Result};
use alloy::network::Ethereum;
use alloy::providers::{Provider, RootProvider};
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

const DEFAULT_VERIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// RPC connection lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

/// Handle returned by [`ProviderConnectionManager::add_connection_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionListenerId(Uuid);

type ConnectionListener = Arc<dyn Fn(bool) + Send + Sync>;
type PendingSetup = Shared<BoxFuture<'static, Result<Arc<RootProvider<Ethereum>>>>>;

struct ProviderState {
    phase: ProviderConnectionState,
    client: Option<Arc<RootProvider<Ethereum>>>,
    /// Last known liveness; answered without a round trip
    connected: bool,
    /// Bumped only by `disconnect()`; a setup whose captured value no
    /// longer matches applies nothing.
    op_seq: u64,
    listeners: Vec<(ConnectionListenerId, ConnectionListener)>,
    last_notified: Option<bool>,
}

struct Inner {
    url: Url,
    verify_timeout: Duration,
    state: Mutex<ProviderState>,
    pending_setup: Mutex<Option<PendingSetup>>,
}

/// Cheaply cloneable handle; one manager exists per application session.
#[derive(Clone)]
pub struct ProviderConnectionManager {
    inner: Arc<Inner>,
}

impl ProviderConnectionManager {
    pub fn new(url: Url) -> Self {
        Self::with_verify_timeout(url, DEFAULT_VERIFY_TIMEOUT)
    }

    pub fn with_verify_timeout(url: Url, verify_timeout: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                url,
                verify_timeout,
                state: Mutex::new(ProviderState {
                    phase: ProviderConnectionState::Disconnected,
                    client: None,
                    connected: false,
                    op_seq: 0,
                    listeners: Vec::new(),
                    last_notified: None,
                }),
                pending_setup: Mutex::new(None),
            }),
        }
    }

    /// The memoized RPC client, created and verified on first use.
    /// Concurrent callers while setup is in flight share that attempt's
    /// outcome; only one transport is ever built.
    pub async fn get_provider(&self) -> Result<Arc<RootProvider<Ethereum>>> {
        let attempt = {
            let mut pending = self.inner.pending_setup.lock().expect("provider setup lock");
            match pending.as_ref() {
                Some(existing) => existing.clone(),
                None => {
                    let seq = {
                        let mut state = self.inner.state.lock().expect("provider state lock");
                        if let Some(client) = &state.client {
                            return Ok(Arc::clone(client));
                        }
                        state.phase = ProviderConnectionState::Connecting;
                        state.op_seq
                    };
                    let inner = Arc::clone(&self.inner);
                    let attempt: PendingSetup = async move {
                        let result = Self::run_setup(Arc::clone(&inner), seq).await;
                        inner
                            .pending_setup
                            .lock()
                            .expect("provider setup lock")
                            .take();
                        result
                    }
                    .boxed()
                    .shared();
                    *pending = Some(attempt.clone());
                    attempt
                }
            }
        };

        attempt.await
    }

    async fn run_setup(inner: Arc<Inner>, seq: u64) -> Result<Arc<RootProvider<Ethereum>>> {
        let client = Arc::new(RootProvider::<Ethereum>::new_http(inner.url.clone()));
        let verified = tokio::time::timeout(inner.verify_timeout, client.get_chain_id()).await;

        match verified {
            Ok(Ok(chain_id)) => {
                {
                    let mut state = inner.state.lock().expect("provider state lock");
                    if state.op_seq != seq {
                        debug!("RPC setup superseded by disconnect");
                        return Err(Error::Rpc("connection torn down during setup".to_string()));
                    }
                    state.client = Some(Arc::clone(&client));
                    state.phase = ProviderConnectionState::Connected;
                    state.connected = true;
                }
                Self::notify_inner(&inner);
                info!(chain_id, url = %inner.url, "RPC provider connected");
                Ok(client)
            }
            Ok(Err(error)) => {
                Self::fail_setup(&inner, seq);
                Err(Error::Rpc(error.to_string()))
            }
            Err(_) => {
                Self::fail_setup(&inner, seq);
                Err(Error::Timeout("RPC verification".to_string()))
            }
        }
    }

    /// Tear down the transport and clear the memo. Idempotent; any setup
    /// still in flight is invalidated and will not apply its result.
    pub fn disconnect(&self) {
        {
            let mut state = self.inner.state.lock().expect("provider state lock");
            state.op_seq += 1;
            state.client = None;
            state.phase = ProviderConnectionState::Disconnected;
            state.connected = false;
        }
        self.inner
            .pending_setup
            .lock()
            .expect("provider setup lock")
            .take();
        self.notify();
        info!("RPC provider disconnected");
    }

    /// Last known liveness, without a new round trip.
    pub fn is_connected(&self) -> bool {
        self.inner
            .state
            .lock()
            .expect("provider state lock")
            .connected
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ProviderConnectionState {
        self.inner.state.lock().expect("provider state lock").phase
    }

    /// Report a failed RPC request observed by contract-calling code. Flips
    /// liveness to false; the request itself is not retried.
    pub fn record_failure(&self) {
        {
            let mut state = self.inner.state.lock().expect("provider state lock");
            if !state.connected {
                return;
            }
            state.connected = false;
            state.phase = ProviderConnectionState::Error;
        }
        self.notify();
        warn!("RPC request failure recorded");
    }

    /// Register a listener receiving the liveness boolean on every observed
    /// transition; consecutive equal values are delivered once.
    pub fn add_connection_listener(
        &self,
        listener: impl Fn(bool) + Send + Sync + 'static,
    ) -> ConnectionListenerId {
        let id = ConnectionListenerId(Uuid::new_v4());
        let mut state = self.inner.state.lock().expect("provider state lock");
        state.listeners.push((id, Arc::new(listener)));
        id
    }

    /// Detach a listener. Returns false if the id was already removed.
    pub fn remove_connection_listener(&self, id: ConnectionListenerId) -> bool {
        let mut state = self.inner.state.lock().expect("provider state lock");
        let before = state.listeners.len();
        state.listeners.retain(|(existing, _)| *existing != id);
        state.listeners.len() != before
    }

    fn fail_setup(inner: &Arc<Inner>, seq: u64) {
        {
            let mut state = inner.state.lock().expect("provider state lock");
            if state.op_seq != seq {
                debug!("RPC setup failure superseded by disconnect");
                return;
            }
            state.phase = ProviderConnectionState::Error;
            state.connected = false;
        }
        Self::notify_inner(inner);
    }

    fn notify(&self) {
        Self::notify_inner(&self.inner);
    }

    fn notify_inner(inner: &Arc<Inner>) {
        let (connected, listeners) = {
            let mut state = inner.state.lock().expect("provider state lock");
            if state.last_notified == Some(state.connected) {
                return;
            }
            state.last_notified = Some(state.connected);
            let listeners: Vec<ConnectionListener> = state
                .listeners
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect();
            (state.connected, listeners)
        };
        for listener in listeners {
            listener(connected);
        }
    }
}

impl std::fmt::Debug for ProviderConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConnectionManager")
            .field("url", &self.inner.url.as_str())
            .field("state", &self.state())
            .finish()
    }
}
