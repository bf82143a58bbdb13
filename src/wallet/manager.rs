//! Wallet connection manager
//!
//! Owns the connect/disconnect/reconnect state machine for the browser
//! wallet, the account registry, and the listener registry. All transitions
//! for this manager flow through here; the health monitor reports probe
//! outcomes back via [`WalletConnectionManager::mark_unhealthy`] and
//! [`WalletConnectionManager::mark_healthy`].
//!
//! Every connect/reconnect captures an operation sequence number and checks
//! it still matches before applying its result, so a `disconnect()` (which
//! bumps the sequence) always wins over a connect that resolves late.

use crate::config::WalletConfig;
use crate::extension::{ExtensionDiscovery, ExtensionSession, WalletExtension};
use crate::wallet::{Account, AccountRegistry};
use crate::{Error, Result};
use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Wallet connection lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
    Unhealthy,
}

/// Full state snapshot delivered to listeners on every transition.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletSnapshot {
    pub state: ConnectionState,
    pub accounts: Vec<Account>,
    pub selected: Option<Account>,
    /// Extension id of the active session, while one exists
    pub provider_id: Option<String>,
}

/// Handle returned by [`WalletConnectionManager::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

type WalletListener = Arc<dyn Fn(&WalletSnapshot) + Send + Sync>;
type PendingReconnect = Shared<BoxFuture<'static, Result<()>>>;

struct ActiveSession {
    provider_id: String,
    session: Arc<dyn ExtensionSession>,
}

struct WalletState {
    phase: ConnectionState,
    registry: AccountRegistry,
    active: Option<ActiveSession>,
    /// Bumped by every connect/reconnect/disconnect; stale results are
    /// dropped when their captured value no longer matches.
    op_seq: u64,
    listeners: Vec<(ListenerId, WalletListener)>,
    last_published: Option<WalletSnapshot>,
}

struct Inner {
    discovery: ExtensionDiscovery,
    config: WalletConfig,
    state: Mutex<WalletState>,
    pending_reconnect: Mutex<Option<PendingReconnect>>,
}

/// Cheaply cloneable handle; one manager exists per application session.
#[derive(Clone)]
pub struct WalletConnectionManager {
    inner: Arc<Inner>,
}

impl WalletConnectionManager {
    pub fn new(discovery: ExtensionDiscovery, config: WalletConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                discovery,
                config,
                state: Mutex::new(WalletState {
                    phase: ConnectionState::Disconnected,
                    registry: AccountRegistry::default(),
                    active: None,
                    op_seq: 0,
                    listeners: Vec::new(),
                    last_published: None,
                }),
                pending_reconnect: Mutex::new(None),
            }),
        }
    }

    /// Connect to the first available wallet extension, in priority order.
    ///
    /// On success the account registry is populated, the preferred or first
    /// account selected, and the state becomes Connected. On failure the
    /// state returns to Disconnected and the error surfaces to the caller;
    /// nothing is retried automatically.
    pub async fn connect(&self) -> Result<()> {
        let seq = {
            let mut state = self.inner.state.lock().expect("wallet state lock");
            if state.phase == ConnectionState::Connected {
                return Ok(());
            }
            state.op_seq += 1;
            state.phase = ConnectionState::Connecting;
            state.op_seq
        };
        Self::publish(&self.inner);

        Self::run_connect_flow(Arc::clone(&self.inner), seq).await
    }

    /// Drop the session and return to Disconnected. Idempotent from any
    /// state; invalidates any in-flight connect, reconnect, or probe result.
    pub fn disconnect(&self) {
        {
            let mut state = self.inner.state.lock().expect("wallet state lock");
            state.op_seq += 1;
            state.phase = ConnectionState::Disconnected;
            state.registry.clear();
            // Releases the extension session transport
            state.active = None;
        }
        self.inner
            .pending_reconnect
            .lock()
            .expect("reconnect lock")
            .take();
        Self::publish(&self.inner);
        info!("Wallet disconnected");
    }

    /// Re-run the connect flow from the current state. Concurrent calls
    /// while one attempt is outstanding share that attempt's outcome; only
    /// one authorization request reaches the extension.
    pub async fn reconnect(&self) -> Result<()> {
        let (attempt, started) = {
            let mut pending = self.inner.pending_reconnect.lock().expect("reconnect lock");
            match pending.as_ref() {
                Some(existing) => (existing.clone(), false),
                None => {
                    let seq = {
                        let mut state = self.inner.state.lock().expect("wallet state lock");
                        state.op_seq += 1;
                        state.phase = ConnectionState::Reconnecting;
                        state.op_seq
                    };
                    let inner = Arc::clone(&self.inner);
                    let attempt: PendingReconnect = async move {
                        let result = Self::run_connect_flow(Arc::clone(&inner), seq).await;
                        inner
                            .pending_reconnect
                            .lock()
                            .expect("reconnect lock")
                            .take();
                        result
                    }
                    .boxed()
                    .shared();
                    *pending = Some(attempt.clone());
                    (attempt, true)
                }
            }
        };
        if started {
            Self::publish(&self.inner);
        } else {
            debug!("Coalescing into outstanding reconnect");
        }

        attempt.await
    }

    /// Change the selected account. Listeners are notified exactly once.
    pub fn select_account(&self, address: Address) -> Result<()> {
        {
            let mut state = self.inner.state.lock().expect("wallet state lock");
            state.registry.select(address)?;
        }
        Self::publish(&self.inner);
        Ok(())
    }

    /// Entry point for the extension's account-change event. The set is
    /// replaced wholesale; a surviving selection is kept, a removed one
    /// falls back to the first account, and an empty set marks the session
    /// Unhealthy since it can no longer sign.
    pub fn accounts_changed(&self, accounts: Vec<Account>) {
        {
            let mut state = self.inner.state.lock().expect("wallet state lock");
            if !matches!(
                state.phase,
                ConnectionState::Connected | ConnectionState::Unhealthy
            ) {
                return;
            }
            let accounts = self.inner.config_display_names(accounts);
            if accounts.is_empty() {
                warn!("Extension reported an empty account set");
                state.registry.clear();
                state.phase = ConnectionState::Unhealthy;
            } else {
                let previous = state.registry.selected_address();
                state.registry.replace_all(accounts, previous);
            }
        }
        Self::publish(&self.inner);
    }

    /// Register a listener; it receives the full snapshot on every
    /// transition. Equal consecutive snapshots are delivered once.
    pub fn add_listener(
        &self,
        listener: impl Fn(&WalletSnapshot) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = ListenerId(Uuid::new_v4());
        let mut state = self.inner.state.lock().expect("wallet state lock");
        state.listeners.push((id, Arc::new(listener)));
        id
    }

    /// Detach a listener. Returns false if the id was already removed.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut state = self.inner.state.lock().expect("wallet state lock");
        let before = state.listeners.len();
        state.listeners.retain(|(existing, _)| *existing != id);
        state.listeners.len() != before
    }

    /// Current snapshot without subscribing.
    pub fn snapshot(&self) -> WalletSnapshot {
        let state = self.inner.state.lock().expect("wallet state lock");
        Self::snapshot_locked(&state)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.inner.state.lock().expect("wallet state lock").phase
    }

    /// The live session, while one exists (Connected or Unhealthy). The
    /// health monitor probes through this.
    pub fn session(&self) -> Option<Arc<dyn ExtensionSession>> {
        let state = self.inner.state.lock().expect("wallet state lock");
        match state.phase {
            ConnectionState::Connected | ConnectionState::Unhealthy => {
                state.active.as_ref().map(|a| Arc::clone(&a.session))
            }
            _ => None,
        }
    }

    /// Signer handle from the live session, for contract-calling code.
    pub fn signer(&self) -> Option<EthereumWallet> {
        self.session().map(|session| session.signer())
    }

    /// Probe failure observed. Connected becomes Unhealthy; repeat failures
    /// do not re-notify.
    pub(crate) fn mark_unhealthy(&self) {
        {
            let mut state = self.inner.state.lock().expect("wallet state lock");
            if state.phase != ConnectionState::Connected {
                return;
            }
            state.phase = ConnectionState::Unhealthy;
        }
        Self::publish(&self.inner);
        warn!("Wallet connection unhealthy");
    }

    /// Probe success observed. Unhealthy recovers to Connected.
    pub(crate) fn mark_healthy(&self) {
        {
            let mut state = self.inner.state.lock().expect("wallet state lock");
            if state.phase != ConnectionState::Unhealthy {
                return;
            }
            state.phase = ConnectionState::Connected;
        }
        Self::publish(&self.inner);
        info!("Wallet connection recovered");
    }

    async fn run_connect_flow(inner: Arc<Inner>, seq: u64) -> Result<()> {
        let candidates = inner.discovery.detect();
        if candidates.is_empty() {
            return Self::apply_failure(&inner, seq, Error::NotFound);
        }

        let mut last_error = Error::NotFound;
        for extension in candidates {
            let descriptor = extension.descriptor();
            match Self::try_provider(&inner, extension.as_ref()).await {
                Ok((session, accounts)) => {
                    return Self::apply_success(&inner, seq, descriptor.id, session, accounts);
                }
                Err(Error::NotAuthorized) => {
                    // The user said no; do not bother the next provider
                    last_error = Error::NotAuthorized;
                    break;
                }
                Err(error) => {
                    warn!(provider = %descriptor.id, %error, "Wallet provider failed");
                    last_error = error;
                }
            }
        }
        Self::apply_failure(&inner, seq, last_error)
    }

    async fn try_provider(
        inner: &Arc<Inner>,
        extension: &dyn WalletExtension,
    ) -> Result<(Arc<dyn ExtensionSession>, Vec<Account>)> {
        let session = extension.enable().await?;
        let accounts = inner.config_display_names(session.accounts().await?);
        Ok((session, accounts))
    }

    fn apply_success(
        inner: &Arc<Inner>,
        seq: u64,
        provider_id: String,
        session: Arc<dyn ExtensionSession>,
        accounts: Vec<Account>,
    ) -> Result<()> {
        {
            let mut state = inner.state.lock().expect("wallet state lock");
            if state.op_seq != seq {
                debug!(provider = %provider_id, "Dropping superseded connect result");
                return Ok(());
            }
            state
                .registry
                .replace_all(accounts, inner.config.preferred_account);
            state.active = Some(ActiveSession {
                provider_id: provider_id.clone(),
                session,
            });
            state.phase = ConnectionState::Connected;
        }
        Self::publish(inner);
        info!(provider = %provider_id, "Wallet connected");
        Ok(())
    }

    fn apply_failure(inner: &Arc<Inner>, seq: u64, error: Error) -> Result<()> {
        {
            let mut state = inner.state.lock().expect("wallet state lock");
            if state.op_seq != seq {
                debug!(%error, "Dropping superseded connect failure");
                return Ok(());
            }
            state.phase = ConnectionState::Disconnected;
            state.registry.clear();
            state.active = None;
        }
        Self::publish(inner);
        Err(error)
    }

    fn snapshot_locked(state: &WalletState) -> WalletSnapshot {
        WalletSnapshot {
            state: state.phase,
            accounts: state.registry.accounts().to_vec(),
            selected: state.registry.selected().cloned(),
            provider_id: state.active.as_ref().map(|a| a.provider_id.clone()),
        }
    }

    /// Deliver the current snapshot to every listener, unless it equals the
    /// previously delivered one. Listeners run after the lock is released.
    fn publish(inner: &Arc<Inner>) {
        let (snapshot, listeners) = {
            let mut state = inner.state.lock().expect("wallet state lock");
            let snapshot = Self::snapshot_locked(&state);
            if state.last_published.as_ref() == Some(&snapshot) {
                return;
            }
            state.last_published = Some(snapshot.clone());
            let listeners: Vec<WalletListener> = state
                .listeners
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect();
            (snapshot, listeners)
        };
        for listener in listeners {
            listener(&snapshot);
        }
    }
}

impl Inner {
    /// Fill empty display names from the config fallback table.
    fn config_display_names(&self, accounts: Vec<Account>) -> Vec<Account> {
        accounts
            .into_iter()
            .enumerate()
            .map(|(index, mut account)| {
                if account.display_name.is_empty() {
                    account.display_name = self.config.display_name(&account.provider_id, index);
                }
                account
            })
            .collect()
    }
}

impl std::fmt::Debug for WalletConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletConnectionManager")
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::ExtensionDescriptor;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Semaphore;

    enum Behavior {
        /// Authorize and expose these accounts
        Succeed(Vec<Account>),
        /// User declines the authorization prompt
        Decline,
        /// Extension internal failure
        Fail,
    }

    struct MockExtension {
        id: &'static str,
        behavior: Behavior,
        enables: AtomicUsize,
        /// When present, `enable()` waits for a permit before resolving
        gate: Option<Arc<Semaphore>>,
    }

    impl MockExtension {
        fn succeeding(id: &'static str, accounts: Vec<Account>) -> Arc<Self> {
            Arc::new(Self {
                id,
                behavior: Behavior::Succeed(accounts),
                enables: AtomicUsize::new(0),
                gate: None,
            })
        }

        fn gated(id: &'static str, accounts: Vec<Account>, gate: Arc<Semaphore>) -> Arc<Self> {
            Arc::new(Self {
                id,
                behavior: Behavior::Succeed(accounts),
                enables: AtomicUsize::new(0),
                gate: Some(gate),
            })
        }

        fn enable_count(&self) -> usize {
            self.enables.load(Ordering::SeqCst)
        }
    }

    struct MockSession {
        accounts: Vec<Account>,
        signer: EthereumWallet,
    }

    #[async_trait]
    impl ExtensionSession for MockSession {
        async fn accounts(&self) -> Result<Vec<Account>> {
            Ok(self.accounts.clone())
        }

        async fn ping(&self) -> Result<()> {
            Ok(())
        }

        fn signer(&self) -> EthereumWallet {
            self.signer.clone()
        }
    }

    #[async_trait]
    impl WalletExtension for MockExtension {
        fn descriptor(&self) -> ExtensionDescriptor {
            ExtensionDescriptor {
                id: self.id.to_string(),
                label: self.id.to_string(),
            }
        }

        async fn enable(&self) -> Result<Arc<dyn ExtensionSession>> {
            self.enables.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.acquire().await.expect("gate open").forget();
            }
            match &self.behavior {
                Behavior::Succeed(accounts) => Ok(Arc::new(MockSession {
                    accounts: accounts.clone(),
                    signer: test_signer(),
                })),
                Behavior::Decline => Err(Error::NotAuthorized),
                Behavior::Fail => Err(Error::Provider("mock failure".to_string())),
            }
        }
    }

    fn test_signer() -> EthereumWallet {
        let signer: alloy::signers::local::PrivateKeySigner =
            "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
                .parse()
                .unwrap();
        EthereumWallet::from(signer)
    }

    fn account(byte: u8) -> Account {
        Account {
            address: Address::repeat_byte(byte),
            display_name: String::new(),
            provider_id: "mock".to_string(),
        }
    }

    fn manager_with(extensions: Vec<Arc<MockExtension>>) -> WalletConnectionManager {
        let config = WalletConfig::default();
        let discovery = ExtensionDiscovery::new(config.clone());
        for extension in extensions {
            discovery.register(extension);
        }
        WalletConnectionManager::new(discovery, config)
    }

    fn snapshots(manager: &WalletConnectionManager) -> (ListenerId, Arc<Mutex<Vec<WalletSnapshot>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let id = manager.add_listener(move |snapshot| {
            sink.lock().unwrap().push(snapshot.clone());
        });
        (id, log)
    }

    #[tokio::test]
    async fn connect_with_no_extension_fails_not_found() {
        let manager = manager_with(vec![]);

        let err = manager.connect().await.unwrap_err();
        assert_eq!(err, Error::NotFound);
        assert_eq!(manager.state(), ConnectionState::Disconnected);
        assert!(manager.snapshot().accounts.is_empty());
    }

    #[tokio::test]
    async fn connect_selects_first_account_and_allows_switching() {
        let manager = manager_with(vec![MockExtension::succeeding(
            "mock",
            vec![account(1), account(2)],
        )]);
        let (_, log) = snapshots(&manager);

        manager.connect().await.unwrap();

        let snapshot = manager.snapshot();
        assert_eq!(snapshot.state, ConnectionState::Connected);
        assert_eq!(snapshot.selected.as_ref().unwrap().address, Address::repeat_byte(1));
        // Fallback display name from the config table
        assert_eq!(snapshot.accounts[0].display_name, "Account 1");

        let before = log.lock().unwrap().len();
        manager.select_account(Address::repeat_byte(2)).unwrap();
        let entries = log.lock().unwrap();
        assert_eq!(entries.len(), before + 1);
        assert_eq!(
            entries.last().unwrap().selected.as_ref().unwrap().address,
            Address::repeat_byte(2)
        );
    }

    #[tokio::test]
    async fn select_unknown_account_fails_and_keeps_selection() {
        let manager = manager_with(vec![MockExtension::succeeding("mock", vec![account(1)])]);
        manager.connect().await.unwrap();

        let err = manager.select_account(Address::repeat_byte(9)).unwrap_err();
        assert!(matches!(err, Error::AccountNotFound(_)));
        assert_eq!(
            manager.snapshot().selected.unwrap().address,
            Address::repeat_byte(1)
        );
    }

    #[tokio::test]
    async fn user_decline_surfaces_and_skips_remaining_providers() {
        let declining = Arc::new(MockExtension {
            id: "first",
            behavior: Behavior::Decline,
            enables: AtomicUsize::new(0),
            gate: None,
        });
        let fallback = MockExtension::succeeding("second", vec![account(1)]);
        let manager = manager_with(vec![Arc::clone(&declining), Arc::clone(&fallback)]);

        let err = manager.connect().await.unwrap_err();
        assert_eq!(err, Error::NotAuthorized);
        assert_eq!(manager.state(), ConnectionState::Disconnected);
        assert_eq!(fallback.enable_count(), 0);
    }

    #[tokio::test]
    async fn provider_failure_falls_through_to_next() {
        let failing = Arc::new(MockExtension {
            id: "first",
            behavior: Behavior::Fail,
            enables: AtomicUsize::new(0),
            gate: None,
        });
        let fallback = MockExtension::succeeding("second", vec![account(1)]);
        let manager = manager_with(vec![failing, Arc::clone(&fallback)]);

        manager.connect().await.unwrap();
        assert_eq!(manager.snapshot().provider_id.as_deref(), Some("second"));
        assert_eq!(fallback.enable_count(), 1);
    }

    #[tokio::test]
    async fn disconnect_during_connect_wins_over_late_success() {
        let gate = Arc::new(Semaphore::new(0));
        let extension = MockExtension::gated("mock", vec![account(1)], Arc::clone(&gate));
        let manager = manager_with(vec![Arc::clone(&extension)]);
        let (_, log) = snapshots(&manager);

        let connecting = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.connect().await })
        };
        // Let the connect reach the gated enable call
        tokio::task::yield_now().await;
        assert_eq!(extension.enable_count(), 1);

        manager.disconnect();
        gate.add_permits(1);

        // The superseded connect resolves without resurrecting its result
        connecting.await.unwrap().unwrap();
        assert_eq!(manager.state(), ConnectionState::Disconnected);
        assert!(log
            .lock()
            .unwrap()
            .iter()
            .all(|s| s.state != ConnectionState::Connected));
    }

    #[tokio::test]
    async fn concurrent_reconnects_share_one_authorization() {
        let gate = Arc::new(Semaphore::new(0));
        let extension = MockExtension::gated("mock", vec![account(1)], Arc::clone(&gate));
        let manager = manager_with(vec![Arc::clone(&extension)]);

        let first = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.reconnect().await })
        };
        tokio::task::yield_now().await;
        let second = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.reconnect().await })
        };
        tokio::task::yield_now().await;

        gate.add_permits(2);
        let (first, second) = (first.await.unwrap(), second.await.unwrap());

        assert!(first.is_ok() && second.is_ok());
        assert_eq!(extension.enable_count(), 1);
        assert_eq!(manager.state(), ConnectionState::Connected);
    }

    #[tokio::test]
    async fn reconnect_clears_unhealthy_on_success() {
        let manager = manager_with(vec![MockExtension::succeeding("mock", vec![account(1)])]);
        manager.connect().await.unwrap();
        let (_, log) = snapshots(&manager);

        manager.mark_unhealthy();
        // A second probe failure must not re-notify
        manager.mark_unhealthy();
        assert_eq!(
            log.lock()
                .unwrap()
                .iter()
                .filter(|s| s.state == ConnectionState::Unhealthy)
                .count(),
            1
        );

        manager.reconnect().await.unwrap();
        assert_eq!(manager.state(), ConnectionState::Connected);
    }

    #[tokio::test]
    async fn reconnect_failure_lands_in_disconnected() {
        let manager = manager_with(vec![Arc::new(MockExtension {
            id: "mock",
            behavior: Behavior::Fail,
            enables: AtomicUsize::new(0),
            gate: None,
        })]);

        let err = manager.reconnect().await.unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
        assert_eq!(manager.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn disconnect_is_idempotent_and_dedups_notifications() {
        let manager = manager_with(vec![MockExtension::succeeding("mock", vec![account(1)])]);
        manager.connect().await.unwrap();
        let (_, log) = snapshots(&manager);

        manager.disconnect();
        manager.disconnect();

        assert_eq!(log.lock().unwrap().len(), 1);
        assert_eq!(manager.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn removed_listener_never_fires_again() {
        let manager = manager_with(vec![MockExtension::succeeding("mock", vec![account(1)])]);
        let (id, log) = snapshots(&manager);

        assert!(manager.remove_listener(id));
        assert!(!manager.remove_listener(id));

        manager.connect().await.unwrap();
        manager.disconnect();
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn accounts_changed_keeps_surviving_selection() {
        let manager = manager_with(vec![MockExtension::succeeding(
            "mock",
            vec![account(1), account(2)],
        )]);
        manager.connect().await.unwrap();
        manager.select_account(Address::repeat_byte(2)).unwrap();

        manager.accounts_changed(vec![account(2), account(3)]);

        let snapshot = manager.snapshot();
        assert_eq!(snapshot.state, ConnectionState::Connected);
        assert_eq!(snapshot.selected.unwrap().address, Address::repeat_byte(2));
    }

    #[tokio::test]
    async fn accounts_changed_falls_back_when_selection_removed() {
        let manager = manager_with(vec![MockExtension::succeeding(
            "mock",
            vec![account(1), account(2)],
        )]);
        manager.connect().await.unwrap();
        manager.select_account(Address::repeat_byte(2)).unwrap();

        manager.accounts_changed(vec![account(3)]);

        let snapshot = manager.snapshot();
        assert_eq!(snapshot.state, ConnectionState::Connected);
        assert_eq!(snapshot.selected.unwrap().address, Address::repeat_byte(3));
    }

    #[tokio::test]
    async fn accounts_changed_to_empty_set_marks_unhealthy() {
        let manager = manager_with(vec![MockExtension::succeeding("mock", vec![account(1)])]);
        manager.connect().await.unwrap();

        manager.accounts_changed(Vec::new());

        let snapshot = manager.snapshot();
        assert_eq!(snapshot.state, ConnectionState::Unhealthy);
        assert!(snapshot.accounts.is_empty());
        assert!(snapshot.selected.is_none());
    }

    #[tokio::test]
    async fn signer_available_only_with_live_session() {
        let manager = manager_with(vec![MockExtension::succeeding("mock", vec![account(1)])]);
        assert!(manager.signer().is_none());

        manager.connect().await.unwrap();
        assert!(manager.signer().is_some());

        manager.disconnect();
        assert!(manager.signer().is_none());
    }
}
