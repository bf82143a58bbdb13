//! Wallet extension capability
//!
//! The browser-injected wallet is modelled as an opaque async capability:
//! `enable()` asks the user for authorization and yields a live session that
//! can enumerate accounts, answer liveness pings, and hand out a signer
//! handle. No signing is implemented here; the session's signer is used
//! as-is by contract-calling code.

mod discovery;
mod local;

pub use discovery::ExtensionDiscovery;
pub use local::{LocalKeyExtension, LOCAL_KEY_ID};

use crate::wallet::Account;
use crate::Result;
use alloy::network::EthereumWallet;
use async_trait::async_trait;
use std::sync::Arc;

/// Identity of a wallet extension, shown in the connect UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionDescriptor {
    /// Stable id used by the provider priority table
    pub id: String,
    /// Human-readable label
    pub label: String,
}

/// An installed wallet extension, prior to authorization.
#[async_trait]
pub trait WalletExtension: Send + Sync {
    fn descriptor(&self) -> ExtensionDescriptor;

    /// Request user authorization. Resolves to a live session on approval;
    /// fails with [`crate::Error::NotAuthorized`] if the user declines.
    async fn enable(&self) -> Result<Arc<dyn ExtensionSession>>;
}

/// An authorized wallet session. Dropped wholesale on disconnect; a new
/// session is acquired by the next connect.
#[async_trait]
pub trait ExtensionSession: Send + Sync {
    /// Enumerate the accounts the user exposed to this app. The result
    /// replaces the previous set wholesale.
    async fn accounts(&self) -> Result<Vec<Account>>;

    /// Cheap liveness check; the extension answers without user interaction.
    async fn ping(&self) -> Result<()>;

    /// Signer handle for contract-calling code. Opaque to this subsystem.
    fn signer(&self) -> EthereumWallet;
}
