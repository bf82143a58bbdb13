//! Timelock Courier connection subsystem
//!
//! Connection management for a dApp that sends time-locked, encrypted
//! messages anchored to a smart contract. Two independent, externally
//! controlled async connections are kept usable here:
//!
//! - the wallet extension (identity/signing), owned by
//!   [`wallet::WalletConnectionManager`] and probed by
//!   [`wallet::HealthMonitor`]
//! - the blockchain RPC endpoint (contract reads/writes), owned by
//!   [`provider::ProviderConnectionManager`]
//!
//! [`network::NetworkStatusMonitor`] adds an advisory online/offline signal
//! for UI banners. Encryption, upload, and on-chain message storage live
//! elsewhere; no signing is implemented in this crate.

pub mod config;
pub mod extension;
pub mod network;
pub mod provider;
pub mod signals;
pub mod wallet;

mod error;

// Re-export commonly used types
pub use config::{Config, RpcConfig, PRIVATE_KEY_ENV};
pub use error::{Error, Result};
pub use network::{HttpProber, NetworkStatus, NetworkStatusMonitor};
pub use provider::{ProviderConnectionManager, ProviderConnectionState};
pub use signals::HostSignals;
pub use wallet::{
    Account, ConnectionState, HealthMonitor, WalletConnectionManager, WalletSnapshot,
};
