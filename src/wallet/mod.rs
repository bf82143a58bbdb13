//! Wallet connection lifecycle
//!
//! The manager owns the connect/disconnect/reconnect state machine and the
//! account registry; the health monitor feeds probe outcomes back into it.
//! Signing is delegated to the extension session and never implemented here.

mod accounts;
mod health;
mod manager;

pub use accounts::{Account, AccountRegistry};
pub use health::{HealthMonitor, HealthStatus};
pub use manager::{ConnectionState, ListenerId, WalletConnectionManager, WalletSnapshot};
