//! Configuration for the connection subsystem
//!
//! Wallet provider priority and display-name fallback are configuration
//! tables, not hardcoded branches, so a new wallet extension can be supported
//! without touching the state machine.

pub mod rpc;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// Re-export RPC config
pub use rpc::RpcConfig;

/// Environment variable holding a hex private key for the local keystore
/// extension (development / CLI use).
pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

/// Wallet connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Extension ids tried in order by `connect()`. Registered extensions not
    /// listed here sort after these, in registration order.
    #[serde(default = "default_provider_priority")]
    pub provider_priority: Vec<String>,
    /// Display-name templates per extension id, applied when the extension
    /// reports an account without a name. `{index}` expands to the account's
    /// position in the enumeration.
    #[serde(default)]
    pub display_name_fallbacks: HashMap<String, String>,
    /// Account to select after connecting, if present in the enumerated set.
    /// Session memory only, never persisted to disk.
    #[serde(default)]
    pub preferred_account: Option<Address>,
}

fn default_provider_priority() -> Vec<String> {
    vec!["browser-injected".to_string(), "local-key".to_string()]
}

impl WalletConfig {
    /// Display name for an unnamed account from `provider_id` at `index`.
    pub fn display_name(&self, provider_id: &str, index: usize) -> String {
        match self.display_name_fallbacks.get(provider_id) {
            Some(template) => template.replace("{index}", &(index + 1).to_string()),
            None => format!("Account {}", index + 1),
        }
    }

    /// Priority rank for an extension id; unlisted ids sort last.
    pub fn priority_rank(&self, provider_id: &str) -> usize {
        self.provider_priority
            .iter()
            .position(|id| id == provider_id)
            .unwrap_or(usize::MAX)
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            provider_priority: default_provider_priority(),
            display_name_fallbacks: HashMap::new(),
            preferred_account: None,
        }
    }
}

/// Wallet liveness probe settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Milliseconds between probes
    pub interval_ms: u64,
    /// Per-probe timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            interval_ms: 15_000,
            timeout_ms: 3_000,
        }
    }
}

/// Network reachability probe settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkProbeConfig {
    /// Endpoint hit with a HEAD request; any response counts as reachable
    pub probe_url: String,
    /// Milliseconds between probes
    pub interval_ms: u64,
    /// Per-probe timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for NetworkProbeConfig {
    fn default() -> Self {
        Self {
            probe_url: "https://cloudflare.com/cdn-cgi/trace".to_string(),
            interval_ms: 30_000,
            timeout_ms: 5_000,
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Chain the message contract lives on
    #[serde(default)]
    pub chain_id: Option<u64>,
    /// Wallet connection settings
    #[serde(default)]
    pub wallet: WalletConfig,
    /// Wallet liveness probe settings
    #[serde(default)]
    pub health: HealthConfig,
    /// Network reachability probe settings
    #[serde(default)]
    pub network: NetworkProbeConfig,
}
