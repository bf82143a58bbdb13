//! RPC endpoint configuration
//!
//! Supports multiple configuration methods following Ethereum ecosystem
//! conventions:
//! 1. Per-chain env vars (ETH_RPC_URL, SEPOLIA_RPC_URL, etc.) - highest priority
//! 2. Provider API key (ALCHEMY_API_KEY) - builds URLs automatically
//! 3. Public RPC fallbacks - for testing only
//!
//! The supported chains are a table, so adding one is a single row.

use std::collections::HashMap;

/// Chain ID constants
pub mod chains {
    pub const ETHEREUM: u64 = 1;
    pub const SEPOLIA: u64 = 11_155_111;
    pub const BASE: u64 = 8453;
}

/// One row of the supported-chain table
struct ChainSpec {
    id: u64,
    name: &'static str,
    /// Per-chain env var holding a full RPC URL
    env_var: &'static str,
    /// Alchemy subdomain, if the chain is served there
    alchemy_slug: Option<&'static str>,
    /// Rate-limited public endpoint, testing only
    public_url: &'static str,
}

const CHAIN_TABLE: &[ChainSpec] = &[
    ChainSpec {
        id: chains::ETHEREUM,
        name: "ethereum",
        env_var: "ETH_RPC_URL",
        alchemy_slug: Some("eth-mainnet"),
        public_url: "https://eth.llamarpc.com",
    },
    ChainSpec {
        id: chains::SEPOLIA,
        name: "sepolia",
        env_var: "SEPOLIA_RPC_URL",
        alchemy_slug: Some("eth-sepolia"),
        public_url: "https://rpc.sepolia.org",
    },
    ChainSpec {
        id: chains::BASE,
        name: "base",
        env_var: "BASE_RPC_URL",
        alchemy_slug: Some("base-mainnet"),
        public_url: "https://mainnet.base.org",
    },
];

const ALCHEMY_API_KEY: &str = "ALCHEMY_API_KEY";

/// RPC configuration for the supported chains
#[derive(Debug, Clone)]
pub struct RpcConfig {
    /// RPC URLs indexed by chain ID
    urls: HashMap<u64, String>,
}

impl RpcConfig {
    /// Create RPC config from environment variables
    ///
    /// Priority per chain:
    /// 1. The chain's env var (ETH_RPC_URL, SEPOLIA_RPC_URL, ...)
    /// 2. ALCHEMY_API_KEY
    /// 3. Public RPC fallback (testing only)
    pub fn from_env() -> Self {
        let alchemy_key = std::env::var(ALCHEMY_API_KEY).ok();
        let mut urls = HashMap::new();

        for spec in CHAIN_TABLE {
            if let Ok(url) = std::env::var(spec.env_var) {
                tracing::debug!(chain = spec.name, var = spec.env_var, "Using per-chain RPC URL");
                urls.insert(spec.id, url);
                continue;
            }
            if let (Some(key), Some(slug)) = (alchemy_key.as_deref(), spec.alchemy_slug) {
                tracing::debug!(chain = spec.name, "Building RPC URL from ALCHEMY_API_KEY");
                urls.insert(spec.id, format!("https://{}.g.alchemy.com/v2/{}", slug, key));
                continue;
            }
            tracing::warn!(
                chain = spec.name,
                "No RPC configured, using public RPC (rate limited)"
            );
            urls.insert(spec.id, spec.public_url.to_string());
        }

        Self { urls }
    }

    /// Create with explicit RPC URLs
    pub fn with_urls(urls: HashMap<u64, String>) -> Self {
        Self { urls }
    }

    /// Get RPC URL for a chain
    pub fn get(&self, chain_id: u64) -> Option<&str> {
        self.urls.get(&chain_id).map(|s| s.as_str())
    }

    /// Check if a chain is configured
    pub fn has_chain(&self, chain_id: u64) -> bool {
        self.urls.contains_key(&chain_id)
    }

    /// Resolve a chain name from the CLI to its id
    pub fn chain_id_by_name(name: &str) -> Option<u64> {
        CHAIN_TABLE
            .iter()
            .find(|spec| spec.name == name.to_lowercase())
            .map(|spec| spec.id)
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
