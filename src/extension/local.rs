//! Local keystore extension
//!
//! A [`WalletExtension`] backed by a private key from the environment, used
//! by the CLI and integration testing where no browser wallet is injected.
//!
//! SECURITY: the private key never leaves this module.
//! - Held in alloy's `PrivateKeySigner`, which handles the crypto
//! - Never serialized and never logged; `Debug` output is redacted
//! - Only reachable through the session's signer handle

use super::{ExtensionDescriptor, ExtensionSession, WalletExtension};
use crate::wallet::Account;
use crate::{Error, Result};
use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

/// Extension id, referenced by the provider priority table.
pub const LOCAL_KEY_ID: &str = "local-key";

/// Keystore-backed wallet capability.
pub struct LocalKeyExtension {
    signer: PrivateKeySigner,
    address: Address,
}

impl LocalKeyExtension {
    /// Create from an environment variable holding a hex-encoded private key.
    pub fn from_env(var_name: &str) -> Result<Self> {
        let key_hex = SecretString::from(std::env::var(var_name).map_err(|_| {
            Error::Config(format!(
                "Environment variable {} not set. Required for the local keystore.",
                var_name
            ))
        })?);

        Self::from_hex(key_hex.expose_secret())
    }

    /// Create from a hex-encoded private key, with or without 0x prefix.
    pub fn from_hex(key_hex: &str) -> Result<Self> {
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| Error::Config(format!("Invalid private key: {}", e)))?;
        let address = signer.address();

        Ok(Self { signer, address })
    }

    /// Public address of the key (safe to share).
    pub fn address(&self) -> Address {
        self.address
    }
}

#[async_trait]
impl WalletExtension for LocalKeyExtension {
    fn descriptor(&self) -> ExtensionDescriptor {
        ExtensionDescriptor {
            id: LOCAL_KEY_ID.to_string(),
            label: "Local keystore".to_string(),
        }
    }

    /// No user prompt exists for a local key; enabling always succeeds.
    async fn enable(&self) -> Result<Arc<dyn ExtensionSession>> {
        Ok(Arc::new(LocalKeySession {
            account: Account {
                address: self.address,
                display_name: String::new(),
                provider_id: LOCAL_KEY_ID.to_string(),
            },
            wallet: EthereumWallet::from(self.signer.clone()),
        }))
    }
}

struct LocalKeySession {
    account: Account,
    wallet: EthereumWallet,
}

#[async_trait]
impl ExtensionSession for LocalKeySession {
    async fn accounts(&self) -> Result<Vec<Account>> {
        Ok(vec![self.account.clone()])
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn signer(&self) -> EthereumWallet {
        self.wallet.clone()
    }
}

// Implement Debug manually to avoid exposing the signer
impl std::fmt::Debug for LocalKeyExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalKeyExtension")
            .field("address", &self.address)
            .field("signer", &"[REDACTED]")
            .finish()
    }
}
