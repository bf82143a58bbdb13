//! Extension discovery
//!
//! Holds the wallet capabilities the host registered and returns them in
//! priority order. The order comes from [`WalletConfig::provider_priority`];
//! ids not in the table keep registration order after the listed ones.

use super::WalletExtension;
use crate::config::WalletConfig;
use std::sync::{Arc, Mutex};

/// Registry of injected wallet capabilities.
#[derive(Clone)]
pub struct ExtensionDiscovery {
    inner: Arc<Mutex<Registry>>,
}

struct Registry {
    priority: WalletConfig,
    extensions: Vec<Arc<dyn WalletExtension>>,
}

impl ExtensionDiscovery {
    pub fn new(config: WalletConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Registry {
                priority: config,
                extensions: Vec::new(),
            })),
        }
    }

    /// Register a capability. A duplicate id replaces the earlier entry.
    pub fn register(&self, extension: Arc<dyn WalletExtension>) {
        let id = extension.descriptor().id;
        let mut registry = self.inner.lock().expect("discovery lock");
        registry
            .extensions
            .retain(|existing| existing.descriptor().id != id);
        registry.extensions.push(extension);
        tracing::debug!(provider = %id, "Registered wallet extension");
    }

    /// Available capabilities in priority order. Never fails, never blocks on
    /// anything external; an empty vec means nothing is injected.
    pub fn detect(&self) -> Vec<Arc<dyn WalletExtension>> {
        let registry = self.inner.lock().expect("discovery lock");
        let mut ranked: Vec<(usize, usize, Arc<dyn WalletExtension>)> = registry
            .extensions
            .iter()
            .enumerate()
            .map(|(pos, ext)| {
                let rank = registry.priority.priority_rank(&ext.descriptor().id);
                (rank, pos, Arc::clone(ext))
            })
            .collect();
        ranked.sort_by_key(|(rank, pos, _)| (*rank, *pos));
        ranked.into_iter().map(|(_, _, ext)| ext).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::{ExtensionDescriptor, ExtensionSession};
    use crate::{Error, Result};
    use async_trait::async_trait;

    struct StubExtension {
        id: &'static str,
    }

    #[async_trait]
    impl WalletExtension for StubExtension {
        fn descriptor(&self) -> ExtensionDescriptor {
            ExtensionDescriptor {
                id: self.id.to_string(),
                label: self.id.to_string(),
            }
        }

        async fn enable(&self) -> Result<std::sync::Arc<dyn ExtensionSession>> {
            Err(Error::Provider("stub".to_string()))
        }
    }

    fn config_with_priority(ids: &[&str]) -> WalletConfig {
        WalletConfig {
            provider_priority: ids.iter().map(|s| s.to_string()).collect(),
            ..WalletConfig::default()
        }
    }

    #[test]
    fn detect_empty_when_nothing_registered() {
        let discovery = ExtensionDiscovery::new(WalletConfig::default());
        assert!(discovery.detect().is_empty());
    }

    #[test]
    fn detect_orders_by_priority_table() {
        let discovery = ExtensionDiscovery::new(config_with_priority(&["beta", "alpha"]));
        discovery.register(Arc::new(StubExtension { id: "alpha" }));
        discovery.register(Arc::new(StubExtension { id: "beta" }));

        let ids: Vec<String> = discovery
            .detect()
            .iter()
            .map(|e| e.descriptor().id)
            .collect();
        assert_eq!(ids, vec!["beta", "alpha"]);
    }

    #[test]
    fn unlisted_providers_keep_registration_order_after_listed() {
        let discovery = ExtensionDiscovery::new(config_with_priority(&["known"]));
        discovery.register(Arc::new(StubExtension { id: "first-unknown" }));
        discovery.register(Arc::new(StubExtension { id: "known" }));
        discovery.register(Arc::new(StubExtension { id: "second-unknown" }));

        let ids: Vec<String> = discovery
            .detect()
            .iter()
            .map(|e| e.descriptor().id)
            .collect();
        assert_eq!(ids, vec!["known", "first-unknown", "second-unknown"]);
    }

    #[test]
    fn duplicate_id_replaces_previous_registration() {
        let discovery = ExtensionDiscovery::new(WalletConfig::default());
        discovery.register(Arc::new(StubExtension { id: "wallet" }));
        discovery.register(Arc::new(StubExtension { id: "wallet" }));
        assert_eq!(discovery.detect().len(), 1);
    }
}
