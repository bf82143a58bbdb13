//! Account registry
//!
//! Holds the enumerated account set and the current selection for the wallet
//! manager. The set is replaced wholesale on every enumeration; individual
//! accounts are never mutated in place. Invariant: the selection, if set, is
//! always an element of the set.

use crate::{Error, Result};
use alloy::primitives::Address;

/// One account exposed by a wallet extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Chain address
    pub address: Address,
    /// Human-readable name; filled from the config fallback table when the
    /// extension reports none
    pub display_name: String,
    /// Id of the extension that exposed this account
    pub provider_id: String,
}

/// Current account set and selection. Owned by the wallet manager.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountRegistry {
    accounts: Vec<Account>,
    selected: Option<Address>,
}

impl AccountRegistry {
    /// Replace the whole set. Selection resolves to `preferred` when present
    /// in the new set, otherwise the first account, otherwise unset.
    pub fn replace_all(&mut self, accounts: Vec<Account>, preferred: Option<Address>) {
        self.selected = preferred
            .filter(|address| accounts.iter().any(|a| a.address == *address))
            .or_else(|| accounts.first().map(|a| a.address));
        self.accounts = accounts;
    }

    /// Change the selection to `address`.
    pub fn select(&mut self, address: Address) -> Result<()> {
        if !self.accounts.iter().any(|a| a.address == address) {
            return Err(Error::AccountNotFound(format!("{address}")));
        }
        self.selected = Some(address);
        Ok(())
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn selected(&self) -> Option<&Account> {
        let address = self.selected?;
        self.accounts.iter().find(|a| a.address == address)
    }

    pub fn selected_address(&self) -> Option<Address> {
        self.selected
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Drop the set and selection. Used on disconnect.
    pub fn clear(&mut self) {
        self.accounts.clear();
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(byte: u8) -> Account {
        Account {
            address: Address::repeat_byte(byte),
            display_name: format!("Account {byte}"),
            provider_id: "test".to_string(),
        }
    }

    #[test]
    fn replace_selects_first_by_default() {
        let mut registry = AccountRegistry::default();
        registry.replace_all(vec![account(1), account(2)], None);

        assert_eq!(registry.selected_address(), Some(Address::repeat_byte(1)));
    }

    #[test]
    fn replace_honors_preferred_when_present() {
        let mut registry = AccountRegistry::default();
        registry.replace_all(vec![account(1), account(2)], Some(Address::repeat_byte(2)));

        assert_eq!(registry.selected_address(), Some(Address::repeat_byte(2)));
    }

    #[test]
    fn replace_ignores_preferred_not_in_set() {
        let mut registry = AccountRegistry::default();
        registry.replace_all(vec![account(1)], Some(Address::repeat_byte(9)));

        assert_eq!(registry.selected_address(), Some(Address::repeat_byte(1)));
    }

    #[test]
    fn replace_with_empty_set_clears_selection() {
        let mut registry = AccountRegistry::default();
        registry.replace_all(vec![account(1)], None);
        registry.replace_all(Vec::new(), registry.selected_address());

        assert!(registry.is_empty());
        assert_eq!(registry.selected_address(), None);
    }

    #[test]
    fn select_unknown_address_fails() {
        let mut registry = AccountRegistry::default();
        registry.replace_all(vec![account(1)], None);

        let err = registry.select(Address::repeat_byte(9)).unwrap_err();
        assert!(matches!(err, Error::AccountNotFound(_)));
        // Selection untouched after the failed call
        assert_eq!(registry.selected_address(), Some(Address::repeat_byte(1)));
    }

    #[test]
    fn selection_is_always_member_of_set() {
        let mut registry = AccountRegistry::default();
        registry.replace_all(vec![account(1), account(2)], None);
        registry.select(Address::repeat_byte(2)).unwrap();
        registry.replace_all(vec![account(3)], registry.selected_address());

        let selected = registry.selected().expect("selection set");
        assert!(registry.accounts().contains(selected));
    }
}
