//! Wallet alias lookup, scoped by subscription and chain.
//!
//! Only the lookup contract lives here; how aliases are persisted is an
//! outer concern.

use std::collections::HashMap;

#[cfg(test)]
use mockall::automock;

/// Looks up the alias a subscriber assigned to a wallet.
#[cfg_attr(test, automock)]
pub trait AliasManager: Send + Sync {
    /// Returns the alias for `wallet` on `chain` under `subscription`, or
    /// `None` if no alias was assigned.
    fn get(&self, subscription: &str, chain: &str, wallet: &str) -> Option<String>;
}

/// An in-memory alias table.
#[derive(Debug, Default)]
pub struct InMemoryAliasManager {
    aliases: HashMap<(String, String, String), String>,
}

impl InMemoryAliasManager {
    /// Creates an empty alias table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns an alias.
    pub fn set(
        &mut self,
        subscription: impl Into<String>,
        chain: impl Into<String>,
        wallet: impl Into<String>,
        alias: impl Into<String>,
    ) {
        self.aliases
            .insert((subscription.into(), chain.into(), wallet.into()), alias.into());
    }
}

impl AliasManager for InMemoryAliasManager {
    fn get(&self, subscription: &str, chain: &str, wallet: &str) -> Option<String> {
        self.aliases
            .get(&(subscription.to_string(), chain.to_string(), wallet.to_string()))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_scoped_by_subscription_and_chain() {
        let mut aliases = InMemoryAliasManager::new();
        aliases.set("default", "cosmos", "cosmos1xxx", "treasury");

        assert_eq!(
            aliases.get("default", "cosmos", "cosmos1xxx"),
            Some("treasury".to_string())
        );
        assert_eq!(aliases.get("other", "cosmos", "cosmos1xxx"), None);
        assert_eq!(aliases.get("default", "osmosis", "cosmos1xxx"), None);
    }
}
