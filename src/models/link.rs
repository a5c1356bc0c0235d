//! An address or identifier with optional explorer URL and display title.

use std::fmt;

/// An address/identifier plus optional explorer URL and display title.
/// Created with the bare value; enrichment may attach href and title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Link {
    /// The raw on-chain value (address, hash, height, proposal id).
    pub value: String,
    /// Explorer URL, attached by enrichment when the chain has one configured.
    pub href: Option<String>,
    /// Display title (wallet alias, validator moniker, proposal title).
    pub title: Option<String>,
}

impl Link {
    /// Creates a link carrying only the bare value.
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into(), href: None, title: None }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.title {
            Some(title) => write!(f, "{} ({})", title, self.value),
            None => write!(f, "{}", self.value),
        }
    }
}
