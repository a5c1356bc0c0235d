//! On-chain value with an optional USD price attached during enrichment.

use std::fmt;

use super::denom::DenomInfo;

/// An on-chain value. Created with the raw integer value and on-chain denom;
/// the single enrichment pass may rewrite value, denom, and price once.
#[derive(Debug, Clone, PartialEq)]
pub struct Amount {
    /// Numeric value. Raw base units before enrichment, display units after.
    pub value: f64,
    /// Denom. Raw on-chain denom before enrichment, display denom after.
    pub denom: String,
    /// Total USD value, set by enrichment when a price source is known.
    pub price_usd: Option<f64>,
}

impl Amount {
    /// Creates an amount from a raw value and denom.
    pub fn new(value: f64, denom: impl Into<String>) -> Self {
        Self { value, denom: denom.into(), price_usd: None }
    }

    /// Creates an amount from the string form used by Cosmos coins.
    /// An unparseable value degrades to zero rather than failing the message.
    pub fn from_coin(amount: &str, denom: &str) -> Self {
        Self::new(amount.parse::<f64>().unwrap_or(0.0), denom)
    }

    /// Applies denom metadata and an optional per-unit spot price.
    ///
    /// Rewrites the raw base-unit value into display units and swaps the
    /// denom for its display form. Called at most once per amount.
    pub fn enrich(&mut self, info: &DenomInfo, price_per_unit: Option<f64>) {
        self.value /= info.denom_coefficient;
        self.denom = info.display_denom.clone();
        self.price_usd = price_per_unit.map(|price| self.value * price);
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.price_usd {
            Some(price) => write!(f, "{} {} (${:.2})", self.value, self.denom, price),
            None => write!(f, "{} {}", self.value, self.denom),
        }
    }
}
