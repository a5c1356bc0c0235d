//! Event-filter expressions over derived message attributes.
//!
//! A filter is a single `key = 'value'` predicate in the Tendermint query
//! grammar subset the subscription strings use. Filters on a chain are OR'd;
//! an empty filter set matches everything. Invalid filter syntax is rejected
//! at configuration load, the only fatal error class in the pipeline.

use std::str::FromStr;

use serde::{de, Deserialize, Deserializer};
use thiserror::Error;

/// An error produced while parsing a filter expression.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The expression is not of the form `key = 'value'`.
    #[error("Invalid filter expression: {0}")]
    InvalidExpression(String),
}

/// An attribute-key/value predicate over a message's derived event
/// attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    /// Attribute key, e.g. `message.action` or `transfer.recipient`.
    pub key: String,
    /// Attribute value the key must equal.
    pub value: String,
}

impl Filter {
    /// Returns true if the attribute set contains this filter's key/value
    /// pair.
    pub fn matches(&self, values: &[(String, String)]) -> bool {
        values.iter().any(|(key, value)| *key == self.key && *value == self.value)
    }
}

impl FromStr for Filter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) = s
            .split_once('=')
            .ok_or_else(|| FilterError::InvalidExpression(s.to_string()))?;

        let key = key.trim();
        let value = value.trim().trim_matches('\'');
        if key.is_empty() || value.is_empty() {
            return Err(FilterError::InvalidExpression(s.to_string()));
        }

        Ok(Self { key: key.to_string(), value: value.to_string() })
    }
}

impl<'de> Deserialize<'de> for Filter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let expression = String::deserialize(deserializer)?;
        expression.parse().map_err(de::Error::custom)
    }
}

/// Applies a chain's filter set to one message's attribute values.
/// Filters are OR'd; an empty set matches everything.
pub fn matches_filters(filters: &[Filter], values: &[(String, String)]) -> bool {
    filters.is_empty() || filters.iter().any(|filter| filter.matches(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> Vec<(String, String)> {
        vec![
            ("message.action".to_string(), "/cosmos.bank.v1beta1.MsgSend".to_string()),
            ("transfer.recipient".to_string(), "cosmos1xxx".to_string()),
        ]
    }

    #[test]
    fn parses_quoted_expression() {
        let filter: Filter = "message.action = '/cosmos.bank.v1beta1.MsgSend'".parse().unwrap();
        assert_eq!(filter.key, "message.action");
        assert_eq!(filter.value, "/cosmos.bank.v1beta1.MsgSend");
    }

    #[test]
    fn rejects_expression_without_equals() {
        let result: Result<Filter, _> = "message.action".parse();
        assert!(result.is_err());
    }

    #[test]
    fn empty_filter_set_matches_everything() {
        assert!(matches_filters(&[], &values()));
    }

    #[test]
    fn filters_are_ord() {
        let miss: Filter = "message.action = '/cosmos.gov.v1beta1.MsgVote'".parse().unwrap();
        let hit: Filter = "transfer.recipient = 'cosmos1xxx'".parse().unwrap();
        assert!(!matches_filters(&[miss.clone()], &values()));
        assert!(matches_filters(&[miss, hit], &values()));
    }
}
