//! Configuration module for Pharos.

mod app_config;
mod chain;
mod filter;
mod helpers;
mod http_retry;

pub use app_config::AppConfig;
pub use chain::{ChainConfig, ExplorerConfig};
pub use filter::{matches_filters, Filter, FilterError};
pub use helpers::{deserialize_duration_from_ms, deserialize_duration_from_seconds, deserialize_urls};
pub use http_retry::{HttpRetryConfig, JitterSetting};
