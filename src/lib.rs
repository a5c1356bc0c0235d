#![warn(missing_docs)]
//! Pharos watches Cosmos-SDK chains over redundant node connections and turns
//! raw chain events into de-duplicated, enriched transaction reports.

pub mod aliases;
pub mod cache;
pub mod chain_api;
pub mod chain_registry;
pub mod config;
pub mod converter;
pub mod fetcher;
pub mod http_client;
pub mod messages;
pub mod metrics;
pub mod models;
pub mod node_manager;
pub mod price;
pub mod processor;
pub mod providers;
pub mod reporter;
