//! Fetcher behavior across nodes: failover, caching, and multi-hop denom
//! resolution.

use std::sync::Arc;

use pharos::{
    aliases::InMemoryAliasManager,
    chain_api::{DenomTrace, IbcChannel},
    config::AppConfig,
    fetcher::DataFetcher,
    metrics::AppMetrics,
    models::Amount,
};
use serde_json::json;

fn build_fetcher(config: serde_json::Value) -> DataFetcher {
    let config: AppConfig = serde_json::from_value(config).unwrap();
    DataFetcher::new(
        Arc::new(config),
        Arc::new(InMemoryAliasManager::new()),
        Arc::new(AppMetrics::new().unwrap()),
    )
    .unwrap()
}

fn chain_entry(name: &str, chain_id: &str, api_nodes: Vec<String>) -> serde_json::Value {
    json!({
        "name": name,
        "chain_id": chain_id,
        "tendermint_nodes": ["wss://rpc.example.com/websocket"],
        "api_nodes": api_nodes,
    })
}

#[tokio::test]
async fn failing_node_is_skipped_and_the_answer_is_cached() {
    let mut bad_node = mockito::Server::new_async().await;
    let mut good_node = mockito::Server::new_async().await;

    let bad_mock = bad_node
        .mock("GET", "/cosmos/staking/v1beta1/validators/cosmosvaloper1xxx")
        .with_status(500)
        .expect(1)
        .create_async()
        .await;
    let good_mock = good_node
        .mock("GET", "/cosmos/staking/v1beta1/validators/cosmosvaloper1xxx")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"validator": {"operator_address": "cosmosvaloper1xxx",
                "description": {"moniker": "Atlas"}}}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let fetcher = build_fetcher(json!({
        "chains": [chain_entry("testchain", "test-1", vec![bad_node.url(), good_node.url()])],
        "http_retry_config": {"max_retries": 0},
    }));

    let validator = fetcher
        .get_validator("testchain", "cosmosvaloper1xxx")
        .await
        .expect("second node should answer");
    assert_eq!(validator.description.moniker, "Atlas");

    // Second ask is served from the cache: neither node sees another hit.
    let cached = fetcher
        .get_validator("testchain", "cosmosvaloper1xxx")
        .await
        .expect("cached answer expected");
    assert_eq!(cached.description.moniker, "Atlas");

    bad_mock.assert_async().await;
    good_mock.assert_async().await;
}

#[tokio::test]
async fn all_nodes_failing_degrades_to_none() {
    let mut node = mockito::Server::new_async().await;
    let _mock = node
        .mock("GET", "/cosmos/staking/v1beta1/params")
        .with_status(503)
        .create_async()
        .await;

    let fetcher = build_fetcher(json!({
        "chains": [chain_entry("testchain", "test-1", vec![node.url()])],
        "http_retry_config": {"max_retries": 0},
    }));

    assert!(fetcher.get_staking_params("testchain").await.is_none());
}

// An asset minted on a chain two IBC hops away: the trace walk crosses both
// hops and the final chain's local denom table answers. Intermediate
// answers come from the cache, exactly where the walk would have put them.
#[tokio::test]
async fn two_hop_denom_resolves_to_its_origin_chain_metadata() {
    let fetcher = build_fetcher(json!({
        "chains": [
            chain_entry("chaina", "chain-a", vec!["https://api-a.example.com".to_string()]),
            chain_entry("chainb", "chain-b", vec!["https://api-b.example.com".to_string()]),
            {
                "name": "chainc",
                "chain_id": "chain-c",
                "tendermint_nodes": ["wss://rpc-c.example.com/websocket"],
                "api_nodes": ["https://api-c.example.com"],
                "denoms": [{
                    "denom": "uorigin",
                    "display_denom": "origin",
                    "denom_coefficient": 1000000.0,
                    "coingecko_currency": "origincoin"
                }]
            },
        ],
    }));

    let hash = "27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2";
    fetcher.cache().set(
        &format!("denom_trace:chaina:{hash}"),
        DenomTrace {
            path: "transfer/channel-1/transfer/channel-2".to_string(),
            base_denom: "uorigin".to_string(),
        },
    );
    fetcher.cache().set(
        "channel:chaina:channel-1:transfer",
        IbcChannel { state: "STATE_OPEN".into(), connection_hops: vec!["connection-10".into()] },
    );
    fetcher
        .cache()
        .set("connection_chain_id:chaina:connection-10", "chain-b".to_string());
    fetcher.cache().set(
        "channel:chainb:channel-2:transfer",
        IbcChannel { state: "STATE_OPEN".into(), connection_hops: vec!["connection-20".into()] },
    );
    fetcher
        .cache()
        .set("connection_chain_id:chainb:connection-20", "chain-c".to_string());
    fetcher.cache().set("price:coingecko:origincoin", 6.7_f64);

    let info = fetcher
        .resolve_denom_info("chain-a", &format!("ibc/{hash}"))
        .await
        .expect("resolution expected");
    assert_eq!(info.display_denom, "origin");

    let mut amount = Amount::from_coin("100000000", &format!("ibc/{hash}"));
    fetcher.populate_amount("chaina", &mut amount).await;
    assert_eq!(amount.denom, "origin");
    assert_eq!(amount.value, 100.0);
    assert_eq!(amount.price_usd, Some(670.0));
}

#[tokio::test]
async fn channel_with_multiple_connection_hops_is_unsupported() {
    let fetcher = build_fetcher(json!({
        "chains": [chain_entry("chaina", "chain-a", vec!["https://api-a.example.com".to_string()])],
    }));

    let hash = "AAAAFB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2";
    fetcher.cache().set(
        &format!("denom_trace:chaina:{hash}"),
        DenomTrace { path: "transfer/channel-1".to_string(), base_denom: "uorigin".to_string() },
    );
    fetcher.cache().set(
        "channel:chaina:channel-1:transfer",
        IbcChannel {
            state: "STATE_OPEN".into(),
            connection_hops: vec!["connection-1".into(), "connection-2".into()],
        },
    );

    assert!(fetcher.resolve_remote_origin("chain-a", &format!("ibc/{hash}")).await.is_none());
}

#[tokio::test]
async fn unresolvable_denom_leaves_the_amount_untouched() {
    let fetcher = build_fetcher(json!({
        "chains": [chain_entry("chaina", "chain-a", vec!["https://api-a.example.com".to_string()])],
    }));

    // An empty registry listing: the last resolution tier has no answer.
    fetcher.cache().set::<Vec<pharos::chain_registry::RegistryChain>>("registry:chains", vec![]);

    let mut amount = Amount::from_coin("5000", "unlisted");
    fetcher.populate_amount("chaina", &mut amount).await;

    assert_eq!(amount.denom, "unlisted");
    assert_eq!(amount.value, 5000.0);
    assert_eq!(amount.price_usd, None);
}
