//! Outcomes after broadcast: reverts and unconfirmed transactions.

#![allow(clippy::unwrap_used)]

use std::time::{Duration, Instant};

use reqwest::StatusCode;
use serde_json::{Value, json};
use storechain_integration_tests::{CHAIN_ID, MockChain, TestGateway};

#[tokio::test]
async fn test_reverted_transaction_reports_its_hash() {
    let gateway = TestGateway::start().await;

    // No category 99 exists, so the contract reverts.
    let response = gateway
        .client
        .put(gateway.url("/api/updateCategory/1/99"))
        .json(&json!({ "name": "Ghost", "description": "Missing" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Transaction reverted");
    assert_eq!(body["transactionHash"].as_str().unwrap().len(), 66);
    assert_eq!(gateway.chain.transaction_count(), 1);
}

#[tokio::test]
async fn test_unconfirmed_write_times_out_with_hash() {
    let chain = MockChain::new(CHAIN_ID);
    chain.hold_receipts();
    let gateway = TestGateway::start_with(chain, &[("RECEIPT_TIMEOUT_SECS", "1")]).await;

    let started = Instant::now();
    let response = gateway
        .client
        .post(gateway.url("/api/addCategory/1"))
        .json(&json!({ "name": "Fruit", "description": "Slow chain" }))
        .send()
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Transaction not confirmed in time");
    assert!(body["transactionHash"].as_str().unwrap().starts_with("0x"));

    // Bounded by the configured budget, not left spinning.
    assert!(elapsed >= Duration::from_millis(900), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(10), "{elapsed:?}");

    // The transaction was broadcast once; the outcome is left to the caller.
    assert_eq!(gateway.chain.transaction_count(), 1);
}

#[tokio::test]
async fn test_next_write_after_timeout_uses_next_nonce() {
    let chain = MockChain::new(CHAIN_ID);
    chain.hold_receipts();
    let gateway = TestGateway::start_with(chain, &[("RECEIPT_TIMEOUT_SECS", "1")]).await;

    for name in ["First", "Second"] {
        let response = gateway
            .client
            .post(gateway.url("/api/addCategory/1"))
            .json(&json!({ "name": name }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    assert_eq!(gateway.chain.accepted_nonces(), vec![0, 1]);
}
