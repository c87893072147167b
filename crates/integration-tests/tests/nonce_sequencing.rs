//! Concurrent writes from the single signing account.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;

use reqwest::StatusCode;
use serde_json::{Value, json};
use storechain_integration_tests::TestGateway;

const WRITES: u64 = 12;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writes_get_contiguous_nonces() {
    let gateway = TestGateway::start().await;

    let requests = (0..WRITES).map(|i| {
        let request = gateway
            .client
            .post(gateway.url("/api/addCategory/1"))
            .json(&json!({ "name": format!("Category {i}"), "description": "Concurrent" }));
        async move {
            let response = request.send().await.unwrap();
            let status = response.status();
            let body: Value = response.json().await.unwrap();
            (status, body)
        }
    });
    let handles: Vec<_> = requests.map(tokio::spawn).collect();

    let mut hashes = HashSet::new();
    for handle in handles {
        let (status, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK, "{body}");
        hashes.insert(body["transactionHash"].as_str().unwrap().to_string());
    }
    assert_eq!(hashes.len(), usize::try_from(WRITES).unwrap());

    // Every nonce used exactly once, with no gaps, in acceptance order.
    let nonces = gateway.chain.accepted_nonces();
    assert_eq!(nonces, (0..WRITES).collect::<Vec<_>>());

    let categories: Value = gateway
        .client
        .get(gateway.url("/api/getAllCategories/1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(categories.as_array().unwrap().len(), usize::try_from(WRITES).unwrap());
}

#[tokio::test]
async fn test_rejected_local_checks_do_not_consume_nonces() {
    let gateway = TestGateway::start().await;

    // Fails validation: no name.
    let response = gateway
        .client
        .post(gateway.url("/api/addCategory/1"))
        .json(&json!({ "description": "Nameless" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = gateway
        .client
        .post(gateway.url("/api/addCategory/1"))
        .json(&json!({ "name": "Fruit" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(gateway.chain.accepted_nonces(), vec![0]);
}
