//! Integration test harness for Storechain.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p storechain-integration-tests
//! ```
//!
//! No node is needed: [`MockChain`] stands in for the JSON-RPC endpoint. It
//! decodes the raw signed transactions the gateway broadcasts, recovers the
//! sender, checks the nonce and applies the contract call to in-memory
//! state, so a test exercises the real encoder, signer and poller end to end.
//!
//! [`TestGateway`] serves the real router on an ephemeral port.
//!
//! # Test Categories
//!
//! - `storefront_api` - HTTP round trips for every entity
//! - `nonce_sequencing` - concurrent writes from one account
//! - `confirmation` - receipt timeouts and reverted transactions

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

mod mock_chain;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::Client;
use storechain_gateway::chain::{TransactionSigner, WritePipeline};
use storechain_gateway::config::GatewayConfig;
use storechain_gateway::state::AppState;

pub use mock_chain::MockChain;

/// Well-known development key. Never funded outside local chains.
pub const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Address of [`DEV_KEY`].
pub const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

/// Contract address the gateway is pointed at.
pub const CONTRACT_ADDRESS: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

pub const CHAIN_ID: u64 = 31_337;

/// A gateway running on a local port against a [`MockChain`].
pub struct TestGateway {
    pub addr: SocketAddr,
    pub client: Client,
    pub chain: Arc<MockChain>,
}

impl TestGateway {
    /// Start a gateway with fast confirmation polling.
    pub async fn start() -> Self {
        Self::start_with(MockChain::new(CHAIN_ID), &[]).await
    }

    /// Start a gateway on `chain`, with `overrides` applied on top of the
    /// test environment.
    pub async fn start_with(chain: MockChain, overrides: &[(&str, &str)]) -> Self {
        let mut vars: HashMap<String, String> = [
            ("GATEWAY_PORT", "0"),
            ("CHAIN_RPC_URL", "http://127.0.0.1:8545"),
            ("CHAIN_ID", "31337"),
            ("STOREFRONT_CONTRACT_ADDRESS", CONTRACT_ADDRESS),
            ("SIGNER_PRIVATE_KEY", DEV_KEY),
            ("RECEIPT_POLL_INTERVAL_MS", "5"),
            ("RECEIPT_POLL_MAX_INTERVAL_MS", "20"),
            ("RECEIPT_TIMEOUT_SECS", "2"),
            ("RECEIPT_MAX_ATTEMPTS", "200"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        for (key, value) in overrides {
            vars.insert((*key).to_string(), (*value).to_string());
        }

        let config = GatewayConfig::from_vars(|key| vars.get(key).cloned()).unwrap();
        let signer = TransactionSigner::from_secret(&config.signer_key).unwrap();

        let chain = Arc::new(chain);
        let pipeline = WritePipeline::new(chain.clone(), signer, config.pipeline_options());
        let app = storechain_gateway::app(AppState::new(config.clone(), pipeline));

        let listener = tokio::net::TcpListener::bind((config.host, 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            chain,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}
