//! JSON-RPC chain client.
//!
//! [`ChainRpc`] is the seam between the write pipeline and the network: the
//! production implementation talks to a node over HTTP, tests substitute an
//! in-memory chain. Every method is a single request with no retries; retry
//! policy belongs to the caller.

use alloy::network::{Ethereum, ReceiptResponse};
use alloy::primitives::{Address, Bytes, TxHash, TxKind};
use alloy::providers::{Provider, RootProvider};
use alloy::rpc::types::{TransactionInput, TransactionRequest};
use alloy::transports::{RpcError, TransportError};
use async_trait::async_trait;
use tracing::instrument;
use url::Url;

use super::error::ChainError;
use super::signer::SignedTransaction;

/// Confirmation record for an included transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    /// Address of the created contract, for deployments.
    pub contract_address: Option<Address>,
    /// Whether execution succeeded.
    pub success: bool,
}

/// Operations the gateway needs from a chain node.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Next sequence number for `address`, counting transactions still in the mempool.
    async fn nonce(&self, address: Address) -> Result<u64, ChainError>;

    /// Current network gas price in wei.
    async fn gas_price(&self) -> Result<u128, ChainError>;

    /// Gas the node expects `input` sent from `from` to `to` to consume.
    async fn estimate_gas(&self, from: Address, to: TxKind, input: &Bytes)
    -> Result<u64, ChainError>;

    /// Read-only call against current state.
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, ChainError>;

    /// Submit a signed transaction and return its hash.
    async fn send_raw_transaction(&self, tx: &SignedTransaction) -> Result<TxHash, ChainError>;

    /// Single receipt lookup; `None` until the transaction is included.
    async fn receipt(&self, tx_hash: TxHash) -> Result<Option<Receipt>, ChainError>;

    async fn chain_id(&self) -> Result<u64, ChainError>;
}

/// Split transport failures from errors the node reported.
fn classify(err: TransportError) -> ChainError {
    match err {
        RpcError::ErrorResp(payload) => ChainError::Rejected(payload.message.to_string()),
        RpcError::DeserError { err, .. } => ChainError::Decode(err.to_string()),
        RpcError::NullResp => ChainError::Decode("null response".to_string()),
        other => ChainError::Network(other.to_string()),
    }
}

/// [`ChainRpc`] over an HTTP JSON-RPC endpoint.
#[derive(Clone)]
pub struct RpcChainClient {
    provider: RootProvider<Ethereum>,
    endpoint: Url,
}

impl RpcChainClient {
    #[must_use]
    pub fn new(endpoint: Url) -> Self {
        let provider = RootProvider::<Ethereum>::new_http(endpoint.clone());
        Self { provider, endpoint }
    }
}

impl std::fmt::Debug for RpcChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcChainClient")
            .field("endpoint", &self.endpoint.host_str())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ChainRpc for RpcChainClient {
    #[instrument(skip(self), fields(%address))]
    async fn nonce(&self, address: Address) -> Result<u64, ChainError> {
        self.provider
            .get_transaction_count(address)
            .pending()
            .await
            .map_err(classify)
    }

    #[instrument(skip(self))]
    async fn gas_price(&self) -> Result<u128, ChainError> {
        self.provider.get_gas_price().await.map_err(classify)
    }

    #[instrument(skip(self, input), fields(%from, input_len = input.len()))]
    async fn estimate_gas(
        &self,
        from: Address,
        to: TxKind,
        input: &Bytes,
    ) -> Result<u64, ChainError> {
        let request = TransactionRequest {
            from: Some(from),
            to: Some(to),
            input: TransactionInput::new(input.clone()),
            ..Default::default()
        };
        self.provider.estimate_gas(request).await.map_err(classify)
    }

    #[instrument(skip(self, input), fields(%to))]
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, ChainError> {
        let request = TransactionRequest {
            to: Some(TxKind::Call(to)),
            input: TransactionInput::new(input),
            ..Default::default()
        };
        self.provider.call(request).await.map_err(classify)
    }

    #[instrument(skip(self, tx), fields(tx_hash = %tx.hash, nonce = tx.nonce))]
    async fn send_raw_transaction(&self, tx: &SignedTransaction) -> Result<TxHash, ChainError> {
        let pending = self
            .provider
            .send_raw_transaction(&tx.raw)
            .await
            .map_err(classify)?;
        Ok(*pending.tx_hash())
    }

    #[instrument(skip(self), fields(%tx_hash))]
    async fn receipt(&self, tx_hash: TxHash) -> Result<Option<Receipt>, ChainError> {
        let receipt = self
            .provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(classify)?;

        Ok(receipt.map(|r| Receipt {
            tx_hash: r.transaction_hash(),
            block_number: r.block_number(),
            gas_used: r.gas_used(),
            contract_address: r.contract_address(),
            success: r.status(),
        }))
    }

    #[instrument(skip(self))]
    async fn chain_id(&self) -> Result<u64, ChainError> {
        self.provider.get_chain_id().await.map_err(classify)
    }
}
