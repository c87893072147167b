//! Error types for the chain layer.
//!
//! Each stage of a write has its own error enum; [`PipelineError`] is the
//! taxonomy callers see, and [`ReadError`] covers queries.

use alloy::primitives::TxHash;
use thiserror::Error;

use storechain_core::MetadataError;

/// Errors from the JSON-RPC endpoint.
#[derive(Debug, Clone, Error)]
pub enum ChainError {
    /// The endpoint could not be reached or the transport failed.
    #[error("network error: {0}")]
    Network(String),

    /// The node answered with an error (nonce too low, insufficient funds,
    /// execution reverted, malformed call).
    #[error("rejected by node: {0}")]
    Rejected(String),

    /// The node answered but the response could not be decoded.
    #[error("undecodable response: {0}")]
    Decode(String),
}

impl ChainError {
    /// Whether repeating the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Errors from transaction signing.
#[derive(Debug, Error)]
pub enum SignerError {
    /// The configured key is not a valid secp256k1 private key.
    #[error("invalid signing key")]
    InvalidKey,

    #[error("signing failed: {0}")]
    Signing(String),
}

/// Errors from call encoding. Always raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("{operation} takes {expected} arguments, got {actual}")]
    Arity {
        operation: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{operation} argument {index} must be {expected}")]
    Type {
        operation: &'static str,
        index: usize,
        expected: String,
    },

    #[error("{operation} is missing {field}")]
    MissingField {
        operation: &'static str,
        field: &'static str,
    },

    #[error("abi encoding failed: {0}")]
    Abi(String),
}

/// Why the confirmation poller gave up.
#[derive(Debug, Clone, Error)]
pub enum PollFailure {
    /// No receipt within the wait budget.
    #[error("no receipt after {attempts} attempts in {elapsed_ms}ms")]
    Timeout { attempts: u32, elapsed_ms: u128 },

    /// Too many transport errors while polling.
    #[error("receipt lookup kept failing: {0}")]
    Transport(ChainError),
}

/// Failure kinds of a write, in pipeline order.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("account {claimed} is not the signing account")]
    Unauthorized { claimed: String },

    #[error("invalid payload: {0}")]
    Validation(#[from] MetadataError),

    #[error("{0}")]
    Conflict(&'static str),

    /// A required entity is missing, e.g. updating a store that was never created.
    #[error("{0}")]
    Precondition(String),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// The read-only existence check could not be answered; nothing was broadcast.
    #[error("existence check failed: {0}")]
    Precheck(ChainError),

    #[error("signer error: {0}")]
    Signer(#[from] SignerError),

    /// Transient failure; nothing was broadcast.
    #[error("network error: {0}")]
    Network(ChainError),

    /// The node refused the transaction.
    #[error("transaction rejected: {0}")]
    Rejected(ChainError),

    /// Included in a block but execution failed.
    #[error("transaction {tx_hash} reverted")]
    Reverted { tx_hash: TxHash },

    /// Broadcast, but no receipt within the budget. The transaction may still confirm.
    #[error("transaction {tx_hash} not confirmed: {failure}")]
    ConfirmationTimeout { tx_hash: TxHash, failure: PollFailure },

    /// Broadcast, but receipt lookups kept failing. The transaction may still confirm.
    #[error("transaction {tx_hash} confirmation failed: {failure}")]
    Confirmation { tx_hash: TxHash, failure: PollFailure },
}

impl PipelineError {
    /// Map a chain error raised before broadcast completed.
    pub(crate) fn from_chain(err: ChainError) -> Self {
        match err {
            ChainError::Network(_) => Self::Network(err),
            ChainError::Rejected(_) | ChainError::Decode(_) => Self::Rejected(err),
        }
    }

    /// Map a poller outcome for a broadcast transaction.
    pub(crate) fn from_poll(tx_hash: TxHash, failure: PollFailure) -> Self {
        match failure {
            PollFailure::Timeout { .. } => Self::ConfirmationTimeout { tx_hash, failure },
            PollFailure::Transport(_) => Self::Confirmation { tx_hash, failure },
        }
    }

    /// Hash of the broadcast transaction, when the failure happened after broadcast.
    #[must_use]
    pub const fn tx_hash(&self) -> Option<TxHash> {
        match self {
            Self::Reverted { tx_hash }
            | Self::ConfirmationTimeout { tx_hash, .. }
            | Self::Confirmation { tx_hash, .. } => Some(*tx_hash),
            _ => None,
        }
    }
}

/// Entities the read path can report as missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Store,
    Product,
    Category,
    Customer,
    Order,
    OrderItem,
}

impl Entity {
    /// Message shown to API clients when the entity does not exist.
    #[must_use]
    pub const fn not_found_message(self) -> &'static str {
        match self {
            Self::Store => "Store doesn't exist",
            Self::Product => "Product not found",
            Self::Category => "Category not found",
            Self::Customer => "Customer not found",
            Self::Order => "Order not found",
            Self::OrderItem => "Order item not found",
        }
    }
}

/// Errors from the read path.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The contract returned its empty sentinel for this entity.
    #[error("{}", .0.not_found_message())]
    NotFound(Entity),

    #[error("query failed: {0}")]
    Query(ChainError),
}

impl From<ChainError> for ReadError {
    fn from(err: ChainError) -> Self {
        Self::Query(err)
    }
}
