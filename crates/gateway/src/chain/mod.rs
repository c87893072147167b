//! On-chain persistence for storefront state.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ WriteIntent  │──▶│ WritePipeline│──▶│  ChainRpc    │──▶ JSON-RPC node
//! └──────────────┘   │  encoder     │   │ (RpcChain-   │
//!                    │  nonce lanes │   │  Client)     │
//!                    │  gas policy  │   └──────────────┘
//!                    │  signer      │          ▲
//!                    │  poller      │          │
//!                    └──────────────┘   ┌──────────────┐
//!                                       │  ReadPath    │◀── queries
//!                                       └──────────────┘
//! ```
//!
//! The chain is the only store. Nothing here caches contract state or nonces.

pub mod client;
pub mod contract;
pub mod encoder;
pub mod error;
pub mod gas;
pub mod intent;
pub mod nonce;
pub mod operations;
pub mod pipeline;
pub mod poller;
pub mod reader;
pub mod signer;

pub use client::{ChainRpc, Receipt, RpcChainClient};
pub use encoder::CallEncoder;
pub use error::{
    ChainError, EncodingError, Entity, PipelineError, PollFailure, ReadError, SignerError,
};
pub use gas::{GasLimitPolicy, GasPolicy, GasPricePolicy, GasQuote};
pub use intent::{Payload, WriteIntent};
pub use nonce::AccountLanes;
pub use operations::{InterfaceVersion, Precheck, WriteOperation};
pub use pipeline::{PipelineOptions, WritePipeline, WriteReceipt};
pub use poller::{ConfirmationPolicy, wait_for_receipt};
pub use reader::ReadPath;
pub use signer::{SignedTransaction, TransactionRequest, TransactionSigner};
