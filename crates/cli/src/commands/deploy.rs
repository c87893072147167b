//! Contract deployment.
//!
//! # Usage
//!
//! ```bash
//! sc-cli deploy --artifact out/Storefront.json
//! ```
//!
//! The artifact is compiler output with a `bytecode` field, either a hex
//! string or an object with the hex under `object`. The transaction goes
//! through the same nonce, gas, signing and confirmation path as gateway
//! writes; `STOREFRONT_CONTRACT_ADDRESS` is not needed.

use std::path::Path;
use std::sync::Arc;

use alloy::primitives::{Address, Bytes};
use serde::Deserialize;
use storechain_gateway::chain::{RpcChainClient, TransactionSigner, WritePipeline};
use storechain_gateway::config::AccountConfig;

use super::CommandError;

#[derive(Deserialize)]
#[serde(untagged)]
enum BytecodeField {
    Hex(String),
    Object { object: String },
}

#[derive(Deserialize)]
struct Artifact {
    bytecode: BytecodeField,
}

/// Creation bytecode from an artifact's JSON text.
///
/// # Errors
///
/// Returns `CommandError::Artifact` if the JSON has no usable bytecode.
pub fn parse_artifact(json: &str) -> Result<Bytes, CommandError> {
    let artifact: Artifact =
        serde_json::from_str(json).map_err(|e| CommandError::Artifact(e.to_string()))?;
    let hex = match artifact.bytecode {
        BytecodeField::Hex(hex) | BytecodeField::Object { object: hex } => hex,
    };
    let bytecode: Bytes = hex
        .trim()
        .parse()
        .map_err(|e: alloy::hex::FromHexError| CommandError::Artifact(e.to_string()))?;
    if bytecode.is_empty() {
        return Err(CommandError::Artifact("bytecode is empty".to_string()));
    }
    Ok(bytecode)
}

/// `deploy --artifact <json>`
///
/// # Errors
///
/// Returns an error if the artifact cannot be read, or if the deployment
/// fails or is not confirmed.
pub async fn deploy(artifact: &Path) -> Result<(), CommandError> {
    let json = std::fs::read_to_string(artifact).map_err(|source| CommandError::Io {
        path: artifact.to_path_buf(),
        source,
    })?;
    let bytecode = parse_artifact(&json)?;

    let config = AccountConfig::from_env()?;
    let signer = TransactionSigner::from_secret(&config.signer_key)?;
    tracing::info!(account = %signer.address(), chain_id = config.chain_id, "Deploying contract");

    let chain = Arc::new(RpcChainClient::new(config.rpc_url.clone()));
    let pipeline = WritePipeline::new(chain, signer, config.pipeline_options(Address::ZERO));
    let receipt = pipeline.deploy(bytecode).await?;

    tracing::info!(tx_hash = %receipt.tx_hash, "{}", receipt.message);

    #[allow(clippy::print_stdout)]
    {
        match receipt.contract_address {
            Some(address) => println!("{address}"),
            None => println!("{}", receipt.tx_hash),
        }
    }
    Ok(())
}
