//! Receipt lookup, for re-checking writes that timed out.
//!
//! # Usage
//!
//! ```bash
//! # One lookup
//! sc-cli receipt 0x5c50...
//!
//! # Poll with the default confirmation budget
//! sc-cli receipt 0x5c50... --wait
//! ```

use alloy::primitives::TxHash;
use serde_json::{Value, json};
use storechain_gateway::chain::{
    ChainRpc, ConfirmationPolicy, Receipt, RpcChainClient, wait_for_receipt,
};
use url::Url;

use super::CommandError;

fn receipt_json(tx_hash: TxHash, receipt: Option<&Receipt>) -> Value {
    match receipt {
        None => json!({ "transactionHash": tx_hash, "status": "pending" }),
        Some(receipt) => json!({
            "transactionHash": receipt.tx_hash,
            "status": if receipt.success { "success" } else { "reverted" },
            "blockNumber": receipt.block_number,
            "gasUsed": receipt.gas_used,
            "contractAddress": receipt.contract_address,
        }),
    }
}

/// `receipt <hash> [--wait]`
///
/// # Errors
///
/// Returns an error if the node cannot be queried, or with `--wait` if no
/// receipt shows up within the confirmation budget.
pub async fn show(rpc_url: Url, tx_hash: TxHash, wait: bool) -> Result<(), CommandError> {
    let chain = RpcChainClient::new(rpc_url);

    let receipt = if wait {
        Some(wait_for_receipt(&chain, tx_hash, &ConfirmationPolicy::default()).await?)
    } else {
        chain.receipt(tx_hash).await?
    };

    #[allow(clippy::print_stdout)]
    {
        println!("{:#}", receipt_json(tx_hash, receipt.as_ref()));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_receipt() {
        let hash = TxHash::repeat_byte(1);
        let value = receipt_json(hash, None);
        assert_eq!(value["status"], "pending");
        assert!(value.get("blockNumber").is_none());
    }

    #[test]
    fn test_reverted_receipt() {
        let hash = TxHash::repeat_byte(2);
        let receipt = Receipt {
            tx_hash: hash,
            block_number: Some(7),
            gas_used: 50_000,
            contract_address: None,
            success: false,
        };
        let value = receipt_json(hash, Some(&receipt));
        assert_eq!(value["status"], "reverted");
        assert_eq!(value["blockNumber"], 7);
        assert!(value["contractAddress"].is_null());
    }
}
