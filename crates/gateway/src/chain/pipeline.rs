//! Write pipeline.
//!
//! Executes one [`WriteIntent`] end to end:
//!
//! 1. authorize the claimed account against the signer
//! 2. validate the payload
//! 3. encode the call
//! 4. run the operation's existence pre-check (read-only)
//! 5. take the signer's nonce lane, fetch the nonce, quote gas, sign, broadcast
//! 6. release the lane and wait for the receipt
//!
//! Steps 1 to 3 never touch the network. A failure aborts everything after
//! it; nothing is written locally, so there is nothing to roll back. Success
//! is only reported once a receipt exists.

use std::sync::Arc;

use alloy::primitives::{Address, Bytes, TxHash, TxKind};
use storechain_core::{ProductId, StoreId};
use tracing::{Span, debug, info, instrument, warn};

use super::client::{ChainRpc, Receipt};
use super::encoder::CallEncoder;
use super::error::{ChainError, EncodingError, PipelineError, ReadError};
use super::gas::GasPolicy;
use super::intent::WriteIntent;
use super::nonce::AccountLanes;
use super::operations::{InterfaceVersion, OperationDescriptor, Precheck};
use super::poller::{ConfirmationPolicy, wait_for_receipt};
use super::reader::ReadPath;
use super::signer::{TransactionRequest, TransactionSigner};

/// Outcome of a confirmed write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReceipt {
    pub tx_hash: TxHash,
    pub nonce: u64,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    /// Set for contract deployments.
    pub contract_address: Option<Address>,
    pub message: &'static str,
}

/// Static settings of a pipeline.
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    pub chain_id: u64,
    pub contract: Address,
    pub interface_version: InterfaceVersion,
    pub gas: GasPolicy,
    pub confirmation: ConfirmationPolicy,
}

/// Turns write intents into confirmed transactions from one signing account.
#[derive(Clone)]
pub struct WritePipeline {
    chain: Arc<dyn ChainRpc>,
    signer: TransactionSigner,
    reader: ReadPath,
    encoder: CallEncoder,
    lanes: AccountLanes,
    options: PipelineOptions,
}

impl std::fmt::Debug for WritePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WritePipeline")
            .field("signer", &self.signer)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Pre-checks only read; a missing entity there is a failed precondition.
fn precheck_failure(err: ReadError) -> PipelineError {
    match err {
        ReadError::Query(err @ ChainError::Network(_)) => PipelineError::Network(err),
        ReadError::Query(err) => PipelineError::Precheck(err),
        ReadError::NotFound(entity) => {
            PipelineError::Precondition(entity.not_found_message().to_string())
        }
    }
}

impl WritePipeline {
    #[must_use]
    pub fn new(
        chain: Arc<dyn ChainRpc>,
        signer: TransactionSigner,
        options: PipelineOptions,
    ) -> Self {
        Self {
            reader: ReadPath::new(Arc::clone(&chain), options.contract),
            encoder: CallEncoder::new(options.interface_version),
            lanes: AccountLanes::new(),
            chain,
            signer,
            options,
        }
    }

    /// Read path sharing this pipeline's chain client and contract.
    #[must_use]
    pub const fn reader(&self) -> &ReadPath {
        &self.reader
    }

    #[must_use]
    pub fn signer_address(&self) -> Address {
        self.signer.address()
    }

    #[must_use]
    pub const fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Check that `claimed` is the signing account.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Unauthorized` otherwise.
    pub fn authorize(&self, claimed: &str) -> Result<Address, PipelineError> {
        if self.signer.is_account(claimed) {
            Ok(self.signer.address())
        } else {
            Err(PipelineError::Unauthorized {
                claimed: claimed.to_string(),
            })
        }
    }

    /// Execute `intent` and wait for its receipt.
    ///
    /// # Errors
    ///
    /// Returns the [`PipelineError`] of the first step that failed.
    #[instrument(
        skip(self, intent),
        fields(operation = %intent.operation, keys = ?intent.keys, tx_hash = tracing::field::Empty)
    )]
    pub async fn execute(&self, intent: WriteIntent) -> Result<WriteReceipt, PipelineError> {
        let descriptor = intent.operation.descriptor(self.encoder.version());

        if let Some(claimed) = &intent.claimed_account {
            self.authorize(claimed)?;
        }
        intent.payload.validate()?;
        let input = self.encoder.encode(intent.operation, &intent.args()?)?;

        self.precheck(descriptor, &intent).await?;

        let mut receipt = self
            .submit(TxKind::Call(self.options.contract), input)
            .await?;
        receipt.message = descriptor.success_message;
        info!(tx_hash = %receipt.tx_hash, block = ?receipt.block_number, "write confirmed");
        Ok(receipt)
    }

    async fn precheck(
        &self,
        descriptor: OperationDescriptor,
        intent: &WriteIntent,
    ) -> Result<(), PipelineError> {
        match descriptor.precheck {
            Precheck::None => Ok(()),
            Precheck::StoreAbsent => {
                let owner = self.signer.address();
                if self.reader.has_store(owner).await.map_err(precheck_failure)? {
                    return Err(PipelineError::Conflict("Store already created"));
                }
                Ok(())
            }
            Precheck::StorePresent => {
                let owner = self.signer.address();
                if !self.reader.has_store(owner).await.map_err(precheck_failure)? {
                    let user = intent
                        .claimed_account
                        .clone()
                        .unwrap_or_else(|| owner.to_checksum(None));
                    return Err(PipelineError::Precondition(format!(
                        "There is no store for user: {user}"
                    )));
                }
                Ok(())
            }
            Precheck::ProductAbsent => {
                let [store, product, ..] = intent.keys[..] else {
                    return Err(EncodingError::MissingField {
                        operation: descriptor.name,
                        field: "productId",
                    }
                    .into());
                };
                let exists = self
                    .reader
                    .product_exists(StoreId::new(store), ProductId::new(product))
                    .await
                    .map_err(precheck_failure)?;
                if exists {
                    return Err(PipelineError::Conflict("Product already exists"));
                }
                Ok(())
            }
        }
    }

    /// Deploy contract `bytecode` from the signing account.
    ///
    /// # Errors
    ///
    /// As [`WritePipeline::execute`] from the nonce step on.
    #[instrument(skip(self, bytecode), fields(bytecode_len = bytecode.len(), tx_hash = tracing::field::Empty))]
    pub async fn deploy(&self, bytecode: Bytes) -> Result<WriteReceipt, PipelineError> {
        let mut receipt = self.submit(TxKind::Create, bytecode).await?;
        receipt.message = "Contract deployed successfully";
        info!(contract = ?receipt.contract_address, "contract deployed");
        Ok(receipt)
    }

    /// Nonce through confirmation for one transaction.
    async fn submit(&self, to: TxKind, input: Bytes) -> Result<WriteReceipt, PipelineError> {
        let from = self.signer.address();

        // The lane is held until the node has the transaction, so the next
        // nonce lookup from this account already counts it as pending.
        let (nonce, tx_hash) = {
            let _lane = self.lanes.acquire(from).await;

            let nonce = self
                .chain
                .nonce(from)
                .await
                .map_err(PipelineError::from_chain)?;
            let gas = self
                .options
                .gas
                .quote(self.chain.as_ref(), from, to, &input)
                .await
                .map_err(PipelineError::from_chain)?;
            debug!(nonce, gas_limit = gas.gas_limit, gas_price = gas.gas_price, "transaction priced");

            let signed = self.signer.sign(&TransactionRequest {
                chain_id: self.options.chain_id,
                nonce,
                to,
                input,
                gas_limit: gas.gas_limit,
                gas_price: gas.gas_price,
            })?;

            let tx_hash = self
                .chain
                .send_raw_transaction(&signed)
                .await
                .map_err(PipelineError::from_chain)?;
            if tx_hash != signed.hash {
                warn!(node = %tx_hash, local = %signed.hash, "node reported a different transaction hash");
            }
            (nonce, tx_hash)
        };

        Span::current().record("tx_hash", tracing::field::display(tx_hash));
        info!(nonce, "transaction broadcast");

        let receipt: Receipt =
            wait_for_receipt(self.chain.as_ref(), tx_hash, &self.options.confirmation)
                .await
                .map_err(|failure| {
                    warn!(error = %failure, "transaction outcome unknown, may still confirm");
                    PipelineError::from_poll(tx_hash, failure)
                })?;

        if !receipt.success {
            return Err(PipelineError::Reverted { tx_hash });
        }

        Ok(WriteReceipt {
            tx_hash,
            nonce,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            contract_address: receipt.contract_address,
            message: "",
        })
    }
}
