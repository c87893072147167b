//! Transaction signing.
//!
//! The signing key is loaded once from configuration and never leaves this
//! module: it is not logged, not part of any `Debug` output, and not
//! serialized. Signing is a pure function of the request and the key.

use alloy::consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::network::TxSignerSync;
use alloy::primitives::{Address, B256, Bytes, TxHash, TxKind, U256};
use alloy::signers::local::PrivateKeySigner;
use secrecy::{ExposeSecret, SecretString};

use super::error::SignerError;

/// Everything needed to build one transaction. Immutable once signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub chain_id: u64,
    pub nonce: u64,
    pub to: TxKind,
    pub input: Bytes,
    pub gas_limit: u64,
    /// Gas price in wei.
    pub gas_price: u128,
}

/// A signed, EIP-2718 encoded transaction and its hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub raw: Bytes,
    pub hash: TxHash,
    pub nonce: u64,
}

/// Holds the gateway's account key.
#[derive(Clone)]
pub struct TransactionSigner {
    signer: PrivateKeySigner,
}

impl TransactionSigner {
    /// Load a signer from a hex-encoded private key (with or without `0x`).
    ///
    /// # Errors
    ///
    /// Returns `SignerError::InvalidKey` if the key is not a valid secp256k1 scalar.
    pub fn from_secret(key: &SecretString) -> Result<Self, SignerError> {
        let signer = key
            .expose_secret()
            .trim()
            .parse::<PrivateKeySigner>()
            .map_err(|_| SignerError::InvalidKey)?;
        Ok(Self { signer })
    }

    /// Load a signer from raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns `SignerError::InvalidKey` if the bytes are not a valid key.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, SignerError> {
        let signer =
            PrivateKeySigner::from_bytes(&B256::from(*bytes)).map_err(|_| SignerError::InvalidKey)?;
        Ok(Self { signer })
    }

    /// The account address derived from the key.
    #[must_use]
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Whether `claimed` names this signer's account.
    ///
    /// Hex comparison is case-insensitive and the `0x` prefix is optional.
    #[must_use]
    pub fn is_account(&self, claimed: &str) -> bool {
        let claimed = claimed.trim();
        let claimed = claimed
            .strip_prefix("0x")
            .or_else(|| claimed.strip_prefix("0X"))
            .unwrap_or(claimed);
        let own = self.address();
        claimed.eq_ignore_ascii_case(&alloy::hex::encode(own))
    }

    /// Sign `request` as a legacy transaction with EIP-155 replay protection.
    ///
    /// # Errors
    ///
    /// Returns `SignerError::Signing` if the signature cannot be produced.
    pub fn sign(&self, request: &TransactionRequest) -> Result<SignedTransaction, SignerError> {
        let mut tx = TxLegacy {
            chain_id: Some(request.chain_id),
            nonce: request.nonce,
            gas_price: request.gas_price,
            gas_limit: request.gas_limit,
            to: request.to,
            value: U256::ZERO,
            input: request.input.clone(),
        };

        let signature = self
            .signer
            .sign_transaction_sync(&mut tx)
            .map_err(|e| SignerError::Signing(e.to_string()))?;
        let signed = tx.into_signed(signature);
        let hash = *signed.hash();
        let raw = TxEnvelope::from(signed).encoded_2718();

        Ok(SignedTransaction {
            raw: Bytes::from(raw),
            hash,
            nonce: request.nonce,
        })
    }

    /// Hex-encoded private key, for writing freshly generated keys to disk.
    #[must_use]
    pub fn export_secret(&self) -> SecretString {
        SecretString::from(alloy::hex::encode_prefixed(self.signer.to_bytes()))
    }
}

impl std::fmt::Debug for TransactionSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionSigner")
            .field("address", &self.address())
            .field("key", &"[REDACTED]")
            .finish()
    }
}
