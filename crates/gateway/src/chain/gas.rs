//! Gas limit and gas price policies.
//!
//! Both values are either fixed by configuration or taken from the network.
//! All arithmetic is on integer wei and gas units.

use alloy::primitives::{Address, Bytes, TxKind};
use storechain_core::TokenAmount;
use tracing::warn;

use super::client::ChainRpc;
use super::error::ChainError;

/// How the gas limit of a transaction is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasLimitPolicy {
    Fixed(u64),
    /// Ask the node, then add `buffer_percent` head-room. When estimation
    /// fails and `fallback` is set, that limit is used instead; otherwise the
    /// estimation error is returned.
    Estimate {
        buffer_percent: u32,
        fallback: Option<u64>,
    },
}

/// How the gas price of a transaction is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasPricePolicy {
    Fixed(TokenAmount),
    /// Current network price plus `premium_percent`.
    Network { premium_percent: u32 },
}

/// Gas limit and price actually used for a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasQuote {
    pub gas_limit: u64,
    pub gas_price: u128,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasPolicy {
    pub limit: GasLimitPolicy,
    pub price: GasPricePolicy,
}

impl Default for GasPolicy {
    /// 200k gas at 5 gwei.
    fn default() -> Self {
        Self {
            limit: GasLimitPolicy::Fixed(200_000),
            price: GasPricePolicy::Fixed(TokenAmount::new(5_000_000_000)),
        }
    }
}

fn add_percent_u64(value: u64, percent: u32) -> u64 {
    value.saturating_add(value.saturating_mul(u64::from(percent)) / 100)
}

fn add_percent_u128(value: u128, percent: u32) -> u128 {
    value.saturating_add(value.saturating_mul(u128::from(percent)) / 100)
}

impl GasPolicy {
    /// Resolve limit and price for a transaction from `from` carrying `input`.
    ///
    /// # Errors
    ///
    /// Returns the node's error if estimation or price lookup fails and no
    /// fallback applies.
    pub async fn quote(
        &self,
        chain: &dyn ChainRpc,
        from: Address,
        to: TxKind,
        input: &Bytes,
    ) -> Result<GasQuote, ChainError> {
        let gas_limit = match self.limit {
            GasLimitPolicy::Fixed(limit) => limit,
            GasLimitPolicy::Estimate {
                buffer_percent,
                fallback,
            } => match chain.estimate_gas(from, to, input).await {
                Ok(estimate) => add_percent_u64(estimate, buffer_percent),
                Err(err) => match fallback {
                    Some(limit) => {
                        warn!(error = %err, fallback = limit, "gas estimation failed, using fallback limit");
                        limit
                    }
                    None => return Err(err),
                },
            },
        };

        let gas_price = match self.price {
            GasPricePolicy::Fixed(price) => price.as_u128(),
            GasPricePolicy::Network { premium_percent } => {
                add_percent_u128(chain.gas_price().await?, premium_percent)
            }
        };

        Ok(GasQuote {
            gas_limit,
            gas_price,
        })
    }
}
