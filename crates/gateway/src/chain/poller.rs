//! Confirmation poller.
//!
//! Polls for a transaction receipt with exponential backoff until one of:
//! a receipt arrives (`Confirmed`), the attempt or time budget runs out
//! (`Failed(Timeout)`), or receipt lookups fail more often than allowed
//! (`Failed(Transport)`). "No receipt yet" and "lookup failed" are tracked
//! separately. A receipt, once seen, is final.

use std::time::Duration;

use alloy::primitives::TxHash;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use super::client::{ChainRpc, Receipt};
use super::error::PollFailure;

/// Budget and pacing for one confirmation wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub backoff_multiplier: u32,
    /// Total wall-clock budget.
    pub timeout: Duration,
    pub max_attempts: u32,
    /// Transport errors tolerated before giving up.
    pub max_transient_errors: u32,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(8),
            backoff_multiplier: 2,
            timeout: Duration::from_secs(120),
            max_attempts: 60,
            max_transient_errors: 3,
        }
    }
}

impl ConfirmationPolicy {
    fn next_interval(&self, current: Duration) -> Duration {
        current
            .saturating_mul(self.backoff_multiplier.max(1))
            .min(self.max_interval)
    }
}

/// Where a confirmation wait stands.
#[derive(Debug, Clone)]
pub enum PollState {
    Pending { attempts: u32 },
    Confirmed(Receipt),
    Failed(PollFailure),
}

/// Wait for `tx_hash` to be included, within `policy`'s budget.
///
/// # Errors
///
/// Returns `PollFailure::Timeout` when the budget runs out and
/// `PollFailure::Transport` when lookups keep failing.
#[instrument(skip(chain, policy), fields(%tx_hash))]
pub async fn wait_for_receipt(
    chain: &dyn ChainRpc,
    tx_hash: TxHash,
    policy: &ConfirmationPolicy,
) -> Result<Receipt, PollFailure> {
    let started = Instant::now();
    let deadline = started + policy.timeout;
    let mut interval = policy.initial_interval;
    let mut transient_errors = 0u32;
    let mut state = PollState::Pending { attempts: 0 };

    let timeout = |attempts: u32| PollFailure::Timeout {
        attempts,
        elapsed_ms: started.elapsed().as_millis(),
    };

    loop {
        let attempts = match state {
            PollState::Pending { attempts } => attempts + 1,
            PollState::Confirmed(receipt) => return Ok(receipt),
            PollState::Failed(failure) => return Err(failure),
        };

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            state = PollState::Failed(timeout(attempts - 1));
            continue;
        }

        state = match tokio::time::timeout(remaining, chain.receipt(tx_hash)).await {
            Ok(Ok(Some(receipt))) => {
                debug!(attempts, block = ?receipt.block_number, "receipt found");
                PollState::Confirmed(receipt)
            }
            Ok(Ok(None)) => {
                debug!(attempts, "receipt not available yet");
                PollState::Pending { attempts }
            }
            Ok(Err(err)) if err.is_retryable() && transient_errors < policy.max_transient_errors => {
                transient_errors += 1;
                warn!(attempts, transient_errors, error = %err, "receipt lookup failed, will retry");
                PollState::Pending { attempts }
            }
            Ok(Err(err)) => PollState::Failed(PollFailure::Transport(err)),
            Err(_) => PollState::Failed(timeout(attempts)),
        };

        if let PollState::Pending { attempts } = state {
            if attempts >= policy.max_attempts {
                state = PollState::Failed(timeout(attempts));
                continue;
            }
            let now = Instant::now();
            if now >= deadline {
                state = PollState::Failed(timeout(attempts));
                continue;
            }
            tokio::time::sleep(interval.min(deadline - now)).await;
            interval = policy.next_interval(interval);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    use alloy::primitives::{Address, Bytes, TxKind};
    use async_trait::async_trait;

    use super::*;
    use crate::chain::error::ChainError;
    use crate::chain::signer::SignedTransaction;

    /// Replays scripted receipt lookups, then answers "not yet" forever.
    #[derive(Default)]
    struct ScriptedReceipts {
        script: Mutex<VecDeque<Result<Option<Receipt>, ChainError>>>,
        lookups: AtomicU32,
    }

    impl ScriptedReceipts {
        fn new(script: Vec<Result<Option<Receipt>, ChainError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                lookups: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl ChainRpc for ScriptedReceipts {
        async fn nonce(&self, _: Address) -> Result<u64, ChainError> {
            unreachable!()
        }
        async fn gas_price(&self) -> Result<u128, ChainError> {
            unreachable!()
        }
        async fn estimate_gas(&self, _: Address, _: TxKind, _: &Bytes) -> Result<u64, ChainError> {
            unreachable!()
        }
        async fn call(&self, _: Address, _: Bytes) -> Result<Bytes, ChainError> {
            unreachable!()
        }
        async fn send_raw_transaction(&self, _: &SignedTransaction) -> Result<TxHash, ChainError> {
            unreachable!()
        }
        async fn receipt(&self, _: TxHash) -> Result<Option<Receipt>, ChainError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.script.lock().unwrap().pop_front().unwrap_or(Ok(None))
        }
        async fn chain_id(&self) -> Result<u64, ChainError> {
            unreachable!()
        }
    }

    fn receipt() -> Receipt {
        Receipt {
            tx_hash: TxHash::repeat_byte(1),
            block_number: Some(10),
            gas_used: 21_000,
            contract_address: None,
            success: true,
        }
    }

    fn policy() -> ConfirmationPolicy {
        ConfirmationPolicy {
            initial_interval: Duration::from_millis(100),
            max_interval: Duration::from_millis(400),
            backoff_multiplier: 2,
            timeout: Duration::from_secs(5),
            max_attempts: 10,
            max_transient_errors: 2,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirms_after_pending_polls() {
        let chain = ScriptedReceipts::new(vec![Ok(None), Ok(None), Ok(Some(receipt()))]);
        let found = wait_for_receipt(&chain, TxHash::repeat_byte(1), &policy())
            .await
            .unwrap();
        assert_eq!(found, receipt());
        assert_eq!(chain.lookups.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_confirming_hits_attempt_budget() {
        let chain = ScriptedReceipts::default();
        let started = Instant::now();
        let err = wait_for_receipt(&chain, TxHash::repeat_byte(1), &policy())
            .await
            .unwrap_err();

        assert!(matches!(err, PollFailure::Timeout { attempts: 10, .. }));
        assert_eq!(chain.lookups.load(Ordering::SeqCst), 10);
        // 100 + 200 + 400 * 7 ms of backoff between ten lookups.
        assert!(started.elapsed() <= Duration::from_millis(3_100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_confirming_hits_time_budget() {
        let chain = ScriptedReceipts::default();
        let policy = ConfirmationPolicy {
            max_attempts: u32::MAX,
            timeout: Duration::from_secs(2),
            ..policy()
        };
        let started = Instant::now();
        let err = wait_for_receipt(&chain, TxHash::repeat_byte(1), &policy)
            .await
            .unwrap_err();

        assert!(matches!(err, PollFailure::Timeout { .. }));
        assert!(started.elapsed() <= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_errors_are_retried_within_bound() {
        let chain = ScriptedReceipts::new(vec![
            Err(ChainError::Network("reset".into())),
            Err(ChainError::Network("reset".into())),
            Ok(Some(receipt())),
        ]);
        let found = wait_for_receipt(&chain, TxHash::repeat_byte(1), &policy()).await;
        assert!(found.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_too_many_transient_errors_fail() {
        let chain = ScriptedReceipts::new(vec![
            Err(ChainError::Network("reset".into())),
            Err(ChainError::Network("reset".into())),
            Err(ChainError::Network("reset".into())),
            Ok(Some(receipt())),
        ]);
        let err = wait_for_receipt(&chain, TxHash::repeat_byte(1), &policy())
            .await
            .unwrap_err();
        assert!(matches!(err, PollFailure::Transport(ChainError::Network(_))));
        assert_eq!(chain.lookups.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_node_rejection_is_not_retried() {
        let chain = ScriptedReceipts::new(vec![Err(ChainError::Rejected("bad hash".into()))]);
        let err = wait_for_receipt(&chain, TxHash::repeat_byte(1), &policy())
            .await
            .unwrap_err();
        assert!(matches!(err, PollFailure::Transport(ChainError::Rejected(_))));
        assert_eq!(chain.lookups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy = policy();
        let mut interval = policy.initial_interval;
        for _ in 0..10 {
            interval = policy.next_interval(interval);
        }
        assert_eq!(interval, policy.max_interval);
    }
}
