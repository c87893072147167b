//! Per-account serialization of nonce assignment.
//!
//! Two writes from the same account must not read the same nonce. Each
//! account gets a lane (an async mutex); a write holds its lane from the
//! nonce lookup until the node has accepted the broadcast, so the next
//! writer's lookup already sees the previous transaction as pending.
//!
//! Nonces are never cached: every holder of the lane asks the node again.

use std::sync::Arc;

use alloy::primitives::Address;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

/// Exclusive hold on one account's lane. Dropping it releases the lane.
#[derive(Debug)]
pub struct LaneGuard {
    address: Address,
    _guard: OwnedMutexGuard<()>,
}

impl LaneGuard {
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }
}

impl Drop for LaneGuard {
    fn drop(&mut self) {
        debug!(address = %self.address, "released nonce lane");
    }
}

/// One async mutex per signing account.
#[derive(Debug, Clone, Default)]
pub struct AccountLanes {
    lanes: Arc<DashMap<Address, Arc<Mutex<()>>>>,
}

impl AccountLanes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive use of `address`'s lane.
    pub async fn acquire(&self, address: Address) -> LaneGuard {
        // Clone the Arc out so the map shard is not locked across the await.
        let lane = {
            let entry = self
                .lanes
                .entry(address)
                .or_insert_with(|| Arc::new(Mutex::new(())));
            Arc::clone(entry.value())
        };

        let guard = lane.lock_owned().await;
        debug!(%address, "acquired nonce lane");
        LaneGuard {
            address,
            _guard: guard,
        }
    }
}
