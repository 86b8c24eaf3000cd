use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::block::OracleStatus;
use crate::sender::{Sender, SubmitError, ZERO_VALUE};
use crate::store::BlockStore;

/// Precision used to express `base_fee_diff_ppm`. See spec.md §4.4.
pub const PPM_PRECISION: u64 = 1_000_000;

fn encode_set_base_fee(base_fee: u64) -> Vec<u8> {
    // setBaseFee(uint256): 4-byte selector + left-padded 32-byte value.
    // The selector itself is out of scope (it depends on the ABI of the
    // opposite chain's oracle contract, which this crate never calls
    // directly); the encoding shape is kept for parity with the on-chain
    // call spec.md §4.4 describes.
    let mut data = vec![0u8; 32];
    data[24..32].copy_from_slice(&base_fee.to_be_bytes());
    data
}

/// Pushes the source chain's observed base fee to the opposite chain's gas
/// oracle contract, gated by a hysteresis policy so that not every block
/// triggers a destination-chain transaction. See spec.md §4.4 and the
/// `ProcessGasPriceOracle` hysteresis predicate in the original source.
pub struct GasOracleUpdater {
    store: Arc<dyn BlockStore>,
    sender: Arc<dyn Sender>,
    gas_oracle_contract: [u8; 20],
    min_base_fee: u64,
    base_fee_diff_ppm: u64,
    /// 0 means "never pushed". Mutated only by this updater's own task, so
    /// no locking is required — see spec.md §5.
    last_pushed_base_fee: AtomicU64,
}

impl GasOracleUpdater {
    pub fn new(
        store: Arc<dyn BlockStore>,
        sender: Arc<dyn Sender>,
        gas_oracle_contract: [u8; 20],
        min_base_fee: u64,
        base_fee_diff_ppm: u64,
    ) -> Self {
        Self {
            store,
            sender,
            gas_oracle_contract,
            min_base_fee,
            base_fee_diff_ppm,
            last_pushed_base_fee: AtomicU64::new(0),
        }
    }

    /// Whether `base_fee` should be pushed given the current
    /// `last_pushed_base_fee`. The first push is unconditional with respect
    /// to `min_base_fee` — preserved as-specified per spec.md §9's Open
    /// Questions note, not corrected.
    pub fn should_push(&self, base_fee: u64) -> bool {
        let last = self.last_pushed_base_fee.load(Ordering::Relaxed);
        if last == 0 {
            return true;
        }
        let expected_delta = last * self.base_fee_diff_ppm / PPM_PRECISION;
        base_fee >= self.min_base_fee
            && (base_fee >= last + expected_delta || base_fee <= last.saturating_sub(expected_delta))
    }

    /// One invocation of the updater: reads the latest observed block,
    /// decides whether to push its base fee, and submits via the oracle
    /// sender if so. See spec.md §4.4.
    #[tracing::instrument(skip(self))]
    pub async fn tick(&self) {
        let height = match self.store.latest_height().await {
            Ok(h) => h,
            Err(e) => {
                warn!(error = %e, "failed to fetch latest source block height");
                return;
            }
        };

        let block = match self.store.get_by_number(height).await {
            Ok(Some(b)) => b,
            Ok(None) => return,
            Err(e) => {
                warn!(error = %e, "failed to fetch source block, abandoning this tick");
                return;
            }
        };

        if block.oracle_status != OracleStatus::OraclePending {
            return;
        }

        if !self.should_push(block.base_fee) {
            return;
        }

        let data = encode_set_base_fee(block.base_fee);
        let submit_result = self
            .sender
            .submit(block.hash.0, self.gas_oracle_contract, ZERO_VALUE, data, 0)
            .await;

        match submit_result {
            Ok(tx_hash) => {
                if let Err(e) = self.store.set_oracle_importing(block.hash, tx_hash).await {
                    error!(block_hash = %block.hash, error = %e, "failed to record oracle import");
                    return;
                }
                self.last_pushed_base_fee
                    .store(block.base_fee, Ordering::Relaxed);
                info!(
                    block_hash = %block.hash,
                    base_fee = block.base_fee,
                    tx_hash = %tx_hash,
                    "pushed base fee to gas oracle"
                );
            }
            Err(SubmitError::NoAvailableAccount) | Err(SubmitError::PendingQueueFull) => {
                // Expected backpressure, silent return.
            }
            Err(e) => {
                error!(block_hash = %block.hash, error = %e, "failed to push base fee");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryBlockStore, MockSender};

    fn updater(min_base_fee: u64, diff_ppm: u64) -> GasOracleUpdater {
        GasOracleUpdater::new(
            Arc::new(InMemoryBlockStore::new()),
            Arc::new(MockSender::new()),
            [0u8; 20],
            min_base_fee,
            diff_ppm,
        )
    }

    #[test]
    fn first_push_is_unconstrained_by_min_base_fee() {
        let u = updater(1_000_000, 100_000);
        assert!(u.should_push(1));
    }

    #[test]
    fn hysteresis_suppresses_small_deltas_s5() {
        // S5: min_base_fee = 10, diff_ppm = 100_000 (10%). Fees 100, 105, 112, 200.
        let u = updater(10, 100_000);
        let mut pushed = Vec::new();
        for fee in [100u64, 105, 112, 200] {
            if u.should_push(fee) {
                pushed.push(fee);
                u.last_pushed_base_fee.store(fee, Ordering::Relaxed);
            }
        }
        assert_eq!(pushed, vec![100, 112, 200]);
    }

    #[test]
    fn below_min_base_fee_never_pushes_after_first() {
        let u = updater(1000, 50_000);
        u.last_pushed_base_fee.store(1000, Ordering::Relaxed);
        assert!(!u.should_push(1));
    }
}
