use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::StoreError;
use crate::message::MessageStatus;
use crate::metrics::RelayerMetrics;
use crate::revert::{classify, RevertOutcome};
use crate::sender::{Sender, SubmitError, ZERO_VALUE};
use crate::store::MessageStore;

/// Default number of pending messages fetched per scan pass. See spec.md
/// §6 (`scan_batch`).
pub const DEFAULT_SCAN_BATCH: usize = 100;

/// Drives pending messages from `Pending` to `Submitted` (or directly to a
/// terminal status on a classified revert). One invocation of
/// [`MessageRelayer::scan_pass`] is one scan pass, per spec.md §4.3.
pub struct MessageRelayer {
    store: Arc<dyn MessageStore>,
    sender: Arc<dyn Sender>,
    messenger_contract: [u8; 20],
    min_gas_limit: u64,
    scan_batch: usize,
    metrics: RelayerMetrics,
}

impl MessageRelayer {
    pub fn new(
        store: Arc<dyn MessageStore>,
        sender: Arc<dyn Sender>,
        messenger_contract: [u8; 20],
        min_gas_limit: u64,
        scan_batch: usize,
        metrics: RelayerMetrics,
    ) -> Self {
        Self {
            store,
            sender,
            messenger_contract,
            min_gas_limit,
            scan_batch,
            metrics,
        }
    }

    /// Fetches up to `scan_batch` pending messages in ascending-nonce order
    /// and attempts to submit each in turn. Stops early on backpressure
    /// from the sender; any other per-message error aborts the remainder
    /// of the pass, leaving later messages `Pending` for the next tick.
    #[tracing::instrument(skip(self))]
    pub async fn scan_pass(&self) {
        let msgs = match self.store.list_pending(self.scan_batch).await {
            Ok(msgs) => msgs,
            Err(e) => {
                error!(error = %e, "failed to fetch pending messages");
                return;
            }
        };

        if msgs.is_empty() {
            return;
        }
        info!(count = msgs.len(), "scanning pending messages");

        for msg in msgs {
            let submit_result = self
                .sender
                .submit(
                    msg.msg_hash.0,
                    self.messenger_contract,
                    ZERO_VALUE,
                    msg.calldata.clone(),
                    self.min_gas_limit,
                )
                .await;

            match submit_result {
                Ok(tx_hash) => {
                    if let Err(e) = self.store.set_submitted(msg.msg_hash, tx_hash).await {
                        // Submission already occurred; a subsequent tick will
                        // re-attempt this msg_hash and rely on the
                        // `AlreadyExecuted` revert classification to recover.
                        // See spec.md §9.
                        error!(msg_hash = %msg.msg_hash, error = %e, "failed to record submission");
                        return;
                    }
                    self.metrics.inc_relayed();
                    info!(msg_hash = %msg.msg_hash, tx_hash = %tx_hash, "relayed message");
                }
                Err(SubmitError::ExecutionReverted(reason)) => match classify(&reason) {
                    RevertOutcome::MessageExpired => {
                        if let Err(e) = self
                            .store
                            .set_status(msg.msg_hash, MessageStatus::Expired, None)
                            .await
                        {
                            self.log_store_failure(&msg.msg_hash, &e);
                        }
                        info!(msg_hash = %msg.msg_hash, "message expired");
                    }
                    RevertOutcome::AlreadyExecuted => {
                        if let Err(e) = self
                            .store
                            .set_status(msg.msg_hash, MessageStatus::Confirmed, None)
                            .await
                        {
                            self.log_store_failure(&msg.msg_hash, &e);
                        }
                        info!(msg_hash = %msg.msg_hash, "message already executed on destination");
                    }
                    RevertOutcome::Transient => {
                        error!(
                            msg_hash = %msg.msg_hash,
                            reason = %reason,
                            "transient revert submitting message, aborting scan pass"
                        );
                        return;
                    }
                },
                Err(SubmitError::NoAvailableAccount) | Err(SubmitError::PendingQueueFull) => {
                    // Expected backpressure: not an error. The next tick resumes.
                    return;
                }
                Err(e) => {
                    error!(msg_hash = %msg.msg_hash, error = %e, "error submitting message, aborting scan pass");
                    return;
                }
            }
        }
    }

    fn log_store_failure(&self, msg_hash: &crate::message::MsgHash, e: &StoreError) {
        warn!(msg_hash = %msg_hash, error = %e, "store update failed after revert classification");
    }
}
