use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use crate::block::{BlockHash, OracleStatus};
use crate::message::{MessageStatus, MsgHash};
use crate::metrics::RelayerMetrics;
use crate::sender::Confirmation;
use crate::store::{BlockStore, MessageStore};

/// Single long-lived task per relayer instance that settles lifecycle
/// status on sender confirmations. Never blocks scan passes. See spec.md
/// §4.5.
///
/// Grounded on `handleConfirmLoop` in the original Go relayer: a `select!`
/// over the message-sender confirmation channel, the oracle-sender
/// confirmation channel, and a cancellation signal. A `watch<bool>` channel
/// is used for cancellation rather than the teacher's bare `AtomicBool`
/// flag because `select!` needs to be woken by the change, not just poll it.
pub struct ConfirmationReactor {
    message_store: Arc<dyn MessageStore>,
    block_store: Arc<dyn BlockStore>,
    metrics: RelayerMetrics,
}

impl ConfirmationReactor {
    pub fn new(
        message_store: Arc<dyn MessageStore>,
        block_store: Arc<dyn BlockStore>,
        metrics: RelayerMetrics,
    ) -> Self {
        Self {
            message_store,
            block_store,
            metrics,
        }
    }

    /// Runs until `cancel` reports `true`. Database errors are logged at
    /// `warn!` and do not terminate the loop — the confirmation stream
    /// keeps draining, per spec.md §4.5's failure policy (the original
    /// source's `@todo handle db error` markers are preserved as-is, no
    /// retry is invented).
    pub async fn run(
        &self,
        mut message_confirmations: mpsc::Receiver<Confirmation>,
        mut oracle_confirmations: mpsc::Receiver<Confirmation>,
        mut cancel: watch::Receiver<bool>,
    ) {
        loop {
            tokio::select! {
                biased;
                _ = cancel.changed() => {
                    if *cancel.borrow() {
                        info!("confirmation reactor shutting down");
                        return;
                    }
                }
                maybe_cfm = message_confirmations.recv() => {
                    match maybe_cfm {
                        Some(cfm) => self.handle_message_confirmation(cfm).await,
                        None => return,
                    }
                }
                maybe_cfm = oracle_confirmations.recv() => {
                    match maybe_cfm {
                        Some(cfm) => self.handle_oracle_confirmation(cfm).await,
                        None => return,
                    }
                }
            }
        }
    }

    async fn handle_message_confirmation(&self, cfm: Confirmation) {
        let msg_hash = MsgHash(cfm.id);
        let status = if cfm.success {
            MessageStatus::Confirmed
        } else {
            MessageStatus::RelayFailed
        };
        if let Err(e) = self
            .message_store
            .set_status(msg_hash, status, Some(cfm.tx_hash))
            .await
        {
            warn!(msg_hash = %msg_hash, error = %e, "failed to record message confirmation");
        }
        self.metrics.inc_relayed_confirmed();
        if cfm.success {
            info!(msg_hash = %msg_hash, tx_hash = %cfm.tx_hash, "message confirmed");
        } else {
            warn!(msg_hash = %msg_hash, tx_hash = %cfm.tx_hash, "message relay failed");
        }
    }

    async fn handle_oracle_confirmation(&self, cfm: Confirmation) {
        let block_hash = BlockHash(cfm.id);
        let status = if cfm.success {
            OracleStatus::OracleImported
        } else {
            OracleStatus::OracleFailed
        };
        if let Err(e) = self
            .block_store
            .set_oracle_status(block_hash, status, Some(cfm.tx_hash))
            .await
        {
            warn!(block_hash = %block_hash, error = %e, "failed to record oracle confirmation");
        }
        if cfm.success {
            info!(block_hash = %block_hash, tx_hash = %cfm.tx_hash, "base fee import confirmed");
        } else {
            warn!(block_hash = %block_hash, tx_hash = %cfm.tx_hash, "base fee import failed");
        }
    }
}
