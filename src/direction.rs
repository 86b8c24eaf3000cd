use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use crate::config::Config;
use crate::gas_oracle::GasOracleUpdater;
use crate::metrics::RelayerMetrics;
use crate::reactor::ConfirmationReactor;
use crate::relayer::MessageRelayer;
use crate::sender::Sender;
use crate::store::{BlockStore, MessageStore};

/// Wires the three concurrent activities of spec.md §5 together for one
/// direction: a scan-pass ticker, a gas-oracle ticker, and the
/// confirmation reactor. Two instances of this type exist in a running
/// system — one per direction — each owning its own sender handles, per
/// spec.md §3's ownership model.
pub struct RelayerInstance {
    config: Config,
    relayer: MessageRelayer,
    gas_oracle: GasOracleUpdater,
    reactor: ConfirmationReactor,
    metrics: RelayerMetrics,
}

impl RelayerInstance {
    /// `message_sender` and `oracle_sender` must be distinct instances —
    /// see spec.md §9: two independent sender pools prevent head-of-line
    /// blocking between message traffic and oracle updates, and must never
    /// share signing accounts.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Config,
        message_store: Arc<dyn MessageStore>,
        block_store: Arc<dyn BlockStore>,
        message_sender: Arc<dyn Sender>,
        oracle_sender: Arc<dyn Sender>,
    ) -> Self {
        let metrics = RelayerMetrics::new();
        let relayer = MessageRelayer::new(
            message_store.clone(),
            message_sender,
            config.messenger_contract,
            config.min_gas_limit,
            config.scan_batch,
            metrics.clone(),
        );
        let gas_oracle = GasOracleUpdater::new(
            block_store.clone(),
            oracle_sender,
            config.gas_oracle_contract,
            config.min_base_fee,
            config.base_fee_diff_ppm,
        );
        let reactor = ConfirmationReactor::new(message_store, block_store, metrics.clone());

        Self {
            config,
            relayer,
            gas_oracle,
            reactor,
            metrics,
        }
    }

    pub fn metrics(&self) -> &RelayerMetrics {
        &self.metrics
    }

    /// Spawns the scan-pass ticker and gas-oracle ticker as background
    /// tasks, and runs the confirmation reactor on the calling task until
    /// `cancel` reports `true`. Mirrors the teacher's `tokio::spawn` +
    /// `tokio::select!` shutdown race in `main.rs`.
    pub async fn run(
        &self,
        message_confirmations: tokio::sync::mpsc::Receiver<crate::sender::Confirmation>,
        oracle_confirmations: tokio::sync::mpsc::Receiver<crate::sender::Confirmation>,
        cancel: watch::Receiver<bool>,
    ) {
        let direction = self.config.direction.as_str();
        info!(direction, "starting relayer instance");

        let scan_cancel = cancel.clone();
        let scan_interval = self.config.scan_interval_ms;
        let scan_task = async {
            let mut ticker = tokio::time::interval(std::time::Duration::from_millis(scan_interval));
            let mut cancel = scan_cancel;
            loop {
                tokio::select! {
                    _ = ticker.tick() => self.relayer.scan_pass().await,
                    _ = cancel.changed() => {
                        if *cancel.borrow() {
                            return;
                        }
                    }
                }
            }
        };

        let oracle_cancel = cancel.clone();
        let oracle_interval = self.config.oracle_interval_ms;
        let oracle_task = async {
            let mut ticker = tokio::time::interval(std::time::Duration::from_millis(oracle_interval));
            let mut cancel = oracle_cancel;
            loop {
                tokio::select! {
                    _ = ticker.tick() => self.gas_oracle.tick().await,
                    _ = cancel.changed() => {
                        if *cancel.borrow() {
                            return;
                        }
                    }
                }
            }
        };

        let reactor_task = self
            .reactor
            .run(message_confirmations, oracle_confirmations, cancel);

        tokio::join!(scan_task, oracle_task, reactor_task);
        info!(direction, "relayer instance shut down");
    }
}
