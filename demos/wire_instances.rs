//! Demonstrates wiring the two symmetric directional instances (L1→L2,
//! L2→L1) described in spec.md §2. The concrete `Sender` and database
//! connections a real deployment needs are external collaborators per
//! spec.md §1 ("the transaction sender's internal nonce/gas-bump logic" is
//! not reimplemented here) — this demo stands in the `MockSender` test
//! double so the wiring compiles and runs standalone.
//!
//! Run with: cargo run --example wire_instances

use std::sync::Arc;

use cross_domain_relayer::config::{Config, Direction};
use cross_domain_relayer::direction::RelayerInstance;
use cross_domain_relayer::testing::{InMemoryBlockStore, InMemoryMessageStore, MockSender};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cross_domain_relayer=info".into()),
        )
        .init();

    let (cancel_tx, cancel_rx) = tokio::sync::watch::channel(false);

    let (l1_to_l2, l1_msg_confirmations, l1_oracle_confirmations) =
        build_instance(Direction::L1ToL2);
    let (l2_to_l1, l2_msg_confirmations, l2_oracle_confirmations) =
        build_instance(Direction::L2ToL1);

    let cancel_l1 = cancel_rx.clone();
    let cancel_l2 = cancel_rx;

    tokio::select! {
        _ = l1_to_l2.run(l1_msg_confirmations, l1_oracle_confirmations, cancel_l1) => {}
        _ = l2_to_l1.run(l2_msg_confirmations, l2_oracle_confirmations, cancel_l2) => {}
        _ = tokio::signal::ctrl_c() => {
            let _ = cancel_tx.send(true);
        }
    }
}

/// Builds one directional instance plus the confirmation-channel halves
/// its sender pair hands out. Per spec.md §9, `message_sender` and
/// `oracle_sender` must be distinct instances so message traffic can never
/// starve oracle updates or vice versa.
fn build_instance(
    direction: Direction,
) -> (
    RelayerInstance,
    tokio::sync::mpsc::Receiver<cross_domain_relayer::sender::Confirmation>,
    tokio::sync::mpsc::Receiver<cross_domain_relayer::sender::Confirmation>,
) {
    let config = Config::from_env(direction);
    let message_store = Arc::new(InMemoryMessageStore::new());
    let block_store = Arc::new(InMemoryBlockStore::new());
    let message_sender = Arc::new(MockSender::new());
    let oracle_sender = Arc::new(MockSender::new());

    let message_confirmations = message_sender.confirmations();
    let oracle_confirmations = oracle_sender.confirmations();

    let instance = RelayerInstance::new(
        config,
        message_store,
        block_store,
        message_sender,
        oracle_sender,
    );
    (instance, message_confirmations, oracle_confirmations)
}
