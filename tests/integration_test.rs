//! End-to-end scenarios against `MessageRelayer`, `GasOracleUpdater` and
//! `ConfirmationReactor` wired up with the in-memory fakes, reproducing the
//! scenarios in spec.md §8.

use std::sync::Arc;

use cross_domain_relayer::block::{BlockHash, OracleStatus, SourceBlock};
use cross_domain_relayer::gas_oracle::GasOracleUpdater;
use cross_domain_relayer::message::{CrossDomainMessage, MessageStatus, MsgHash, TxHash};
use cross_domain_relayer::metrics::RelayerMetrics;
use cross_domain_relayer::reactor::ConfirmationReactor;
use cross_domain_relayer::relayer::MessageRelayer;
use cross_domain_relayer::sender::{Confirmation, SubmitError};
use cross_domain_relayer::store::{BlockStore, MessageStore};
use cross_domain_relayer::testing::{
    InMemoryBlockStore, InMemoryMessageStore, MockSender, ScriptedResponse,
};

fn msg(id: u8, nonce: u64) -> CrossDomainMessage {
    CrossDomainMessage {
        msg_hash: MsgHash([id; 32]),
        nonce,
        source_height: 100 + nonce,
        calldata: vec![id],
        status: MessageStatus::Pending,
        dest_tx_hash: None,
    }
}

fn tx(id: u8) -> TxHash {
    TxHash([id; 32])
}

// S1: happy path. A pending message is submitted successfully, then
// confirmed once the sender reports success.
#[tokio::test]
async fn s1_happy_path_submits_then_confirms() {
    let store = Arc::new(InMemoryMessageStore::new());
    store.insert(msg(1, 0));
    let sender = Arc::new(MockSender::new());
    sender.script([1u8; 32], ScriptedResponse::Ok(tx(0xaa)));
    let metrics = RelayerMetrics::new();
    let relayer = MessageRelayer::new(store.clone(), sender.clone(), [0u8; 20], 130_000, 100, metrics.clone());

    relayer.scan_pass().await;

    let after = store.get(MsgHash([1u8; 32])).unwrap();
    assert_eq!(after.status, MessageStatus::Submitted);
    assert_eq!(after.dest_tx_hash, Some(tx(0xaa)));
    assert_eq!(metrics.snapshot().0, 1);

    let reactor = ConfirmationReactor::new(store.clone(), Arc::new(InMemoryBlockStore::new()), metrics.clone());
    let confirmations = sender.confirmations();
    let (cancel_tx, cancel_rx) = tokio::sync::watch::channel(false);
    sender
        .confirm(Confirmation {
            id: [1u8; 32],
            tx_hash: tx(0xaa),
            success: true,
        })
        .await;
    // Drop the sending side so the reactor's recv() returns None after
    // draining the one queued confirmation, letting `run` exit on its own.
    drop(sender);
    cancel_tx.send(false).ok();
    let (_dummy_tx, dummy_rx) = tokio::sync::mpsc::channel(1);
    reactor.run(confirmations, dummy_rx, cancel_rx).await;

    let after = store.get(MsgHash([1u8; 32])).unwrap();
    assert_eq!(after.status, MessageStatus::Confirmed);
    assert_eq!(metrics.snapshot().1, 1);
}

// S2: destination-chain revert classified as the message's validity window
// having elapsed moves it straight to `Expired` without ever touching
// `Submitted`.
#[tokio::test]
async fn s2_expired_revert_short_circuits_to_expired() {
    let store = Arc::new(InMemoryMessageStore::new());
    store.insert(msg(2, 0));
    let sender = Arc::new(MockSender::new());
    sender.script(
        [2u8; 32],
        ScriptedResponse::Err(SubmitError::ExecutionReverted(
            "execution reverted: Message expired".into(),
        )),
    );
    let metrics = RelayerMetrics::new();
    let relayer = MessageRelayer::new(store.clone(), sender, [0u8; 20], 130_000, 100, metrics.clone());

    relayer.scan_pass().await;

    let after = store.get(MsgHash([2u8; 32])).unwrap();
    assert_eq!(after.status, MessageStatus::Expired);
    assert_eq!(metrics.snapshot().0, 0);
}

// S3: a revert classified as "already executed" on the destination chain
// resolves the message as `Confirmed` even though this relayer never saw a
// successful submission — the idempotent-recovery path.
#[tokio::test]
async fn s3_already_executed_revert_resolves_confirmed() {
    let store = Arc::new(InMemoryMessageStore::new());
    store.insert(msg(3, 0));
    let sender = Arc::new(MockSender::new());
    sender.script(
        [3u8; 32],
        ScriptedResponse::Err(SubmitError::ExecutionReverted(
            "execution reverted: Message was already successfully executed".into(),
        )),
    );
    let metrics = RelayerMetrics::new();
    let relayer = MessageRelayer::new(store.clone(), sender, [0u8; 20], 130_000, 100, metrics);

    relayer.scan_pass().await;

    let after = store.get(MsgHash([3u8; 32])).unwrap();
    assert_eq!(after.status, MessageStatus::Confirmed);
}

// S4: backpressure from the sender (no signing account available) halts
// the scan pass silently, leaving later messages untouched for the next
// tick rather than treating the condition as an error.
#[tokio::test]
async fn s4_backpressure_halts_scan_pass_without_error() {
    let store = Arc::new(InMemoryMessageStore::new());
    store.insert(msg(4, 0));
    store.insert(msg(5, 1));
    let sender = Arc::new(MockSender::new());
    sender.script([4u8; 32], ScriptedResponse::Err(SubmitError::NoAvailableAccount));
    sender.script([5u8; 32], ScriptedResponse::Ok(tx(0xbb)));
    let metrics = RelayerMetrics::new();
    let relayer = MessageRelayer::new(store.clone(), sender, [0u8; 20], 130_000, 100, metrics.clone());

    relayer.scan_pass().await;

    assert_eq!(store.get(MsgHash([4u8; 32])).unwrap().status, MessageStatus::Pending);
    assert_eq!(store.get(MsgHash([5u8; 32])).unwrap().status, MessageStatus::Pending);
    assert_eq!(metrics.snapshot().0, 0);
}

// Property 3: within a single scan pass, submission order follows ascending
// nonce regardless of the order messages were inserted into the store.
#[tokio::test]
async fn scan_pass_submits_in_ascending_nonce_order() {
    let store = Arc::new(InMemoryMessageStore::new());
    store.insert(msg(30, 3));
    store.insert(msg(10, 1));
    store.insert(msg(20, 2));
    let sender = Arc::new(MockSender::new());
    for id in [10u8, 20, 30] {
        sender.script([id; 32], ScriptedResponse::Ok(tx(id)));
    }
    let metrics = RelayerMetrics::new();
    let relayer = MessageRelayer::new(store, sender.clone(), [0u8; 20], 130_000, 100, metrics);

    relayer.scan_pass().await;

    assert_eq!(sender.call_order(), vec![[10u8; 32], [20u8; 32], [30u8; 32]]);
}

// S5: the gas-price oracle suppresses small deltas but always pushes the
// first observed base fee and any delta crossing the ppm threshold.
#[tokio::test]
async fn s5_oracle_hysteresis_suppresses_small_deltas() {
    let block_store = Arc::new(InMemoryBlockStore::new());
    let sender = Arc::new(MockSender::new());
    for fee in [0xc0u8, 0xc1, 0xc2, 0xc3] {
        sender.script([fee; 32], ScriptedResponse::Ok(tx(fee)));
    }
    let updater = GasOracleUpdater::new(block_store.clone(), sender, [0u8; 20], 10, 100_000);

    let fees = [(0xc0u8, 100u64), (0xc1, 105), (0xc2, 112), (0xc3, 200)];
    let mut pushed_heights = Vec::new();
    for (i, (hash_byte, fee)) in fees.iter().enumerate() {
        block_store.insert(SourceBlock {
            hash: BlockHash([*hash_byte; 32]),
            number: i as u64,
            base_fee: *fee,
            oracle_status: OracleStatus::OraclePending,
            oracle_tx_hash: None,
        });
        updater.tick().await;
        let after = block_store.get_by_number(i as u64).await.unwrap().unwrap();
        if after.oracle_status == OracleStatus::OracleImporting {
            pushed_heights.push(i as u64);
        }
    }

    // 100 (first push, unconditional), 112 (12% above 100), 200 (78% above 112).
    // 105 is within the 10% hysteresis band around 100 and is suppressed.
    assert_eq!(pushed_heights, vec![0, 2, 3]);
}

// S6: a submitted message whose sender later reports failure (rather than
// a revert at submit time) settles as `RelayFailed`, not `Confirmed`.
#[tokio::test]
async fn s6_failed_confirmation_settles_relay_failed() {
    let message_store = Arc::new(InMemoryMessageStore::new());
    message_store.insert(msg(6, 0));
    let block_store = Arc::new(InMemoryBlockStore::new());
    let sender = Arc::new(MockSender::new());
    sender.script([6u8; 32], ScriptedResponse::Ok(tx(0xdd)));
    let metrics = RelayerMetrics::new();
    let relayer = MessageRelayer::new(
        message_store.clone(),
        sender.clone(),
        [0u8; 20],
        130_000,
        100,
        metrics.clone(),
    );
    relayer.scan_pass().await;
    assert_eq!(
        message_store.get(MsgHash([6u8; 32])).unwrap().status,
        MessageStatus::Submitted
    );

    let reactor = ConfirmationReactor::new(message_store.clone(), block_store, metrics.clone());
    let confirmations = sender.confirmations();
    sender
        .confirm(Confirmation {
            id: [6u8; 32],
            tx_hash: tx(0xdd),
            success: false,
        })
        .await;
    drop(sender);
    let (_cancel_tx, cancel_rx) = tokio::sync::watch::channel(false);
    let (_dummy_tx, dummy_rx) = tokio::sync::mpsc::channel(1);
    reactor.run(confirmations, dummy_rx, cancel_rx).await;

    assert_eq!(
        message_store.get(MsgHash([6u8; 32])).unwrap().status,
        MessageStatus::RelayFailed
    );
}
