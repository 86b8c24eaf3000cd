//! In-memory fakes used by this crate's own integration tests and
//! available to downstream crates that want to exercise a `RelayerInstance`
//! without a real database or chain connection. Mirrors the teacher's
//! preference for hand-written fakes over a mocking framework (`db.rs`'s
//! functions are trivial enough to fake directly in test modules rather
//! than mocked).

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::block::{BlockHash, OracleStatus, SourceBlock};
use crate::error::StoreError;
use crate::message::{CrossDomainMessage, MessageStatus, MsgHash, TxHash};
use crate::sender::{Confirmation, Sender, SubmitError};
use crate::store::{BlockStore, MessageStore};

/// In-memory `MessageStore` keyed by `MsgHash`, preserving insertion order
/// for `list_pending`'s ascending-nonce contract via an explicit sort.
#[derive(Default)]
pub struct InMemoryMessageStore {
    messages: Mutex<HashMap<[u8; 32], CrossDomainMessage>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, msg: CrossDomainMessage) {
        self.messages.lock().unwrap().insert(msg.msg_hash.0, msg);
    }

    pub fn get(&self, msg_hash: MsgHash) -> Option<CrossDomainMessage> {
        self.messages.lock().unwrap().get(&msg_hash.0).cloned()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn list_pending(&self, limit: usize) -> Result<Vec<CrossDomainMessage>, StoreError> {
        let messages = self.messages.lock().unwrap();
        let mut pending: Vec<_> = messages
            .values()
            .filter(|m| m.status == MessageStatus::Pending)
            .cloned()
            .collect();
        pending.sort_by_key(|m| m.nonce);
        pending.truncate(limit);
        Ok(pending)
    }

    async fn set_submitted(
        &self,
        msg_hash: MsgHash,
        dest_tx_hash: TxHash,
    ) -> Result<(), StoreError> {
        let mut messages = self.messages.lock().unwrap();
        if let Some(msg) = messages.get_mut(&msg_hash.0) {
            msg.status = MessageStatus::Submitted;
            msg.dest_tx_hash = Some(dest_tx_hash);
        }
        Ok(())
    }

    async fn set_status(
        &self,
        msg_hash: MsgHash,
        status: MessageStatus,
        dest_tx_hash: Option<TxHash>,
    ) -> Result<(), StoreError> {
        let mut messages = self.messages.lock().unwrap();
        if let Some(msg) = messages.get_mut(&msg_hash.0) {
            msg.status = status;
            if dest_tx_hash.is_some() {
                msg.dest_tx_hash = dest_tx_hash;
            }
        }
        Ok(())
    }
}

/// In-memory `BlockStore` keyed by height.
#[derive(Default)]
pub struct InMemoryBlockStore {
    blocks: Mutex<HashMap<u64, SourceBlock>>,
}

impl InMemoryBlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, block: SourceBlock) {
        self.blocks.lock().unwrap().insert(block.number, block);
    }
}

#[async_trait]
impl BlockStore for InMemoryBlockStore {
    async fn latest_height(&self) -> Result<u64, StoreError> {
        Ok(self.blocks.lock().unwrap().keys().copied().max().unwrap_or(0))
    }

    async fn get_by_number(&self, n: u64) -> Result<Option<SourceBlock>, StoreError> {
        Ok(self.blocks.lock().unwrap().get(&n).cloned())
    }

    async fn set_oracle_importing(
        &self,
        block_hash: BlockHash,
        tx_hash: TxHash,
    ) -> Result<(), StoreError> {
        let mut blocks = self.blocks.lock().unwrap();
        if let Some(block) = blocks.values_mut().find(|b| b.hash == block_hash) {
            block.oracle_status = OracleStatus::OracleImporting;
            block.oracle_tx_hash = Some(tx_hash);
        }
        Ok(())
    }

    async fn set_oracle_status(
        &self,
        block_hash: BlockHash,
        status: OracleStatus,
        tx_hash: Option<TxHash>,
    ) -> Result<(), StoreError> {
        let mut blocks = self.blocks.lock().unwrap();
        if let Some(block) = blocks.values_mut().find(|b| b.hash == block_hash) {
            block.oracle_status = status;
            if tx_hash.is_some() {
                block.oracle_tx_hash = tx_hash;
            }
        }
        Ok(())
    }
}

/// Scripted response for one `MockSender::submit` call.
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    Ok(TxHash),
    Err(SubmitError),
}

/// A `Sender` whose `submit` responses are scripted in advance (by id) and
/// which pushes confirmations on demand via `confirm`. Used by this crate's
/// own tests to reproduce spec.md §8's S1–S6 scenarios deterministically —
/// no randomness, unlike the teacher's `should_simulate_failure` coin-flip
/// fault injection, because these are exact invariant checks rather than
/// demo traffic.
pub struct MockSender {
    responses: Mutex<HashMap<[u8; 32], ScriptedResponse>>,
    confirm_tx: mpsc::Sender<Confirmation>,
    confirm_rx: Mutex<Option<mpsc::Receiver<Confirmation>>>,
    call_order: Mutex<Vec<[u8; 32]>>,
}

impl MockSender {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(128);
        Self {
            responses: Mutex::new(HashMap::new()),
            confirm_tx: tx,
            confirm_rx: Mutex::new(Some(rx)),
            call_order: Mutex::new(Vec::new()),
        }
    }

    /// Scripts the response `submit` will return the next time it is
    /// called with this `id`.
    pub fn script(&self, id: [u8; 32], response: ScriptedResponse) {
        self.responses.lock().unwrap().insert(id, response);
    }

    /// Pushes a confirmation onto the channel the reactor drains.
    pub async fn confirm(&self, confirmation: Confirmation) {
        self.confirm_tx.send(confirmation).await.ok();
    }

    /// Ids passed to `submit`, in call order — used to assert spec.md §8's
    /// "ordering within a pass" property (ascending-nonce submission).
    pub fn call_order(&self) -> Vec<[u8; 32]> {
        self.call_order.lock().unwrap().clone()
    }
}

impl Default for MockSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Sender for MockSender {
    async fn submit(
        &self,
        id: [u8; 32],
        _to: [u8; 20],
        _value: [u8; 32],
        _data: Vec<u8>,
        _min_gas_limit: u64,
    ) -> Result<TxHash, SubmitError> {
        self.call_order.lock().unwrap().push(id);
        match self.responses.lock().unwrap().remove(&id) {
            Some(ScriptedResponse::Ok(tx_hash)) => Ok(tx_hash),
            Some(ScriptedResponse::Err(e)) => Err(e),
            None => Err(SubmitError::Other("no scripted response for id".into())),
        }
    }

    fn confirmations(&self) -> mpsc::Receiver<Confirmation> {
        self.confirm_rx
            .lock()
            .unwrap()
            .take()
            .expect("confirmations() called more than once on MockSender")
    }
}
