//! Durable store interfaces consumed by the relayer. Concrete stores are
//! shared with watchers (out of scope for this crate, see spec.md §1);
//! the relayer only ever writes rows it has observed in a non-terminal
//! state, so row-level ownership never conflicts with a watcher's inserts.

mod sqlite;

pub use sqlite::{SqliteBlockStore, SqliteMessageStore};

use async_trait::async_trait;

use crate::block::{BlockHash, OracleStatus, SourceBlock};
use crate::error::StoreError;
use crate::message::{CrossDomainMessage, MsgHash, TxHash};

/// Durable read/write of pending messages and their lifecycle status.
/// See spec.md §6.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Pending messages ordered by ascending `nonce`, capped at `limit`.
    async fn list_pending(&self, limit: usize) -> Result<Vec<CrossDomainMessage>, StoreError>;

    /// Atomically transitions a message to `Submitted` and records its
    /// destination tx hash.
    async fn set_submitted(&self, msg_hash: MsgHash, dest_tx_hash: TxHash)
        -> Result<(), StoreError>;

    /// Atomically transitions a message to a terminal status. `dest_tx_hash`
    /// is set only when `Some` (e.g. a failed confirmation still carries a
    /// tx hash; an `AlreadyExecuted` classification carries none).
    async fn set_status(
        &self,
        msg_hash: MsgHash,
        status: crate::message::MessageStatus,
        dest_tx_hash: Option<TxHash>,
    ) -> Result<(), StoreError>;
}

/// Durable read of recently observed source-chain blocks and their oracle
/// import status. See spec.md §6.
#[async_trait]
pub trait BlockStore: Send + Sync {
    /// Height of the most recently observed source-chain block.
    async fn latest_height(&self) -> Result<u64, StoreError>;

    /// The single block at the given height, if any. An implementation that
    /// finds more than one row at `n` must return `StoreError::AmbiguousHeight`
    /// rather than picking one arbitrarily.
    async fn get_by_number(&self, n: u64) -> Result<Option<SourceBlock>, StoreError>;

    async fn set_oracle_importing(
        &self,
        block_hash: BlockHash,
        tx_hash: TxHash,
    ) -> Result<(), StoreError>;

    async fn set_oracle_status(
        &self,
        block_hash: BlockHash,
        status: OracleStatus,
        tx_hash: Option<TxHash>,
    ) -> Result<(), StoreError>;
}
