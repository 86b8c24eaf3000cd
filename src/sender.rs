use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::message::TxHash;

/// The zero `u256` value, in the big-endian 32-byte representation
/// `Sender::submit`'s `value` parameter uses. Every call site in this
/// crate submits with zero value — see `Sender::submit`'s doc comment.
pub const ZERO_VALUE: [u8; 32] = [0u8; 32];

/// Errors a `Sender` can return from `submit`. Distinguishes backpressure
/// (expected, the caller backs off and retries next tick) from terminal
/// reverts (a lifecycle event, not a failure) from genuine transport
/// failures. Names and semantics are taken from `sender.ErrNoAvailableAccount`
/// / `sender.ErrFullPending` / the two `execution reverted:` sentinels in
/// the original relayer's sender package.
#[derive(Debug, Error, Clone)]
pub enum SubmitError {
    #[error("no available signing account")]
    NoAvailableAccount,
    #[error("pending transaction queue is full")]
    PendingQueueFull,
    #[error("execution reverted: {0}")]
    ExecutionReverted(String),
    #[error("sender error: {0}")]
    Other(String),
}

/// A confirmation delivered asynchronously by a `Sender` once its
/// destination-chain transaction lands. `id` echoes whatever opaque id was
/// passed to `submit`, so the caller can correlate without depending on the
/// sender's own notion of identity (nonce-replaced or fee-bumped
/// transactions may change `tx_hash` but never `id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation {
    pub id: [u8; 32],
    pub tx_hash: TxHash,
    pub success: bool,
}

/// Submits destination-chain transactions and reports confirmations on an
/// mpsc channel. See spec.md §4.1.
///
/// An mpsc receiver (rather than a broadcast receiver) models "a lazy,
/// infinite, single-consumer sequence": only one task — the
/// `ConfirmationReactor` — ever drains it, and using mpsc makes that
/// single-consumer contract a compile-time guarantee instead of a
/// convention a second subscriber could quietly violate.
#[async_trait]
pub trait Sender: Send + Sync {
    /// `value` is a 256-bit big-endian word, like the other on-chain
    /// numeric fields this crate passes through verbatim (spec.md §4.1
    /// specifies `u256`); every call site in this crate passes
    /// `ZERO_VALUE`, since neither the messenger relay nor the gas-oracle
    /// push ever attaches ether, but the representation must not silently
    /// truncate a future non-zero value the way a native integer width
    /// smaller than 256 bits would.
    async fn submit(
        &self,
        id: [u8; 32],
        to: [u8; 20],
        value: [u8; 32],
        data: Vec<u8>,
        min_gas_limit: u64,
    ) -> Result<TxHash, SubmitError>;

    /// Hands out the receiving end of the confirmation channel. Implementors
    /// keep the sending half internally and push onto it as transactions
    /// land. Callers take this exactly once per sender instance.
    fn confirmations(&self) -> mpsc::Receiver<Confirmation>;
}
