use std::fmt;

use serde::{Deserialize, Serialize};

/// Content-addressed identifier for a cross-domain message. Stable across
/// chains and across the message's entire lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MsgHash(pub [u8; 32]);

impl fmt::Display for MsgHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// A destination-chain transaction hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxHash(pub [u8; 32]);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Lifecycle status of a `CrossDomainMessage`. Terminal states
/// (`Confirmed`, `RelayFailed`, `Expired`) are absorbing: once reached, no
/// further writes to this message occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageStatus {
    Pending,
    Submitted,
    Confirmed,
    RelayFailed,
    Expired,
}

impl MessageStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            MessageStatus::Confirmed | MessageStatus::RelayFailed | MessageStatus::Expired
        )
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MessageStatus::Pending => "pending",
            MessageStatus::Submitted => "submitted",
            MessageStatus::Confirmed => "confirmed",
            MessageStatus::RelayFailed => "relay_failed",
            MessageStatus::Expired => "expired",
        };
        write!(f, "{s}")
    }
}

/// A cross-domain message observed by a watcher and driven through its
/// lifecycle by the relayer. See spec.md §3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossDomainMessage {
    pub msg_hash: MsgHash,
    pub nonce: u64,
    pub source_height: u64,
    pub calldata: Vec<u8>,
    pub status: MessageStatus,
    pub dest_tx_hash: Option<TxHash>,
}
