use std::fmt;

use crate::message::TxHash;

/// A 32-byte block hash from the source chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockHash(pub [u8; 32]);

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Status of a source block's base-fee import into the destination-chain
/// gas oracle. Terminal states: `OracleImported`, `OracleFailed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleStatus {
    OraclePending,
    OracleImporting,
    OracleImported,
    OracleFailed,
}

impl fmt::Display for OracleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OracleStatus::OraclePending => "oracle_pending",
            OracleStatus::OracleImporting => "oracle_importing",
            OracleStatus::OracleImported => "oracle_imported",
            OracleStatus::OracleFailed => "oracle_failed",
        };
        write!(f, "{s}")
    }
}

/// A recently observed source-chain block, as populated by a watcher.
/// See spec.md §3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBlock {
    pub hash: BlockHash,
    pub number: u64,
    pub base_fee: u64,
    pub oracle_status: OracleStatus,
    pub oracle_tx_hash: Option<TxHash>,
}
