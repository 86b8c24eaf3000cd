use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::block::{BlockHash, OracleStatus, SourceBlock};
use crate::error::{RelayerError, StoreError};
use crate::message::{CrossDomainMessage, MessageStatus, MsgHash, TxHash};

use super::{BlockStore, MessageStore};

fn to_store_err(e: sqlx::Error) -> StoreError {
    StoreError::Database(e.to_string())
}

fn hash32(col: &str) -> Result<[u8; 32], StoreError> {
    let bytes =
        hex::decode(col.trim_start_matches("0x")).map_err(|e| StoreError::Database(e.to_string()))?;
    bytes
        .try_into()
        .map_err(|_| StoreError::Database(format!("expected 32 bytes, got column {col}")))
}

fn status_str(status: MessageStatus) -> &'static str {
    match status {
        MessageStatus::Pending => "pending",
        MessageStatus::Submitted => "submitted",
        MessageStatus::Confirmed => "confirmed",
        MessageStatus::RelayFailed => "relay_failed",
        MessageStatus::Expired => "expired",
    }
}

fn parse_status(s: &str) -> MessageStatus {
    match s {
        "submitted" => MessageStatus::Submitted,
        "confirmed" => MessageStatus::Confirmed,
        "relay_failed" => MessageStatus::RelayFailed,
        "expired" => MessageStatus::Expired,
        _ => MessageStatus::Pending,
    }
}

fn oracle_status_str(status: OracleStatus) -> &'static str {
    match status {
        OracleStatus::OraclePending => "oracle_pending",
        OracleStatus::OracleImporting => "oracle_importing",
        OracleStatus::OracleImported => "oracle_imported",
        OracleStatus::OracleFailed => "oracle_failed",
    }
}

fn parse_oracle_status(s: &str) -> OracleStatus {
    match s {
        "oracle_importing" => OracleStatus::OracleImporting,
        "oracle_imported" => OracleStatus::OracleImported,
        "oracle_failed" => OracleStatus::OracleFailed,
        _ => OracleStatus::OraclePending,
    }
}

/// Reference `MessageStore` backed by SQLite, grounded on the teacher's
/// `db::init_db` / hand-written `CREATE TABLE IF NOT EXISTS` migrations.
/// Shared with watchers: this store never creates `Pending` rows itself,
/// only transitions them.
pub struct SqliteMessageStore {
    pool: SqlitePool,
}

impl SqliteMessageStore {
    /// Connects and runs this store's migrations. Returns `RelayerError`,
    /// not `StoreError` — store construction is the startup-only path
    /// spec.md §7 allows to propagate a fatal error to the caller, per
    /// `RelayerError`'s doc comment.
    pub async fn connect(database_url: &str) -> Result<Self, RelayerError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(to_store_err)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cross_domain_messages (
                msg_hash        TEXT PRIMARY KEY,
                nonce           INTEGER NOT NULL,
                source_height   INTEGER NOT NULL,
                calldata        TEXT NOT NULL,
                status          TEXT NOT NULL DEFAULT 'pending',
                dest_tx_hash    TEXT,
                updated_at      TEXT NOT NULL DEFAULT (datetime('now'))
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(to_store_err)?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_messages_status_nonce \
             ON cross_domain_messages(status, nonce)",
        )
        .execute(&pool)
        .await
        .map_err(to_store_err)?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for SqliteMessageStore {
    async fn list_pending(&self, limit: usize) -> Result<Vec<CrossDomainMessage>, StoreError> {
        let rows: Vec<(String, i64, i64, String, String, Option<String>)> = sqlx::query_as(
            r#"
            SELECT msg_hash, nonce, source_height, calldata, status, dest_tx_hash
            FROM cross_domain_messages
            WHERE status = 'pending'
            ORDER BY nonce ASC
            LIMIT ?
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(to_store_err)?;

        rows.into_iter()
            .map(|(msg_hash, nonce, source_height, calldata, status, dest_tx_hash)| {
                Ok(CrossDomainMessage {
                    msg_hash: MsgHash(hash32(&msg_hash)?),
                    nonce: nonce as u64,
                    source_height: source_height as u64,
                    calldata: hex::decode(calldata.trim_start_matches("0x"))
                        .map_err(|e| StoreError::Database(e.to_string()))?,
                    status: parse_status(&status),
                    dest_tx_hash: dest_tx_hash.map(|h| Ok::<_, StoreError>(TxHash(hash32(&h)?))).transpose()?,
                })
            })
            .collect()
    }

    async fn set_submitted(
        &self,
        msg_hash: MsgHash,
        dest_tx_hash: TxHash,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE cross_domain_messages
            SET status = 'submitted', dest_tx_hash = ?, updated_at = datetime('now')
            WHERE msg_hash = ?
            "#,
        )
        .bind(dest_tx_hash.to_string())
        .bind(msg_hash.to_string())
        .execute(&self.pool)
        .await
        .map_err(to_store_err)?;
        Ok(())
    }

    async fn set_status(
        &self,
        msg_hash: MsgHash,
        status: MessageStatus,
        dest_tx_hash: Option<TxHash>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE cross_domain_messages
            SET status = ?,
                dest_tx_hash = COALESCE(?, dest_tx_hash),
                updated_at = datetime('now')
            WHERE msg_hash = ?
            "#,
        )
        .bind(status_str(status))
        .bind(dest_tx_hash.map(|h| h.to_string()))
        .bind(msg_hash.to_string())
        .execute(&self.pool)
        .await
        .map_err(to_store_err)?;
        Ok(())
    }
}

/// Reference `BlockStore` backed by SQLite, grounded on the same teacher
/// pattern as `SqliteMessageStore`.
pub struct SqliteBlockStore {
    pool: SqlitePool,
}

impl SqliteBlockStore {
    /// See `SqliteMessageStore::connect` for why this returns `RelayerError`.
    pub async fn connect(database_url: &str) -> Result<Self, RelayerError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(to_store_err)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS source_blocks (
                hash            TEXT PRIMARY KEY,
                number          INTEGER NOT NULL UNIQUE,
                base_fee        INTEGER NOT NULL,
                oracle_status   TEXT NOT NULL DEFAULT 'oracle_pending',
                oracle_tx_hash  TEXT,
                updated_at      TEXT NOT NULL DEFAULT (datetime('now'))
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(to_store_err)?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlockStore for SqliteBlockStore {
    async fn latest_height(&self) -> Result<u64, StoreError> {
        let height: Option<i64> = sqlx::query_scalar("SELECT MAX(number) FROM source_blocks")
            .fetch_one(&self.pool)
            .await
            .map_err(to_store_err)?;
        Ok(height.unwrap_or(0) as u64)
    }

    async fn get_by_number(&self, n: u64) -> Result<Option<SourceBlock>, StoreError> {
        let rows: Vec<(String, i64, i64, String, Option<String>)> = sqlx::query_as(
            r#"
            SELECT hash, number, base_fee, oracle_status, oracle_tx_hash
            FROM source_blocks
            WHERE number = ?
            "#,
        )
        .bind(n as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(to_store_err)?;

        match rows.len() {
            0 => Ok(None),
            1 => {
                let (hash, number, base_fee, oracle_status, oracle_tx_hash) =
                    rows.into_iter().next().unwrap();
                Ok(Some(SourceBlock {
                    hash: BlockHash(hash32(&hash)?),
                    number: number as u64,
                    base_fee: base_fee as u64,
                    oracle_status: parse_oracle_status(&oracle_status),
                    oracle_tx_hash: oracle_tx_hash
                        .map(|h| Ok::<_, StoreError>(TxHash(hash32(&h)?)))
                        .transpose()?,
                }))
            }
            _ => Err(StoreError::AmbiguousHeight(n)),
        }
    }

    async fn set_oracle_importing(
        &self,
        block_hash: BlockHash,
        tx_hash: TxHash,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE source_blocks
            SET oracle_status = 'oracle_importing', oracle_tx_hash = ?, updated_at = datetime('now')
            WHERE hash = ?
            "#,
        )
        .bind(tx_hash.to_string())
        .bind(block_hash.to_string())
        .execute(&self.pool)
        .await
        .map_err(to_store_err)?;
        Ok(())
    }

    async fn set_oracle_status(
        &self,
        block_hash: BlockHash,
        status: OracleStatus,
        tx_hash: Option<TxHash>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE source_blocks
            SET oracle_status = ?,
                oracle_tx_hash = COALESCE(?, oracle_tx_hash),
                updated_at = datetime('now')
            WHERE hash = ?
            "#,
        )
        .bind(oracle_status_str(status))
        .bind(tx_hash.map(|h| h.to_string()))
        .bind(block_hash.to_string())
        .execute(&self.pool)
        .await
        .map_err(to_store_err)?;
        Ok(())
    }
}
