//! Indexed message table
//!
//! One row per message with the addresses it involves, used for address
//! lookups and pruned by height.

use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::{FromRow, Postgres};

use crate::filter::Table;
use crate::store::{StoreError, StoreResult};

use super::{Record, RecordRepository};

pub type MessageRepository = RecordRepository<StoredMessage>;

/// A message as indexed by the dispatch layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    pub tx_hash: String,
    pub index: i32,
    pub msg_type: String,
    /// De-duplicated, in order of first occurrence
    pub involved_addresses: Vec<String>,
    pub height: i64,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct MessageRow {
    pub id: i64,
    pub tx_hash: String,
    pub msg_index: i32,
    pub msg_type: String,
    pub involved_addresses: Vec<String>,
    pub height: i64,
}

impl Record for StoredMessage {
    type Row = MessageRow;
    const TABLE: Table = Table::Message;
    const COLUMNS: &'static [&'static str] =
        &["tx_hash", "msg_index", "msg_type", "involved_addresses", "height"];

    fn to_row(hash: &str, m: &Self) -> StoreResult<MessageRow> {
        Ok(MessageRow {
            id: 0,
            tx_hash: hash.to_string(),
            msg_index: m.index,
            msg_type: m.msg_type.clone(),
            involved_addresses: m.involved_addresses.clone(),
            height: m.height,
        })
    }

    fn to_domain(row: MessageRow) -> StoreResult<Self> {
        Ok(StoredMessage {
            tx_hash: row.tx_hash,
            index: row.msg_index,
            msg_type: row.msg_type,
            involved_addresses: row.involved_addresses,
            height: row.height,
        })
    }

    fn bind<'q>(
        row: MessageRow,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        query
            .bind(row.tx_hash)
            .bind(row.msg_index)
            .bind(row.msg_type)
            .bind(row.involved_addresses)
            .bind(row.height)
    }
}

impl RecordRepository<StoredMessage> {
    /// Highest indexed height, if any message is stored
    pub async fn latest_height(&self) -> StoreResult<Option<i64>> {
        sqlx::query_scalar::<_, Option<i64>>("SELECT MAX(height) FROM message")
            .fetch_one(self.pool())
            .await
            .map_err(|e| StoreError::from_sqlx(e, Table::Message.name()))
    }

    /// Delete every message below `height`. Returns the number removed.
    pub async fn prune_below(&self, height: i64) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM message WHERE height < $1")
            .bind(height)
            .execute(self.pool())
            .await
            .map_err(StoreError::internal)?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_message_round_trip() {
        let msg = StoredMessage {
            tx_hash: "HASH".to_string(),
            index: 2,
            msg_type: "/overgold.stake.MsgBuyRequest".to_string(),
            involved_addresses: vec!["ovg1a".to_string(), "ovg1b".to_string()],
            height: 100,
        };
        let row = StoredMessage::to_row("HASH", &msg).unwrap();
        assert_eq!(row.msg_index, 2);
        assert_eq!(StoredMessage::to_domain(row).unwrap(), msg);
    }
}
