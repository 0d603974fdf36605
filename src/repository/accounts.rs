//! Account message tables

use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::{FromRow, Postgres};

use crate::domain::{MsgAccountMigrate, MsgSetExtra};
use crate::filter::Table;
use crate::store::StoreResult;

use super::banking::{extras_from_json, extras_to_json};
use super::{Record, RecordRepository};

pub type AccountMigrateRepository = RecordRepository<MsgAccountMigrate>;
pub type SetExtraRepository = RecordRepository<MsgSetExtra>;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct AccountMigrateRow {
    pub id: i64,
    pub tx_hash: String,
    pub creator: String,
    pub address: String,
    pub hash: String,
    pub public_key: String,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct SetExtraRow {
    pub id: i64,
    pub tx_hash: String,
    pub creator: String,
    pub hash: String,
    pub extras: serde_json::Value,
}

impl Record for MsgAccountMigrate {
    type Row = AccountMigrateRow;
    const TABLE: Table = Table::AccountsAccountMigrate;
    const COLUMNS: &'static [&'static str] =
        &["tx_hash", "creator", "address", "hash", "public_key"];

    fn to_row(hash: &str, m: &Self) -> StoreResult<AccountMigrateRow> {
        Ok(AccountMigrateRow {
            id: 0,
            tx_hash: hash.to_string(),
            creator: m.creator.clone(),
            address: m.address.clone(),
            hash: m.hash.clone(),
            public_key: m.public_key.clone(),
        })
    }

    fn to_domain(row: AccountMigrateRow) -> StoreResult<Self> {
        Ok(MsgAccountMigrate {
            creator: row.creator,
            address: row.address,
            hash: row.hash,
            public_key: row.public_key,
        })
    }

    fn bind<'q>(
        row: AccountMigrateRow,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        query
            .bind(row.tx_hash)
            .bind(row.creator)
            .bind(row.address)
            .bind(row.hash)
            .bind(row.public_key)
    }
}

impl Record for MsgSetExtra {
    type Row = SetExtraRow;
    const TABLE: Table = Table::AccountsSetExtra;
    const COLUMNS: &'static [&'static str] = &["tx_hash", "creator", "hash", "extras"];

    fn to_row(hash: &str, m: &Self) -> StoreResult<SetExtraRow> {
        Ok(SetExtraRow {
            id: 0,
            tx_hash: hash.to_string(),
            creator: m.creator.clone(),
            hash: m.hash.clone(),
            extras: extras_to_json(&m.extras)?,
        })
    }

    fn to_domain(row: SetExtraRow) -> StoreResult<Self> {
        Ok(MsgSetExtra {
            extras: extras_from_json(row.extras)?,
            creator: row.creator,
            hash: row.hash,
        })
    }

    fn bind<'q>(
        row: SetExtraRow,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        query
            .bind(row.tx_hash)
            .bind(row.creator)
            .bind(row.hash)
            .bind(row.extras)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Extra, ExtraKind};

    #[test]
    fn test_set_extra_round_trip() {
        let msg = MsgSetExtra {
            creator: "vcg1creator".to_string(),
            hash: "ab12".to_string(),
            extras: vec![Extra::new(ExtraKind::Email, "someone@example.com")],
        };
        let row = MsgSetExtra::to_row("HASH", &msg).unwrap();
        assert_eq!(MsgSetExtra::to_domain(row).unwrap(), msg);
    }

    #[test]
    fn test_account_migrate_keeps_tx_hash_apart_from_hash() {
        let msg = MsgAccountMigrate {
            creator: "vcg1creator".to_string(),
            address: "vcg1address".to_string(),
            hash: "account-hash".to_string(),
            public_key: "pk".to_string(),
        };
        let row = MsgAccountMigrate::to_row("TXHASH", &msg).unwrap();
        assert_eq!(row.tx_hash, "TXHASH");
        assert_eq!(row.hash, "account-hash");
        assert_eq!(MsgAccountMigrate::to_domain(row).unwrap(), msg);
    }
}
