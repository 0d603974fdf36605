//! Banking message tables

use rust_decimal::Decimal;
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::{FromRow, Postgres};

use crate::domain::amount::{decimal_to_uint, uint_to_decimal};
use crate::domain::{Extra, MsgIssue, MsgSystemTransfer};
use crate::filter::Table;
use crate::store::StoreResult;

use super::{Record, RecordRepository};

pub type IssueRepository = RecordRepository<MsgIssue>;
pub type SystemTransferRepository = RecordRepository<MsgSystemTransfer>;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct IssueRow {
    pub id: i64,
    pub tx_hash: String,
    pub creator: String,
    pub wallet: String,
    pub asset: String,
    pub amount: Decimal,
    pub extras: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct SystemTransferRow {
    pub id: i64,
    pub tx_hash: String,
    pub creator: String,
    pub wallet_from: String,
    pub wallet_to: String,
    pub asset: String,
    pub amount: Decimal,
    pub extras: serde_json::Value,
}

pub(super) fn extras_to_json(extras: &[Extra]) -> StoreResult<serde_json::Value> {
    Ok(serde_json::to_value(extras)?)
}

pub(super) fn extras_from_json(value: serde_json::Value) -> StoreResult<Vec<Extra>> {
    Ok(serde_json::from_value(value)?)
}

impl Record for MsgIssue {
    type Row = IssueRow;
    const TABLE: Table = Table::BankingIssue;
    const COLUMNS: &'static [&'static str] =
        &["tx_hash", "creator", "wallet", "asset", "amount", "extras"];

    fn to_row(hash: &str, m: &Self) -> StoreResult<IssueRow> {
        Ok(IssueRow {
            id: 0,
            tx_hash: hash.to_string(),
            creator: m.creator.clone(),
            wallet: m.wallet.clone(),
            asset: m.asset.clone(),
            amount: uint_to_decimal(&m.amount)?,
            extras: extras_to_json(&m.extras)?,
        })
    }

    fn to_domain(row: IssueRow) -> StoreResult<Self> {
        Ok(MsgIssue {
            amount: decimal_to_uint(row.amount)?.to_string(),
            extras: extras_from_json(row.extras)?,
            creator: row.creator,
            wallet: row.wallet,
            asset: row.asset,
        })
    }

    fn bind<'q>(
        row: IssueRow,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        query
            .bind(row.tx_hash)
            .bind(row.creator)
            .bind(row.wallet)
            .bind(row.asset)
            .bind(row.amount)
            .bind(row.extras)
    }
}

impl Record for MsgSystemTransfer {
    type Row = SystemTransferRow;
    const TABLE: Table = Table::BankingSystemTransfer;
    const COLUMNS: &'static [&'static str] = &[
        "tx_hash",
        "creator",
        "wallet_from",
        "wallet_to",
        "asset",
        "amount",
        "extras",
    ];

    fn to_row(hash: &str, m: &Self) -> StoreResult<SystemTransferRow> {
        Ok(SystemTransferRow {
            id: 0,
            tx_hash: hash.to_string(),
            creator: m.creator.clone(),
            wallet_from: m.wallet_from.clone(),
            wallet_to: m.wallet_to.clone(),
            asset: m.asset.clone(),
            amount: uint_to_decimal(&m.amount)?,
            extras: extras_to_json(&m.extras)?,
        })
    }

    fn to_domain(row: SystemTransferRow) -> StoreResult<Self> {
        Ok(MsgSystemTransfer {
            amount: decimal_to_uint(row.amount)?.to_string(),
            extras: extras_from_json(row.extras)?,
            creator: row.creator,
            wallet_from: row.wallet_from,
            wallet_to: row.wallet_to,
            asset: row.asset,
        })
    }

    fn bind<'q>(
        row: SystemTransferRow,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        query
            .bind(row.tx_hash)
            .bind(row.creator)
            .bind(row.wallet_from)
            .bind(row.wallet_to)
            .bind(row.asset)
            .bind(row.amount)
            .bind(row.extras)
    }
}
