//! Stake message tables

use rust_decimal::Decimal;
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::{FromRow, Postgres};

use crate::domain::amount::{decimal_to_uint, uint_to_decimal};
use crate::domain::{
    Coin, MsgBuyRequest, MsgCancelSell, MsgClaimReward, MsgDistributeRewards,
    MsgManageSystemStake, MsgSellRequest, MsgTransferFromUser, MsgTransferToUser, StakeKind,
};
use crate::filter::Table;
use crate::store::{StoreError, StoreResult};

use super::{Record, RecordRepository};

pub type StakeBuyRepository = RecordRepository<MsgBuyRequest>;
pub type StakeSellRepository = RecordRepository<MsgSellRequest>;
pub type StakeSellCancelRepository = RecordRepository<MsgCancelSell>;
pub type StakeClaimRewardRepository = RecordRepository<MsgClaimReward>;
pub type StakeDistributeRewardsRepository = RecordRepository<MsgDistributeRewards>;
pub type StakeTransferFromUserRepository = RecordRepository<MsgTransferFromUser>;
pub type StakeTransferToUserRepository = RecordRepository<MsgTransferToUser>;
pub type StakeManageSystemStakeRepository = RecordRepository<MsgManageSystemStake>;

/// Row of `overgold_stake_buy` / `overgold_stake_sell`
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct AmountRow {
    pub id: i64,
    pub tx_hash: String,
    pub creator: String,
    pub amount: Decimal,
}

/// Row of the coin-valued stake tables
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct CoinRow {
    pub id: i64,
    pub tx_hash: String,
    pub creator: String,
    pub amount: Decimal,
    pub denom: String,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct CreatorRow {
    pub id: i64,
    pub tx_hash: String,
    pub creator: String,
}

/// Row of the user transfer tables
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct TransferRow {
    pub id: i64,
    pub tx_hash: String,
    pub creator: String,
    pub amount: Decimal,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ManageSystemStakeRow {
    pub id: i64,
    pub tx_hash: String,
    pub creator: String,
    pub amount: Decimal,
    pub kind: String,
}

const AMOUNT_COLUMNS: &[&str] = &["tx_hash", "creator", "amount"];
const COIN_COLUMNS: &[&str] = &["tx_hash", "creator", "amount", "denom"];
const TRANSFER_COLUMNS: &[&str] = &["tx_hash", "creator", "amount", "address"];

fn amount_row(hash: &str, creator: &str, amount: &str) -> StoreResult<AmountRow> {
    Ok(AmountRow {
        id: 0,
        tx_hash: hash.to_string(),
        creator: creator.to_string(),
        amount: uint_to_decimal(amount)?,
    })
}

fn bind_amount_row<'q>(
    row: AmountRow,
    query: Query<'q, Postgres, PgArguments>,
) -> Query<'q, Postgres, PgArguments> {
    query.bind(row.tx_hash).bind(row.creator).bind(row.amount)
}

fn coin_row(hash: &str, creator: &str, coin: &Coin) -> StoreResult<CoinRow> {
    Ok(CoinRow {
        id: 0,
        tx_hash: hash.to_string(),
        creator: creator.to_string(),
        amount: uint_to_decimal(&coin.amount)?,
        denom: coin.denom.clone(),
    })
}

fn coin_from_row(row: &CoinRow) -> StoreResult<Coin> {
    Ok(Coin::new(
        row.denom.clone(),
        decimal_to_uint(row.amount)?.to_string(),
    ))
}

fn bind_coin_row<'q>(
    row: CoinRow,
    query: Query<'q, Postgres, PgArguments>,
) -> Query<'q, Postgres, PgArguments> {
    query
        .bind(row.tx_hash)
        .bind(row.creator)
        .bind(row.amount)
        .bind(row.denom)
}

fn transfer_row(hash: &str, creator: &str, amount: &str, address: &str) -> StoreResult<TransferRow> {
    Ok(TransferRow {
        id: 0,
        tx_hash: hash.to_string(),
        creator: creator.to_string(),
        amount: uint_to_decimal(amount)?,
        address: address.to_string(),
    })
}

fn bind_transfer_row<'q>(
    row: TransferRow,
    query: Query<'q, Postgres, PgArguments>,
) -> Query<'q, Postgres, PgArguments> {
    query
        .bind(row.tx_hash)
        .bind(row.creator)
        .bind(row.amount)
        .bind(row.address)
}

impl Record for MsgBuyRequest {
    type Row = AmountRow;
    const TABLE: Table = Table::StakeBuy;
    const COLUMNS: &'static [&'static str] = AMOUNT_COLUMNS;

    fn to_row(hash: &str, m: &Self) -> StoreResult<AmountRow> {
        amount_row(hash, &m.creator, &m.amount)
    }

    fn to_domain(row: AmountRow) -> StoreResult<Self> {
        Ok(MsgBuyRequest {
            amount: decimal_to_uint(row.amount)?.to_string(),
            creator: row.creator,
        })
    }

    fn bind<'q>(
        row: AmountRow,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        bind_amount_row(row, query)
    }
}

impl Record for MsgSellRequest {
    type Row = AmountRow;
    const TABLE: Table = Table::StakeSell;
    const COLUMNS: &'static [&'static str] = AMOUNT_COLUMNS;

    fn to_row(hash: &str, m: &Self) -> StoreResult<AmountRow> {
        amount_row(hash, &m.creator, &m.amount)
    }

    fn to_domain(row: AmountRow) -> StoreResult<Self> {
        Ok(MsgSellRequest {
            amount: decimal_to_uint(row.amount)?.to_string(),
            creator: row.creator,
        })
    }

    fn bind<'q>(
        row: AmountRow,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        bind_amount_row(row, query)
    }
}

impl Record for MsgCancelSell {
    type Row = CoinRow;
    const TABLE: Table = Table::StakeSellCancel;
    const COLUMNS: &'static [&'static str] = COIN_COLUMNS;

    fn to_row(hash: &str, m: &Self) -> StoreResult<CoinRow> {
        coin_row(hash, &m.creator, &m.amount)
    }

    fn to_domain(row: CoinRow) -> StoreResult<Self> {
        Ok(MsgCancelSell {
            amount: coin_from_row(&row)?,
            creator: row.creator,
        })
    }

    fn bind<'q>(
        row: CoinRow,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        bind_coin_row(row, query)
    }
}

impl Record for MsgClaimReward {
    type Row = CoinRow;
    const TABLE: Table = Table::StakeClaimReward;
    const COLUMNS: &'static [&'static str] = COIN_COLUMNS;

    fn to_row(hash: &str, m: &Self) -> StoreResult<CoinRow> {
        coin_row(hash, &m.creator, &m.amount)
    }

    fn to_domain(row: CoinRow) -> StoreResult<Self> {
        Ok(MsgClaimReward {
            amount: coin_from_row(&row)?,
            creator: row.creator,
        })
    }

    fn bind<'q>(
        row: CoinRow,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        bind_coin_row(row, query)
    }
}

impl Record for MsgDistributeRewards {
    type Row = CreatorRow;
    const TABLE: Table = Table::StakeDistributeRewards;
    const COLUMNS: &'static [&'static str] = &["tx_hash", "creator"];

    fn to_row(hash: &str, m: &Self) -> StoreResult<CreatorRow> {
        Ok(CreatorRow {
            id: 0,
            tx_hash: hash.to_string(),
            creator: m.creator.clone(),
        })
    }

    fn to_domain(row: CreatorRow) -> StoreResult<Self> {
        Ok(MsgDistributeRewards {
            creator: row.creator,
        })
    }

    fn bind<'q>(
        row: CreatorRow,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        query.bind(row.tx_hash).bind(row.creator)
    }
}

impl Record for MsgTransferFromUser {
    type Row = TransferRow;
    const TABLE: Table = Table::StakeTransferFromUser;
    const COLUMNS: &'static [&'static str] = TRANSFER_COLUMNS;

    fn to_row(hash: &str, m: &Self) -> StoreResult<TransferRow> {
        transfer_row(hash, &m.creator, &m.amount, &m.address)
    }

    fn to_domain(row: TransferRow) -> StoreResult<Self> {
        Ok(MsgTransferFromUser {
            amount: decimal_to_uint(row.amount)?.to_string(),
            creator: row.creator,
            address: row.address,
        })
    }

    fn bind<'q>(
        row: TransferRow,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        bind_transfer_row(row, query)
    }
}

impl Record for MsgTransferToUser {
    type Row = TransferRow;
    const TABLE: Table = Table::StakeTransferToUser;
    const COLUMNS: &'static [&'static str] = TRANSFER_COLUMNS;

    fn to_row(hash: &str, m: &Self) -> StoreResult<TransferRow> {
        transfer_row(hash, &m.creator, &m.amount, &m.address)
    }

    fn to_domain(row: TransferRow) -> StoreResult<Self> {
        Ok(MsgTransferToUser {
            amount: decimal_to_uint(row.amount)?.to_string(),
            creator: row.creator,
            address: row.address,
        })
    }

    fn bind<'q>(
        row: TransferRow,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        bind_transfer_row(row, query)
    }
}

impl Record for MsgManageSystemStake {
    type Row = ManageSystemStakeRow;
    const TABLE: Table = Table::StakeManageSystemStake;
    const COLUMNS: &'static [&'static str] = &["tx_hash", "creator", "amount", "kind"];

    fn to_row(hash: &str, m: &Self) -> StoreResult<ManageSystemStakeRow> {
        Ok(ManageSystemStakeRow {
            id: 0,
            tx_hash: hash.to_string(),
            creator: m.creator.clone(),
            amount: uint_to_decimal(&m.amount)?,
            kind: m.kind.to_string(),
        })
    }

    fn to_domain(row: ManageSystemStakeRow) -> StoreResult<Self> {
        let kind: StakeKind = row.kind.parse().map_err(StoreError::internal)?;

        Ok(MsgManageSystemStake {
            amount: decimal_to_uint(row.amount)?.to_string(),
            creator: row.creator,
            kind,
        })
    }

    fn bind<'q>(
        row: ManageSystemStakeRow,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        query
            .bind(row.tx_hash)
            .bind(row.creator)
            .bind(row.amount)
            .bind(row.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_buy_round_trip() {
        let msg = MsgBuyRequest {
            creator: "ovg1creator".to_string(),
            amount: "10000123".to_string(),
        };
        let row = MsgBuyRequest::to_row("HASH", &msg).unwrap();
        assert_eq!(row.amount, dec!(10000123));
        assert_eq!(row.tx_hash, "HASH");
        assert_eq!(MsgBuyRequest::to_domain(row).unwrap(), msg);
    }

    #[test]
    fn test_buy_rejects_malformed_amount() {
        let msg = MsgBuyRequest {
            creator: "ovg1creator".to_string(),
            amount: "12abc".to_string(),
        };
        assert!(matches!(
            MsgBuyRequest::to_row("HASH", &msg),
            Err(StoreError::Internal { .. })
        ));
    }

    #[test]
    fn test_stored_amount_overflow_is_internal() {
        let row = AmountRow {
            id: 1,
            tx_hash: "HASH".to_string(),
            creator: "ovg1creator".to_string(),
            amount: dec!(18446744073709551616),
        };
        assert!(matches!(
            MsgSellRequest::to_domain(row),
            Err(StoreError::Internal { .. })
        ));
    }

    #[test]
    fn test_claim_reward_round_trip() {
        let msg = MsgClaimReward {
            creator: "ovg1creator".to_string(),
            amount: Coin::new("stovg", "42"),
        };
        let row = MsgClaimReward::to_row("HASH", &msg).unwrap();
        assert_eq!(row.denom, "stovg");
        assert_eq!(MsgClaimReward::to_domain(row).unwrap(), msg);
    }

    #[test]
    fn test_transfer_round_trip() {
        let msg = MsgTransferToUser {
            creator: "ovg1creator".to_string(),
            amount: "5".to_string(),
            address: "ovg1address".to_string(),
        };
        let row = MsgTransferToUser::to_row("HASH", &msg).unwrap();
        assert_eq!(MsgTransferToUser::to_domain(row).unwrap(), msg);
    }

    #[test]
    fn test_manage_system_stake_unknown_kind() {
        let row = ManageSystemStakeRow {
            id: 1,
            tx_hash: "HASH".to_string(),
            creator: "ovg1creator".to_string(),
            amount: dec!(1),
            kind: "hold".to_string(),
        };
        assert!(matches!(
            MsgManageSystemStake::to_domain(row),
            Err(StoreError::Internal { .. })
        ));
    }

    #[test]
    fn test_manage_system_stake_round_trip() {
        let msg = MsgManageSystemStake {
            creator: "ovg1creator".to_string(),
            amount: "700".to_string(),
            kind: StakeKind::Sell,
        };
        let row = MsgManageSystemStake::to_row("HASH", &msg).unwrap();
        assert_eq!(row.kind, "sell");
        assert_eq!(MsgManageSystemStake::to_domain(row).unwrap(), msg);
    }
}
