//! Tariffs and their fee tiers
//!
//! A tariff row stores the ids of its fee rows. Fee rows are written first so
//! their ids are known when the tariff row is written; both happen in one
//! transaction.

use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection, PgPool};

use crate::domain::amount::{decimal_to_uint, parse_decimal, uint_to_decimal};
use crate::domain::{Fees, Tariff};
use crate::filter::{Field, Filter, Table};
use crate::store::{self, PgTx, StoreError, StoreResult, UnitOfWork};

use super::single;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct FeesRow {
    pub id: i64,
    pub msg_id: Decimal,
    pub creator: String,
    pub amount_from: Decimal,
    pub fee: Decimal,
    pub ref_reward: Decimal,
    pub stake_reward: Decimal,
    pub min_amount: Decimal,
    pub no_ref_reward: bool,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct TariffRow {
    pub id: i64,
    pub msg_id: Decimal,
    pub amount: Decimal,
    pub denom: String,
    pub min_ref_balance: Decimal,
    pub fees_ids: Vec<i64>,
}

fn to_fees_row(fees: &Fees) -> StoreResult<FeesRow> {
    Ok(FeesRow {
        id: 0,
        msg_id: Decimal::from(fees.id),
        creator: fees.creator.clone(),
        amount_from: uint_to_decimal(&fees.amount_from)?,
        fee: parse_decimal(&fees.fee)?,
        ref_reward: parse_decimal(&fees.ref_reward)?,
        stake_reward: parse_decimal(&fees.stake_reward)?,
        min_amount: Decimal::from(fees.min_amount),
        no_ref_reward: fees.no_ref_reward,
    })
}

fn to_fees_domain(row: FeesRow) -> StoreResult<Fees> {
    Ok(Fees {
        id: decimal_to_uint(row.msg_id)?,
        amount_from: decimal_to_uint(row.amount_from)?.to_string(),
        fee: row.fee.to_string(),
        ref_reward: row.ref_reward.to_string(),
        stake_reward: row.stake_reward.to_string(),
        min_amount: decimal_to_uint(row.min_amount)?,
        no_ref_reward: row.no_ref_reward,
        creator: row.creator,
    })
}

fn to_tariff_row(tariff: &Tariff, fees_ids: Vec<i64>) -> StoreResult<TariffRow> {
    Ok(TariffRow {
        id: 0,
        msg_id: Decimal::from(tariff.id),
        amount: uint_to_decimal(&tariff.amount)?,
        denom: tariff.denom.clone(),
        min_ref_balance: uint_to_decimal(&tariff.min_ref_balance)?,
        fees_ids,
    })
}

fn to_tariff_domain(row: TariffRow, fees: Vec<Fees>) -> StoreResult<Tariff> {
    Ok(Tariff {
        id: decimal_to_uint(row.msg_id)?,
        amount: decimal_to_uint(row.amount)?.to_string(),
        min_ref_balance: decimal_to_uint(row.min_ref_balance)?.to_string(),
        denom: row.denom,
        fees,
    })
}

/// Repository for `overgold_feeexcluder_tariff` and `overgold_feeexcluder_fees`
#[derive(Debug, Clone)]
pub struct TariffRepository {
    pool: PgPool,
}

impl TariffRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Tariffs matching `filter`, each with its fee tiers.
    ///
    /// A tariff whose fee rows are missing fails the whole read with
    /// `NotFound`.
    pub async fn get_all_tariffs(&self, filter: &Filter) -> StoreResult<Vec<Tariff>> {
        let mut conn = self.pool.acquire().await.map_err(StoreError::internal)?;

        let rows: Vec<TariffRow> =
            store::select(&mut *conn, Table::FeeExcluderTariff, filter, &[]).await?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            result.push(load_tariff(&mut *conn, row).await?);
        }

        Ok(result)
    }

    /// Insert a tariff with its fees; returns the tariff row id
    pub async fn insert_tariff(&self, tx: Option<&mut PgTx>, tariff: &Tariff) -> StoreResult<i64> {
        let mut uow = UnitOfWork::begin(&self.pool, tx).await?;

        // 1) fee tiers first, to learn their ids
        let fees_ids = insert_fees(uow.conn(), &tariff.fees).await?;

        // 2) tariff row referencing them
        let row = to_tariff_row(tariff, fees_ids)?;
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO overgold_feeexcluder_tariff (
                msg_id, amount, denom, min_ref_balance, fees_ids
            )
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(row.msg_id)
        .bind(row.amount)
        .bind(row.denom)
        .bind(row.min_ref_balance)
        .bind(row.fees_ids)
        .fetch_one(uow.conn())
        .await
        .map_err(StoreError::internal)?;

        uow.commit().await?;
        Ok(id)
    }

    /// Replace tariff `id` and its fee tiers. The previous fee rows are
    /// removed in the same transaction.
    pub async fn update_tariff(
        &self,
        tx: Option<&mut PgTx>,
        id: i64,
        tariff: &Tariff,
    ) -> StoreResult<()> {
        let mut uow = UnitOfWork::begin(&self.pool, tx).await?;

        let existing = lock_tariff_row(uow.conn(), id).await?;

        delete_fees(uow.conn(), &existing.fees_ids).await?;
        let fees_ids = insert_fees(uow.conn(), &tariff.fees).await?;

        let row = to_tariff_row(tariff, fees_ids)?;
        sqlx::query(
            r#"
            UPDATE overgold_feeexcluder_tariff SET
                msg_id = $1,
                amount = $2,
                denom = $3,
                min_ref_balance = $4,
                fees_ids = $5
            WHERE id = $6
            "#,
        )
        .bind(row.msg_id)
        .bind(row.amount)
        .bind(row.denom)
        .bind(row.min_ref_balance)
        .bind(row.fees_ids)
        .bind(id)
        .execute(uow.conn())
        .await
        .map_err(StoreError::internal)?;

        uow.commit().await
    }

    /// Delete tariff `id`, then its fee rows. Missing fee rows are tolerated.
    pub async fn delete_tariff(&self, tx: Option<&mut PgTx>, id: i64) -> StoreResult<()> {
        let mut uow = UnitOfWork::begin(&self.pool, tx).await?;

        let existing = lock_tariff_row(uow.conn(), id).await?;

        sqlx::query("DELETE FROM overgold_feeexcluder_tariff WHERE id = $1")
            .bind(id)
            .execute(uow.conn())
            .await
            .map_err(StoreError::internal)?;

        delete_fees(uow.conn(), &existing.fees_ids).await?;

        uow.commit().await
    }

    /// Fee tiers matching `filter`, without their tariff
    pub async fn get_all_fees(&self, filter: &Filter) -> StoreResult<Vec<Fees>> {
        let rows: Vec<FeesRow> =
            store::select(&self.pool, Table::FeeExcluderFees, filter, &[]).await?;
        rows.into_iter().map(to_fees_domain).collect()
    }
}

/// Load tariff row `id` on `conn` together with its fees
pub(super) async fn find_tariff(conn: &mut PgConnection, id: i64) -> StoreResult<Tariff> {
    let row = find_tariff_row(conn, id).await?;
    load_tariff(conn, row).await
}

async fn find_tariff_row(conn: &mut PgConnection, id: i64) -> StoreResult<TariffRow> {
    select_tariff_row(conn, Filter::new().set(Field::Id, id)).await
}

/// Read tariff `id` and hold its row lock, so concurrent writers see each
/// other's `fees_ids`
async fn lock_tariff_row(conn: &mut PgConnection, id: i64) -> StoreResult<TariffRow> {
    select_tariff_row(conn, Filter::new().set(Field::Id, id).for_update()).await
}

async fn select_tariff_row(conn: &mut PgConnection, filter: Filter) -> StoreResult<TariffRow> {
    let rows: Vec<TariffRow> =
        store::select(&mut *conn, Table::FeeExcluderTariff, &filter, &[]).await?;

    single(rows, Table::FeeExcluderTariff)
}

async fn load_tariff(conn: &mut PgConnection, row: TariffRow) -> StoreResult<Tariff> {
    let mut fees = Vec::with_capacity(row.fees_ids.len());

    for fees_id in &row.fees_ids {
        let rows: Vec<FeesRow> = store::select(
            &mut *conn,
            Table::FeeExcluderFees,
            &Filter::new().set(Field::Id, *fees_id),
            &[],
        )
        .await?;

        fees.push(to_fees_domain(single(rows, Table::FeeExcluderFees)?)?);
    }

    to_tariff_domain(row, fees)
}

async fn insert_fees(conn: &mut PgConnection, fees: &[Fees]) -> StoreResult<Vec<i64>> {
    let mut ids = Vec::with_capacity(fees.len());

    for f in fees {
        let row = to_fees_row(f)?;
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO overgold_feeexcluder_fees (
                msg_id, creator, amount_from, fee, ref_reward,
                stake_reward, min_amount, no_ref_reward
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(row.msg_id)
        .bind(row.creator)
        .bind(row.amount_from)
        .bind(row.fee)
        .bind(row.ref_reward)
        .bind(row.stake_reward)
        .bind(row.min_amount)
        .bind(row.no_ref_reward)
        .fetch_one(&mut *conn)
        .await
        .map_err(StoreError::internal)?;

        ids.push(id);
    }

    Ok(ids)
}

async fn delete_fees(conn: &mut PgConnection, ids: &[i64]) -> StoreResult<()> {
    if ids.is_empty() {
        return Ok(());
    }

    sqlx::query("DELETE FROM overgold_feeexcluder_fees WHERE id = ANY($1)")
        .bind(ids)
        .execute(conn)
        .await
        .map_err(StoreError::internal)?;

    Ok(())
}
