//! Fee statistics
//!
//! A stats row owns exactly one daily-stats row through `daily_stats_id`.
//! The daily-stats row is written first and removed last.

use chrono::NaiveDate;
use sqlx::{FromRow, PgConnection, PgPool};

use crate::domain::{Coin, DailyStats, Stats};
use crate::filter::{Field, Filter, Table};
use crate::store::{self, PgTx, StoreError, StoreResult, UnitOfWork};

use super::single;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DailyStatsRow {
    pub id: i64,
    pub amount_with_fee: serde_json::Value,
    pub amount_no_fee: serde_json::Value,
    pub fee: serde_json::Value,
    pub count_with_fee: i32,
    pub count_no_fee: i32,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct StatsRow {
    pub id: String,
    pub date: NaiveDate,
    pub daily_stats_id: i64,
}

fn coins_to_json(coins: &[Coin]) -> StoreResult<serde_json::Value> {
    for coin in coins {
        coin.validate()?;
    }
    Ok(serde_json::to_value(coins)?)
}

fn coins_from_json(value: serde_json::Value) -> StoreResult<Vec<Coin>> {
    let coins: Vec<Coin> = serde_json::from_value(value)?;
    for coin in &coins {
        coin.validate()?;
    }
    Ok(coins)
}

fn to_daily_stats_row(stats: &DailyStats) -> StoreResult<DailyStatsRow> {
    Ok(DailyStatsRow {
        id: 0,
        amount_with_fee: coins_to_json(&stats.amount_with_fee)?,
        amount_no_fee: coins_to_json(&stats.amount_no_fee)?,
        fee: coins_to_json(&stats.fee)?,
        count_with_fee: stats.count_with_fee,
        count_no_fee: stats.count_no_fee,
    })
}

fn to_daily_stats_domain(row: DailyStatsRow) -> StoreResult<DailyStats> {
    Ok(DailyStats {
        amount_with_fee: coins_from_json(row.amount_with_fee)?,
        amount_no_fee: coins_from_json(row.amount_no_fee)?,
        fee: coins_from_json(row.fee)?,
        count_with_fee: row.count_with_fee,
        count_no_fee: row.count_no_fee,
    })
}

fn parse_date(date: &str) -> StoreResult<NaiveDate> {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|e| StoreError::internal(format!("invalid stats date {date:?}: {e}")))
}

fn to_stats_row(stats: &Stats, daily_stats_id: i64) -> StoreResult<StatsRow> {
    Ok(StatsRow {
        id: stats.index.clone(),
        date: parse_date(&stats.date)?,
        daily_stats_id,
    })
}

fn to_stats_domain(row: StatsRow, stats: DailyStats) -> Stats {
    Stats {
        index: row.id,
        date: row.date.format(DATE_FORMAT).to_string(),
        stats,
    }
}

/// Repository for `overgold_feeexcluder_stats` and
/// `overgold_feeexcluder_daily_stats`
#[derive(Debug, Clone)]
pub struct StatsRepository {
    pool: PgPool,
}

impl StatsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Stats matching `filter` with their daily counters. A stats row whose
    /// daily-stats row is missing fails the read with `NotFound`.
    pub async fn get_all_stats(&self, filter: &Filter) -> StoreResult<Vec<Stats>> {
        let mut conn = self.pool.acquire().await.map_err(StoreError::internal)?;

        let rows: Vec<StatsRow> =
            store::select(&mut *conn, Table::FeeExcluderStats, filter, &[]).await?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let daily = find_daily_stats(&mut *conn, row.daily_stats_id).await?;
            result.push(to_stats_domain(row, daily));
        }

        Ok(result)
    }

    pub async fn get_all_daily_stats(&self, filter: &Filter) -> StoreResult<Vec<DailyStats>> {
        let rows: Vec<DailyStatsRow> =
            store::select(&self.pool, Table::FeeExcluderDailyStats, filter, &[]).await?;
        rows.into_iter().map(to_daily_stats_domain).collect()
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Insert a batch of stats atomically
    pub async fn insert(&self, stats: &[Stats]) -> StoreResult<()> {
        if stats.is_empty() {
            return Ok(());
        }

        let mut uow = UnitOfWork::begin(&self.pool, None).await?;
        for s in stats {
            self.insert_stats(Some(uow.tx()), s).await?;
        }
        uow.commit().await?;

        tracing::debug!(count = stats.len(), "Inserted fee stats");
        Ok(())
    }

    /// Insert one stats entry with its daily counters; returns its id
    pub async fn insert_stats(&self, tx: Option<&mut PgTx>, stats: &Stats) -> StoreResult<String> {
        let mut uow = UnitOfWork::begin(&self.pool, tx).await?;

        // 1) owned child
        let daily_stats_id = insert_daily_stats(uow.conn(), &stats.stats).await?;

        // 2) parent, referencing the child
        let row = to_stats_row(stats, daily_stats_id)?;
        let id: String = sqlx::query_scalar(
            r#"
            INSERT INTO overgold_feeexcluder_stats (id, date, daily_stats_id)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(row.id)
        .bind(row.date)
        .bind(row.daily_stats_id)
        .fetch_one(uow.conn())
        .await
        .map_err(StoreError::internal)?;

        uow.commit().await?;
        Ok(id)
    }

    /// Overwrite stats `stats.index` and its daily counters
    pub async fn update_stats(&self, tx: Option<&mut PgTx>, stats: &Stats) -> StoreResult<()> {
        let mut uow = UnitOfWork::begin(&self.pool, tx).await?;

        let existing = find_stats_row(uow.conn(), &stats.index).await?;
        let row = to_stats_row(stats, existing.daily_stats_id)?;

        update_daily_stats(uow.conn(), existing.daily_stats_id, &stats.stats).await?;

        sqlx::query("UPDATE overgold_feeexcluder_stats SET date = $1 WHERE id = $2")
            .bind(row.date)
            .bind(row.id)
            .execute(uow.conn())
            .await
            .map_err(StoreError::internal)?;

        uow.commit().await
    }

    /// Delete stats `id`, then its daily counters. A missing daily-stats row
    /// is tolerated.
    pub async fn delete_stats(&self, tx: Option<&mut PgTx>, id: &str) -> StoreResult<()> {
        let mut uow = UnitOfWork::begin(&self.pool, tx).await?;

        let existing = find_stats_row(uow.conn(), id).await?;

        sqlx::query("DELETE FROM overgold_feeexcluder_stats WHERE id = $1")
            .bind(id)
            .execute(uow.conn())
            .await
            .map_err(StoreError::internal)?;

        sqlx::query("DELETE FROM overgold_feeexcluder_daily_stats WHERE id = $1")
            .bind(existing.daily_stats_id)
            .execute(uow.conn())
            .await
            .map_err(StoreError::internal)?;

        uow.commit().await
    }
}

/// Read stats `id` and hold its row lock
async fn find_stats_row(conn: &mut PgConnection, id: &str) -> StoreResult<StatsRow> {
    let rows: Vec<StatsRow> = store::select(
        conn,
        Table::FeeExcluderStats,
        &Filter::new().set(Field::Id, id).for_update(),
        &[],
    )
    .await?;

    single(rows, Table::FeeExcluderStats)
}

async fn find_daily_stats(conn: &mut PgConnection, id: i64) -> StoreResult<DailyStats> {
    let rows: Vec<DailyStatsRow> = store::select(
        conn,
        Table::FeeExcluderDailyStats,
        &Filter::new().set(Field::Id, id),
        &[],
    )
    .await?;

    to_daily_stats_domain(single(rows, Table::FeeExcluderDailyStats)?)
}

async fn insert_daily_stats(conn: &mut PgConnection, stats: &DailyStats) -> StoreResult<i64> {
    let row = to_daily_stats_row(stats)?;

    sqlx::query_scalar(
        r#"
        INSERT INTO overgold_feeexcluder_daily_stats (
            amount_with_fee, amount_no_fee, fee, count_with_fee, count_no_fee
        )
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(row.amount_with_fee)
    .bind(row.amount_no_fee)
    .bind(row.fee)
    .bind(row.count_with_fee)
    .bind(row.count_no_fee)
    .fetch_one(conn)
    .await
    .map_err(StoreError::internal)
}

async fn update_daily_stats(
    conn: &mut PgConnection,
    id: i64,
    stats: &DailyStats,
) -> StoreResult<()> {
    let row = to_daily_stats_row(stats)?;

    let updated = sqlx::query(
        r#"
        UPDATE overgold_feeexcluder_daily_stats SET
            amount_with_fee = $1,
            amount_no_fee = $2,
            fee = $3,
            count_with_fee = $4,
            count_no_fee = $5
        WHERE id = $6
        "#,
    )
    .bind(row.amount_with_fee)
    .bind(row.amount_no_fee)
    .bind(row.fee)
    .bind(row.count_with_fee)
    .bind(row.count_no_fee)
    .bind(id)
    .execute(conn)
    .await
    .map_err(StoreError::internal)?
    .rows_affected();

    if updated == 0 {
        return Err(StoreError::not_found(Table::FeeExcluderDailyStats.name()));
    }

    Ok(())
}
