//! Flat record repository
//!
//! Every single-table message family is described by a `Record` impl and
//! served by the same generic repository.

use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{FromRow, PgPool, Postgres};
use std::marker::PhantomData;

use crate::filter::{Filter, Table};
use crate::store::{self, PgTx, StoreError, StoreResult, UnitOfWork};

use super::Repository;

/// Storage description of a flat message family
pub trait Record: Sized + Send + Sync + 'static {
    /// Stored row shape
    type Row: for<'r> FromRow<'r, PgRow> + Send + Unpin;

    const TABLE: Table;

    /// Columns written on insert and update, in bind order. Excludes `id`.
    const COLUMNS: &'static [&'static str];

    /// Map to the row shape. `hash` is the provenance transaction hash.
    fn to_row(hash: &str, record: &Self) -> StoreResult<Self::Row>;

    /// Map a stored row back. Fails with `Internal` on malformed data.
    fn to_domain(row: Self::Row) -> StoreResult<Self>;

    /// Bind the row's `COLUMNS` values in order
    fn bind<'q>(
        row: Self::Row,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments>;
}

fn insert_statement(table: Table, columns: &[&str]) -> String {
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("${}", i)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.name(),
        columns.join(", "),
        placeholders.join(", ")
    )
}

fn update_statement(table: Table, columns: &[&str]) -> String {
    let assignments: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{} = ${}", column, i + 1))
        .collect();
    format!(
        "UPDATE {} SET {} WHERE id = ${}",
        table.name(),
        assignments.join(", "),
        columns.len() + 1
    )
}

fn delete_statement(table: Table) -> String {
    format!("DELETE FROM {} WHERE id = $1", table.name())
}

/// Repository over one `Record` family
pub struct RecordRepository<R> {
    pool: PgPool,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for RecordRepository<R> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _record: PhantomData,
        }
    }
}

impl<R: Record> RecordRepository<R> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }

    pub(crate) fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Insert inside `tx` when given, otherwise in a transaction of its own.
    /// Nothing is written without a transaction hash.
    pub async fn insert_in(
        &self,
        tx: Option<&mut PgTx>,
        hash: &str,
        records: &[R],
    ) -> StoreResult<()> {
        if records.is_empty() || hash.is_empty() {
            return Ok(());
        }

        let mut uow = UnitOfWork::begin(&self.pool, tx).await?;
        let query = insert_statement(R::TABLE, R::COLUMNS);

        for record in records {
            let row = R::to_row(hash, record)?;
            R::bind(row, sqlx::query(&query))
                .execute(uow.conn())
                .await
                .map_err(StoreError::internal)?;
        }

        uow.commit().await?;

        tracing::debug!(table = %R::TABLE, count = records.len(), "Inserted records");
        Ok(())
    }

    pub async fn update_in(
        &self,
        tx: Option<&mut PgTx>,
        hash: &str,
        id: i64,
        records: &[R],
    ) -> StoreResult<()> {
        if records.is_empty() {
            return Ok(());
        }

        let mut uow = UnitOfWork::begin(&self.pool, tx).await?;
        let query = update_statement(R::TABLE, R::COLUMNS);

        for record in records {
            let row = R::to_row(hash, record)?;
            let updated = R::bind(row, sqlx::query(&query))
                .bind(id)
                .execute(uow.conn())
                .await
                .map_err(StoreError::internal)?
                .rows_affected();

            if updated == 0 {
                return Err(StoreError::not_found(R::TABLE.name()));
            }
        }

        uow.commit().await
    }

    pub async fn delete_in(&self, tx: Option<&mut PgTx>, id: i64) -> StoreResult<()> {
        let mut uow = UnitOfWork::begin(&self.pool, tx).await?;

        let deleted = sqlx::query(&delete_statement(R::TABLE))
            .bind(id)
            .execute(uow.conn())
            .await
            .map_err(StoreError::internal)?
            .rows_affected();

        if deleted == 0 {
            return Err(StoreError::not_found(R::TABLE.name()));
        }

        uow.commit().await
    }
}

#[async_trait]
impl<R: Record> Repository for RecordRepository<R> {
    type Entity = R;
    type Id = i64;

    async fn get_all(&self, filter: &Filter) -> StoreResult<Vec<R>> {
        let rows: Vec<R::Row> = store::select(&self.pool, R::TABLE, filter, &[]).await?;
        rows.into_iter().map(R::to_domain).collect()
    }

    async fn insert(&self, hash: &str, entities: &[R]) -> StoreResult<()> {
        self.insert_in(None, hash, entities).await
    }

    async fn update(&self, hash: &str, id: i64, entities: &[R]) -> StoreResult<()> {
        self.update_in(None, hash, id, entities).await
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        self.delete_in(None, id).await
    }
}
