//! Create-tariffs messages
//!
//! Each message row owns one tariff through `tariff_id`. Writes cascade into
//! the tariff and its fee tiers inside the same transaction.

use async_trait::async_trait;
use sqlx::{FromRow, PgConnection, PgPool};

use crate::domain::MsgCreateTariffs;
use crate::filter::{Field, Filter, Table};
use crate::repository::Repository;
use crate::store::{self, StoreError, StoreResult, UnitOfWork};

use super::single;
use super::tariffs::{find_tariff, TariffRepository};

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct CreateTariffsRow {
    pub id: i64,
    pub tx_hash: String,
    pub creator: String,
    pub denom: String,
    pub tariff_id: i64,
}

/// Repository for `overgold_feeexcluder_create_tariffs`
#[derive(Debug, Clone)]
pub struct CreateTariffsRepository {
    pool: PgPool,
    tariffs: TariffRepository,
}

impl CreateTariffsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            tariffs: TariffRepository::new(pool.clone()),
            pool,
        }
    }
}

async fn find_row(conn: &mut PgConnection, id: i64) -> StoreResult<CreateTariffsRow> {
    let rows: Vec<CreateTariffsRow> = store::select(
        conn,
        Table::FeeExcluderCreateTariffs,
        &Filter::new().set(Field::Id, id).for_update(),
        &[],
    )
    .await?;

    single(rows, Table::FeeExcluderCreateTariffs)
}

#[async_trait]
impl Repository for CreateTariffsRepository {
    type Entity = MsgCreateTariffs;
    type Id = i64;

    async fn get_all(&self, filter: &Filter) -> StoreResult<Vec<MsgCreateTariffs>> {
        let mut conn = self.pool.acquire().await.map_err(StoreError::internal)?;

        let rows: Vec<CreateTariffsRow> =
            store::select(&mut *conn, Table::FeeExcluderCreateTariffs, filter, &[]).await?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let tariff = find_tariff(&mut *conn, row.tariff_id).await?;
            result.push(MsgCreateTariffs {
                creator: row.creator,
                denom: row.denom,
                tariff,
            });
        }

        Ok(result)
    }

    async fn insert(&self, hash: &str, msgs: &[MsgCreateTariffs]) -> StoreResult<()> {
        if msgs.is_empty() || hash.is_empty() {
            return Ok(());
        }

        let mut uow = UnitOfWork::begin(&self.pool, None).await?;

        for msg in msgs {
            let tariff_id = self.tariffs.insert_tariff(Some(uow.tx()), &msg.tariff).await?;

            sqlx::query(
                r#"
                INSERT INTO overgold_feeexcluder_create_tariffs (
                    tx_hash, creator, denom, tariff_id
                )
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(hash)
            .bind(&msg.creator)
            .bind(&msg.denom)
            .bind(tariff_id)
            .execute(uow.conn())
            .await
            .map_err(StoreError::internal)?;
        }

        uow.commit().await?;

        tracing::debug!(tx_hash = %hash, count = msgs.len(), "Inserted create-tariffs messages");
        Ok(())
    }

    async fn update(&self, hash: &str, id: i64, msgs: &[MsgCreateTariffs]) -> StoreResult<()> {
        if msgs.is_empty() {
            return Ok(());
        }

        let mut uow = UnitOfWork::begin(&self.pool, None).await?;

        let existing = find_row(uow.conn(), id).await?;

        for msg in msgs {
            self.tariffs
                .update_tariff(Some(uow.tx()), existing.tariff_id, &msg.tariff)
                .await?;

            sqlx::query(
                r#"
                UPDATE overgold_feeexcluder_create_tariffs SET
                    tx_hash = $1,
                    creator = $2,
                    denom = $3
                WHERE id = $4
                "#,
            )
            .bind(hash)
            .bind(&msg.creator)
            .bind(&msg.denom)
            .bind(id)
            .execute(uow.conn())
            .await
            .map_err(StoreError::internal)?;
        }

        uow.commit().await
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        let mut uow = UnitOfWork::begin(&self.pool, None).await?;

        let existing = find_row(uow.conn(), id).await?;

        sqlx::query("DELETE FROM overgold_feeexcluder_create_tariffs WHERE id = $1")
            .bind(id)
            .execute(uow.conn())
            .await
            .map_err(StoreError::internal)?;

        // the owned tariff may already be gone
        match self.tariffs.delete_tariff(Some(uow.tx()), existing.tariff_id).await {
            Err(e) if e.is_not_found() => {}
            other => other?,
        }

        uow.commit().await
    }
}
