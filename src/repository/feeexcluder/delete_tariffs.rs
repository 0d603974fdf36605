use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::{FromRow, Postgres};

use crate::domain::MsgDeleteTariffs;
use crate::filter::Table;
use crate::repository::{Record, RecordRepository};
use crate::store::StoreResult;

pub type DeleteTariffsRepository = RecordRepository<MsgDeleteTariffs>;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DeleteTariffsRow {
    pub id: i64,
    pub tx_hash: String,
    pub creator: String,
    pub denom: String,
    pub tariff_id: String,
    pub fees_id: String,
}

impl Record for MsgDeleteTariffs {
    type Row = DeleteTariffsRow;
    const TABLE: Table = Table::FeeExcluderDeleteTariffs;
    const COLUMNS: &'static [&'static str] =
        &["tx_hash", "creator", "denom", "tariff_id", "fees_id"];

    fn to_row(hash: &str, m: &Self) -> StoreResult<DeleteTariffsRow> {
        Ok(DeleteTariffsRow {
            id: 0,
            tx_hash: hash.to_string(),
            creator: m.creator.clone(),
            denom: m.denom.clone(),
            tariff_id: m.tariff_id.clone(),
            fees_id: m.fees_id.clone(),
        })
    }

    fn to_domain(row: DeleteTariffsRow) -> StoreResult<Self> {
        Ok(MsgDeleteTariffs {
            creator: row.creator,
            denom: row.denom,
            tariff_id: row.tariff_id,
            fees_id: row.fees_id,
        })
    }

    fn bind<'q>(
        row: DeleteTariffsRow,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        query
            .bind(row.tx_hash)
            .bind(row.creator)
            .bind(row.denom)
            .bind(row.tariff_id)
            .bind(row.fees_id)
    }
}
