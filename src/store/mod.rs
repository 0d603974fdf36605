//! Store module
//!
//! Error taxonomy, transaction scoping and the filtered read shared by all
//! repositories.

mod error;
mod unit_of_work;

pub use error::{StoreError, StoreResult};
pub use unit_of_work::{PgTx, UnitOfWork};

use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::{Executor, FromRow, Postgres};

use crate::filter::{Field, Filter, Table, Value};

/// Bind filter arguments in placeholder order
pub(crate) fn bind_values<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    values: Vec<Value>,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for value in values {
        query = match value {
            Value::Text(v) => query.bind(v),
            Value::Int(v) => query.bind(v),
            Value::Decimal(v) => query.bind(v),
            Value::Bool(v) => query.bind(v),
            Value::Date(v) => query.bind(v),
        };
    }
    query
}

/// Run `filter` against `table` and return every matching row.
///
/// Zero rows is reported as `NotFound`, never as an empty success.
pub(crate) async fn select<'c, E, R>(
    executor: E,
    table: Table,
    filter: &Filter,
    allowed: &[Field],
) -> StoreResult<Vec<R>>
where
    E: Executor<'c, Database = Postgres>,
    R: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let (query, args) = filter.build(table, allowed);

    let rows: Vec<R> = bind_values(sqlx::query_as::<_, R>(&query), args)
        .fetch_all(executor)
        .await
        .map_err(|e| StoreError::from_sqlx(e, table.name()))?;

    if rows.is_empty() {
        return Err(StoreError::not_found(table.name()));
    }

    Ok(rows)
}
