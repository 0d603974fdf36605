//! Fee excluder tables
//!
//! Composite entities: a create-tariffs message owns a tariff, a tariff owns
//! its fee tiers, and a stats entry owns its daily counters.

mod create_tariffs;
mod delete_tariffs;
mod stats;
mod tariffs;

pub use create_tariffs::CreateTariffsRepository;
pub use delete_tariffs::DeleteTariffsRepository;
pub use stats::StatsRepository;
pub use tariffs::TariffRepository;

use crate::filter::Table;
use crate::store::{StoreError, StoreResult};

/// The one row of a lookup by primary key
fn single<T>(rows: Vec<T>, table: Table) -> StoreResult<T> {
    let count = rows.len();
    let mut rows = rows.into_iter();

    match (rows.next(), count) {
        (Some(row), 1) => Ok(row),
        (None, _) => Err(StoreError::not_found(table.name())),
        (Some(_), n) => Err(StoreError::internal(format!(
            "expected one row in {}, got {}",
            table.name(),
            n
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single() {
        assert_eq!(single(vec![1], Table::FeeExcluderTariff), Ok(1));
        assert!(single::<i32>(vec![], Table::FeeExcluderTariff)
            .unwrap_err()
            .is_not_found());
        assert!(matches!(
            single(vec![1, 2], Table::FeeExcluderTariff),
            Err(StoreError::Internal { .. })
        ));
    }
}
