//! Filter construction and query building

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{Field, Table};

/// Comparison value bound to a placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Int(i64),
    Decimal(Decimal),
    Bool(bool),
    Date(NaiveDate),
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

/// A single filter term
#[derive(Debug, Clone, PartialEq)]
enum Condition {
    Eq(Value),
    /// Inclusive bounds; a missing bound is open
    Range {
        from: Option<Value>,
        to: Option<Value>,
    },
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    fn keyword(self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

/// Flat, field-level read query.
///
/// Terms keep insertion order; setting a field twice replaces the first value
/// in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    terms: Vec<(Field, Condition)>,
    order: Option<(Field, Order)>,
    limit: Option<i64>,
    offset: Option<i64>,
    for_update: bool,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Equality on `field`
    pub fn set(self, field: Field, value: impl Into<Value>) -> Self {
        self.put(field, Condition::Eq(value.into()))
    }

    /// Inclusive range on `field`
    pub fn set_range(self, field: Field, from: Option<Value>, to: Option<Value>) -> Self {
        self.put(field, Condition::Range { from, to })
    }

    pub fn order_by(mut self, field: Field, order: Order) -> Self {
        self.order = Some((field, order));
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Lock the selected rows until the surrounding transaction ends
    pub fn for_update(mut self) -> Self {
        self.for_update = true;
        self
    }

    fn put(mut self, field: Field, condition: Condition) -> Self {
        match self.terms.iter_mut().find(|(f, _)| *f == field) {
            Some(term) => term.1 = condition,
            None => self.terms.push((field, condition)),
        }
        self
    }

    /// Build a parameterized `SELECT` over `table`.
    ///
    /// A term is emitted only when its field belongs to the table and, if
    /// `allowed` is non-empty, to `allowed` as well. Everything else is
    /// dropped. An empty filter selects the whole table; no implicit limit
    /// is applied.
    pub fn build(&self, table: Table, allowed: &[Field]) -> (String, Vec<Value>) {
        let permits = |field: Field| {
            table.fields().contains(&field) && (allowed.is_empty() || allowed.contains(&field))
        };

        let mut args: Vec<Value> = Vec::new();
        let mut predicates: Vec<String> = Vec::new();

        for (field, condition) in &self.terms {
            if !permits(*field) {
                continue;
            }

            match condition {
                Condition::Eq(value) => {
                    args.push(value.clone());
                    predicates.push(format!("{} = {}", field.column(), field.placeholder(args.len())));
                }
                Condition::Range { from, to } => {
                    if !field.is_range_capable() {
                        continue;
                    }
                    if let Some(value) = from {
                        args.push(value.clone());
                        predicates.push(format!(
                            "{} >= {}",
                            field.column(),
                            field.placeholder(args.len())
                        ));
                    }
                    if let Some(value) = to {
                        args.push(value.clone());
                        predicates.push(format!(
                            "{} <= {}",
                            field.column(),
                            field.placeholder(args.len())
                        ));
                    }
                }
            }
        }

        let mut query = format!("SELECT * FROM {}", table.name());

        if !predicates.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&predicates.join(" AND "));
        }

        if let Some((field, order)) = self.order {
            if permits(field) {
                query.push_str(&format!(" ORDER BY {} {}", field.column(), order.keyword()));
            }
        }

        if let Some(limit) = self.limit {
            args.push(Value::Int(limit));
            query.push_str(&format!(" LIMIT ${}", args.len()));
        }

        if let Some(offset) = self.offset {
            args.push(Value::Int(offset));
            query.push_str(&format!(" OFFSET ${}", args.len()));
        }

        if self.for_update {
            query.push_str(" FOR UPDATE");
        }

        (query, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_selects_all() {
        let (query, args) = Filter::new().build(Table::StakeBuy, &[]);
        assert_eq!(query, "SELECT * FROM overgold_stake_buy");
        assert!(args.is_empty());
    }

    #[test]
    fn test_terms_keep_insertion_order() {
        let (query, args) = Filter::new()
            .set(Field::Creator, "ovg1creator")
            .set(Field::TxHash, "ABC")
            .build(Table::StakeBuy, &[]);

        assert_eq!(
            query,
            "SELECT * FROM overgold_stake_buy WHERE creator = $1 AND tx_hash = $2"
        );
        assert_eq!(args, vec![Value::from("ovg1creator"), Value::from("ABC")]);
    }

    #[test]
    fn test_second_set_overwrites_first() {
        let filter = Filter::new()
            .set(Field::Creator, "first")
            .set(Field::TxHash, "hash")
            .set(Field::Creator, "second");

        let (query, args) = filter.build(Table::StakeBuy, &[]);
        assert_eq!(
            query,
            "SELECT * FROM overgold_stake_buy WHERE creator = $1 AND tx_hash = $2"
        );
        assert_eq!(args[0], Value::from("second"));
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_fields_outside_table_are_excluded() {
        let (query, args) = Filter::new()
            .set(Field::PublicKey, "pk")
            .set(Field::Creator, "ovg1creator")
            .build(Table::StakeBuy, &[]);

        assert_eq!(query, "SELECT * FROM overgold_stake_buy WHERE creator = $1");
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn test_explicit_allow_list_restricts_fields() {
        let (query, args) = Filter::new()
            .set(Field::Creator, "ovg1creator")
            .set(Field::Address, "ovg1address")
            .set(Field::Hash, "h")
            .build(Table::AccountsAccountMigrate, &[Field::Address, Field::Hash]);

        assert_eq!(
            query,
            "SELECT * FROM vipcoin_chain_accounts_account_migrate WHERE address = $1 AND hash = $2"
        );
        assert_eq!(args, vec![Value::from("ovg1address"), Value::from("h")]);
    }

    #[test]
    fn test_range_terms() {
        let (query, args) = Filter::new()
            .set_range(Field::Height, Some(Value::Int(10)), Some(Value::Int(20)))
            .set_range(Field::Id, None, Some(Value::Int(5)))
            .build(Table::Message, &[]);

        assert_eq!(
            query,
            "SELECT * FROM message WHERE height >= $1::bigint AND height <= $2::bigint AND id <= $3"
        );
        assert_eq!(args, vec![Value::Int(10), Value::Int(20), Value::Int(5)]);
    }

    #[test]
    fn test_range_on_plain_field_is_excluded() {
        let (query, args) = Filter::new()
            .set_range(Field::Creator, Some(Value::from("a")), None)
            .build(Table::StakeBuy, &[]);

        assert_eq!(query, "SELECT * FROM overgold_stake_buy");
        assert!(args.is_empty());
    }

    #[test]
    fn test_order_limit_offset() {
        let (query, args) = Filter::new()
            .set(Field::Creator, "c")
            .order_by(Field::Id, Order::Desc)
            .limit(10)
            .offset(20)
            .build(Table::StakeSell, &[]);

        assert_eq!(
            query,
            "SELECT * FROM overgold_stake_sell WHERE creator = $1 ORDER BY id DESC LIMIT $2 OFFSET $3"
        );
        assert_eq!(args, vec![Value::from("c"), Value::Int(10), Value::Int(20)]);
    }

    #[test]
    fn test_typed_columns_accept_text_values() {
        let (query, args) = Filter::new()
            .set(Field::Date, "2024-03-01")
            .build(Table::FeeExcluderStats, &[]);
        assert_eq!(
            query,
            "SELECT * FROM overgold_feeexcluder_stats WHERE date = $1::date"
        );
        assert_eq!(args, vec![Value::from("2024-03-01")]);

        let (query, _) = Filter::new()
            .set(Field::Amount, "1000000")
            .set_range(Field::Id, Some(Value::Int(2)), None)
            .build(Table::StakeBuy, &[]);
        assert_eq!(
            query,
            "SELECT * FROM overgold_stake_buy WHERE amount = $1::numeric AND id >= $2"
        );
    }

    #[test]
    fn test_for_update_locks_after_limit() {
        let (query, _) = Filter::new()
            .set(Field::Id, 3i64)
            .limit(1)
            .for_update()
            .build(Table::FeeExcluderTariff, &[]);

        assert_eq!(
            query,
            "SELECT * FROM overgold_feeexcluder_tariff WHERE id = $1 LIMIT $2 FOR UPDATE"
        );
    }

    #[test]
    fn test_order_on_disallowed_field_is_ignored() {
        let (query, _) = Filter::new()
            .order_by(Field::PublicKey, Order::Asc)
            .build(Table::StakeBuy, &[]);

        assert_eq!(query, "SELECT * FROM overgold_stake_buy");
    }

    #[test]
    fn test_build_does_not_mutate_filter() {
        let filter = Filter::new().set(Field::Id, 1i64);
        let before = filter.clone();
        let _ = filter.build(Table::StakeBuy, &[]);
        let _ = filter.build(Table::StakeSell, &[Field::Id]);
        assert_eq!(filter, before);
    }
}
