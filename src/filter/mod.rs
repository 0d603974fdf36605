//! Filter module
//!
//! Turns a caller-built, flat filter into a parameterized query over one
//! table. Column and table names come only from the fixed symbol tables in
//! `field`; values are always bound positionally.

mod builder;
mod field;

pub use builder::{Filter, Order, Value};
pub use field::{Field, Table};
