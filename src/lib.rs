//! chain_indexer Library
//!
//! Persists decoded chain messages into PostgreSQL behind filtered,
//! transactional repositories.

pub mod config;
pub mod db;
pub mod domain;
mod error;
pub mod filter;
pub mod jobs;
pub mod modules;
pub mod repository;
pub mod store;
pub mod worker;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use filter::{Field, Filter, Order, Table, Value};
pub use store::{StoreError, StoreResult, UnitOfWork};
