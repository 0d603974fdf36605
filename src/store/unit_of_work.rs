//! Unit of Work
//!
//! Scoped transaction handle. A unit either owns a freshly begun transaction
//! or borrows one handed in by a caller that is folding this operation into a
//! larger write.

use sqlx::{PgConnection, PgPool, Postgres, Transaction};

use super::{StoreError, StoreResult};

/// Transaction type shared by every repository
pub type PgTx = Transaction<'static, Postgres>;

/// Transaction scope for one write operation.
///
/// Only an owned unit ever finalizes the transaction. An owned unit that is
/// dropped without `commit` is rolled back by the driver, so every early
/// return and every `?` releases it.
pub enum UnitOfWork<'a> {
    Owned(PgTx),
    Borrowed(&'a mut PgTx),
}

impl<'a> UnitOfWork<'a> {
    /// Reuse `existing` when given, otherwise begin a new transaction.
    pub async fn begin(pool: &PgPool, existing: Option<&'a mut PgTx>) -> StoreResult<Self> {
        match existing {
            Some(tx) => Ok(UnitOfWork::Borrowed(tx)),
            None => {
                let tx = pool.begin().await.map_err(StoreError::internal)?;
                Ok(UnitOfWork::Owned(tx))
            }
        }
    }

    /// Whether this unit must finalize the transaction
    pub fn is_owned(&self) -> bool {
        matches!(self, UnitOfWork::Owned(_))
    }

    /// Connection to execute statements on
    pub fn conn(&mut self) -> &mut PgConnection {
        match self {
            UnitOfWork::Owned(tx) => &mut **tx,
            UnitOfWork::Borrowed(tx) => &mut ***tx,
        }
    }

    /// Underlying transaction, for handing to a nested repository call
    pub fn tx(&mut self) -> &mut PgTx {
        match self {
            UnitOfWork::Owned(tx) => tx,
            UnitOfWork::Borrowed(tx) => &mut **tx,
        }
    }

    /// Commit if owned. A borrowed unit leaves the decision to its owner.
    pub async fn commit(self) -> StoreResult<()> {
        match self {
            UnitOfWork::Owned(tx) => tx.commit().await.map_err(StoreError::internal),
            UnitOfWork::Borrowed(_) => Ok(()),
        }
    }

    /// Roll back if owned.
    pub async fn rollback(self) -> StoreResult<()> {
        match self {
            UnitOfWork::Owned(tx) => tx.rollback().await.map_err(StoreError::internal),
            UnitOfWork::Borrowed(_) => Ok(()),
        }
    }
}
