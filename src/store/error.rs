//! Store Errors
//!
//! The closed error taxonomy reported by every repository.

use crate::domain::AmountError;

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can cross the repository boundary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A read matched zero rows, or a referenced parent row is absent
    #[error("not found: {what}")]
    NotFound { what: String },

    /// Storage-layer failure the caller cannot recover from locally
    #[error("internal error: {cause}")]
    Internal { cause: String },
}

impl StoreError {
    pub fn not_found(what: impl Into<String>) -> Self {
        StoreError::NotFound { what: what.into() }
    }

    pub fn internal(cause: impl ToString) -> Self {
        StoreError::Internal {
            cause: cause.to_string(),
        }
    }

    /// Classify a driver error observed while touching `what`.
    ///
    /// "No rows" becomes `NotFound`; everything else is wrapped as `Internal`
    /// with the driver message kept as diagnostic text.
    pub fn from_sqlx(err: sqlx::Error, what: &str) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::not_found(what),
            other => StoreError::internal(other),
        }
    }

    /// Check if this error reports absence
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

impl From<AmountError> for StoreError {
    fn from(err: AmountError) -> Self {
        StoreError::internal(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::internal(err)
    }
}
