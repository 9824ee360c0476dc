use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::pooled_connection::deadpool::PoolError;
use thiserror::Error;

/// Errors surfaced by the store layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A lookup that required a row matched nothing.
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// A write was rejected by a unique constraint.
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// A write referenced a row that does not exist.
    #[error("foreign key constraint violated: {constraint}")]
    ForeignKeyViolation { constraint: String },

    /// Checking out a pooled connection failed.
    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),

    /// The store could not be brought up (pool construction, first checkout).
    #[error("store initialization failed: {0}")]
    Initialization(String),

    /// Any other database error, passed through unchanged.
    #[error("database error: {0}")]
    Database(DieselError),
}

impl StoreError {
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation { .. })
    }
}

impl From<DieselError> for StoreError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Self::not_found("record"),
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::UniqueViolation {
                    constraint: info.constraint_name().unwrap_or("unknown").to_string(),
                }
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                Self::ForeignKeyViolation {
                    constraint: info.constraint_name().unwrap_or("unknown").to_string(),
                }
            }
            other => {
                tracing::error!(?other, "database error");
                Self::Database(other)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_not_found() {
        let err: StoreError = DieselError::NotFound.into();
        assert!(err.is_not_found());
    }

    #[test]
    fn maps_unique_violation() {
        // `String` implements `DatabaseErrorInformation` (message only, no
        // constraint name), which is enough to exercise the mapping.
        let diesel_err = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value".to_string()),
        );
        let err: StoreError = diesel_err.into();
        assert!(err.is_unique_violation());
        match err {
            StoreError::UniqueViolation { constraint } => assert_eq!(constraint, "unknown"),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn maps_foreign_key_violation() {
        let diesel_err = DieselError::DatabaseError(
            DatabaseErrorKind::ForeignKeyViolation,
            Box::new("violates foreign key".to_string()),
        );
        match StoreError::from(diesel_err) {
            StoreError::ForeignKeyViolation { .. } => {}
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn passes_through_other_errors() {
        let err: StoreError = DieselError::RollbackTransaction.into();
        match err {
            StoreError::Database(DieselError::RollbackTransaction) => {}
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
