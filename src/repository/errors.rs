use diesel::r2d2::PoolError;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

use crate::domain::approval::ApprovalError;
use crate::domain::delivery_assignment::TransitionError;
use crate::domain::order::OrderStateError;

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Failures surfaced by [`DieselRepository`](super::DieselRepository).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error: {0}")]
    Connection(#[from] PoolError),
    #[error("database error: {0}")]
    Database(DieselError),
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("record not found")]
    NotFound,
    #[error("invalid stored value: {0}")]
    InvalidData(String),
    /// The approval was refused and rolled back.
    #[error(transparent)]
    Approval(#[from] ApprovalError),
    /// The order's status does not allow the change.
    #[error(transparent)]
    OrderState(#[from] OrderStateError),
    /// A delivery assignment could not move to the requested state.
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl From<DieselError> for RepositoryError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => RepositoryError::NotFound,
            DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation
                | DatabaseErrorKind::ForeignKeyViolation
                | DatabaseErrorKind::CheckViolation
                | DatabaseErrorKind::NotNullViolation,
                info,
            ) => RepositoryError::ConstraintViolation(info.message().to_string()),
            other => RepositoryError::Database(other),
        }
    }
}
