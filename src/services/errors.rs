use thiserror::Error;

use crate::domain::approval::ApprovalError;
use crate::domain::delivery_assignment::TransitionError;
use crate::repository::RepositoryError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures returned by the service layer and translated into HTTP responses
/// by the routes.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The caller is logged in but lacks the role or does not own the record.
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    /// Invalid input. The message is shown to the user as is.
    #[error("{0}")]
    Form(String),
    /// The request clashes with the stored state, for example a refused approval.
    #[error("{0}")]
    Conflict(String),
    /// A delivery assignment transition was refused.
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::ConstraintViolation(message) => ServiceError::Conflict(message),
            RepositoryError::Approval(err @ ApprovalError::EmptyOrder(_)) => {
                ServiceError::Form(err.to_string())
            }
            RepositoryError::Approval(err) => ServiceError::Conflict(err.to_string()),
            RepositoryError::OrderState(err) => ServiceError::Conflict(err.to_string()),
            RepositoryError::Transition(err) => ServiceError::Transition(err),
            other @ (RepositoryError::Connection(_)
            | RepositoryError::Database(_)
            | RepositoryError::InvalidData(_)) => ServiceError::Internal(other.to_string()),
        }
    }
}
