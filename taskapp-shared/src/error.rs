/// Domain errors raised by the service layer
///
/// Each variant maps to one HTTP status in the API crate; the message is
/// what the client sees, except for [`ServiceError::Internal`].

use crate::auth::jwt::JwtError;
use crate::auth::password::PasswordError;
use crate::models::page::PageError;
use crate::models::task::ParseEnumError;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    /// Credentials did not match an account
    #[error("{0}")]
    Unauthenticated(String),

    /// Anything the client cannot fix; details are logged, not returned
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ServiceError::Forbidden(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ServiceError::BadRequest(message.into())
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation { .. } => {
                ServiceError::Conflict("Resource already exists".to_string())
            }
            StoreError::ForeignKeyViolation { .. } => {
                ServiceError::NotFound("Resource not found".to_string())
            }
            StoreError::Database(e) => ServiceError::Internal(e.to_string()),
        }
    }
}

impl From<ParseEnumError> for ServiceError {
    fn from(err: ParseEnumError) -> Self {
        ServiceError::BadRequest(err.to_string())
    }
}

impl From<PageError> for ServiceError {
    fn from(err: PageError) -> Self {
        ServiceError::BadRequest(err.to_string())
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

impl From<JwtError> for ServiceError {
    fn from(err: JwtError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
