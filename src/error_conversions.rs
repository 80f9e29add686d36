//! Error conversion glue between layers.
//!
//! The domain layer must not depend on repository or service error types, so
//! the conversions live here.

use crate::repository::RepositoryError;
use crate::services::ServiceError;

impl From<RepositoryError> for ServiceError {
    fn from(_: RepositoryError) -> Self {
        ServiceError::StoreUnavailable
    }
}

#[cfg(feature = "scanner")]
impl From<reqwest::Error> for RepositoryError {
    fn from(val: reqwest::Error) -> Self {
        if val.is_decode() {
            RepositoryError::Decode(val.to_string())
        } else if let Some(status) = val.status() {
            RepositoryError::Status {
                status: status.as_u16(),
                message: val.to_string(),
            }
        } else {
            RepositoryError::Transport(val.to_string())
        }
    }
}
