use thiserror::Error;

/// Failures of a product lookup, as reported to the presentation layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// No product carries the scanned identifier.
    #[error("product not found")]
    NotFound,
    /// The store could not be queried.
    #[error("product store unavailable")]
    StoreUnavailable,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
