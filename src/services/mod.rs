pub mod errors;
pub mod resolver;
pub mod suggestions;

pub use errors::{ServiceError, ServiceResult};
