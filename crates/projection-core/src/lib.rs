pub mod calculators;
pub mod error;
pub mod time_value;
pub mod types;

pub use error::ProjectionError;
pub use types::*;

/// Standard result type for all projection operations
pub type ProjectionResult<T> = Result<T, ProjectionError>;
