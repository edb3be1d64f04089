//! Convenience result type alias for Roombook.

use crate::error::AppError;

/// A specialized `Result` type for Roombook operations.
pub type AppResult<T> = Result<T, AppError>;
