//! Result type alias for Ferry

use super::errors::FerryError;

/// Result type alias for Ferry operations
///
/// # Examples
///
/// ```
/// use ferry::domain::result::Result;
/// use ferry::domain::errors::FerryError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(FerryError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, FerryError>;
