//! Result type alias for goform
//!
//! Convenience alias using [`GoFormError`] as the error type. Form
//! validation outcomes deliberately do not use this alias: validation
//! failures are data (a [`crate::form::FormErrors`] tree), not errors.

use super::errors::GoFormError;

/// Result type alias for goform operations
///
/// # Examples
///
/// ```
/// use goform::domain::result::Result;
/// use goform::domain::errors::GoFormError;
///
/// fn checked(path: &str) -> Result<()> {
///     if path.is_empty() {
///         return Err(GoFormError::Validation("empty path".to_string()));
///     }
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, GoFormError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::GoFormError;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(GoFormError::Validation("test error".to_string()));
        assert!(result.is_err());
    }
}
