//! Separates recoverable validation failures from everything else

use crate::error::{AppError, AppResult, FieldError, StoreError};

/// Field errors for a rejected submission.
///
/// Only `StoreError::Validation` is recoverable. Any other failure is
/// returned as an `AppError` so the caller forwards it with `?`.
pub fn recover(err: StoreError) -> AppResult<Vec<FieldError>> {
    match err {
        StoreError::Validation(errors) => Ok(errors),
        other => Err(AppError::from(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failures_are_recovered() {
        let errors = vec![FieldError::new("title", "required")];
        assert_eq!(recover(StoreError::Validation(errors.clone())).unwrap(), errors);
    }

    #[test]
    fn other_failures_are_re_raised() {
        assert!(matches!(recover(StoreError::NotFound), Err(AppError::NotFound(_))));
        assert!(matches!(
            recover(StoreError::Database(sqlx::Error::PoolTimedOut)),
            Err(AppError::Database(_))
        ));
    }
}
