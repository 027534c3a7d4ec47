//! Error types for Bookshelf server
//!
//! `StoreError` is raised at the storage boundary, `AppError` at the handler
//! boundary. `AppError::into_response` is the single place where failures
//! become user-visible error pages.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::views;

/// One field-level validation message, as shown next to a form input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Failures reported by a `BookStore`
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    /// Target of `From<StoreError>` for a validation failure with no form to
    /// re-render. Create and update recover these through
    /// `services::validation::recover` before they get here, so this only
    /// shows if a store starts validating on reads or deletes.
    #[error("Validation error")]
    Validation(Vec<FieldError>),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

impl AppError {
    /// The "not found" signal, status 404 with the default message
    pub fn not_found() -> Self {
        AppError::NotFound("Not Found".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Database(_) | AppError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the user
    fn public_message(&self) -> String {
        match self {
            AppError::NotFound(msg) => msg.clone(),
            AppError::Validation(errors) => errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            _ => "Internal Server Error".to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::not_found(),
            StoreError::Validation(errors) => AppError::Validation(errors),
            StoreError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::NotFound(msg) => tracing::debug!("Not found: {}", msg),
            AppError::Validation(errors) => tracing::warn!("Unrecovered validation error: {:?}", errors),
            AppError::Database(e) => tracing::error!("Database error: {:?}", e),
            AppError::Template(e) => tracing::error!("Template error: {:#}", e),
        }

        error_page(status, &self.public_message())
    }
}

/// Render the error page, falling back to plain text if the template itself fails
pub fn error_page(status: StatusCode, message: &str) -> Response {
    match views::render_error(status, message) {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render error page: {:#}", e);
            (status, format!("{} {}", status.as_u16(), message)).into_response()
        }
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
