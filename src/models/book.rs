//! Book model and related types.
//!
//! `Book` is a persisted row. `BookForm` is what a browser submits, and
//! `BookDraft` is what a form is rendered from: either a blank record, a
//! persisted book, or rejected input that has not been saved.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::FieldError;

/// Field order used when reporting validation errors
const FIELD_ORDER: [&str; 4] = ["title", "author", "genre", "year"];

/// Persisted book record
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Path of the edit page for this book
    pub fn path(&self) -> String {
        format!("/books/{}", self.id)
    }
}

/// Book fields as submitted by the create and update forms.
///
/// Fields missing from the body deserialize as empty strings so that the
/// store reports them as validation failures instead of the extractor
/// rejecting the request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
pub struct BookForm {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Please provide a value for \"Title\""))]
    pub title: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Please provide a value for \"Author\""))]
    pub author: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    #[validate(custom(function = "optional_year", message = "\"Year\" must be a whole number"))]
    pub year: String,
}

/// Column values ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct BookValues {
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub year: Option<i32>,
}

impl BookForm {
    /// Validate the submission and convert it into column values
    pub fn to_values(&self) -> Result<BookValues, Vec<FieldError>> {
        self.validate().map_err(|e| field_errors(&e))?;

        Ok(BookValues {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            genre: non_empty(&self.genre),
            year: non_empty(&self.year).and_then(|y| y.parse().ok()),
        })
    }
}

/// Field error for a column or constraint the database refused, worded like
/// the form validators. Unknown columns are reported against `"book"`.
pub fn rejected_field(column: Option<&str>) -> FieldError {
    match column.and_then(|c| FIELD_ORDER.into_iter().find(|f| c.contains(f))) {
        Some("title") => FieldError::new("title", "Please provide a value for \"Title\""),
        Some("author") => FieldError::new("author", "Please provide a value for \"Author\""),
        Some("year") => FieldError::new("year", "\"Year\" must be a whole number"),
        Some(field) => FieldError::new(field, format!("\"{}\" is invalid", field)),
        None => FieldError::new("book", "The book could not be saved as entered"),
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn optional_year(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || value.parse::<i32>().is_ok() {
        Ok(())
    } else {
        Err(ValidationError::new("year"))
    }
}

/// Flatten `validator` output into field errors, in form order
fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .clone()
                    .unwrap_or_else(|| Cow::Owned(format!("\"{}\" is invalid", field)));
                FieldError::new(field.clone(), message)
            })
        })
        .collect();

    out.sort_by_key(|e| {
        FIELD_ORDER
            .iter()
            .position(|f| *f == e.field)
            .unwrap_or(FIELD_ORDER.len())
    });
    out
}

/// Unsaved book shape used to render forms
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookDraft {
    pub id: Option<i32>,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year: String,
}

impl BookDraft {
    /// Blank draft for the creation form
    pub fn blank() -> Self {
        Self::default()
    }

    /// Copy rejected input, keeping the id of the record it was meant for
    pub fn from_submission(form: &BookForm, original_id: Option<i32>) -> Self {
        Self {
            id: original_id,
            title: form.title.clone(),
            author: form.author.clone(),
            genre: form.genre.clone(),
            year: form.year.clone(),
        }
    }
}

impl From<&Book> for BookDraft {
    fn from(book: &Book) -> Self {
        Self {
            id: Some(book.id),
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone().unwrap_or_default(),
            year: book.year.map(|y| y.to_string()).unwrap_or_default(),
        }
    }
}
