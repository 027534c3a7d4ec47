//! Request extractors that never answer with axum's plain-text rejections.
//!
//! Bad input either falls back to a default the handlers already cope with,
//! or becomes an `AppError` rendered on the error page.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Form,
};

use crate::{error::AppError, models::BookForm};

/// `q` and `page` from the listing query string.
///
/// Repeated keys keep their first value. A query string that cannot be
/// decoded at all means no filter on page 1.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub q: Option<String>,
    pub page: Option<String>,
}

#[async_trait]
impl<S> FromRequestParts<S> for ListParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let pairs = match Query::<Vec<(String, String)>>::try_from_uri(&parts.uri) {
            Ok(Query(pairs)) => pairs,
            Err(e) => {
                tracing::debug!("Ignoring undecodable query string: {}", e);
                return Ok(Self::default());
            }
        };

        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "q" if params.q.is_none() => params.q = Some(value),
                "page" if params.page.is_none() => params.page = Some(value),
                _ => {}
            }
        }
        Ok(params)
    }
}

/// Book id from the path. Anything that is not an `i32` is not found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookId(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for BookId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                tracing::debug!("Rejected book id: {}", e);
                AppError::not_found()
            })?;
        parse_id(&raw).map(BookId)
    }
}

fn parse_id(raw: &str) -> Result<i32, AppError> {
    raw.parse::<i32>().map_err(|_| AppError::not_found())
}

/// Submitted book fields.
///
/// A body that is not a urlencoded form is read as an empty submission, so
/// the store rejects it and the form is shown again with field errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookSubmission(pub BookForm);

#[async_trait]
impl<S> FromRequest<S> for BookSubmission
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Form::<BookForm>::from_request(req, state).await {
            Ok(Form(form)) => Ok(BookSubmission(form)),
            Err(e) => {
                tracing::debug!("Treating unreadable form body as empty: {}", e);
                Ok(BookSubmission(BookForm::default()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;

    async fn list_params(uri: &str) -> ListParams {
        let (mut parts, _) = HttpRequest::builder().uri(uri).body(()).unwrap().into_parts();
        ListParams::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[test]
    fn ids_must_be_numeric() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("abc"), Err(AppError::NotFound(_))));
        assert!(matches!(parse_id("99999999999"), Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn repeated_keys_keep_the_first_value() {
        let params = list_params("/books?q=dune&page=2&page=3&q=emma").await;
        assert_eq!(params.q.as_deref(), Some("dune"));
        assert_eq!(params.page.as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn missing_query_string_gives_defaults() {
        assert_eq!(list_params("/books").await, ListParams::default());
    }

    #[tokio::test]
    async fn unknown_keys_are_ignored() {
        let params = list_params("/books?sort=year&q=sci+fi").await;
        assert_eq!(params.q.as_deref(), Some("sci fi"));
        assert_eq!(params.page, None);
    }
}
