//! PostgreSQL book store

use async_trait::async_trait;
use sqlx::{postgres::PgDatabaseError, Pool, Postgres, QueryBuilder};

use super::BookStore;
use crate::{
    error::{StoreError, StoreResult},
    models::{book::rejected_field, Book, BookForm, SearchFilter},
};

const BOOK_COLUMNS: &str = "id, title, author, genre, year, created_at, updated_at";

// SQLSTATE codes reported back to the user as validation failures
const NOT_NULL_VIOLATION: &str = "23502";
const CHECK_VIOLATION: &str = "23514";

#[derive(Clone)]
pub struct PgBookStore {
    pool: Pool<Postgres>,
}

impl PgBookStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Append `WHERE (...)` for a search filter
fn push_search_filter<'a>(builder: &mut QueryBuilder<'a, Postgres>, filter: &SearchFilter) {
    if let Some(pattern) = filter.like_pattern() {
        builder
            .push(" WHERE (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR author ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR genre ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR CAST(year AS TEXT) ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

/// Turn constraint violations into validation failures, everything else stays a database error.
/// The raw Postgres message only goes to the log.
fn map_write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if matches!(db.code().as_deref(), Some(NOT_NULL_VIOLATION) | Some(CHECK_VIOLATION)) {
            tracing::warn!("Book rejected by database constraint: {}", db.message());
            // NOT NULL names the column, CHECK names the constraint
            let column = db
                .try_downcast_ref::<PgDatabaseError>()
                .and_then(|pg| pg.column())
                .or_else(|| db.constraint());
            return StoreError::Validation(vec![rejected_field(column)]);
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn count(&self, filter: &SearchFilter) -> StoreResult<i64> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM books");
        push_search_filter(&mut builder, filter);

        let total = builder.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(total)
    }

    async fn find_page(&self, filter: &SearchFilter, limit: i64, offset: i64) -> StoreResult<Vec<Book>> {
        let mut builder = QueryBuilder::new(format!("SELECT {} FROM books", BOOK_COLUMNS));
        push_search_filter(&mut builder, filter);
        builder
            .push(" ORDER BY id LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let books = builder.build_query_as::<Book>().fetch_all(&self.pool).await?;
        Ok(books)
    }

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!("SELECT {} FROM books WHERE id = $1", BOOK_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn create(&self, form: &BookForm) -> StoreResult<Book> {
        let values = form.to_values().map_err(StoreError::Validation)?;

        sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, author, genre, year, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&values.title)
        .bind(&values.author)
        .bind(&values.genre)
        .bind(values.year)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn update(&self, id: i32, form: &BookForm) -> StoreResult<Book> {
        let values = form.to_values().map_err(StoreError::Validation)?;

        sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books
            SET title = $1, author = $2, genre = $3, year = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&values.title)
        .bind(&values.author)
        .bind(&values.genre)
        .bind(values.year)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: i32) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_filter_binds_pattern_for_every_field() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM books");
        push_search_filter(&mut builder, &SearchFilter::from_query(Some("dune")));
        assert_eq!(
            builder.sql(),
            "SELECT COUNT(*) FROM books WHERE (title ILIKE $1 OR author ILIKE $2 \
             OR genre ILIKE $3 OR CAST(year AS TEXT) ILIKE $4)"
        );
    }

    #[test]
    fn empty_filter_adds_no_where_clause() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM books");
        push_search_filter(&mut builder, &SearchFilter::all());
        assert_eq!(builder.sql(), "SELECT COUNT(*) FROM books");
    }

    #[test]
    fn non_database_errors_stay_database_errors() {
        assert!(matches!(
            map_write_error(sqlx::Error::PoolTimedOut),
            StoreError::Database(_)
        ));
    }
}
