//! Repository layer for book persistence

pub mod books;
pub mod memory;

use async_trait::async_trait;

use crate::{
    error::StoreResult,
    models::{Book, BookForm, SearchFilter},
};

pub use books::PgBookStore;
pub use memory::MemoryBookStore;

/// Persistence over the single `books` table.
///
/// `create` and `update` validate the submission and report rejected input as
/// `StoreError::Validation`; nothing is written in that case.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Number of books matching the filter
    async fn count(&self, filter: &SearchFilter) -> StoreResult<i64>;

    /// At most `limit` matching books starting at `offset`, in id order
    async fn find_page(&self, filter: &SearchFilter, limit: i64, offset: i64) -> StoreResult<Vec<Book>>;

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<Book>>;

    async fn create(&self, form: &BookForm) -> StoreResult<Book>;

    /// Replace all fields of an existing book. `StoreError::NotFound` if the id is gone.
    async fn update(&self, id: i32, form: &BookForm) -> StoreResult<Book>;

    /// `StoreError::NotFound` if the id is gone
    async fn delete(&self, id: i32) -> StoreResult<()>;
}
