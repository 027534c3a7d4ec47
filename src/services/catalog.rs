//! Book catalog service

use std::sync::Arc;

use serde::Serialize;

use super::{
    pagination::{normalize_page, Pagination},
    validation,
};
use crate::{
    error::{AppError, AppResult, FieldError},
    models::{Book, BookForm, SearchFilter},
    repository::BookStore,
};

/// One page of the book listing
#[derive(Debug, Serialize)]
pub struct BookPage {
    pub books: Vec<Book>,
    /// Search term as typed, echoed back into the search box
    pub query: String,
    pub pagination: Pagination,
}

/// Outcome of a create or update submission
#[derive(Debug)]
pub enum Submission {
    Saved(Book),
    Rejected(Vec<FieldError>),
}

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn BookStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    /// Search and paginate books
    pub async fn list_books(&self, q: Option<&str>, page: Option<&str>) -> AppResult<BookPage> {
        let filter = SearchFilter::from_query(q);
        let page = normalize_page(page);

        let total = self.store.count(&filter).await?;
        let pagination = Pagination::new(page, total);
        let books = self
            .store
            .find_page(&filter, pagination.limit(), pagination.offset())
            .await?;

        Ok(BookPage {
            books,
            query: q.unwrap_or_default().to_string(),
            pagination,
        })
    }

    /// Get a book by ID, `AppError::NotFound` when absent
    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(AppError::not_found)
    }

    pub async fn create_book(&self, form: &BookForm) -> AppResult<Submission> {
        match self.store.create(form).await {
            Ok(book) => {
                tracing::info!("Created book id={} title={:?}", book.id, book.title);
                Ok(Submission::Saved(book))
            }
            Err(err) => Ok(Submission::Rejected(validation::recover(err)?)),
        }
    }

    /// Update an existing book. The lookup happens first, so an unknown id
    /// is reported as not found without attempting the write.
    pub async fn update_book(&self, id: i32, form: &BookForm) -> AppResult<Submission> {
        let book = self.get_book(id).await?;

        match self.store.update(book.id, form).await {
            Ok(updated) => {
                tracing::info!("Updated book id={}", updated.id);
                Ok(Submission::Saved(updated))
            }
            Err(err) => Ok(Submission::Rejected(validation::recover(err)?)),
        }
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        let book = self.get_book(id).await?;
        self.store.delete(book.id).await?;
        tracing::info!("Deleted book id={}", book.id);
        Ok(())
    }

    /// Round trip to the store, used by the readiness check
    pub async fn check_store(&self) -> AppResult<i64> {
        Ok(self.store.count(&SearchFilter::all()).await?)
    }
}
