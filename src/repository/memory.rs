//! In-process book store.
//!
//! Same contract as `PgBookStore`, backed by a `BTreeMap` so that natural
//! order is id order. Used by the test suites, and by the server when
//! `database.backend = "memory"`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::BookStore;
use crate::{
    error::{StoreError, StoreResult},
    models::{Book, BookForm, SearchFilter},
};

#[derive(Default)]
struct Table {
    last_id: i32,
    rows: BTreeMap<i32, Book>,
}

#[derive(Default)]
pub struct MemoryBookStore {
    table: RwLock<Table>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored books, regardless of any filter
    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn count(&self, filter: &SearchFilter) -> StoreResult<i64> {
        let table = self.table.read().await;
        Ok(table.rows.values().filter(|b| filter.matches(b)).count() as i64)
    }

    async fn find_page(&self, filter: &SearchFilter, limit: i64, offset: i64) -> StoreResult<Vec<Book>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|b| filter.matches(b))
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<Book>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn create(&self, form: &BookForm) -> StoreResult<Book> {
        let values = form.to_values().map_err(StoreError::Validation)?;

        let mut table = self.table.write().await;
        table.last_id += 1;
        let now = Utc::now();
        let book = Book {
            id: table.last_id,
            title: values.title,
            author: values.author,
            genre: values.genre,
            year: values.year,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(book.id, book.clone());
        Ok(book)
    }

    async fn update(&self, id: i32, form: &BookForm) -> StoreResult<Book> {
        let values = form.to_values().map_err(StoreError::Validation)?;

        let mut table = self.table.write().await;
        let book = table.rows.get_mut(&id).ok_or(StoreError::NotFound)?;
        book.title = values.title;
        book.author = values.author;
        book.genre = values.genre;
        book.year = values.year;
        book.updated_at = Utc::now();
        Ok(book.clone())
    }

    async fn delete(&self, id: i32) -> StoreResult<()> {
        self.table
            .write()
            .await
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str, author: &str) -> BookForm {
        BookForm {
            title: title.to_string(),
            author: author.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn ids_are_never_reused() {
        let store = MemoryBookStore::new();
        let first = store.create(&form("A", "X")).await.unwrap();
        store.delete(first.id).await.unwrap();
        let second = store.create(&form("B", "Y")).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn rejected_input_is_not_written() {
        let store = MemoryBookStore::new();
        let err = store.create(&form("", "X")).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(ref e) if e.len() == 1));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn rejected_update_leaves_record_unchanged() {
        let store = MemoryBookStore::new();
        let book = store.create(&form("Dune", "Herbert")).await.unwrap();
        assert!(store.update(book.id, &form("Dune", "")).await.is_err());
        assert_eq!(store.find_by_id(book.id).await.unwrap(), Some(book));
    }

    #[tokio::test]
    async fn missing_rows_report_not_found() {
        let store = MemoryBookStore::new();
        assert!(matches!(store.update(9, &form("A", "B")).await, Err(StoreError::NotFound)));
        assert!(matches!(store.delete(9).await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn pages_follow_id_order() {
        let store = MemoryBookStore::new();
        for i in 0..5 {
            store.create(&form(&format!("Book {}", i), "Anon")).await.unwrap();
        }
        let page = store.find_page(&SearchFilter::all(), 2, 2).await.unwrap();
        let ids: Vec<_> = page.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![3, 4]);
        assert!(store.find_page(&SearchFilter::all(), 2, 10).await.unwrap().is_empty());
    }
}
