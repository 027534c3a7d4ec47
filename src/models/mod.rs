//! Data models for Bookshelf

pub mod book;
pub mod search;

// Re-export commonly used types
pub use book::{Book, BookDraft, BookForm, BookValues};
pub use search::SearchFilter;
