//! Book pages: listing, creation form, update form and delete

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::{
    api::extract::{BookId, BookSubmission, ListParams},
    error::AppResult,
    models::BookDraft,
    services::catalog::Submission,
    views, AppState,
};

/// GET / - send visitors to the listing
pub async fn home() -> Redirect {
    Redirect::to("/books")
}

/// GET /books - search and paginate books
pub async fn list_books(
    State(state): State<AppState>,
    params: ListParams,
) -> AppResult<Html<String>> {
    let page = state
        .services
        .catalog
        .list_books(params.q.as_deref(), params.page.as_deref())
        .await?;
    views::book_list(&page)
}

/// GET /books/new - blank creation form
pub async fn new_book_form() -> AppResult<Html<String>> {
    views::new_book(&BookDraft::blank(), &[])
}

/// POST /books/new - create a book
pub async fn create_book(
    State(state): State<AppState>,
    BookSubmission(form): BookSubmission,
) -> AppResult<Response> {
    match state.services.catalog.create_book(&form).await? {
        Submission::Saved(book) => Ok(Redirect::to(&book.path()).into_response()),
        Submission::Rejected(errors) => {
            let draft = BookDraft::from_submission(&form, None);
            Ok(views::new_book(&draft, &errors)?.into_response())
        }
    }
}

/// GET /books/:id - update form
pub async fn edit_book_form(State(state): State<AppState>, BookId(id): BookId) -> AppResult<Html<String>> {
    let book = state.services.catalog.get_book(id).await?;
    views::update_book(&BookDraft::from(&book), &[])
}

/// POST /books/:id - update a book
pub async fn update_book(
    State(state): State<AppState>,
    BookId(id): BookId,
    BookSubmission(form): BookSubmission,
) -> AppResult<Response> {
    match state.services.catalog.update_book(id, &form).await? {
        Submission::Saved(book) => Ok(Redirect::to(&book.path()).into_response()),
        Submission::Rejected(errors) => {
            let draft = BookDraft::from_submission(&form, Some(id));
            Ok(views::update_book(&draft, &errors)?.into_response())
        }
    }
}

/// POST /books/:id/delete - delete a book
pub async fn delete_book(State(state): State<AppState>, BookId(id): BookId) -> AppResult<Redirect> {
    state.services.catalog.delete_book(id).await?;
    Ok(Redirect::to("/"))
}
