//! HTML views rendered with minijinja.
//!
//! Templates are compiled into the binary and parsed once on first use.

use axum::{http::StatusCode, response::Html};
use minijinja::{context, Environment};
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::{
    error::{AppResult, FieldError},
    models::BookDraft,
    services::catalog::BookPage,
};

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../templates/layout.html")),
    ("error.html", include_str!("../templates/error.html")),
    ("books/index.html", include_str!("../templates/books/index.html")),
    ("books/form-fields.html", include_str!("../templates/books/form-fields.html")),
    ("books/new-book.html", include_str!("../templates/books/new-book.html")),
    ("books/update-book.html", include_str!("../templates/books/update-book.html")),
];

static ENV: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    for &(name, source) in TEMPLATES {
        if let Err(e) = env.add_template(name, source) {
            tracing::error!("Failed to load template {}: {:#}", name, e);
        }
    }
    env
});

fn render<S: Serialize>(name: &str, ctx: S) -> Result<String, minijinja::Error> {
    ENV.get_template(name)?.render(ctx)
}

/// Book listing with search box and page links
pub fn book_list(page: &BookPage) -> AppResult<Html<String>> {
    let body = render(
        "books/index.html",
        context! {
            title => "Books",
            books => &page.books,
            q => &page.query,
            page => page.pagination.page,
            total => page.pagination.total,
            total_pages => page.pagination.total_pages,
            has_prev => page.pagination.has_prev(),
            has_next => page.pagination.has_next(),
        },
    )?;
    Ok(Html(body))
}

/// Creation form, optionally with the errors of a rejected submission
pub fn new_book(draft: &BookDraft, errors: &[FieldError]) -> AppResult<Html<String>> {
    let body = render(
        "books/new-book.html",
        context! { title => "New Book", book => draft, errors => errors },
    )?;
    Ok(Html(body))
}

/// Update form for an existing book
pub fn update_book(draft: &BookDraft, errors: &[FieldError]) -> AppResult<Html<String>> {
    let body = render(
        "books/update-book.html",
        context! { title => "Update Book", book => draft, errors => errors },
    )?;
    Ok(Html(body))
}

pub fn render_error(status: StatusCode, message: &str) -> Result<String, minijinja::Error> {
    render(
        "error.html",
        context! {
            title => message,
            status => status.as_u16(),
            message => message,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::pagination::Pagination;

    #[test]
    fn all_templates_parse() {
        for &(name, _) in TEMPLATES {
            assert!(ENV.get_template(name).is_ok(), "template {} failed to load", name);
        }
    }

    #[test]
    fn form_values_are_escaped() {
        let draft = BookDraft {
            title: "<script>".into(),
            ..BookDraft::blank()
        };
        let html = new_book(&draft, &[]).unwrap().0;
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn errors_are_listed() {
        let errors = vec![FieldError::new("title", "Please provide a value for \"Title\"")];
        let html = new_book(&BookDraft::blank(), &errors).unwrap().0;
        assert!(html.contains("Please provide a value for &quot;Title&quot;"));
    }

    #[test]
    fn empty_listing_renders() {
        let page = BookPage {
            books: vec![],
            query: "zzz".into(),
            pagination: Pagination::new(1, 0),
        };
        let html = book_list(&page).unwrap().0;
        assert!(html.contains("No books found"));
        assert!(html.contains("value=\"zzz\""));
    }

    #[test]
    fn middle_page_links_both_ways() {
        let page = BookPage {
            books: vec![],
            query: "sci fi&more".into(),
            pagination: Pagination::new(2, 25),
        };
        let html = book_list(&page).unwrap().0;
        assert!(html.contains("Page 2 of 3 (25 books)"));
        assert!(html.contains("href=\"/books?page=1&amp;q=sci%20fi%26more\""));
        assert!(html.contains("href=\"/books?page=3&amp;q=sci%20fi%26more\""));
    }

    #[test]
    fn error_page_shows_status() {
        let html = render_error(StatusCode::NOT_FOUND, "Not Found").unwrap();
        assert!(html.contains("404"));
        assert!(html.contains("Not Found"));
    }
}
