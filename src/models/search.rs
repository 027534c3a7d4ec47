//! Free-text search over the book catalog

use super::book::Book;

/// Case-insensitive substring filter across title, author, genre and year.
///
/// A record matches when at least one of the four fields contains the term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    term: Option<String>,
}

impl SearchFilter {
    /// Build a filter from the raw `q` parameter. Blank terms match everything.
    pub fn from_query(q: Option<&str>) -> Self {
        let term = q
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        Self { term }
    }

    pub fn all() -> Self {
        Self::default()
    }

    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    /// `%term%` with LIKE wildcards in the term escaped (backslash escape)
    pub fn like_pattern(&self) -> Option<String> {
        self.term.as_ref().map(|term| {
            let mut pattern = String::with_capacity(term.len() + 2);
            pattern.push('%');
            for c in term.chars() {
                if matches!(c, '%' | '_' | '\\') {
                    pattern.push('\\');
                }
                pattern.push(c);
            }
            pattern.push('%');
            pattern
        })
    }

    pub fn matches(&self, book: &Book) -> bool {
        let Some(term) = &self.term else {
            return true;
        };
        let needle = term.to_lowercase();
        let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);

        contains(&book.title)
            || contains(&book.author)
            || book.genre.as_deref().is_some_and(contains)
            || book.year.is_some_and(|y| contains(&y.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn book(title: &str, author: &str, genre: Option<&str>, year: Option<i32>) -> Book {
        let now = Utc::now();
        Book {
            id: 1,
            title: title.into(),
            author: author.into(),
            genre: genre.map(Into::into),
            year,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn blank_query_matches_everything() {
        assert_eq!(SearchFilter::from_query(Some("   ")), SearchFilter::all());
        assert_eq!(SearchFilter::from_query(None).term(), None);
        assert!(SearchFilter::all().matches(&book("A", "B", None, None)));
    }

    #[test]
    fn matches_any_field_case_insensitively() {
        let dune = book("Dune", "Frank Herbert", Some("Sci-Fi"), Some(1965));
        assert!(SearchFilter::from_query(Some("dUNe")).matches(&dune));
        assert!(SearchFilter::from_query(Some("herb")).matches(&dune));
        assert!(SearchFilter::from_query(Some("sci-fi")).matches(&dune));
        assert!(SearchFilter::from_query(Some("196")).matches(&dune));
        assert!(!SearchFilter::from_query(Some("austen")).matches(&dune));
    }

    #[test]
    fn missing_optional_fields_never_match() {
        let bare = book("Emma", "Austen", None, None);
        assert!(!SearchFilter::from_query(Some("novel")).matches(&bare));
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        let filter = SearchFilter::from_query(Some("100%_a\\b"));
        assert_eq!(filter.like_pattern().as_deref(), Some("%100\\%\\_a\\\\b%"));
        assert_eq!(SearchFilter::all().like_pattern(), None);
    }
}
