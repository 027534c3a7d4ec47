//! Page arithmetic for the book listing

use serde::Serialize;

/// Books per listing page
pub const PAGE_SIZE: i64 = 10;

/// Parse the `page` parameter. Anything unparsable or below 1 means page 1.
pub fn normalize_page(raw: Option<&str>) -> i64 {
    raw.and_then(|p| p.trim().parse::<i64>().ok())
        .filter(|p| *p > 0)
        .unwrap_or(1)
}

/// Position of one page within a result set.
///
/// The requested page is not clamped against `total_pages`: a page past the
/// end yields an empty slice rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(page: i64, total: i64) -> Self {
        Self::with_page_size(page, total, PAGE_SIZE)
    }

    pub fn with_page_size(page: i64, total: i64, page_size: i64) -> Self {
        let total_pages = if total > page_size {
            (total + page_size - 1) / page_size
        } else {
            1
        };
        Self {
            page,
            page_size,
            total,
            total_pages,
        }
    }

    pub fn offset(&self) -> i64 {
        if self.page > 1 {
            (self.page - 1).saturating_mul(self.page_size)
        } else {
            0
        }
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_page_values_fall_back_to_first_page() {
        assert_eq!(normalize_page(None), 1);
        assert_eq!(normalize_page(Some("")), 1);
        assert_eq!(normalize_page(Some("abc")), 1);
        assert_eq!(normalize_page(Some("0")), 1);
        assert_eq!(normalize_page(Some("-4")), 1);
        assert_eq!(normalize_page(Some("2.5")), 1);
        assert_eq!(normalize_page(Some(" 3 ")), 3);
    }

    #[test]
    fn total_pages_is_one_up_to_a_full_page() {
        assert_eq!(Pagination::new(1, 0).total_pages, 1);
        assert_eq!(Pagination::new(1, 10).total_pages, 1);
        assert_eq!(Pagination::new(1, 11).total_pages, 2);
        assert_eq!(Pagination::new(1, 20).total_pages, 2);
        assert_eq!(Pagination::new(1, 95).total_pages, 10);
    }

    #[test]
    fn offset_only_applies_after_first_page() {
        assert_eq!(Pagination::new(1, 50).offset(), 0);
        assert_eq!(Pagination::new(2, 50).offset(), 10);
        assert_eq!(Pagination::new(5, 50).offset(), 40);
    }

    #[test]
    fn pages_past_the_end_are_not_clamped() {
        let pagination = Pagination::new(9, 15);
        assert_eq!(pagination.total_pages, 2);
        assert_eq!(pagination.offset(), 80);
        assert!(!pagination.has_next());
        assert!(pagination.has_prev());
    }

    #[test]
    fn huge_pages_do_not_overflow() {
        assert_eq!(Pagination::new(i64::MAX, 1).offset(), i64::MAX);
    }
}
