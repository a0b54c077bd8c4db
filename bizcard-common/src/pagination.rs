//! Pagination arithmetic for directory listings

/// Page size used when the caller does not ask for one
pub const DEFAULT_PER_PAGE: i64 = 10;

/// Largest page size a caller may request
pub const MAX_PER_PAGE: i64 = 100;

/// Pagination metadata for a single listing request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: i64,
    /// Rows per page (>= 1)
    pub per_page: i64,
    /// Offset for SQL LIMIT/OFFSET query
    pub offset: i64,
}

impl Pagination {
    /// Sanitize a requested page and page size
    ///
    /// `page` below 1 becomes 1; `per_page` is clamped to `[1, MAX_PER_PAGE]`.
    /// Pages past the end are NOT clamped: they yield an empty slice.
    ///
    /// # Examples
    /// ```
    /// use bizcard_common::pagination::Pagination;
    ///
    /// let p = Pagination::new(3, 10);
    /// assert_eq!(p.offset, 20);
    ///
    /// let p = Pagination::new(0, 0);
    /// assert_eq!((p.page, p.per_page, p.offset), (1, 1, 0));
    /// ```
    pub fn new(page: i64, per_page: i64) -> Self {
        let page = page.max(1);
        let per_page = per_page.clamp(1, MAX_PER_PAGE);
        let offset = (page - 1).saturating_mul(per_page);

        Self {
            page,
            per_page,
            offset,
        }
    }

    /// Number of rows this page holds out of `total`
    pub fn slice_len(&self, total: i64) -> i64 {
        (total - self.offset).clamp(0, self.per_page)
    }

    /// Total number of pages for `total` rows
    pub fn total_pages(&self, total: i64) -> i64 {
        (total + self.per_page - 1) / self.per_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_normal() {
        let p = Pagination::new(2, 10);
        assert_eq!(p.page, 2);
        assert_eq!(p.offset, 10);
        assert_eq!(p.slice_len(25), 10);
        assert_eq!(p.total_pages(25), 3);
    }

    #[test]
    fn test_pagination_last_partial_page() {
        let p = Pagination::new(3, 10);
        assert_eq!(p.offset, 20);
        assert_eq!(p.slice_len(25), 5);
    }

    #[test]
    fn test_pagination_out_of_bounds_high() {
        let p = Pagination::new(99, 10);
        assert_eq!(p.page, 99); // Not clamped
        assert_eq!(p.slice_len(25), 0);
    }

    #[test]
    fn test_pagination_out_of_bounds_low() {
        let p = Pagination::new(-4, 10);
        assert_eq!(p.page, 1);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn test_per_page_clamped() {
        assert_eq!(Pagination::new(1, 0).per_page, 1);
        assert_eq!(Pagination::new(1, 5000).per_page, MAX_PER_PAGE);
    }

    #[test]
    fn test_pagination_empty() {
        let p = Pagination::new(1, 10);
        assert_eq!(p.slice_len(0), 0);
        assert_eq!(p.total_pages(0), 0);
    }

    #[test]
    fn test_slice_len_matches_formula() {
        // max(0, min(P, T - (k-1)*P))
        for total in 0..40 {
            for per_page in 1..8 {
                for page in 1..10 {
                    let p = Pagination::new(page, per_page);
                    let expected = (total - (page - 1) * per_page).min(per_page).max(0);
                    assert_eq!(p.slice_len(total), expected);
                }
            }
        }
    }
}
