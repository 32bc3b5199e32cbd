//! Pagination utilities shared by the service and HTTP layers.
//!
//! Two flavors are supported:
//! - `Pagination` feeds offset/limit queries (SeaORM `paginate`).
//! - `Page::from_vec` slices an already-fetched, filtered result set.

use serde::Serialize;

/// Pagination parameters
#[derive(Clone, Copy, Debug)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub per_page: u32,
}

impl Pagination {
    /// Clamp to sane defaults and convert to `u64`
    pub fn normalize(self) -> (u64, u64) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, 100);
        ((page - 1) as u64, per_page as u64)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: 20 } }
}

/// Parse a `page` query parameter. Missing, non-numeric and `< 1` values
/// all land on the first page.
pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|p| *p >= 1)
        .map(|p| p.min(u32::MAX as i64) as u32)
        .unwrap_or(1)
}

/// One page of results plus the counters the listing pages render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: u64,
    pub current_page: u32,
    pub total_count: u64,
}

impl<T> Page<T> {
    /// Wrap a page fetched from the database together with the total row count.
    pub fn new(items: Vec<T>, page: u32, page_size: u32, total_count: u64) -> Self {
        let page_size = page_size.max(1) as u64;
        Self {
            items,
            total_pages: total_count.div_ceil(page_size),
            current_page: page.max(1),
            total_count,
        }
    }

    /// Slice the full result set down to the requested page. The requested
    /// page is echoed back even when it lies past the end.
    pub fn from_vec(all: Vec<T>, page: u32, page_size: u32) -> Self {
        let page = page.max(1);
        let size = page_size.max(1) as usize;
        let total_count = all.len() as u64;
        let start = (page as usize - 1).saturating_mul(size);
        let items: Vec<T> = all.into_iter().skip(start).take(size).collect();
        Self::new(items, page, size as u32, total_count)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_pages: self.total_pages,
            current_page: self.current_page,
            total_count: self.total_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_clamps_zero_to_defaults() {
        let (idx, per) = Pagination { page: 0, per_page: 0 }.normalize();
        assert_eq!(idx, 0);
        assert_eq!(per, 1);
    }

    #[test]
    fn normalize_clamps_upper_bound() {
        let (idx, per) = Pagination { page: 5, per_page: 1000 }.normalize();
        assert_eq!(idx, 4);
        assert_eq!(per, 100);
    }

    #[test]
    fn default_values_are_sane() {
        let d = Pagination::default();
        assert_eq!(d.page, 1);
        assert_eq!(d.per_page, 20);
    }

    #[test]
    fn parse_page_falls_back_to_first_page() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("")), 1);
        assert_eq!(parse_page(Some("abc")), 1);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("-3")), 1);
        assert_eq!(parse_page(Some(" 4 ")), 4);
    }

    #[test]
    fn from_vec_slices_nine_per_page() {
        let all: Vec<u32> = (1..=20).collect();
        let page = Page::from_vec(all.clone(), 1, 9);
        assert_eq!(page.items, (1..=9).collect::<Vec<_>>());
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_count, 20);

        let last = Page::from_vec(all, 3, 9);
        assert_eq!(last.items, vec![19, 20]);
        assert_eq!(last.current_page, 3);
    }

    #[test]
    fn from_vec_past_the_end_is_empty_but_keeps_counters() {
        let page = Page::from_vec(vec![1, 2, 3], 5, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.current_page, 5);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total_count, 3);
    }

    #[test]
    fn empty_result_has_zero_pages() {
        let page: Page<u8> = Page::from_vec(Vec::new(), 1, 9);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.total_count, 0);
    }

    #[test]
    fn new_computes_total_pages_from_count() {
        let page = Page::new(vec!["a"; 10], 2, 10, 31);
        assert_eq!(page.total_pages, 4);
        assert_eq!(page.current_page, 2);
    }
}
