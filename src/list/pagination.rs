//! Page arithmetic for list screens

use crate::utils::helpers::calculate_offset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    /// `false` when the backend gave no count and `total` is a lower bound
    pub exact: bool,
    pub total_pages: u32,
    pub has_prev: bool,
    pub has_next: bool,
    /// 1-based position of the first row on the page, 0 when empty
    pub start: u64,
    pub end: u64,
}

impl Pagination {
    pub fn compute(total: u64, page_size: u32, page: u32, items_on_page: usize, exact: bool) -> Self {
        let page_size = page_size.max(1);
        let page = page.max(1);
        let total_pages = total_pages(total, page_size);

        let has_next = if exact {
            page < total_pages
        } else {
            items_on_page as u64 >= u64::from(page_size)
        };

        let (start, end) = if items_on_page == 0 {
            (0, 0)
        } else {
            let offset = calculate_offset(page, page_size);
            (offset + 1, offset + items_on_page as u64)
        };

        Self {
            page,
            page_size,
            total,
            exact,
            total_pages,
            has_prev: page > 1,
            has_next,
            start,
            end,
        }
    }

    /// `"41–45 de 45 atividades"`; a lower-bound total is shown as `45+`
    pub fn label(&self, plural: &str) -> String {
        let total = if self.exact {
            self.total.to_string()
        } else {
            format!("{}+", self.total)
        };
        if self.start == 0 {
            format!("0 de {} {}", total, plural)
        } else {
            format!("{}–{} de {} {}", self.start, self.end, total, plural)
        }
    }
}

/// `max(1, ceil(total / page_size))`
pub fn total_pages(total: u64, page_size: u32) -> u32 {
    let size = u64::from(page_size.max(1));
    let pages = (total + size - 1) / size;
    u32::try_from(pages.max(1)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_last_page_of_45() {
        let p = Pagination::compute(45, 20, 3, 5, true);
        assert_eq!(p.total_pages, 3);
        assert!(!p.has_next);
        assert!(p.has_prev);
        assert_eq!(p.label("atividades"), "41–45 de 45 atividades");
    }

    #[test]
    fn test_empty_result() {
        let p = Pagination::compute(0, 20, 1, 0, true);
        assert_eq!(p.total_pages, 1);
        assert!(!p.has_next);
        assert!(!p.has_prev);
        assert_eq!(p.label("estudantes"), "0 de 0 estudantes");
    }

    #[test]
    fn test_inexact_total_uses_page_fill() {
        let p = Pagination::compute(20, 20, 1, 20, false);
        assert!(p.has_next);
        assert_eq!(p.label("unidades"), "1–20 de 20+ unidades");

        let p = Pagination::compute(27, 20, 2, 7, false);
        assert!(!p.has_next);
    }

    proptest! {
        #[test]
        fn prop_total_pages(total in 0u64..1_000_000, page_size in 1u32..500) {
            let expected = std::cmp::max(1, (total as f64 / page_size as f64).ceil() as u64);
            prop_assert_eq!(u64::from(total_pages(total, page_size)), expected);
        }

        #[test]
        fn prop_boundaries(total in 0u64..10_000, page_size in 1u32..100, page in 1u32..200) {
            let p = Pagination::compute(total, page_size, page, 0, true);
            prop_assert_eq!(p.has_prev, page > 1);
            prop_assert_eq!(p.has_next, page < p.total_pages);
        }
    }
}
