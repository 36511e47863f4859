//! Page-number resolution for list views.
//!
//! # Invariants
//! - There is always at least one page, even for an empty list.
//! - A non-numeric or missing page number resolves to page 1.
//! - A numeric page outside `1..=num_pages` resolves to the last page.

/// Resolved page window over `total` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-based page number.
    pub number: u32,
    pub num_pages: u32,
    pub per_page: u32,
    pub total: u64,
}

impl PageWindow {
    /// Resolves a raw (query-string) page number against `total` items.
    pub fn resolve(raw_page: Option<&str>, total: u64, per_page: u32) -> Self {
        let per_page = per_page.max(1);
        let num_pages = num_pages(total, per_page);
        let number = match raw_page.map(str::trim).map(str::parse::<i64>) {
            None | Some(Err(_)) => 1,
            Some(Ok(value)) if value >= 1 && value <= i64::from(num_pages) => {
                u32::try_from(value).unwrap_or(num_pages)
            }
            Some(Ok(_)) => num_pages,
        };
        Self {
            number,
            num_pages,
            per_page,
            total,
        }
    }

    pub fn offset(&self) -> u32 {
        (self.number - 1).saturating_mul(self.per_page)
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

fn num_pages(total: u64, per_page: u32) -> u32 {
    let pages = total.div_ceil(u64::from(per_page)).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::PageWindow;

    #[test]
    fn empty_list_has_one_page() {
        let window = PageWindow::resolve(None, 0, 9);
        assert_eq!(window.number, 1);
        assert_eq!(window.num_pages, 1);
        assert_eq!(window.offset(), 0);
        assert!(!window.has_next());
    }

    #[test]
    fn garbage_page_number_falls_back_to_first_page() {
        let window = PageWindow::resolve(Some("abc"), 30, 9);
        assert_eq!(window.number, 1);
    }

    #[test]
    fn out_of_range_page_resolves_to_last_page() {
        assert_eq!(PageWindow::resolve(Some("99"), 30, 9).number, 4);
        assert_eq!(PageWindow::resolve(Some("0"), 30, 9).number, 4);
        assert_eq!(PageWindow::resolve(Some("-2"), 30, 9).number, 4);
    }

    #[test]
    fn middle_page_offsets_and_neighbours() {
        let window = PageWindow::resolve(Some(" 2 "), 30, 9);
        assert_eq!(window.offset(), 9);
        assert!(window.has_next());
        assert!(window.has_previous());
    }
}
