//! Page-number pagination over an already fetched list.

/// Products per page on the landing page.
pub const FEATURED_PAGE_SIZE: usize = 4;

/// Parse a `?page=` value. Absent or non-numeric means page 1.
///
/// Zero and out-of-range numbers are kept as-is; they select an empty page.
#[must_use]
pub fn parse_page(raw: Option<&str>) -> usize {
    raw.and_then(|value| value.trim().parse().ok()).unwrap_or(1)
}

/// One page of a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current: usize,
    pub total_pages: usize,
}

impl<T: Clone> Page<T> {
    /// Slice page `current` (1-based) out of `all`.
    ///
    /// Page 0 and pages past the end yield no items rather than an error.
    #[must_use]
    pub fn of(all: &[T], current: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let items = current
            .checked_sub(1)
            .and_then(|index| {
                let start = index.checked_mul(page_size)?;
                let end = start.saturating_add(page_size).min(all.len());
                all.get(start..end)
            })
            .map(<[T]>::to_vec)
            .unwrap_or_default();

        Self {
            items,
            current,
            total_pages: all.len().div_ceil(page_size),
        }
    }
}

impl<T> Page<T> {
    /// Previous page number, if there is one to go back to.
    #[must_use]
    pub const fn prev(&self) -> Option<usize> {
        if self.current > 1 {
            Some(self.current - 1)
        } else {
            None
        }
    }

    /// Next page number, if the next page has items.
    #[must_use]
    pub const fn next(&self) -> Option<usize> {
        if self.current < self.total_pages {
            Some(self.current + 1)
        } else {
            None
        }
    }

    /// Links for every page, marking the current one.
    #[must_use]
    pub fn links(&self) -> Vec<PageLink> {
        (1..=self.total_pages)
            .map(|number| PageLink {
                number,
                is_current: number == self.current,
            })
            .collect()
    }
}

/// A numbered page link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLink {
    pub number: usize,
    pub is_current: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEN: [u32; 10] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

    #[test]
    fn test_parse_page_defaults() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("abc")), 1);
        assert_eq!(parse_page(Some("-3")), 1);
        assert_eq!(parse_page(Some("")), 1);
        assert_eq!(parse_page(Some("3")), 3);
        assert_eq!(parse_page(Some("0")), 0);
    }

    #[test]
    fn test_first_and_last_pages() {
        let first = Page::of(&TEN, 1, 4);
        assert_eq!(first.items, vec![1, 2, 3, 4]);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.prev(), None);
        assert_eq!(first.next(), Some(2));

        let last = Page::of(&TEN, 3, 4);
        assert_eq!(last.items, vec![9, 10]);
        assert_eq!(last.prev(), Some(2));
        assert_eq!(last.next(), None);
    }

    #[test]
    fn test_out_of_range_pages_are_empty() {
        let items = [1, 2, 3, 4, 5, 6, 7, 8];
        let page = Page::of(&items, 99, 4);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.next(), None);

        assert!(Page::of(&items, 0, 4).items.is_empty());
        assert!(Page::of(&items, usize::MAX, 4).items.is_empty());
    }

    #[test]
    fn test_empty_list() {
        let page = Page::<u32>::of(&[], 1, 4);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
        assert!(page.links().is_empty());
    }

    #[test]
    fn test_links_mark_current() {
        let page = Page::of(&TEN, 2, 4);
        let current: Vec<usize> = page
            .links()
            .iter()
            .filter(|link| link.is_current)
            .map(|link| link.number)
            .collect();
        assert_eq!(current, vec![2]);
        assert_eq!(page.links().len(), 3);
    }
}
