//! List query - search, status filter and pagination over a mirror snapshot

use super::sync::Resource;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// What the list screen currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery<S> {
    /// Case-insensitive substring, matched against the searchable fields
    pub search: String,
    pub status: Option<S>,
    /// 1-based
    pub page: usize,
    pub page_size: usize,
}

impl<S> Default for ListQuery<S> {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Page actually shown, after clamping
    pub page: usize,
    /// Never below 1, even for an empty result
    pub total_pages: usize,
    /// Matches across all pages
    pub total_items: usize,
}

impl<S: Copy + Eq> ListQuery<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_status(mut self, status: S) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn matches<T: Resource<Status = S>>(&self, item: &T) -> bool {
        if self.status.is_some_and(|status| item.status() != status) {
            return false;
        }
        let needle = self.search.trim().to_lowercase();
        needle.is_empty()
            || item
                .search_text()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn apply<T: Resource<Status = S>>(&self, items: &[T]) -> Page<T> {
        let matched: Vec<&T> = items.iter().filter(|item| self.matches(*item)).collect();
        let page_size = self.page_size.max(1);
        let total_items = matched.len();
        let total_pages = total_items.div_ceil(page_size).max(1);
        let page = self.page.clamp(1, total_pages);

        let items = matched
            .into_iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .cloned()
            .collect();

        Page {
            items,
            page,
            total_pages,
            total_items,
        }
    }
}
