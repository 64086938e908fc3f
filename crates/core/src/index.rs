//! Pure filter combinators over a blueprint's log entries.
//!
//! An index borrows the backing slice and never mutates it; every operation
//! produces a new index, so filters compose by chaining and combined filters
//! intersect.

use doc_model::{LogCategory, LogEntry, TimeRange};
use std::collections::HashSet;
use viewer_core::NormalizedRect;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum IndexError {
    #[error("page {page} out of range (page_count={page_count})")]
    InvalidPageNumber { page: u32, page_count: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntryIndex<'a> {
    entries: Vec<&'a LogEntry>,
}

impl<'a> EntryIndex<'a> {
    pub fn new(entries: &'a [LogEntry]) -> Self {
        Self { entries: entries.iter().collect() }
    }

    pub fn entries(&self) -> &[&'a LogEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<&'a LogEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries pinned to a 1-based page, after checking the page against the
    /// blueprint's page count. An out-of-range page is a caller bug, not an
    /// empty result.
    pub fn for_page(&self, page: u32, page_count: u32) -> Result<Self, IndexError> {
        if page == 0 || page > page_count {
            return Err(IndexError::InvalidPageNumber { page, page_count });
        }

        Ok(self.on_page(page))
    }

    /// Exact page match without range checking, for callers that already
    /// validated or clamped the page.
    pub fn on_page(&self, page: u32) -> Self {
        self.retain(|entry| entry.page_number == page)
    }

    /// Entries whose category is in the set. An empty set selects nothing;
    /// it is not an "all categories" wildcard.
    pub fn by_category(&self, categories: &HashSet<LogCategory>) -> Self {
        self.retain(|entry| categories.contains(&entry.category))
    }

    /// Entries inside the inclusive range; `None` means unbounded.
    pub fn by_date_range(&self, range: Option<TimeRange>) -> Self {
        match range {
            Some(range) => self.retain(|entry| range.contains(entry.date)),
            None => self.clone(),
        }
    }

    /// Entries whose normalized position lies inside the rectangle, edges
    /// included.
    pub fn within_rect(&self, rect: NormalizedRect) -> Self {
        self.retain(|entry| rect.contains(entry.x, entry.y))
    }

    /// Entries within `radius` of `(x, y)` in normalized units.
    pub fn near_point(&self, x: f64, y: f64, radius: f64) -> Self {
        self.retain(|entry| {
            let dx = entry.x - x;
            let dy = entry.y - y;
            (dx * dx + dy * dy).sqrt() <= radius
        })
    }

    /// Entries carrying at least one photo or a video.
    pub fn with_media(&self) -> Self {
        self.retain(|entry| entry.has_media())
    }

    /// Newest first. The sort is stable, so entries sharing a timestamp keep
    /// their insertion order and repeated queries stay deterministic.
    pub fn sorted_by_date_descending(&self) -> Self {
        let mut entries = self.entries.clone();
        entries.sort_by_key(|entry| std::cmp::Reverse(entry.date));
        Self { entries }
    }

    fn retain(&self, keep: impl Fn(&LogEntry) -> bool) -> Self {
        Self { entries: self.entries.iter().copied().filter(|entry| keep(entry)).collect() }
    }
}
