//! Gallery query engine: ordered, filtered media lists for a project, a
//! blueprint, or a selected region of one page.

use crate::index::EntryIndex;
use doc_model::{BlueprintId, LogCategory, LogEntry, LogEntryId, ProjectId, TimeRange};
use sitepin_scheduler::CancellationToken;
use std::collections::{HashMap, HashSet};
use storage::{LogStore, StoreError};
use viewer_core::NormalizedRect;

/// Where the candidate entries come from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GalleryContext {
    WholeProject(ProjectId),
    SingleBlueprint(BlueprintId),
    SpatialRegion {
        blueprint_id: BlueprintId,
        rect: NormalizedRect,
        page: u32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GalleryFilter {
    pub categories: HashSet<LogCategory>,
    pub date_range: Option<TimeRange>,
    pub include_photos: bool,
    pub include_videos: bool,
}

impl GalleryFilter {
    /// Every category, unbounded dates, both media kinds.
    pub fn all() -> Self {
        Self {
            categories: LogCategory::ALL.into(),
            date_range: None,
            include_photos: true,
            include_videos: true,
        }
    }
}

impl Default for GalleryFilter {
    fn default() -> Self {
        Self::all()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Photo,
    Video,
}

/// One photo or video lifted out of a log entry for gallery display.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaItem {
    pub entry_id: LogEntryId,
    pub blueprint_id: BlueprintId,
    pub kind: MediaKind,
    pub data: Vec<u8>,
    pub file_name: Option<String>,
    pub title: String,
    pub category: LogCategory,
    pub date: i64,
    pub page_number: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum GalleryError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("query cancelled")]
    Cancelled,
    #[error("page {0} is not a valid 1-based page number")]
    InvalidPage(u32),
}

/// Read-only projections over a finished result list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MediaStatistics {
    pub total_items: usize,
    pub photo_count: usize,
    pub video_count: usize,
    pub count_by_category: HashMap<LogCategory, usize>,
}

impl MediaStatistics {
    pub fn from_items(items: &[MediaItem]) -> Self {
        let mut stats = Self { total_items: items.len(), ..Self::default() };

        for item in items {
            match item.kind {
                MediaKind::Photo => stats.photo_count += 1,
                MediaKind::Video => stats.video_count += 1,
            }
            *stats.count_by_category.entry(item.category).or_insert(0) += 1;
        }

        stats
    }
}

/// Composes store fetches with index filters into an ordered media list.
///
/// The engine is synchronous; hosts run it off the interactive thread and
/// pass a token they can cancel when the query is superseded or its
/// selection is cleared. A cancelled query yields no partial data.
pub struct GalleryQueryEngine<S> {
    store: S,
}

impl<S: LogStore> GalleryQueryEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn run(
        &self,
        context: &GalleryContext,
        filter: &GalleryFilter,
        token: &CancellationToken,
    ) -> Result<Vec<MediaItem>, GalleryError> {
        if token.is_cancelled() {
            return Err(GalleryError::Cancelled);
        }

        // Snapshot the candidate set up front so later store mutations cannot
        // tear the result.
        let snapshot: Vec<LogEntry> = match context {
            GalleryContext::WholeProject(project_id) => {
                self.store.entries_for_project(*project_id)?
            }
            GalleryContext::SingleBlueprint(blueprint_id)
            | GalleryContext::SpatialRegion { blueprint_id, .. } => {
                self.store.entries_for_blueprint(*blueprint_id)?
            }
        };

        if token.is_cancelled() {
            return Err(GalleryError::Cancelled);
        }

        let index = EntryIndex::new(&snapshot);
        let index = match context {
            GalleryContext::SpatialRegion { rect, page, .. } => {
                if *page == 0 {
                    return Err(GalleryError::InvalidPage(*page));
                }
                index.on_page(*page).within_rect(*rect)
            }
            _ => index,
        };

        let survivors = index
            .by_category(&filter.categories)
            .by_date_range(filter.date_range)
            .sorted_by_date_descending();

        if token.is_cancelled() {
            return Err(GalleryError::Cancelled);
        }

        let mut items = Vec::new();
        for entry in survivors.entries() {
            expand_entry(entry, filter, &mut items);
        }

        Ok(items)
    }
}

/// Append the entry's media items in photo-before-video order. An entry with
/// no attachments of the requested kinds contributes nothing; the media-kind
/// filter acts on the expanded items, not on the entry itself.
fn expand_entry(entry: &LogEntry, filter: &GalleryFilter, items: &mut Vec<MediaItem>) {
    if filter.include_photos {
        for (index, data) in entry.photos.iter().enumerate() {
            items.push(MediaItem {
                entry_id: entry.id,
                blueprint_id: entry.blueprint_id,
                kind: MediaKind::Photo,
                data: data.clone(),
                file_name: Some(format!("photo_{}.jpg", index + 1)),
                title: entry.title.clone(),
                category: entry.category,
                date: entry.date,
                page_number: entry.page_number,
            });
        }
    }

    if filter.include_videos {
        if let Some(video) = &entry.video {
            items.push(MediaItem {
                entry_id: entry.id,
                blueprint_id: entry.blueprint_id,
                kind: MediaKind::Video,
                data: video.data.clone(),
                file_name: Some(video.file_name.clone()),
                title: entry.title.clone(),
                category: entry.category,
                date: entry.date,
                page_number: entry.page_number,
            });
        }
    }
}
