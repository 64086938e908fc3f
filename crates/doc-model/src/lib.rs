//! Record types for projects, blueprints, and log entries.
//!
//! Ownership is expressed through identifier references (an entry carries its
//! blueprint's id, a blueprint carries its project's id); the records never
//! hold live back-references. Cascade deletion is a store operation, not a
//! graph traversal.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ModelError {
    #[error("page {page} out of range (page_count={page_count})")]
    PageOutOfRange { page: u32, page_count: u32 },
    #[error("normalized position ({x}, {y}) outside [0, 1]")]
    PositionOutOfRange { x: f64, y: f64 },
    #[error("unknown category \"{0}\"")]
    UnknownCategory(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub Uuid);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlueprintId(pub Uuid);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LogEntryId(pub Uuid);

impl ProjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl BlueprintId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl LogEntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for BlueprintId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for LogEntryId {
    fn default() -> Self {
        Self::new()
    }
}

/// Current wall-clock time as Unix seconds.
pub fn now_unix() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs() as i64
}

/// Inclusive interval over Unix-second timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: i64,
    pub end: i64,
}

impl TimeRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }
}

/// Closed set of log entry tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogCategory {
    Electrical,
    Plumbing,
    Structural,
    Hvac,
    Insulation,
    Flooring,
    Roofing,
    Windows,
    Doors,
    Finishes,
    Safety,
    General,
}

impl LogCategory {
    pub const ALL: [LogCategory; 12] = [
        LogCategory::Electrical,
        LogCategory::Plumbing,
        LogCategory::Structural,
        LogCategory::Hvac,
        LogCategory::Insulation,
        LogCategory::Flooring,
        LogCategory::Roofing,
        LogCategory::Windows,
        LogCategory::Doors,
        LogCategory::Finishes,
        LogCategory::Safety,
        LogCategory::General,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LogCategory::Electrical => "electrical",
            LogCategory::Plumbing => "plumbing",
            LogCategory::Structural => "structural",
            LogCategory::Hvac => "hvac",
            LogCategory::Insulation => "insulation",
            LogCategory::Flooring => "flooring",
            LogCategory::Roofing => "roofing",
            LogCategory::Windows => "windows",
            LogCategory::Doors => "doors",
            LogCategory::Finishes => "finishes",
            LogCategory::Safety => "safety",
            LogCategory::General => "general",
        }
    }
}

impl std::str::FromStr for LogCategory {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        LogCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| ModelError::UnknownCategory(value.to_owned()))
    }
}

/// Page pixel dimensions reported by the PDF renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl Default for PageSize {
    fn default() -> Self {
        Self { width: 612.0, height: 792.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    pub client_name: String,
    pub location: String,
    pub created_at: i64,
    pub last_modified_at: i64,
    pub is_archived: bool,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        let now = now_unix();

        Self {
            id: ProjectId::new(),
            name: name.into(),
            description: String::new(),
            client_name: String::new(),
            location: String::new(),
            created_at: now,
            last_modified_at: now,
            is_archived: false,
        }
    }

    pub fn touch(&mut self) {
        self.last_modified_at = now_unix();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    pub id: BlueprintId,
    pub project_id: ProjectId,
    pub name: String,
    pub file_name: String,
    pub uploaded_at: i64,
    pub page_count: u32,
    /// One entry per page, in page order. Uniform-size documents repeat the
    /// same dimensions.
    pub page_sizes: Vec<PageSize>,
    /// Last viewed page, 1-based.
    pub current_page: u32,
}

impl Blueprint {
    /// Create a blueprint whose pages all share the same dimensions.
    pub fn new(
        project_id: ProjectId,
        name: impl Into<String>,
        file_name: impl Into<String>,
        page_count: u32,
        page_size: PageSize,
    ) -> Self {
        let page_count = page_count.max(1);

        Self {
            id: BlueprintId::new(),
            project_id,
            name: name.into(),
            file_name: file_name.into(),
            uploaded_at: now_unix(),
            page_count,
            page_sizes: vec![page_size; page_count as usize],
            current_page: 1,
        }
    }

    /// Create a blueprint with per-page dimensions. The page count is the
    /// length of `page_sizes`; an empty list yields a single default page.
    pub fn with_page_sizes(
        project_id: ProjectId,
        name: impl Into<String>,
        file_name: impl Into<String>,
        page_sizes: Vec<PageSize>,
    ) -> Self {
        let page_sizes =
            if page_sizes.is_empty() { vec![PageSize::default()] } else { page_sizes };

        Self {
            id: BlueprintId::new(),
            project_id,
            name: name.into(),
            file_name: file_name.into(),
            uploaded_at: now_unix(),
            page_count: page_sizes.len() as u32,
            page_sizes,
            current_page: 1,
        }
    }

    /// Dimensions for a 1-based page number.
    pub fn page_size(&self, page: u32) -> Option<PageSize> {
        if page == 0 {
            return None;
        }

        self.page_sizes.get(page as usize - 1).copied()
    }

    pub fn set_current_page(&mut self, page: u32) {
        self.current_page = page.max(1).min(self.page_count.max(1));
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoAttachment {
    pub data: Vec<u8>,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: LogEntryId,
    pub blueprint_id: BlueprintId,
    pub title: String,
    pub notes: String,
    pub date: i64,
    pub category: LogCategory,
    /// Normalized position on the page, origin top-left, both in [0, 1].
    pub x: f64,
    pub y: f64,
    /// 1-based page the entry is pinned to.
    pub page_number: u32,
    pub photos: Vec<Vec<u8>>,
    pub video: Option<VideoAttachment>,
}

impl LogEntry {
    pub fn new(
        blueprint_id: BlueprintId,
        title: impl Into<String>,
        category: LogCategory,
        x: f64,
        y: f64,
        page_number: u32,
    ) -> Self {
        Self {
            id: LogEntryId::new(),
            blueprint_id,
            title: title.into(),
            notes: String::new(),
            date: now_unix(),
            category,
            x,
            y,
            page_number,
            photos: Vec::new(),
            video: None,
        }
    }

    /// Check the entry against its blueprint's page count and the normalized
    /// position invariant.
    pub fn validate(&self, page_count: u32) -> Result<(), ModelError> {
        if self.page_number == 0 || self.page_number > page_count {
            return Err(ModelError::PageOutOfRange {
                page: self.page_number,
                page_count,
            });
        }

        let in_unit = |value: f64| value.is_finite() && (0.0..=1.0).contains(&value);
        if !in_unit(self.x) || !in_unit(self.y) {
            return Err(ModelError::PositionOutOfRange { x: self.x, y: self.y });
        }

        Ok(())
    }

    pub fn has_media(&self) -> bool {
        !self.photos.is_empty() || self.video.is_some()
    }

    pub fn photo_count(&self) -> usize {
        self.photos.len()
    }

    pub fn has_video(&self) -> bool {
        self.video.is_some()
    }

    /// Photos plus the video, if present.
    pub fn media_count(&self) -> usize {
        self.photos.len() + usize::from(self.video.is_some())
    }

    pub fn add_photo(&mut self, data: Vec<u8>) {
        self.photos.push(data);
    }

    pub fn remove_photo(&mut self, index: usize) -> Option<Vec<u8>> {
        if index < self.photos.len() {
            Some(self.photos.remove(index))
        } else {
            None
        }
    }

    pub fn set_video(&mut self, data: Vec<u8>, file_name: impl Into<String>) {
        self.video = Some(VideoAttachment { data, file_name: file_name.into() });
    }

    pub fn remove_video(&mut self) -> Option<VideoAttachment> {
        self.video.take()
    }
}
