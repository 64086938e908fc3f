//! Store boundary for projects, blueprints, and log entries.
//!
//! The query core only ever reads through the [`LogStore`] trait and treats
//! the store as a black box; writes go through [`MemoryStore`] directly.
//! [`Storage`] persists a whole project as a versioned JSON file.

mod memory;
mod project_file;

pub use memory::{MediaTotals, MemoryStore};
pub use project_file::{ProjectFile, Storage, StorageError};

use doc_model::{BlueprintId, LogEntry, ProjectId};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("unknown project {0:?}")]
    UnknownProject(ProjectId),
    #[error("unknown blueprint {0:?}")]
    UnknownBlueprint(BlueprintId),
    #[error("unknown entry {0:?}")]
    UnknownEntry(doc_model::LogEntryId),
    #[error(transparent)]
    InvalidEntry(#[from] doc_model::ModelError),
}

/// Read side of the store, as seen by the query engine.
///
/// Both fetches return owned snapshots so a running query stays internally
/// consistent even if the store is mutated while it runs.
pub trait LogStore {
    fn entries_for_blueprint(&self, blueprint_id: BlueprintId) -> Result<Vec<LogEntry>, StoreError>;
    fn entries_for_project(&self, project_id: ProjectId) -> Result<Vec<LogEntry>, StoreError>;
}

impl<S: LogStore + ?Sized> LogStore for &S {
    fn entries_for_blueprint(&self, blueprint_id: BlueprintId) -> Result<Vec<LogEntry>, StoreError> {
        (**self).entries_for_blueprint(blueprint_id)
    }

    fn entries_for_project(&self, project_id: ProjectId) -> Result<Vec<LogEntry>, StoreError> {
        (**self).entries_for_project(project_id)
    }
}
