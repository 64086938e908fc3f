//! Versioned JSON persistence for a whole project.

use crate::{LogStore, MemoryStore, StoreError};
use directories::ProjectDirs;
use doc_model::{Blueprint, LogEntry, Project, ProjectId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const PROJECT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("unable to resolve local data directory")]
    NoDataDirectory,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// On-disk snapshot of one project: the project record, its blueprints, and
/// their entries, in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFile {
    version: u32,
    pub project: Project,
    pub blueprints: Vec<Blueprint>,
    pub entries: Vec<LogEntry>,
}

impl ProjectFile {
    pub fn new(project: Project, blueprints: Vec<Blueprint>, entries: Vec<LogEntry>) -> Self {
        Self { version: PROJECT_SCHEMA_VERSION, project, blueprints, entries }
    }

    /// Snapshot a project out of a store.
    pub fn from_store(store: &MemoryStore, project_id: ProjectId) -> Result<Self, StoreError> {
        let project = store
            .project(project_id)
            .ok_or(StoreError::UnknownProject(project_id))?
            .clone();

        let blueprints: Vec<Blueprint> =
            store.blueprints_for_project(project_id).into_iter().cloned().collect();
        let entries = store.entries_for_project(project_id)?;

        Ok(Self::new(project, blueprints, entries))
    }

    /// Rebuild a store from the snapshot, re-validating every record on the
    /// way in.
    pub fn into_store(self) -> Result<MemoryStore, StoreError> {
        let mut store = MemoryStore::new();
        store.insert_project(self.project);

        for blueprint in self.blueprints {
            store.insert_blueprint(blueprint)?;
        }

        for entry in self.entries {
            store.insert_entry(entry)?;
        }

        Ok(store)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let bytes = fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), StorageError> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        let bytes = serde_json::to_vec_pretty(self)?;
        fs::write(path, bytes)?;
        Ok(())
    }
}

/// Project files under a root directory, one file per project id.
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn from_default_root() -> Result<Self, StorageError> {
        let dirs =
            ProjectDirs::from("dev", "SitePin", "SitePin").ok_or(StorageError::NoDataDirectory)?;

        Ok(Self { root: dirs.data_local_dir().to_path_buf() })
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn save_project(&self, file: &ProjectFile) -> Result<PathBuf, StorageError> {
        let path = self.project_path(file.project.id);
        file.save_to(&path)?;
        Ok(path)
    }

    pub fn load_project(&self, project_id: ProjectId) -> Result<ProjectFile, StorageError> {
        ProjectFile::load_from(self.project_path(project_id))
    }

    fn project_path(&self, project_id: ProjectId) -> PathBuf {
        self.root.join(format!("{}.json", project_id.0))
    }
}
