//! In-memory store with explicit ownership and cascade deletes.

use crate::{LogStore, StoreError};
use doc_model::{Blueprint, BlueprintId, LogEntry, LogEntryId, Project, ProjectId};

/// Photo/video totals for a blueprint or project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MediaTotals {
    pub photos: usize,
    pub videos: usize,
}

impl MediaTotals {
    pub fn items(&self) -> usize {
        self.photos + self.videos
    }
}

/// Record store keeping insertion order per collection.
///
/// Inserts validate that the owning record exists and that entries satisfy
/// the page/position invariants against their blueprint. Removals cascade:
/// removing a project removes its blueprints and their entries, removing a
/// blueprint removes its entries.
#[derive(Debug, Default)]
pub struct MemoryStore {
    projects: Vec<Project>,
    blueprints: Vec<Blueprint>,
    entries: Vec<LogEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_project(&mut self, project: Project) -> ProjectId {
        let id = project.id;
        self.projects.retain(|existing| existing.id != id);
        self.projects.push(project);
        id
    }

    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }

    pub fn project_mut(&mut self, id: ProjectId) -> Option<&mut Project> {
        self.projects.iter_mut().find(|project| project.id == id)
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn insert_blueprint(&mut self, blueprint: Blueprint) -> Result<BlueprintId, StoreError> {
        if self.project(blueprint.project_id).is_none() {
            return Err(StoreError::UnknownProject(blueprint.project_id));
        }

        let id = blueprint.id;
        self.blueprints.retain(|existing| existing.id != id);
        self.blueprints.push(blueprint);
        Ok(id)
    }

    pub fn blueprint(&self, id: BlueprintId) -> Option<&Blueprint> {
        self.blueprints.iter().find(|blueprint| blueprint.id == id)
    }

    pub fn blueprint_mut(&mut self, id: BlueprintId) -> Option<&mut Blueprint> {
        self.blueprints.iter_mut().find(|blueprint| blueprint.id == id)
    }

    pub fn blueprints_for_project(&self, project_id: ProjectId) -> Vec<&Blueprint> {
        self.blueprints
            .iter()
            .filter(|blueprint| blueprint.project_id == project_id)
            .collect()
    }

    pub fn insert_entry(&mut self, entry: LogEntry) -> Result<LogEntryId, StoreError> {
        let blueprint = self
            .blueprint(entry.blueprint_id)
            .ok_or(StoreError::UnknownBlueprint(entry.blueprint_id))?;
        entry.validate(blueprint.page_count)?;

        let id = entry.id;
        self.entries.retain(|existing| existing.id != id);
        self.entries.push(entry);
        Ok(id)
    }

    pub fn entry(&self, id: LogEntryId) -> Option<&LogEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Replace an existing entry in place, re-validating it and keeping its
    /// position in insertion order.
    pub fn update_entry(&mut self, entry: LogEntry) -> Result<(), StoreError> {
        let blueprint = self
            .blueprint(entry.blueprint_id)
            .ok_or(StoreError::UnknownBlueprint(entry.blueprint_id))?;
        entry.validate(blueprint.page_count)?;

        let slot = self
            .entries
            .iter_mut()
            .find(|existing| existing.id == entry.id)
            .ok_or(StoreError::UnknownEntry(entry.id))?;
        *slot = entry;
        Ok(())
    }

    pub fn remove_entry(&mut self, id: LogEntryId) -> Option<LogEntry> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(index))
    }

    pub fn remove_blueprint(&mut self, id: BlueprintId) -> Option<Blueprint> {
        let index = self.blueprints.iter().position(|blueprint| blueprint.id == id)?;
        let blueprint = self.blueprints.remove(index);
        self.entries.retain(|entry| entry.blueprint_id != id);
        Some(blueprint)
    }

    pub fn remove_project(&mut self, id: ProjectId) -> Option<Project> {
        let index = self.projects.iter().position(|project| project.id == id)?;
        let project = self.projects.remove(index);

        let owned: Vec<BlueprintId> = self
            .blueprints
            .iter()
            .filter(|blueprint| blueprint.project_id == id)
            .map(|blueprint| blueprint.id)
            .collect();

        for blueprint_id in owned {
            self.remove_blueprint(blueprint_id);
        }

        Some(project)
    }

    pub fn media_totals_for_blueprint(&self, blueprint_id: BlueprintId) -> MediaTotals {
        self.entries
            .iter()
            .filter(|entry| entry.blueprint_id == blueprint_id)
            .fold(MediaTotals::default(), |totals, entry| MediaTotals {
                photos: totals.photos + entry.photo_count(),
                videos: totals.videos + usize::from(entry.has_video()),
            })
    }

    pub fn media_totals_for_project(&self, project_id: ProjectId) -> MediaTotals {
        self.blueprints_for_project(project_id)
            .into_iter()
            .map(|blueprint| self.media_totals_for_blueprint(blueprint.id))
            .fold(MediaTotals::default(), |acc, totals| MediaTotals {
                photos: acc.photos + totals.photos,
                videos: acc.videos + totals.videos,
            })
    }

    /// Most recent entries across the project, newest first, ties kept in
    /// insertion order.
    pub fn recent_entries(&self, project_id: ProjectId, limit: usize) -> Vec<&LogEntry> {
        let blueprint_ids: Vec<BlueprintId> = self
            .blueprints_for_project(project_id)
            .into_iter()
            .map(|blueprint| blueprint.id)
            .collect();

        let mut entries: Vec<&LogEntry> = self
            .entries
            .iter()
            .filter(|entry| blueprint_ids.contains(&entry.blueprint_id))
            .collect();
        entries.sort_by_key(|entry| std::cmp::Reverse(entry.date));
        entries.truncate(limit);
        entries
    }
}

impl LogStore for MemoryStore {
    fn entries_for_blueprint(&self, blueprint_id: BlueprintId) -> Result<Vec<LogEntry>, StoreError> {
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.blueprint_id == blueprint_id)
            .cloned()
            .collect())
    }

    fn entries_for_project(&self, project_id: ProjectId) -> Result<Vec<LogEntry>, StoreError> {
        let blueprint_ids: Vec<BlueprintId> = self
            .blueprints_for_project(project_id)
            .into_iter()
            .map(|blueprint| blueprint.id)
            .collect();

        Ok(self
            .entries
            .iter()
            .filter(|entry| blueprint_ids.contains(&entry.blueprint_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::{LogCategory, PageSize};

    fn seeded_store() -> (MemoryStore, ProjectId, BlueprintId) {
        let mut store = MemoryStore::new();
        let project_id = store.insert_project(Project::new("Modern Office Complex"));

        let blueprint = Blueprint::new(
            project_id,
            "Ground Floor Plan",
            "ground-floor.pdf",
            2,
            PageSize::default(),
        );
        let blueprint_id =
            store.insert_blueprint(blueprint).expect("blueprint insert should succeed");

        (store, project_id, blueprint_id)
    }

    #[test]
    fn insert_entry_requires_known_blueprint() {
        let (mut store, _, _) = seeded_store();

        let orphan = LogEntry::new(
            BlueprintId::new(),
            "Panel",
            LogCategory::Electrical,
            0.5,
            0.5,
            1,
        );

        assert!(matches!(
            store.insert_entry(orphan),
            Err(StoreError::UnknownBlueprint(_))
        ));
    }

    #[test]
    fn insert_entry_enforces_model_invariants() {
        let (mut store, _, blueprint_id) = seeded_store();

        let bad_page =
            LogEntry::new(blueprint_id, "Panel", LogCategory::Electrical, 0.5, 0.5, 3);
        assert!(matches!(store.insert_entry(bad_page), Err(StoreError::InvalidEntry(_))));

        let bad_position =
            LogEntry::new(blueprint_id, "Panel", LogCategory::Electrical, 1.5, 0.5, 1);
        assert!(store.insert_entry(bad_position).is_err());
    }

    #[test]
    fn blueprint_insert_requires_known_project() {
        let mut store = MemoryStore::new();

        let blueprint = Blueprint::new(
            ProjectId::new(),
            "Plan",
            "plan.pdf",
            1,
            PageSize::default(),
        );

        assert!(matches!(
            store.insert_blueprint(blueprint),
            Err(StoreError::UnknownProject(_))
        ));
    }

    #[test]
    fn removing_a_blueprint_cascades_to_entries() {
        let (mut store, _, blueprint_id) = seeded_store();

        let entry = LogEntry::new(blueprint_id, "Panel", LogCategory::Electrical, 0.3, 0.4, 1);
        let entry_id = store.insert_entry(entry).expect("entry insert should succeed");

        store.remove_blueprint(blueprint_id).expect("blueprint should be removed");

        assert!(store.entry(entry_id).is_none());
        assert!(store
            .entries_for_blueprint(blueprint_id)
            .expect("fetch should succeed")
            .is_empty());
    }

    #[test]
    fn removing_a_project_cascades_to_blueprints_and_entries() {
        let (mut store, project_id, blueprint_id) = seeded_store();

        let entry = LogEntry::new(blueprint_id, "Panel", LogCategory::Electrical, 0.3, 0.4, 1);
        store.insert_entry(entry).expect("entry insert should succeed");

        store.remove_project(project_id).expect("project should be removed");

        assert!(store.blueprint(blueprint_id).is_none());
        assert!(store
            .entries_for_project(project_id)
            .expect("fetch should succeed")
            .is_empty());
    }

    #[test]
    fn update_entry_replaces_in_place() {
        let (mut store, _, blueprint_id) = seeded_store();

        let entry = LogEntry::new(blueprint_id, "Panel", LogCategory::Electrical, 0.3, 0.4, 1);
        let entry_id = store.insert_entry(entry).expect("entry insert should succeed");

        let mut updated = store.entry(entry_id).expect("entry should exist").clone();
        updated.notes = "200A service".to_owned();
        store.update_entry(updated).expect("update should succeed");

        assert_eq!(
            store.entry(entry_id).expect("entry should exist").notes,
            "200A service"
        );

        let mut unknown = store.entry(entry_id).expect("entry should exist").clone();
        unknown.id = LogEntryId::new();
        assert!(matches!(store.update_entry(unknown), Err(StoreError::UnknownEntry(_))));
    }

    #[test]
    fn fetches_preserve_insertion_order() {
        let (mut store, _, blueprint_id) = seeded_store();

        for title in ["first", "second", "third"] {
            let entry =
                LogEntry::new(blueprint_id, title, LogCategory::General, 0.5, 0.5, 1);
            store.insert_entry(entry).expect("entry insert should succeed");
        }

        let fetched = store
            .entries_for_blueprint(blueprint_id)
            .expect("fetch should succeed");
        let titles: Vec<&str> = fetched.iter().map(|entry| entry.title.as_str()).collect();

        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn media_totals_count_photos_and_videos() {
        let (mut store, project_id, blueprint_id) = seeded_store();

        let mut with_photos =
            LogEntry::new(blueprint_id, "Panel", LogCategory::Electrical, 0.3, 0.4, 1);
        with_photos.add_photo(vec![1]);
        with_photos.add_photo(vec![2]);
        store.insert_entry(with_photos).expect("entry insert should succeed");

        let mut with_video =
            LogEntry::new(blueprint_id, "Valve", LogCategory::Plumbing, 0.7, 0.6, 1);
        with_video.set_video(vec![3], "valve.mov");
        store.insert_entry(with_video).expect("entry insert should succeed");

        let totals = store.media_totals_for_blueprint(blueprint_id);
        assert_eq!(totals, MediaTotals { photos: 2, videos: 1 });
        assert_eq!(totals.items(), 3);

        assert_eq!(store.media_totals_for_project(project_id), totals);
    }

    #[test]
    fn recent_entries_are_newest_first_and_limited() {
        let (mut store, project_id, blueprint_id) = seeded_store();

        for (title, date) in [("old", 100), ("newest", 300), ("mid", 200)] {
            let mut entry =
                LogEntry::new(blueprint_id, title, LogCategory::General, 0.5, 0.5, 1);
            entry.date = date;
            store.insert_entry(entry).expect("entry insert should succeed");
        }

        let recent = store.recent_entries(project_id, 2);
        let titles: Vec<&str> = recent.iter().map(|entry| entry.title.as_str()).collect();

        assert_eq!(titles, vec!["newest", "mid"]);
    }
}
