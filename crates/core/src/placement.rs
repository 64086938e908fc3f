//! Tap-to-place command for new pins.
//!
//! The command carries its normalized coordinates explicitly from the tap
//! that produced them to the entry it creates; there is no shared mutable
//! coordinate state between the gesture layer and the model.

use doc_model::{Blueprint, LogCategory, LogEntry, ModelError};
use viewer_core::NormalizedPoint;

/// Request to create a log entry at a tapped position on a blueprint page.
#[derive(Debug, Clone)]
pub struct PlacePin {
    pub title: String,
    pub notes: String,
    pub category: LogCategory,
    pub page_number: u32,
    pub position: NormalizedPoint,
}

impl PlacePin {
    pub fn new(
        title: impl Into<String>,
        category: LogCategory,
        page_number: u32,
        position: NormalizedPoint,
    ) -> Self {
        Self {
            title: title.into(),
            notes: String::new(),
            category,
            page_number,
            position,
        }
    }

    /// Build the entry for the target blueprint, validating the page number
    /// and position against it.
    pub fn apply(&self, blueprint: &Blueprint) -> Result<LogEntry, ModelError> {
        let mut entry = LogEntry::new(
            blueprint.id,
            self.title.clone(),
            self.category,
            self.position.x,
            self.position.y,
            self.page_number,
        );
        entry.notes = self.notes.clone();
        entry.validate(blueprint.page_count)?;
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::{PageSize, ProjectId};

    fn blueprint() -> Blueprint {
        Blueprint::new(
            ProjectId::new(),
            "Ground Floor Plan",
            "ground-floor.pdf",
            2,
            PageSize::default(),
        )
    }

    #[test]
    fn placement_produces_a_valid_entry() {
        let blueprint = blueprint();
        let command = PlacePin::new(
            "Main Electrical Panel",
            LogCategory::Electrical,
            1,
            NormalizedPoint::new(0.3, 0.4),
        );

        let entry = command.apply(&blueprint).expect("placement should succeed");

        assert_eq!(entry.blueprint_id, blueprint.id);
        assert_eq!(entry.page_number, 1);
        assert_eq!((entry.x, entry.y), (0.3, 0.4));
        assert_eq!(entry.category, LogCategory::Electrical);
    }

    #[test]
    fn placement_rejects_out_of_range_page() {
        let blueprint = blueprint();
        let command = PlacePin::new(
            "Panel",
            LogCategory::Electrical,
            5,
            NormalizedPoint::new(0.3, 0.4),
        );

        assert!(matches!(
            command.apply(&blueprint),
            Err(ModelError::PageOutOfRange { page: 5, page_count: 2 })
        ));
    }

    #[test]
    fn placement_rejects_out_of_range_position() {
        let blueprint = blueprint();
        let command = PlacePin::new(
            "Panel",
            LogCategory::Electrical,
            1,
            NormalizedPoint::new(1.4, 0.4),
        );

        assert!(matches!(
            command.apply(&blueprint),
            Err(ModelError::PositionOutOfRange { .. })
        ));
    }

    #[test]
    fn empty_title_is_persistable() {
        let blueprint = blueprint();
        let command =
            PlacePin::new("", LogCategory::General, 1, NormalizedPoint::new(0.5, 0.5));

        let entry = command.apply(&blueprint).expect("placement should succeed");
        assert!(entry.title.is_empty());
    }
}
