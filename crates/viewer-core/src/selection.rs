//! Drag-to-select state machine for spatial region queries.
//!
//! The controller is decoupled from gesture recognition: the host translates
//! its pointer events into `begin`/`update`/`end` calls. Events are returned
//! to the caller rather than delivered through callbacks, and calls arriving
//! in the wrong state are tolerated as no-ops since an event-driven UI layer
//! cannot guarantee ordering.

use crate::mapping::{self, Bounds, MapError, NormalizedRect, SurfacePoint, SurfaceRect};

/// Committed selections narrower or shorter than this fraction of the surface
/// are treated as accidental taps and discarded.
pub const MIN_SELECTION_EXTENT: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Inactive,
    AwaitingDrag,
    Dragging,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionEvent {
    Changed(NormalizedRect),
    Cleared,
}

#[derive(Debug)]
pub struct SelectionController {
    state: SelectionState,
    surface: Option<Bounds>,
    anchor: Option<SurfacePoint>,
    current: Option<SurfaceRect>,
    committed: Option<NormalizedRect>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self {
            state: SelectionState::Inactive,
            surface: None,
            anchor: None,
            current: None,
            committed: None,
        }
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// The last committed selection, until the next drag begins or the
    /// controller is disabled.
    pub fn committed(&self) -> Option<NormalizedRect> {
        self.committed
    }

    /// The in-progress drag rectangle, for overlay drawing.
    pub fn pending_rect(&self) -> Option<SurfaceRect> {
        self.current
    }

    /// Enter search mode over the given overlay surface.
    pub fn enable(&mut self, surface: Bounds) -> Result<(), MapError> {
        self.surface = Some(surface.validate()?);
        self.state = SelectionState::AwaitingDrag;
        self.anchor = None;
        self.current = None;
        Ok(())
    }

    /// Start a drag at the anchor point. No-op unless awaiting a drag.
    pub fn begin(&mut self, point: SurfacePoint) {
        if self.state != SelectionState::AwaitingDrag {
            return;
        }

        self.anchor = Some(point);
        self.current = None;
        self.committed = None;
        self.state = SelectionState::Dragging;
    }

    /// Extend the drag to the given point. No-op unless dragging.
    pub fn update(&mut self, point: SurfacePoint) {
        if self.state != SelectionState::Dragging {
            return;
        }

        let Some(anchor) = self.anchor else {
            return;
        };

        self.current = Some(SurfaceRect::spanning(anchor, point));
    }

    /// Finish the drag. Commits and reports the normalized rectangle when it
    /// clears the minimum-size gate; otherwise the drag is discarded silently
    /// and the controller waits for the next one.
    pub fn end(&mut self) -> Option<SelectionEvent> {
        if self.state != SelectionState::Dragging {
            return None;
        }

        self.anchor = None;
        let rect = self.current.take();
        self.state = SelectionState::AwaitingDrag;

        let surface = self.surface?;
        let normalized = mapping::to_normalized_rect(rect?, surface).ok()?;

        if normalized.width > MIN_SELECTION_EXTENT && normalized.height > MIN_SELECTION_EXTENT {
            self.committed = Some(normalized);
            self.state = SelectionState::Inactive;
            Some(SelectionEvent::Changed(normalized))
        } else {
            None
        }
    }

    /// Leave search mode from any state, dropping any pending drag and
    /// committed selection.
    pub fn disable(&mut self) -> SelectionEvent {
        self.state = SelectionState::Inactive;
        self.anchor = None;
        self.current = None;
        self.committed = None;
        SelectionEvent::Cleared
    }
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new()
    }
}
