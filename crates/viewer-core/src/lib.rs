//! Viewer-side geometry: normalized coordinate mapping and the
//! rectangle-selection state machine.
//!
//! Everything here is synchronous and allocation-light, suitable for the
//! interactive input thread. Rendering and gesture recognition live in the
//! host; this crate only receives points the host has already converted into
//! page or overlay space.

mod mapping;
mod selection;

pub use mapping::{
    to_normalized, to_normalized_rect, to_page_point, Bounds, MapError, NormalizedPoint,
    NormalizedRect, PagePoint, SurfacePoint, SurfaceRect,
};
pub use selection::{
    SelectionController, SelectionEvent, SelectionState, MIN_SELECTION_EXTENT,
};
