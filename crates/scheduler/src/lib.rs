//! Query scheduling primitives: cooperative cancellation and stale-result
//! protection.
//!
//! Gallery queries run off the interactive thread while the user keeps
//! gesturing, so two hazards need handling: an in-flight query must be
//! stoppable when its selection is cleared, and a slow query must never
//! overwrite the result of a newer one. [`CancellationToken`] covers the
//! first, [`RequestSequence`] the second.

mod cancel;
mod sequence;

pub use cancel::CancellationToken;
pub use sequence::{RequestId, RequestSequence};
