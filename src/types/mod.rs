//! Core types for gaze data representation.
//!
//! - [`DisplayGeometry`] describes the display area gaze is mapped onto
//! - [`GazeSample`] is one buffered, timestamped gaze estimate
//! - [`Validity`] is the per-sample tracking quality flag
//! - [`SessionState`] is the explicit session lifecycle enum
//! - [`UpdateRate`] controls delivery rate for subscribed streams
//!
//! All coordinates are display **pixels**; timestamps are device-clock
//! microseconds.

mod geometry;
mod sample;
mod state;
mod update_rate;

pub use geometry::DisplayGeometry;
pub use sample::{GazeSample, Validity};
pub use state::SessionState;
pub use update_rate::UpdateRate;
