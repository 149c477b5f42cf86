//! Bundled device implementations.
//!
//! Two devices ship with the crate, both behind [`crate::GazeDevice`]:
//!
//! - [`SyntheticDevice`] generates a deterministic gaze path, for unit
//!   tests and benchmarks
//! - [`ScriptedDevice`] replays a scenario file tick by tick, for
//!   integration tests and demos
//!
//! Vendor SDK bindings for physical trackers live outside this crate and
//! implement the same trait.

mod scripted;
mod synthetic;

pub use scripted::ScriptedDevice;
pub use synthetic::{SyntheticConfig, SyntheticDevice};
