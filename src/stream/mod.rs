//! Stream utilities for sample subscriptions.

mod decimate;

pub use decimate::{Decimate, DecimateExt};
