//! Gaze sample types

use serde::{Deserialize, Serialize};

/// Per-sample tracking quality reported by the device.
///
/// A sample is `Invalid` when the device produced an estimate it does not
/// trust (blink, subject out of range). Invalid samples are still buffered;
/// filtering is the consumer's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Validity {
    Valid,
    Invalid,
}

impl Validity {
    /// Display-string form used in tabular output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Validity::Valid => "Valid",
            Validity::Invalid => "Invalid",
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Validity::Valid)
    }
}

impl std::fmt::Display for Validity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One timestamped gaze estimate, as buffered by a session.
///
/// Immutable once appended: the session owns the buffer exclusively until
/// read out. `sequence` is assigned by the session in insertion order and
/// is contiguous from zero; `timestamp_us` comes from the device clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazeSample {
    /// Insertion index within the session buffer
    pub sequence: u64,

    /// Device timestamp in microseconds
    pub timestamp_us: i64,

    /// Horizontal gaze coordinate, display pixels
    pub x: f32,

    /// Vertical gaze coordinate, display pixels
    pub y: f32,

    /// Tracking quality for this sample
    pub validity: Validity,
}

impl GazeSample {
    /// Construct a sample from a device-level point and a sequence index.
    pub fn from_point(sequence: u64, point: crate::device::RawGazePoint) -> Self {
        Self {
            sequence,
            timestamp_us: point.timestamp_us,
            x: point.x,
            y: point.y,
            validity: point.validity,
        }
    }
}
