//! Display geometry for gaze coordinate mapping

use serde::{Deserialize, Serialize};

use crate::{Result, TrackerError};

/// Physical display area the tracker maps gaze onto.
///
/// All dimensions are in **pixels**; gaze coordinates produced by devices
/// use the same unit. `offset` shifts the coordinate origin on both axes,
/// mirroring the vendor SDK's origin-offset transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayGeometry {
    /// Display width in pixels
    pub width: f32,

    /// Display height in pixels
    pub height: f32,

    /// Origin offset applied to both axes, in pixels
    pub offset: f32,
}

impl DisplayGeometry {
    /// Create a geometry without validating it. Use [`DisplayGeometry::validated`]
    /// at session and device boundaries.
    pub fn new(width: f32, height: f32, offset: f32) -> Self {
        Self { width, height, offset }
    }

    /// Create a geometry, rejecting non-positive or non-finite dimensions.
    pub fn validated(width: f32, height: f32, offset: f32) -> Result<Self> {
        let geometry = Self { width, height, offset };
        geometry.validate()?;
        Ok(geometry)
    }

    /// Validate this geometry for use with a tracking device.
    pub fn validate(&self) -> Result<()> {
        if !self.width.is_finite() || !self.height.is_finite() {
            return Err(TrackerError::initialization_failed(format!(
                "display dimensions must be finite, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(TrackerError::initialization_failed(format!(
                "display dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.offset.is_finite() {
            return Err(TrackerError::initialization_failed(format!(
                "origin offset must be finite, got {}",
                self.offset
            )));
        }
        Ok(())
    }

    /// Map a normalized point (0.0..=1.0 on both axes) into display pixels,
    /// applying the origin offset.
    pub fn project(&self, nx: f32, ny: f32) -> (f32, f32) {
        (nx * self.width + self.offset, ny * self.height + self.offset)
    }
}
