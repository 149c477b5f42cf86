//! Scenario files for scripted playback devices.
//!
//! A scenario is the recorded-session analog of live hardware: a YAML file
//! describing what the device reports on each poll tick, in order. It is
//! how integration tests and demos exercise the full session lifecycle
//! without a tracker attached.
//!
//! ```yaml
//! name: sweep-left-to-right
//! sample_rate_hz: 60.0
//! license:
//!   accepted: int.lab2024
//!   expires: 2030/12/31
//! ticks:
//!   - kind: point
//!     x: 0.1
//!     y: 0.5
//!   - kind: empty
//!   - kind: fault
//!     reason: subject out of range
//! ```
//!
//! Coordinates are normalized (`0.0..=1.0`); the scripted device projects
//! them into display pixels using the session's geometry.

use std::path::Path;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::license::{LicenseKey, LicensePolicy};
use crate::{Result, TrackerError};

/// License provisioning as written in a scenario file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseSpec {
    /// Credential the device accepts
    pub accepted: String,

    /// Expiry date, `YYYY/MM/DD`
    pub expires: String,
}

impl LicenseSpec {
    /// Convert to a runtime policy, surfacing a malformed date as a
    /// parse error with the scenario as context.
    pub fn to_policy(&self) -> Result<LicensePolicy> {
        LicensePolicy::with_expiry_str(LicenseKey::new(self.accepted.clone()), &self.expires)
            .map_err(|e| {
                TrackerError::scenario_parse_error("license.expires", e.to_string())
            })
    }
}

/// One scripted poll outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioTick {
    /// Device reports a gaze estimate at normalized coordinates.
    Point {
        x: f32,
        y: f32,
        #[serde(default = "default_valid")]
        valid: bool,
    },
    /// Device has no new estimate this tick.
    Empty,
    /// Device reports a transient read fault.
    Fault { reason: String },
}

fn default_valid() -> bool {
    true
}

/// A complete scripted device description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Human-readable scenario name, also used as the device identity
    pub name: String,

    /// Native cadence the scripted device reports
    pub sample_rate_hz: f64,

    /// License provisioning for the scripted device
    pub license: LicenseSpec,

    /// Ordered poll outcomes; replayed once, then the device reports
    /// no further estimates
    pub ticks: Vec<ScenarioTick>,
}

impl Scenario {
    /// Load and validate a scenario from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| TrackerError::scenario_file_error(path.to_path_buf(), e))?;
        let scenario = Self::parse(&text)?;
        info!(
            name = %scenario.name,
            ticks = scenario.ticks.len(),
            rate = scenario.sample_rate_hz,
            "loaded scenario {}", path.display()
        );
        Ok(scenario)
    }

    /// Parse and validate a scenario from YAML text.
    pub fn parse(text: &str) -> Result<Self> {
        let scenario: Scenario = serde_yaml_ng::from_str(text)
            .map_err(|e| TrackerError::scenario_parse_error("scenario YAML", e.to_string()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Structural validation beyond what serde enforces.
    pub fn validate(&self) -> Result<()> {
        if self.ticks.is_empty() {
            return Err(TrackerError::scenario_parse_error("ticks", "scenario has no ticks"));
        }
        if !self.sample_rate_hz.is_finite() || self.sample_rate_hz <= 0.0 {
            return Err(TrackerError::scenario_parse_error(
                "sample_rate_hz",
                format!("sample rate must be positive, got {}", self.sample_rate_hz),
            ));
        }
        for (index, tick) in self.ticks.iter().enumerate() {
            if let ScenarioTick::Point { x, y, .. } = tick {
                let in_range =
                    (0.0..=1.0).contains(x) && (0.0..=1.0).contains(y) && x.is_finite() && y.is_finite();
                if !in_range {
                    return Err(TrackerError::scenario_parse_error(
                        format!("ticks[{index}]"),
                        format!("normalized coordinates out of range: ({x}, {y})"),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Number of ticks that carry a gaze estimate.
    pub fn point_count(&self) -> usize {
        self.ticks.iter().filter(|t| matches!(t, ScenarioTick::Point { .. })).count()
    }
}
