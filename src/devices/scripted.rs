//! Scenario playback device.

use std::path::Path;
use tracing::{debug, info, trace};

use crate::device::{DeviceClaim, GazeDevice, RawGazePoint};
use crate::license::LicenseKey;
use crate::scenario::{Scenario, ScenarioTick};
use crate::types::{DisplayGeometry, Validity};
use crate::{Result, TrackerError};

/// Device that replays a [`Scenario`] tick by tick.
///
/// Each poll consumes the next scripted tick. Timestamps advance by the
/// scenario's sample interval per tick, so scripted points always carry
/// strictly increasing timestamps. When the script is exhausted the
/// device reports no further estimates (`Ok(None)`), like a tracker whose
/// subject has left.
pub struct ScriptedDevice {
    device_id: String,
    geometry: DisplayGeometry,
    license_valid: bool,
    sample_rate_hz: f64,
    interval_us: i64,
    ticks: std::vec::IntoIter<ScenarioTick>,
    cursor: u64,
    claim: Option<DeviceClaim>,
}

impl ScriptedDevice {
    /// Open a playback device for an in-memory scenario.
    pub fn open(scenario: Scenario, geometry: DisplayGeometry, key: &LicenseKey) -> Result<Self> {
        geometry.validate()?;
        scenario.validate()?;

        let device_id = format!("scenario:{}", scenario.name);
        let claim = DeviceClaim::acquire(&device_id)?;

        let policy = scenario.license.to_policy()?;
        let license_valid = policy.validate(key);
        let interval_us = (1_000_000.0 / scenario.sample_rate_hz).round().max(1.0) as i64;

        info!(
            device = %device_id,
            ticks = scenario.ticks.len(),
            license_valid,
            "opened scripted device"
        );

        Ok(Self {
            device_id,
            geometry,
            license_valid,
            sample_rate_hz: scenario.sample_rate_hz,
            interval_us,
            ticks: scenario.ticks.into_iter(),
            cursor: 0,
            claim: Some(claim),
        })
    }

    /// Open a playback device from a scenario file.
    pub fn open_file<P: AsRef<Path>>(
        path: P,
        geometry: DisplayGeometry,
        key: &LicenseKey,
    ) -> Result<Self> {
        let scenario = Scenario::load(path)?;
        Self::open(scenario, geometry, key)
    }
}

impl GazeDevice for ScriptedDevice {
    fn poll(&mut self) -> Result<Option<RawGazePoint>> {
        if self.claim.is_none() {
            return Err(TrackerError::device_fault("device handle released"));
        }

        let tick_index = self.cursor;
        let Some(tick) = self.ticks.next() else {
            trace!(device = %self.device_id, "script exhausted");
            return Ok(None);
        };
        self.cursor += 1;

        match tick {
            ScenarioTick::Point { x, y, valid } => {
                let (px, py) = self.geometry.project(x, y);
                let validity = if valid { Validity::Valid } else { Validity::Invalid };
                Ok(Some(RawGazePoint {
                    timestamp_us: tick_index as i64 * self.interval_us,
                    x: px,
                    y: py,
                    validity,
                }))
            }
            ScenarioTick::Empty => Ok(None),
            ScenarioTick::Fault { reason } => Err(TrackerError::device_fault(reason)),
        }
    }

    fn close(&mut self) {
        if self.claim.take().is_some() {
            debug!(device = %self.device_id, "closed scripted device");
        }
    }

    fn license_valid(&self) -> bool {
        self.license_valid
    }

    fn is_open(&self) -> bool {
        self.claim.is_some()
    }

    fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_hz
    }

    fn device_id(&self) -> &str {
        &self.device_id
    }
}
