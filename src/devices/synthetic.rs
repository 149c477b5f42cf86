//! Deterministic synthetic gaze device.

use tracing::{debug, info};

use crate::device::{DeviceClaim, GazeDevice, RawGazePoint};
use crate::license::{LicenseKey, LicensePolicy};
use crate::types::{DisplayGeometry, Validity};
use crate::{Result, TrackerError};

/// Configuration for a [`SyntheticDevice`].
#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    /// Device identity used for exclusive claiming
    pub device_id: String,

    /// Native sampling cadence in Hz
    pub sample_rate_hz: f64,

    /// Mark every Nth sample `Invalid` (None for all-valid output)
    pub invalid_every: Option<u32>,

    /// Report a one-shot transient fault on this poll index
    pub fault_on_poll: Option<u64>,

    /// Credential the device accepts
    pub policy: LicensePolicy,
}

impl SyntheticConfig {
    /// 60Hz device accepting `key`, no invalid samples, no faults.
    pub fn accepting(key: impl Into<String>) -> Self {
        Self {
            device_id: "synthetic-0".to_string(),
            sample_rate_hz: 60.0,
            invalid_every: None,
            fault_on_poll: None,
            policy: LicensePolicy::perpetual(LicenseKey::new(key)),
        }
    }
}

/// Deterministic gaze generator.
///
/// Gaze follows a closed Lissajous-style path over the display; each poll
/// yields exactly one estimate, with timestamps advancing by the sample
/// interval, so N polls always produce N samples with strictly increasing
/// timestamps.
#[derive(Debug)]
pub struct SyntheticDevice {
    config: SyntheticConfig,
    geometry: DisplayGeometry,
    license_valid: bool,
    interval_us: i64,
    polls: u64,
    fault_pending: Option<u64>,
    claim: Option<DeviceClaim>,
}

impl SyntheticDevice {
    /// Open a synthetic device: validate geometry, claim the identity, and
    /// evaluate the presented credential against the device's policy.
    ///
    /// An invalid credential does not fail the open; it yields a device
    /// whose license verdict is false, so the session can report it via
    /// `is_license_valid()` and refuse to record.
    pub fn open(geometry: DisplayGeometry, key: &LicenseKey, config: SyntheticConfig) -> Result<Self> {
        geometry.validate()?;
        if !config.sample_rate_hz.is_finite() || config.sample_rate_hz <= 0.0 {
            return Err(TrackerError::initialization_failed(format!(
                "sample rate must be positive, got {}",
                config.sample_rate_hz
            )));
        }

        let claim = DeviceClaim::acquire(&config.device_id)?;
        let license_valid = config.policy.validate(key);
        let interval_us = (1_000_000.0 / config.sample_rate_hz).round().max(1.0) as i64;

        info!(
            device = %config.device_id,
            rate = config.sample_rate_hz,
            license_valid,
            "opened synthetic device"
        );

        Ok(Self {
            fault_pending: config.fault_on_poll,
            config,
            geometry,
            license_valid,
            interval_us,
            polls: 0,
            claim: Some(claim),
        })
    }

    fn path_point(&self, tick: u64) -> (f32, f32) {
        // Closed curve touching most of the display, period ~600 ticks.
        let t = tick as f32 * (std::f32::consts::TAU / 600.0);
        let nx = 0.5 + 0.45 * (3.0 * t).sin();
        let ny = 0.5 + 0.45 * (2.0 * t).cos();
        (nx, ny)
    }
}

impl GazeDevice for SyntheticDevice {
    fn poll(&mut self) -> Result<Option<RawGazePoint>> {
        if self.claim.is_none() {
            return Err(TrackerError::device_fault("device handle released"));
        }

        let tick = self.polls;
        self.polls += 1;

        if self.fault_pending == Some(tick) {
            self.fault_pending = None;
            return Err(TrackerError::device_fault("scripted transient fault"));
        }

        let (nx, ny) = self.path_point(tick);
        let (x, y) = self.geometry.project(nx, ny);
        let validity = match self.config.invalid_every {
            Some(n) if n > 0 && tick % n as u64 == n as u64 - 1 => Validity::Invalid,
            _ => Validity::Valid,
        };

        Ok(Some(RawGazePoint { timestamp_us: tick as i64 * self.interval_us, x, y, validity }))
    }

    fn close(&mut self) {
        if self.claim.take().is_some() {
            debug!(device = %self.config.device_id, "closed synthetic device");
        }
    }

    fn license_valid(&self) -> bool {
        self.license_valid
    }

    fn is_open(&self) -> bool {
        self.claim.is_some()
    }

    fn sample_rate_hz(&self) -> f64 {
        self.config.sample_rate_hz
    }

    fn device_id(&self) -> &str {
        &self.config.device_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> DisplayGeometry {
        DisplayGeometry::new(2560.0, 1440.0, 0.0)
    }

    fn open(config: SyntheticConfig) -> SyntheticDevice {
        SyntheticDevice::open(geometry(), &LicenseKey::from("valid-key"), config).unwrap()
    }

    #[test]
    fn every_poll_yields_a_point_with_increasing_timestamps() {
        let mut config = SyntheticConfig::accepting("valid-key");
        config.device_id = "synthetic-ts".to_string();
        let mut device = open(config);

        let mut last = -1i64;
        for _ in 0..100 {
            let point = device.poll().unwrap().expect("synthetic device yields every poll");
            assert!(point.timestamp_us > last);
            last = point.timestamp_us;
            assert!(point.x >= 0.0 && point.x <= 2560.0);
            assert!(point.y >= 0.0 && point.y <= 1440.0);
        }
    }

    #[test]
    fn invalid_credential_opens_with_false_verdict() {
        let mut config = SyntheticConfig::accepting("valid-key");
        config.device_id = "synthetic-lic".to_string();
        let device =
            SyntheticDevice::open(geometry(), &LicenseKey::from("wrong"), config).unwrap();
        assert!(!device.license_valid());
        assert!(device.is_open());
    }

    #[test]
    fn scripted_fault_is_one_shot() {
        let mut config = SyntheticConfig::accepting("valid-key");
        config.device_id = "synthetic-fault".to_string();
        config.fault_on_poll = Some(1);
        let mut device = open(config);

        assert!(device.poll().unwrap().is_some());
        let err = device.poll().unwrap_err();
        assert!(err.is_retryable());
        assert!(device.poll().unwrap().is_some());
    }

    #[test]
    fn periodic_invalid_marking() {
        let mut config = SyntheticConfig::accepting("valid-key");
        config.device_id = "synthetic-inv".to_string();
        config.invalid_every = Some(3);
        let mut device = open(config);

        let validities: Vec<Validity> =
            (0..6).map(|_| device.poll().unwrap().unwrap().validity).collect();
        assert_eq!(
            validities,
            vec![
                Validity::Valid,
                Validity::Valid,
                Validity::Invalid,
                Validity::Valid,
                Validity::Valid,
                Validity::Invalid,
            ]
        );
    }

    #[test]
    fn poll_after_close_is_a_device_fault() {
        let mut config = SyntheticConfig::accepting("valid-key");
        config.device_id = "synthetic-closed".to_string();
        let mut device = open(config);
        device.close();
        assert!(!device.is_open());
        assert!(device.poll().is_err());
        // close is idempotent
        device.close();
    }

    #[test]
    fn double_open_of_same_identity_is_rejected() {
        let mut config = SyntheticConfig::accepting("valid-key");
        config.device_id = "synthetic-excl".to_string();
        let first = open(config.clone());
        let second = SyntheticDevice::open(geometry(), &LicenseKey::from("valid-key"), config);
        assert!(matches!(second.unwrap_err(), TrackerError::Initialization { .. }));
        drop(first);
    }

    #[test]
    fn bad_geometry_fails_open() {
        let config = SyntheticConfig::accepting("valid-key");
        let err = SyntheticDevice::open(
            DisplayGeometry::new(-1.0, 1440.0, 0.0),
            &LicenseKey::from("valid-key"),
            config,
        )
        .unwrap_err();
        assert!(matches!(err, TrackerError::Initialization { .. }));
    }
}
