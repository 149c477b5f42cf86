//! Device capability trait for gaze sources.
//!
//! Everything the session layer needs from an eye tracker is three
//! operations: open (the implementation's constructor), poll, and close.
//! Keeping the trait this small lets the session logic run unchanged
//! against real vendor SDK bindings and the bundled simulated devices.
//!
//! A physical tracker is an exclusively-owned resource: exactly one open
//! device may hold a given hardware identity at a time. Implementations
//! enforce this by taking a [`DeviceClaim`] at open; a second open of the
//! same identity fails at construction rather than producing two sessions
//! that race on the hardware.

use std::collections::HashSet;
use std::sync::Mutex;
use tracing::{debug, trace};

use crate::types::Validity;
use crate::{Result, TrackerError};

/// One gaze estimate as produced by a device, before the session assigns
/// a sequence index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawGazePoint {
    /// Device timestamp in microseconds
    pub timestamp_us: i64,

    /// Horizontal coordinate, display pixels
    pub x: f32,

    /// Vertical coordinate, display pixels
    pub y: f32,

    /// Tracking quality for this estimate
    pub validity: Validity,
}

/// Capability interface for gaze sources.
///
/// Implementations must be `Send` so a device can be moved into a
/// background recording task.
pub trait GazeDevice: Send {
    /// Poll for the latest gaze estimate since the previous call.
    ///
    /// Must be non-blocking or bounded-latency so a caller-driven polling
    /// loop stays responsive. Returns:
    /// - `Ok(Some(point))` - a new estimate is available
    /// - `Ok(None)` - no new estimate this tick
    /// - `Err(e)` - transient read fault; the caller may retry
    fn poll(&mut self) -> Result<Option<RawGazePoint>>;

    /// Release the device handle. Idempotent; polling a closed device is
    /// a device fault.
    fn close(&mut self);

    /// Verdict the device's licensing mechanism reached on the credential
    /// presented at open. Evaluated once at open; constant thereafter.
    fn license_valid(&self) -> bool;

    /// Whether the handle is still held.
    fn is_open(&self) -> bool;

    /// Native sampling cadence in Hz.
    fn sample_rate_hz(&self) -> f64;

    /// Stable hardware identity used for exclusive claiming.
    fn device_id(&self) -> &str;
}

/// Process-wide set of claimed device identities.
static CLAIMED_DEVICES: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Exclusive hold on a device identity, released on drop.
#[derive(Debug)]
pub struct DeviceClaim {
    id: String,
}

impl DeviceClaim {
    /// Claim `id` for this process. Fails with an initialization error if
    /// another open device already holds it.
    pub fn acquire(id: &str) -> Result<Self> {
        let mut claimed = CLAIMED_DEVICES.lock().expect("device claim registry poisoned");
        let set = claimed.get_or_insert_with(HashSet::new);
        if !set.insert(id.to_string()) {
            return Err(TrackerError::initialization_failed(format!(
                "device {id:?} is already claimed by another session"
            )));
        }
        debug!(device = id, "claimed device");
        Ok(Self { id: id.to_string() })
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Drop for DeviceClaim {
    fn drop(&mut self) {
        let mut claimed = CLAIMED_DEVICES.lock().expect("device claim registry poisoned");
        if let Some(set) = claimed.as_mut() {
            set.remove(&self.id);
        }
        trace!(device = %self.id, "released device claim");
    }
}
