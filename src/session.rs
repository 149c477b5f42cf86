//! Session-controlled gaze recording.
//!
//! [`TrackerSession`] is the synchronous, caller-driven recording surface:
//! the caller owns the cadence by invoking [`TrackerSession::update`] in a
//! timed loop, and the session guards every operation with an explicit
//! state machine (`Created → Recording ⇄ Paused → Stopped`).
//!
//! ```rust
//! use gazelink::{Gazelink, DisplayGeometry};
//!
//! # fn main() -> gazelink::Result<()> {
//! let geometry = DisplayGeometry::new(2560.0, 1440.0, 0.0);
//! let mut session = Gazelink::simulate(geometry, "valid-key")?;
//!
//! session.start()?;
//! for _ in 0..10 {
//!     session.update()?;
//! }
//! session.stop();
//!
//! println!("{}", session.formatted_data()?);
//! # Ok(())
//! # }
//! ```

use tracing::{debug, info, trace, warn};

use crate::device::GazeDevice;
use crate::export::GazeTable;
use crate::types::{DisplayGeometry, GazeSample, SessionState};
use crate::{Result, TrackerError};

/// A recording session over one exclusively-held gaze device.
///
/// Invariants, upheld by every operation:
/// - the sample buffer only grows while the session is `Recording`;
///   pausing or stopping never discards buffered samples
/// - sequence indices are contiguous from zero in insertion order
/// - the license verdict is evaluated once, at construction, and cached
/// - `Stopped` is terminal; the device handle is released on stop
pub struct TrackerSession<D: GazeDevice> {
    device: D,
    geometry: DisplayGeometry,
    license_valid: bool,
    state: SessionState,
    buffer: Vec<GazeSample>,
}

impl<D: GazeDevice> TrackerSession<D> {
    /// Wrap an opened device in a session.
    ///
    /// The device is expected to have validated the caller's credential at
    /// open; the verdict is cached here and never re-evaluated. Fails if
    /// the geometry is invalid or the device handle is already released.
    pub fn new(device: D, geometry: DisplayGeometry) -> Result<Self> {
        geometry.validate()?;
        if !device.is_open() {
            return Err(TrackerError::initialization_failed(format!(
                "device {:?} handle is not open",
                device.device_id()
            )));
        }

        let license_valid = device.license_valid();
        info!(
            device = device.device_id(),
            rate = device.sample_rate_hz(),
            license_valid,
            "created tracker session"
        );

        Ok(Self { device, geometry, license_valid, state: SessionState::Created, buffer: Vec::new() })
    }

    /// Whether the credential presented at construction unlocked the device.
    /// Pure query; callable in any state.
    pub fn is_license_valid(&self) -> bool {
        self.license_valid
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Display geometry this session records against.
    pub fn geometry(&self) -> DisplayGeometry {
        self.geometry
    }

    /// Native device cadence in Hz. Callers should drive [`Self::update`]
    /// at least this fast to avoid missing estimates.
    pub fn sample_rate_hz(&self) -> f64 {
        self.device.sample_rate_hz()
    }

    /// Number of buffered samples.
    pub fn sample_count(&self) -> usize {
        self.buffer.len()
    }

    /// Begin or resume collection.
    ///
    /// Valid from `Created` and `Paused`. Calling while already `Recording`
    /// is a no-op: the tick clock is not restarted and sequence numbering
    /// continues uninterrupted. Fails when the license is invalid or after
    /// `stop()` has released the device handle.
    pub fn start(&mut self) -> Result<()> {
        if !self.state.can_start() {
            return Err(TrackerError::Recording {
                operation: "start",
                state: self.state,
                reason: "device handle released; construct a new session".to_string(),
            });
        }
        if !self.license_valid {
            return Err(TrackerError::license_rejected("start", self.state));
        }
        if !self.device.is_open() {
            return Err(TrackerError::Recording {
                operation: "start",
                state: self.state,
                reason: "device handle is not open".to_string(),
            });
        }
        if self.state.is_recording() {
            trace!("start while recording: no-op");
            return Ok(());
        }

        debug!(from = %self.state, "session recording");
        self.state = SessionState::Recording;
        Ok(())
    }

    /// Poll the device once and append at most one new sample.
    ///
    /// Returns `Ok(true)` when a sample was appended and `Ok(false)` when
    /// the device had no new estimate this tick, so timed polling loops
    /// need no special casing. Valid only while `Recording`. A transient
    /// device fault is returned as a retryable error; the session state
    /// and buffer are unaffected and the caller may simply keep polling.
    pub fn update(&mut self) -> Result<bool> {
        if !self.state.is_recording() {
            return Err(TrackerError::invalid_state("update", self.state));
        }

        match self.device.poll() {
            Ok(Some(point)) => {
                let sample = GazeSample::from_point(self.buffer.len() as u64, point);
                trace!(
                    sequence = sample.sequence,
                    timestamp_us = sample.timestamp_us,
                    "buffered gaze sample"
                );
                self.buffer.push(sample);
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(e) => {
                warn!(error = %e, "device poll failed");
                Err(e)
            }
        }
    }

    /// Suspend collection, keeping the buffer. No-op unless `Recording`.
    pub fn pause(&mut self) {
        if self.state.can_pause() {
            debug!(samples = self.buffer.len(), "session paused");
            self.state = SessionState::Paused;
        } else {
            trace!(state = %self.state, "pause: no-op");
        }
    }

    /// Finalize the session: release the device handle and seal the buffer.
    ///
    /// Idempotent. After stop, no further samples can be appended and
    /// `start()` fails; the buffered samples remain readable.
    pub fn stop(&mut self) {
        if self.state.is_terminal() {
            trace!("stop: already stopped");
            return;
        }
        info!(samples = self.buffer.len(), from = %self.state, "session stopped");
        self.device.close();
        self.state = SessionState::Stopped;
    }

    /// Borrow the accumulated samples in insertion order.
    ///
    /// Non-destructive; callable in any state. Fails when the license is
    /// invalid, mirroring the vendor SDK's retrieval gate.
    pub fn samples(&self) -> Result<&[GazeSample]> {
        if !self.license_valid {
            return Err(TrackerError::retrieval_failed("license is invalid or expired"));
        }
        Ok(&self.buffer)
    }

    /// The accumulated samples as a tabular-ready [`GazeTable`].
    ///
    /// Non-destructive and repeatable: the buffer is never cleared by a
    /// read. A session with no recorded data yields an empty table rather
    /// than an error.
    pub fn formatted_data(&self) -> Result<GazeTable> {
        Ok(GazeTable::from_samples(self.samples()?))
    }

    /// Discard all buffered samples. The session state is unchanged; a
    /// `Recording` session keeps collecting, with sequence numbering
    /// restarting from zero.
    pub fn clear_buffer(&mut self) {
        debug!(discarded = self.buffer.len(), "cleared sample buffer");
        self.buffer.clear();
    }
}
