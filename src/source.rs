//! Async sample sources for background recording.

use async_trait::async_trait;
use tokio::time::{Interval, MissedTickBehavior, interval};
use tracing::trace;

use crate::device::GazeDevice;
use crate::types::GazeSample;
use crate::Result;

/// Trait for async gaze sample sources.
///
/// Sources abstract over pacing: the driver just awaits the next sample.
///
/// Returns:
/// - `Ok(Some(sample))` - new sample available
/// - `Ok(None)` - source ended (normal termination)
/// - `Err(e)` - transient error occurred
#[async_trait]
pub trait SampleSource: Send + 'static {
    /// Await the next gaze sample.
    async fn next_sample(&mut self) -> Result<Option<GazeSample>>;

    /// Native source cadence in Hz.
    fn sample_rate_hz(&self) -> f64;

    /// Release underlying resources. Called once when collection ends.
    fn close(&mut self) {}
}

/// Number of consecutive empty polls after which a paced source reports
/// end-of-stream (the subject left, or a script ran out).
const DEFAULT_IDLE_LIMIT: u32 = 120;

/// Adapts a synchronous [`GazeDevice`] into a [`SampleSource`] by pacing
/// polls at the device's native rate and assigning sequence indices.
pub struct PacedSource<D: GazeDevice> {
    device: D,
    interval: Interval,
    sequence: u64,
    idle_polls: u32,
    idle_limit: u32,
}

impl<D: GazeDevice> PacedSource<D> {
    pub fn new(device: D) -> Self {
        let period = std::time::Duration::from_secs_f64(1.0 / device.sample_rate_hz());
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { device, interval, sequence: 0, idle_polls: 0, idle_limit: DEFAULT_IDLE_LIMIT }
    }

    /// Override how many consecutive empty polls count as end-of-stream.
    pub fn with_idle_limit(mut self, limit: u32) -> Self {
        self.idle_limit = limit.max(1);
        self
    }
}

#[async_trait]
impl<D: GazeDevice + 'static> SampleSource for PacedSource<D> {
    async fn next_sample(&mut self) -> Result<Option<GazeSample>> {
        loop {
            self.interval.tick().await;
            match self.device.poll()? {
                Some(point) => {
                    let sample = GazeSample::from_point(self.sequence, point);
                    self.sequence += 1;
                    self.idle_polls = 0;
                    return Ok(Some(sample));
                }
                None => {
                    self.idle_polls += 1;
                    if self.idle_polls >= self.idle_limit {
                        trace!(
                            idle_polls = self.idle_polls,
                            "no estimates from device, ending source"
                        );
                        return Ok(None);
                    }
                }
            }
        }
    }

    fn sample_rate_hz(&self) -> f64 {
        self.device.sample_rate_hz()
    }

    fn close(&mut self) {
        self.device.close();
    }
}
