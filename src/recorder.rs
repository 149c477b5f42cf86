//! Background recording with stream subscriptions.
//!
//! [`Recorder`] is the async counterpart of [`crate::TrackerSession`]: the
//! same lifecycle semantics, but a tokio task owns the device and drives
//! polling at the native cadence, so the caller does not run an update
//! loop. Live previews come from [`Recorder::subscribe`]; the full
//! recording comes back from [`Recorder::stop`].

use std::sync::{Arc, Mutex};
use futures::{Stream, StreamExt};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::device::GazeDevice;
use crate::driver::Driver;
use crate::export::GazeTable;
use crate::source::PacedSource;
use crate::types::{GazeSample, SessionState, UpdateRate};
use crate::{Result, TrackerError};

/// Asynchronous recording session over one exclusively-held device.
///
/// State semantics match [`crate::TrackerSession`]: collection only in
/// `Recording`, pause keeps the buffer, `Stopped` is terminal. The sample
/// buffer lives behind a mutex shared with the collector task, so appends
/// and reads never race.
pub struct Recorder {
    latest: watch::Receiver<Option<Arc<GazeSample>>>,
    gate: watch::Sender<bool>,
    collected: Arc<Mutex<Vec<GazeSample>>>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
    state: SessionState,
    license_valid: bool,
    source_hz: f64,
}

impl Recorder {
    /// Move an opened device into a background collector.
    ///
    /// The collector starts gated: no polling happens until
    /// [`Recorder::start`]. Must be called within a tokio runtime.
    pub fn spawn<D: GazeDevice + 'static>(device: D) -> Result<Self> {
        if !device.is_open() {
            return Err(TrackerError::initialization_failed(format!(
                "device {:?} handle is not open",
                device.device_id()
            )));
        }

        let license_valid = device.license_valid();
        let source_hz = device.sample_rate_hz();
        info!(
            device = device.device_id(),
            rate = source_hz,
            license_valid,
            "spawning background recorder"
        );

        let channels = Driver::spawn(PacedSource::new(device));

        Ok(Self {
            latest: channels.latest,
            gate: channels.gate,
            collected: channels.collected,
            cancel: channels.cancel,
            task: Some(channels.task),
            state: SessionState::Created,
            license_valid,
            source_hz,
        })
    }

    /// Whether the credential presented at device open was accepted.
    pub fn is_license_valid(&self) -> bool {
        self.license_valid
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Native device cadence in Hz.
    pub fn source_hz(&self) -> f64 {
        self.source_hz
    }

    /// Number of samples collected so far.
    pub fn sample_count(&self) -> usize {
        self.collected.lock().expect("sample buffer poisoned").len()
    }

    /// Begin or resume collection. Same guards as the synchronous session:
    /// no-op while `Recording`, fails on an invalid license or after stop.
    pub fn start(&mut self) -> Result<()> {
        if !self.state.can_start() {
            return Err(TrackerError::Recording {
                operation: "start",
                state: self.state,
                reason: "recorder stopped; construct a new one".to_string(),
            });
        }
        if !self.license_valid {
            return Err(TrackerError::license_rejected("start", self.state));
        }
        if self.state.is_recording() {
            return Ok(());
        }

        debug!(from = %self.state, "recorder collecting");
        self.state = SessionState::Recording;
        let _ = self.gate.send(true);
        Ok(())
    }

    /// Suspend collection, keeping everything collected so far.
    /// No-op unless `Recording`.
    pub fn pause(&mut self) {
        if self.state.can_pause() {
            debug!(samples = self.sample_count(), "recorder paused");
            self.state = SessionState::Paused;
            let _ = self.gate.send(false);
        }
    }

    /// Resume collection after a pause.
    pub fn resume(&mut self) -> Result<()> {
        self.start()
    }

    /// Stop collection, shut the collector down, and return the full
    /// recording in insertion order. Idempotent; a second stop returns the
    /// same (final) table.
    pub async fn stop(&mut self) -> GazeTable {
        if !self.state.is_terminal() {
            self.state = SessionState::Stopped;
            let _ = self.gate.send(false);
            self.cancel.cancel();
            if let Some(task) = self.task.take() {
                if let Err(e) = task.await {
                    warn!("collector task did not shut down cleanly: {e}");
                }
            }
            info!(samples = self.sample_count(), "recorder stopped");
        }

        let samples = self.collected.lock().expect("sample buffer poisoned");
        GazeTable::from_samples(&samples)
    }

    /// Subscribe to collected samples as a stream.
    ///
    /// `UpdateRate::Native` delivers every collected sample the watch
    /// channel observes; `UpdateRate::Max(hz)` decimates to the freshest
    /// sample per interval. Subscribers only see samples collected while
    /// the recorder is in `Recording`.
    pub fn subscribe(&self, rate: UpdateRate) -> impl Stream<Item = GazeSample> + Send + 'static {
        let samples = WatchStream::new(self.latest.clone())
            .filter_map(|opt| async move { opt.map(|sample| *sample) });

        match rate.interval(self.source_hz) {
            None => samples.boxed(),
            Some(period) => {
                use crate::stream::DecimateExt;
                samples.decimate(period).boxed()
            }
        }
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        debug!("dropping recorder");
        // Stop the collector on drop so the device claim is released.
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::{SyntheticConfig, SyntheticDevice};
    use crate::license::LicenseKey;
    use crate::types::DisplayGeometry;
    use std::time::Duration;

    fn device(device_id: &str, key: &str) -> SyntheticDevice {
        let mut config = SyntheticConfig::accepting("valid-key");
        config.device_id = device_id.to_string();
        config.sample_rate_hz = 500.0;
        SyntheticDevice::open(
            DisplayGeometry::new(2560.0, 1440.0, 0.0),
            &LicenseKey::from(key),
            config,
        )
        .unwrap()
    }

    async fn wait_for_samples(recorder: &Recorder, at_least: usize) {
        let mut latest = recorder.latest.clone();
        while recorder.sample_count() < at_least {
            latest.changed().await.expect("collector ended prematurely");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn records_across_pause_resume_in_order() {
        let mut recorder = Recorder::spawn(device("recorder-lifecycle", "valid-key")).unwrap();
        assert!(recorder.is_license_valid());
        assert_eq!(recorder.state(), SessionState::Created);

        recorder.start().unwrap();
        wait_for_samples(&recorder, 5).await;

        recorder.pause();
        // Let an in-flight poll land before freezing the count
        tokio::time::sleep(Duration::from_millis(20)).await;
        let frozen = recorder.sample_count();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(recorder.sample_count(), frozen);

        recorder.resume().unwrap();
        wait_for_samples(&recorder, frozen + 5).await;

        let table = recorder.stop().await;
        assert!(table.len() >= frozen + 5);
        assert_eq!(recorder.state(), SessionState::Stopped);

        let rows = table.rows();
        assert!(rows.windows(2).all(|w| w[1].timestamp_us > w[0].timestamp_us));
        assert!(rows.windows(2).all(|w| w[1].sequence == w[0].sequence + 1));
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_license_cannot_start() {
        let mut recorder = Recorder::spawn(device("recorder-unlicensed", "wrong")).unwrap();
        assert!(!recorder.is_license_valid());
        let err = recorder.start().unwrap_err();
        assert!(matches!(err, TrackerError::Recording { operation: "start", .. }));
        let table = recorder.stop().await;
        assert!(table.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_terminal_and_idempotent() {
        let mut recorder = Recorder::spawn(device("recorder-stop", "valid-key")).unwrap();
        recorder.start().unwrap();
        wait_for_samples(&recorder, 3).await;

        let first = recorder.stop().await;
        let again = recorder.stop().await;
        assert_eq!(first.len(), again.len());

        let err = recorder.start().unwrap_err();
        assert!(matches!(
            err,
            TrackerError::Recording { state: SessionState::Stopped, .. }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn subscription_delivers_live_samples() {
        let mut recorder = Recorder::spawn(device("recorder-subscribe", "valid-key")).unwrap();
        let mut stream = recorder.subscribe(UpdateRate::Native);
        recorder.start().unwrap();

        let sample = stream.next().await.expect("stream should deliver a sample");
        assert!(sample.timestamp_us >= 0);

        recorder.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn decimated_subscription_sees_fewer_samples() {
        let mut recorder = Recorder::spawn(device("recorder-decimate", "valid-key")).unwrap();
        let mut decimated = recorder.subscribe(UpdateRate::Max(10));
        recorder.start().unwrap();

        let first = decimated.next().await.expect("decimated stream should deliver");
        wait_for_samples(&recorder, 50).await;
        let later = decimated.next().await.expect("decimated stream should keep delivering");
        // 500Hz source, 10Hz subscription: consecutive emits skip samples
        assert!(later.sequence > first.sequence + 1);

        recorder.stop().await;
    }
}
