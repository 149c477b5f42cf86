//! Driver spawns and manages the background collection task.

use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use crate::source::SampleSource;
use crate::types::GazeSample;

/// How many consecutive source errors the collector tolerates before
/// shutting down.
const MAX_ERRORS: u32 = 10;

/// Handles returned by [`Driver::spawn`].
pub struct DriverChannels {
    /// Latest collected sample, for stream subscriptions
    pub latest: watch::Receiver<Option<Arc<GazeSample>>>,

    /// Collection gate: `true` while samples should be ingested
    pub gate: watch::Sender<bool>,

    /// All collected samples, appended under the lock
    pub collected: Arc<Mutex<Vec<GazeSample>>>,

    /// Cancellation token for graceful shutdown
    pub cancel: CancellationToken,

    /// The collector task itself, for deterministic shutdown
    pub task: JoinHandle<()>,
}

/// Driver spawns the collector task that owns the sample source.
///
/// The task polls the source only while the gate is open, so a paused
/// recorder genuinely stops the device cadence instead of discarding
/// samples after the fact. Collected samples go into a mutex-protected
/// buffer shared with the recorder; the latest sample is additionally
/// published on a watch channel for subscribers.
pub struct Driver;

impl Driver {
    /// Spawn the collector for `source`. The gate starts closed; open it
    /// with `gate.send(true)` to begin ingestion.
    pub fn spawn<S>(source: S) -> DriverChannels
    where
        S: SampleSource,
    {
        let (latest_tx, latest_rx) = watch::channel(None);
        let (gate_tx, gate_rx) = watch::channel(false);
        let collected = Arc::new(Mutex::new(Vec::new()));
        let cancel = CancellationToken::new();

        let task = tokio::spawn(Self::collector_task(
            source,
            latest_tx,
            gate_rx,
            Arc::clone(&collected),
            cancel.clone(),
        ));

        DriverChannels { latest: latest_rx, gate: gate_tx, collected, cancel, task }
    }

    /// Collector task: ingest samples while the gate is open.
    async fn collector_task<S>(
        mut source: S,
        latest_tx: watch::Sender<Option<Arc<GazeSample>>>,
        mut gate_rx: watch::Receiver<bool>,
        collected: Arc<Mutex<Vec<GazeSample>>>,
        cancel: CancellationToken,
    ) where
        S: SampleSource,
    {
        info!("collector task started");
        let mut sample_count = 0u64;
        let mut error_count = 0u32;

        loop {
            if cancel.is_cancelled() {
                info!("collector cancelled");
                break;
            }

            // While the gate is closed, do not touch the source at all.
            if !*gate_rx.borrow() {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        info!("collector cancelled while paused");
                        break;
                    }
                    changed = gate_rx.changed() => {
                        if changed.is_err() {
                            debug!("gate sender dropped, shutting down");
                            break;
                        }
                        continue;
                    }
                }
            }

            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("collector cancelled during poll");
                    break;
                }
                result = source.next_sample() => result,
            };

            match result {
                Ok(Some(sample)) => {
                    sample_count += 1;
                    error_count = 0;
                    trace!(
                        sequence = sample.sequence,
                        timestamp_us = sample.timestamp_us,
                        "collected sample"
                    );

                    collected.lock().expect("sample buffer poisoned").push(sample);

                    if latest_tx.send(Some(Arc::new(sample))).is_err() {
                        debug!("all subscribers dropped, continuing collection");
                    }
                }
                Ok(None) => {
                    info!("source ended after {} samples", sample_count);
                    let _ = latest_tx.send(None);
                    break;
                }
                Err(e) => {
                    // Transient source fault - don't lose the session over it
                    error_count += 1;
                    warn!("source error ({}/{}): {}", error_count, MAX_ERRORS, e);

                    if error_count >= MAX_ERRORS {
                        error!("too many source errors, shutting down");
                        let _ = latest_tx.send(None);
                        break;
                    }

                    // Exponential backoff: 50ms, 100ms, 200ms, ...
                    let backoff = std::time::Duration::from_millis(50 * (1 << error_count.min(5)));
                    tokio::time::sleep(backoff).await;
                }
            }
        }

        source.close();
        info!("collector task ended ({} samples)", sample_count);
    }
}
