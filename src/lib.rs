//! Modern, type-safe Rust library for eye-tracker gaze recording.
//!
//! Gazelink provides session-controlled access to gaze data with
//! first-class support for deterministic testing without hardware.
//!
//! # Features
//!
//! - **Session Control**: Explicit `Created → Recording ⇄ Paused → Stopped`
//!   lifecycle with guarded transitions
//! - **Device Abstraction**: One small trait (`poll`/`close`) over vendor
//!   SDK bindings, synthetic generators, and scripted playback
//! - **Background Recording**: Optional tokio-based collector with live
//!   sample streams
//! - **Deterministic Testing**: Scenario files replay exact device behavior
//!
//! # Quick Start
//!
//! ## Caller-driven polling
//!
//! ```rust
//! use gazelink::{DisplayGeometry, Gazelink};
//!
//! fn main() -> gazelink::Result<()> {
//!     let geometry = DisplayGeometry::new(2560.0, 1440.0, 0.0);
//!     let mut session = Gazelink::simulate(geometry, "valid-key")?;
//!
//!     session.start()?;
//!     for _ in 0..10 {
//!         session.update()?;
//!     }
//!     session.stop();
//!
//!     println!("{}", session.formatted_data()?);
//!     Ok(())
//! }
//! ```
//!
//! ## Background recording
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use gazelink::{DisplayGeometry, Gazelink, SyntheticConfig, SyntheticDevice, LicenseKey, UpdateRate};
//!
//! #[tokio::main]
//! async fn main() -> gazelink::Result<()> {
//!     let geometry = DisplayGeometry::new(2560.0, 1440.0, 0.0);
//!     let key = LicenseKey::from("valid-key");
//!     let device = SyntheticDevice::open(geometry, &key, SyntheticConfig::accepting("valid-key"))?;
//!
//!     let mut recorder = Gazelink::record(device)?;
//!     let mut preview = recorder.subscribe(UpdateRate::Max(10));
//!     recorder.start()?;
//!
//!     while let Some(sample) = preview.next().await {
//!         println!("gaze at ({}, {})", sample.x, sample.y);
//!     }
//!
//!     let table = recorder.stop().await;
//!     println!("{table}");
//!     Ok(())
//! }
//! ```

// Core types and error handling
pub mod device;
pub mod devices;
mod error;
pub mod export;
pub mod license;
mod session;
pub mod types;

// Background recording architecture
pub mod driver;
pub mod recorder;
pub mod source;
pub mod stream;

// Scenario playback
pub mod scenario;

// Core exports
pub use device::{DeviceClaim, GazeDevice, RawGazePoint};
pub use devices::{ScriptedDevice, SyntheticConfig, SyntheticDevice};
pub use error::{Result, TrackerError};
pub use export::{GazeRow, GazeTable};
pub use license::{LicenseKey, LicensePolicy};
pub use session::TrackerSession;
pub use types::*;

// Background recording exports
pub use recorder::Recorder;

// Scenario exports
pub use scenario::{Scenario, ScenarioTick};

/// Unified entry point for gaze recording sessions.
///
/// This factory provides a consistent API for creating sessions over the
/// bundled devices. Vendor SDK bindings implement [`GazeDevice`] and pass
/// through the same constructors.
///
/// # Examples
///
/// ## Synthetic device
/// ```rust
/// use gazelink::{DisplayGeometry, Gazelink};
///
/// # fn main() -> gazelink::Result<()> {
/// let geometry = DisplayGeometry::new(2560.0, 1440.0, 0.0);
/// let session = Gazelink::simulate(geometry, "valid-key")?;
/// assert!(session.is_license_valid());
/// # Ok(())
/// # }
/// ```
///
/// ## Scenario playback
/// ```rust,no_run
/// use gazelink::{DisplayGeometry, Gazelink, LicenseKey};
///
/// # fn main() -> gazelink::Result<()> {
/// let geometry = DisplayGeometry::new(1920.0, 1080.0, 0.0);
/// let key = LicenseKey::from("int.lab2024");
/// let session = Gazelink::open_scenario("sweep.yaml", geometry, &key)?;
/// # Ok(())
/// # }
/// ```
pub struct Gazelink;

impl Gazelink {
    /// Open a synthetic device that accepts `key` and wrap it in a session.
    ///
    /// The device is provisioned to accept exactly the presented
    /// credential, so the resulting session always has a valid license.
    /// Use [`Gazelink::simulate_with`] to model rejected or expired
    /// credentials.
    pub fn simulate(
        geometry: DisplayGeometry,
        key: impl Into<String>,
    ) -> Result<TrackerSession<SyntheticDevice>> {
        let key = LicenseKey::new(key);
        let config = SyntheticConfig::accepting(key.as_str());
        let device = SyntheticDevice::open(geometry, &key, config)?;
        TrackerSession::new(device, geometry)
    }

    /// Open a synthetic device with explicit configuration.
    pub fn simulate_with(
        geometry: DisplayGeometry,
        key: &LicenseKey,
        config: SyntheticConfig,
    ) -> Result<TrackerSession<SyntheticDevice>> {
        let device = SyntheticDevice::open(geometry, key, config)?;
        TrackerSession::new(device, geometry)
    }

    /// Open a scenario file for scripted playback.
    ///
    /// The scenario provides the device's license provisioning; `key` is
    /// the credential presented against it.
    pub fn open_scenario<P: AsRef<std::path::Path>>(
        path: P,
        geometry: DisplayGeometry,
        key: &LicenseKey,
    ) -> Result<TrackerSession<ScriptedDevice>> {
        let device = ScriptedDevice::open_file(path, geometry, key)?;
        TrackerSession::new(device, geometry)
    }

    /// Move an opened device into a background [`Recorder`].
    ///
    /// Must be called within a tokio runtime.
    pub fn record<D: GazeDevice + 'static>(device: D) -> Result<Recorder> {
        Recorder::spawn(device)
    }
}
