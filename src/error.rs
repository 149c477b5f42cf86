//! Error types for gaze recording.
//!
//! This module provides error handling for the gazelink recording library.
//! All errors implement the `std::error::Error` trait and include structured context
//! for debugging and recovery guidance.
//!
//! ## Error Categories
//!
//! - **Initialization Errors**: Device open, geometry, or license setup failures
//! - **Recording Errors**: Session operations invoked in an invalid state
//! - **Retrieval Errors**: Data requested in an invalid context
//! - **Device Errors**: Transient faults reported by the device during a poll
//! - **Scenario Errors**: Unreadable or malformed scenario files
//!
//! ## Recovery and Retry
//!
//! Errors provide methods to determine if they are recoverable:
//!
//! ```rust
//! use gazelink::TrackerError;
//!
//! let error = TrackerError::device_fault("tracker lost the eyes");
//! if error.is_retryable() {
//!     println!("Can retry this operation");
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```
//!
//! ## Helper Constructors
//!
//! Use helper methods for common error scenarios:
//!
//! ```rust
//! use gazelink::{SessionState, TrackerError};
//!
//! // Setup failures
//! let init_error = TrackerError::initialization_failed("device already claimed");
//!
//! // State machine violations
//! let rec_error = TrackerError::invalid_state("update", SessionState::Paused);
//! ```

use std::path::PathBuf;
use thiserror::Error;

use crate::types::SessionState;

/// Result type alias for recording operations.
pub type Result<T, E = TrackerError> = std::result::Result<T, E>;

/// Main error type for gaze recording operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TrackerError {
    /// Fatal setup failure: the device could not be opened, the display
    /// geometry is invalid, or the license policy could not be evaluated.
    /// The caller must abort the session.
    #[error("Failed to initialize tracker: {reason}")]
    Initialization {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A session operation was invoked in a state that does not permit it,
    /// or the license gate rejected it. The caller may retry after
    /// correcting the session state.
    #[error("Cannot {operation} while session is {state}: {reason}")]
    Recording { operation: &'static str, state: SessionState, reason: String },

    /// Data was requested in a context where none can be produced.
    /// Callers should treat this as "no data yet" rather than a hard failure.
    #[error("Cannot retrieve gaze data: {reason}")]
    Retrieval { reason: String },

    /// Transient fault reported by the device during a poll. The sample
    /// buffer and session state are unaffected; the caller may retry.
    #[error("Device fault: {reason}")]
    Device {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Scenario file could not be read.
    #[error("Scenario file error: {path}")]
    ScenarioFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Scenario file was read but its contents are not a usable scenario.
    #[error("Scenario parse error in {context}: {details}")]
    ScenarioParse { context: String, details: String },
}

impl TrackerError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            TrackerError::Recording { .. } => true,
            TrackerError::Device { .. } => true,
            TrackerError::Initialization { .. } => false,
            TrackerError::Retrieval { .. } => false,
            TrackerError::ScenarioFile { .. } => false,
            TrackerError::ScenarioParse { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            TrackerError::Initialization { .. } => vec![
                "Check the display geometry has positive dimensions",
                "Verify the license key and expiry date",
                "Ensure no other session holds the same device",
                "Reconnect the tracker and construct a new session",
            ],
            TrackerError::Recording { .. } => vec![
                "Check the current session state before calling",
                "Call start() before update()",
                "Construct a new session after stop()",
            ],
            TrackerError::Retrieval { .. } => vec![
                "Treat as no data yet",
                "Record some samples before reading",
                "Verify the license is still valid",
            ],
            TrackerError::Device { .. } => vec![
                "Retry the poll on the next tick",
                "Check the subject is within tracking range",
                "Verify the device cable and power",
            ],
            TrackerError::ScenarioFile { .. } => vec![
                "Check the file exists and is readable",
                "Check file permissions",
            ],
            TrackerError::ScenarioParse { .. } => vec![
                "Validate the scenario YAML structure",
                "Check tick coordinates are within 0.0..=1.0",
                "Check the sample rate is positive",
            ],
        }
    }

    /// Helper constructor for initialization failures.
    pub fn initialization_failed(reason: impl Into<String>) -> Self {
        TrackerError::Initialization { reason: reason.into(), source: None }
    }

    /// Helper constructor for initialization failures with source.
    pub fn initialization_failed_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        TrackerError::Initialization { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for state machine violations.
    pub fn invalid_state(operation: &'static str, state: SessionState) -> Self {
        TrackerError::Recording {
            operation,
            state,
            reason: "operation not permitted in this state".to_string(),
        }
    }

    /// Helper constructor for license-gated recording failures.
    pub fn license_rejected(operation: &'static str, state: SessionState) -> Self {
        TrackerError::Recording {
            operation,
            state,
            reason: "license is invalid or expired".to_string(),
        }
    }

    /// Helper constructor for retrieval failures.
    pub fn retrieval_failed(reason: impl Into<String>) -> Self {
        TrackerError::Retrieval { reason: reason.into() }
    }

    /// Helper constructor for transient device faults.
    pub fn device_fault(reason: impl Into<String>) -> Self {
        TrackerError::Device { reason: reason.into(), source: None }
    }

    /// Helper constructor for scenario file errors with path context.
    pub fn scenario_file_error(path: PathBuf, source: std::io::Error) -> Self {
        TrackerError::ScenarioFile { path, source }
    }

    /// Helper constructor for scenario parse errors.
    pub fn scenario_parse_error(context: impl Into<String>, details: impl Into<String>) -> Self {
        TrackerError::ScenarioParse { context: context.into(), details: details.into() }
    }
}

impl From<std::io::Error> for TrackerError {
    fn from(err: std::io::Error) -> Self {
        TrackerError::ScenarioFile { path: PathBuf::from("<unknown>"), source: err }
    }
}
