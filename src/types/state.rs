//! Session lifecycle state machine

use serde::{Deserialize, Serialize};

/// Lifecycle state of a recording session.
///
/// Transitions:
///
/// ```text
/// Created ──start──▶ Recording ◀──start── Paused
///                        │  ──pause──▶      │
///                        └───────stop───────┘──▶ Stopped
/// ```
///
/// `Stopped` is terminal: the device handle is released on stop, so the only
/// way back to `Recording` is constructing a new session. Representing the
/// lifecycle as a single enum (rather than booleans) makes invalid
/// combinations unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Constructed, device open, no recording started yet
    Created,
    /// Actively collecting samples on each update tick
    Recording,
    /// Collection suspended; buffer retained
    Paused,
    /// Finalized; device handle released
    Stopped,
}

impl SessionState {
    /// Whether `start()` may transition from this state into `Recording`.
    ///
    /// `Recording` itself is accepted because `start()` while recording is a
    /// documented no-op. `Stopped` is not: the device handle is gone.
    pub fn can_start(&self) -> bool {
        matches!(self, SessionState::Created | SessionState::Recording | SessionState::Paused)
    }

    /// Whether samples may be ingested in this state.
    pub fn is_recording(&self) -> bool {
        matches!(self, SessionState::Recording)
    }

    /// Whether `pause()` performs a transition from this state.
    /// (`Paused` and `Stopped` make it a no-op.)
    pub fn can_pause(&self) -> bool {
        matches!(self, SessionState::Recording)
    }

    /// Whether `stop()` performs a transition from this state.
    pub fn can_stop(&self) -> bool {
        matches!(self, SessionState::Recording | SessionState::Paused)
    }

    /// Whether the session has been finalized.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Stopped)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionState::Created => "created",
            SessionState::Recording => "recording",
            SessionState::Paused => "paused",
            SessionState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_guard_excludes_only_stopped() {
        assert!(SessionState::Created.can_start());
        assert!(SessionState::Recording.can_start());
        assert!(SessionState::Paused.can_start());
        assert!(!SessionState::Stopped.can_start());
    }

    #[test]
    fn ingestion_only_while_recording() {
        assert!(SessionState::Recording.is_recording());
        for state in [SessionState::Created, SessionState::Paused, SessionState::Stopped] {
            assert!(!state.is_recording());
        }
    }

    #[test]
    fn stop_reachable_from_recording_and_paused() {
        assert!(SessionState::Recording.can_stop());
        assert!(SessionState::Paused.can_stop());
        assert!(!SessionState::Created.can_stop());
        assert!(!SessionState::Stopped.can_stop());
    }
}
