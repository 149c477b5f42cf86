//! Update rate control for sample streams

use serde::{Deserialize, Serialize};

/// Delivery rate for subscribed sample streams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UpdateRate {
    /// Full speed from the device (typically 60Hz or 120Hz)
    Native,

    /// Limited to at most this many samples per second.
    /// If the requested rate meets or exceeds the device rate, Native is used.
    Max(u32),
}

impl UpdateRate {
    /// Normalize rate against the device frequency.
    /// Returns the effective rate to use.
    pub fn normalize(self, device_hz: f64) -> Self {
        match self {
            UpdateRate::Native => UpdateRate::Native,
            UpdateRate::Max(hz) if hz as f64 >= device_hz => UpdateRate::Native,
            UpdateRate::Max(hz) => UpdateRate::Max(hz),
        }
    }

    /// Minimum spacing between delivered samples, if rate limiting applies.
    pub fn interval(self, device_hz: f64) -> Option<std::time::Duration> {
        match self.normalize(device_hz) {
            UpdateRate::Native => None,
            UpdateRate::Max(hz) => Some(std::time::Duration::from_secs_f64(1.0 / hz as f64)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rates_at_or_above_device_collapse_to_native() {
        assert_eq!(UpdateRate::Max(60).normalize(60.0), UpdateRate::Native);
        assert_eq!(UpdateRate::Max(120).normalize(60.0), UpdateRate::Native);
        assert_eq!(UpdateRate::Max(30).normalize(60.0), UpdateRate::Max(30));
        assert_eq!(UpdateRate::Native.normalize(60.0), UpdateRate::Native);
    }

    #[test]
    fn interval_reflects_effective_rate() {
        assert!(UpdateRate::Native.interval(60.0).is_none());
        assert!(UpdateRate::Max(90).interval(60.0).is_none());
        let interval = UpdateRate::Max(10).interval(60.0).unwrap();
        assert_eq!(interval, std::time::Duration::from_millis(100));
    }
}
