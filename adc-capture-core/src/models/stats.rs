use serde::{Deserialize, Serialize};

use crate::processing::pcm;

/// Running min/max over every sample observed during an acquisition.
///
/// `min` starts at `i16::MAX` and `max` at `i16::MIN`, so with no samples
/// observed the pair stays at its sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningStats {
    pub min: i16,
    pub max: i16,
    pub samples: u64,
}

impl Default for RunningStats {
    fn default() -> Self {
        Self {
            min: i16::MAX,
            max: i16::MIN,
            samples: 0,
        }
    }
}

impl RunningStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, sample: i16) {
        if sample < self.min {
            self.min = sample;
        }
        if sample > self.max {
            self.max = sample;
        }
        self.samples += 1;
    }

    /// Observe every little-endian 16-bit sample in `bytes`.
    pub fn observe_le_bytes(&mut self, bytes: &[u8]) {
        for sample in pcm::decode_le(bytes) {
            self.observe(sample);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples == 0
    }

    /// `max - min`, widened so a full-scale swing does not overflow.
    pub fn range(&self) -> Option<i32> {
        if self.is_empty() {
            return None;
        }
        Some(i32::from(self.max) - i32::from(self.min))
    }

    /// Larger absolute extreme normalised to 0.0–1.0.
    pub fn peak_level(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let peak = f32::from(self.min).abs().max(f32::from(self.max).abs());
        peak / 32768.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn empty_stats_keep_sentinels() {
        let stats = RunningStats::new();

        assert_eq!(stats.min, i16::MAX);
        assert_eq!(stats.max, i16::MIN);
        assert!(stats.range().is_none());
        assert_eq!(stats.peak_level(), 0.0);
    }

    #[test]
    fn observe_tracks_extremes() {
        let mut stats = RunningStats::new();
        for s in [5, -20, 300, 0] {
            stats.observe(s);
        }

        assert_eq!(stats.min, -20);
        assert_eq!(stats.max, 300);
        assert_eq!(stats.samples, 4);
        assert_eq!(stats.range(), Some(320));
        assert!(stats.min <= stats.max);
    }

    #[test]
    fn single_sample_min_equals_max() {
        let mut stats = RunningStats::new();
        stats.observe(42);

        assert_eq!(stats.min, 42);
        assert_eq!(stats.max, 42);
        assert_eq!(stats.range(), Some(0));
    }

    #[test]
    fn full_scale_range_does_not_overflow() {
        let mut stats = RunningStats::new();
        stats.observe(i16::MIN);
        stats.observe(i16::MAX);

        assert_eq!(stats.range(), Some(65535));
        assert_relative_eq!(stats.peak_level(), 1.0);
    }

    #[test]
    fn observe_le_bytes_decodes_pairs() {
        let mut stats = RunningStats::new();
        // 0x0100 = 256, 0xFFFF = -1
        stats.observe_le_bytes(&[0x00, 0x01, 0xFF, 0xFF]);

        assert_eq!(stats.samples, 2);
        assert_eq!(stats.min, -1);
        assert_eq!(stats.max, 256);
    }

    #[test]
    fn peak_level_uses_larger_extreme() {
        let mut stats = RunningStats::new();
        stats.observe(-16384);
        stats.observe(100);

        assert_relative_eq!(stats.peak_level(), 0.5);
    }
}
