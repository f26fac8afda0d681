use serde::{Deserialize, Serialize};

use super::stats::RunningStats;
use crate::processing::pcm;

/// Bytes returned by an acquisition.
///
/// Either the last fully-read chunk (`chunk_samples × channels × 2` bytes)
/// or empty when the final requested chunk did not complete. Immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureResult {
    bytes: Box<[u8]>,
    report: AcquisitionReport,
}

impl CaptureResult {
    pub fn new(bytes: Box<[u8]>, report: AcquisitionReport) -> Self {
        Self { bytes, report }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Interleaved samples, in channel order within each frame.
    pub fn samples(&self) -> impl Iterator<Item = i16> + '_ {
        pcm::decode_le(&self.bytes)
    }

    pub fn report(&self) -> &AcquisitionReport {
        &self.report
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes.into_vec()
    }
}

impl AsRef<[u8]> for CaptureResult {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Summary of one acquisition, serializable for diagnostics export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionReport {
    pub id: String,
    pub captured_at: String,
    pub unit_id: i32,
    pub channels: Vec<u8>,
    pub sample_rate_hz: u32,
    pub chunks_requested: u32,
    pub chunks_read: u32,
    pub stats: RunningStats,
    /// SHA-256 of the returned bytes; `None` for an empty result.
    pub checksum: Option<String>,
    /// Audio time covered by the returned bytes.
    pub duration_secs: f64,
}

impl AcquisitionReport {
    pub fn samples_observed(&self) -> u64 {
        self.stats.samples
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
