use sha2::{Digest, Sha256};

use crate::models::capture_result::{AcquisitionReport, CaptureResult};
use crate::models::config::{AcquisitionPlan, BYTES_PER_SAMPLE};
use crate::processing::chunk_reader::ReadSummary;

/// Turns the buffer left by the read loop into a `CaptureResult`.
///
/// All or nothing: the buffer is copied only if the final requested chunk
/// was read. An earlier success followed by a failed last read is empty.
pub struct ResultPacker<'a> {
    plan: &'a AcquisitionPlan,
}

impl<'a> ResultPacker<'a> {
    pub fn new(plan: &'a AcquisitionPlan) -> Self {
        Self { plan }
    }

    pub fn pack(&self, summary: &ReadSummary, buffer: &[u8]) -> CaptureResult {
        let bytes: Box<[u8]> = if summary.last_chunk_ok {
            buffer.into()
        } else {
            Box::default()
        };

        let checksum = (!bytes.is_empty()).then(|| sha256_hex(&bytes));
        let report = AcquisitionReport {
            id: uuid::Uuid::new_v4().to_string(),
            captured_at: chrono::Utc::now().to_rfc3339(),
            unit_id: self.plan.unit_id(),
            channels: self.plan.channels().as_slice().to_vec(),
            sample_rate_hz: self.plan.sample_rate_hz(),
            chunks_requested: summary.chunks_requested,
            chunks_read: summary.chunks_read,
            stats: summary.stats,
            checksum,
            duration_secs: self.duration_secs(bytes.len()),
        };

        CaptureResult::new(bytes, report)
    }

    fn duration_secs(&self, byte_len: usize) -> f64 {
        let frame_bytes = self.plan.channels().len() * BYTES_PER_SAMPLE;
        if frame_bytes == 0 || self.plan.sample_rate_hz() == 0 {
            return 0.0;
        }
        (byte_len / frame_bytes) as f64 / f64::from(self.plan.sample_rate_hz())
    }
}

fn sha256_hex(data: &[u8]) -> String {
    Sha256::digest(data).iter().map(|b| format!("{:02x}", b)).collect()
}
