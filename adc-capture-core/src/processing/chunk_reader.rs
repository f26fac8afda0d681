use std::time::Duration;

use crate::models::error::CodecStatus;
use crate::models::stats::RunningStats;
use crate::processing::pcm;
use crate::traits::log_sink::CaptureLog;
use crate::traits::platform::{Scheduler, Watchdog};

/// Samples shown per debug dump, and per dump row.
const DEBUG_SAMPLES: usize = 16;
const DEBUG_ROW: usize = 8;

/// Anything that can fill a buffer with one chunk of samples.
pub trait ChunkSource {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, CodecStatus>;
}

/// Outcome of a read loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadSummary {
    pub chunks_requested: u32,
    pub chunks_read: u32,
    pub stats: RunningStats,
    /// The final requested chunk was read, so the buffer holds it.
    pub last_chunk_ok: bool,
}

impl ReadSummary {
    pub fn samples_observed(&self) -> u64 {
        self.stats.samples
    }
}

/// Drives the blocking read loop.
///
/// Per chunk: reset the watchdog, read, yield, fold the samples into the
/// running stats. A failed or short read ends the loop; it is not an error.
/// Only the bytes a read reported are scanned, and a short chunk never
/// counts as read.
pub struct ChunkReader<'a, W: Watchdog, S: Scheduler> {
    watchdog: &'a mut W,
    scheduler: &'a mut S,
    log: &'a dyn CaptureLog,
    yield_interval: Duration,
    debug_chunks: u32,
}

impl<'a, W: Watchdog, S: Scheduler> ChunkReader<'a, W, S> {
    pub fn new(watchdog: &'a mut W, scheduler: &'a mut S, log: &'a dyn CaptureLog) -> Self {
        Self {
            watchdog,
            scheduler,
            log,
            yield_interval: Duration::from_millis(1),
            debug_chunks: 0,
        }
    }

    pub fn yield_interval(mut self, interval: Duration) -> Self {
        self.yield_interval = interval;
        self
    }

    pub fn debug_chunks(mut self, count: u32) -> Self {
        self.debug_chunks = count;
        self
    }

    pub fn run<R: ChunkSource>(&mut self, source: &mut R, buffer: &mut [u8], chunk_count: u32) -> ReadSummary {
        let mut summary = ReadSummary {
            chunks_requested: chunk_count,
            chunks_read: 0,
            stats: RunningStats::new(),
            last_chunk_ok: false,
        };

        for chunk in 0..chunk_count {
            // The read blocks for up to a chunk of sample time.
            self.watchdog.reset();
            let filled = match source.read_chunk(buffer) {
                // Zero is the codec's plain success status.
                Ok(0) => buffer.len(),
                Ok(n) => n.min(buffer.len()),
                Err(status) => {
                    self.log
                        .warn(format_args!("read failed at chunk {}: {}", chunk, status));
                    break;
                }
            };
            self.scheduler.sleep(self.yield_interval);

            let data = &buffer[..filled];
            summary.stats.observe_le_bytes(data);

            if chunk < self.debug_chunks {
                self.log
                    .debug(format_args!("chunk {} first {} samples:", chunk, DEBUG_SAMPLES));
                for row in pcm::format_rows(data, DEBUG_SAMPLES, DEBUG_ROW) {
                    self.log.debug(format_args!("{}", row));
                }
            }

            if filled < buffer.len() {
                self.log.warn(format_args!(
                    "short read at chunk {}: {} of {} bytes",
                    chunk,
                    filled,
                    buffer.len()
                ));
                break;
            }

            summary.chunks_read += 1;
            summary.last_chunk_ok = chunk + 1 == chunk_count;
        }

        summary
    }
}
