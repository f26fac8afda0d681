use std::sync::Arc;

use crate::logging::FacadeLog;
use crate::models::capture_result::CaptureResult;
use crate::models::config::{AcquireOptions, AcquisitionConfig, Attenuation};
use crate::models::error::AdcError;
use crate::processing::buffer::AcquisitionBuffer;
use crate::processing::chunk_reader::ChunkReader;
use crate::processing::result_packer::ResultPacker;
use crate::session::codec_session::CodecSession;
use crate::traits::allocator::SampleAllocator;
use crate::traits::codec::CodecBackend;
use crate::traits::log_sink::CaptureLog;
use crate::traits::platform::{Scheduler, Watchdog};

/// Single-shot ADC acquisition orchestrator.
///
/// Generic over the platform collaborators. One call to `acquire` runs:
/// ```text
/// validate → open session → allocate buffer → read loop → pack
///                                                          ↓
///                                 close session ← release buffer
/// ```
/// Every failure releases what was acquired up to that point before the
/// error is returned. The ADC unit is a singleton: callers serialize
/// acquisitions; `&mut self` enforces that for a single `Acquirer`.
pub struct Acquirer<C, A, W, S>
where
    C: CodecBackend,
    A: SampleAllocator,
    W: Watchdog,
    S: Scheduler,
{
    codec: C,
    allocator: A,
    watchdog: W,
    scheduler: S,
    options: AcquireOptions,
    log: Arc<dyn CaptureLog>,
}

impl<C, A, W, S> Acquirer<C, A, W, S>
where
    C: CodecBackend,
    A: SampleAllocator,
    W: Watchdog,
    S: Scheduler,
{
    pub fn new(codec: C, allocator: A, watchdog: W, scheduler: S) -> Self {
        Self {
            codec,
            allocator,
            watchdog,
            scheduler,
            options: AcquireOptions::default(),
            log: Arc::new(FacadeLog),
        }
    }

    pub fn with_options(mut self, options: AcquireOptions) -> Self {
        self.options = options;
        self
    }

    pub fn set_options(&mut self, options: AcquireOptions) {
        self.options = options;
    }

    pub fn options(&self) -> &AcquireOptions {
        &self.options
    }

    pub fn set_log(&mut self, log: Arc<dyn CaptureLog>) {
        self.log = log;
    }

    /// Acquire one capture and release every resource before returning.
    ///
    /// Returns the last chunk when the final requested read succeeds,
    /// otherwise an empty result. Configuration and setup failures are
    /// errors; read failures are not.
    pub fn acquire(&mut self, config: &AcquisitionConfig) -> Result<CaptureResult, AdcError> {
        let log = Arc::clone(&self.log);
        let log: &dyn CaptureLog = log.as_ref();

        log.info(format_args!(
            "starting ADC acquisition (task core {})",
            self.options.task_core
        ));

        let plan = config.validate().map_err(|e| {
            log.error(format_args!("invalid acquisition config: {}", e));
            e
        })?;

        match Attenuation::try_from(plan.atten()) {
            Ok(atten) => log.debug(format_args!(
                "config for unit {}, channels {:?}, sample rate {} Hz, atten {}",
                plan.unit_id(),
                plan.channels().as_slice(),
                plan.sample_rate_hz(),
                atten
            )),
            Err(raw) => log.debug(format_args!(
                "config for unit {}, channels {:?}, sample rate {} Hz, atten raw {}",
                plan.unit_id(),
                plan.channels().as_slice(),
                plan.sample_rate_hz(),
                raw
            )),
        }

        let mut session = CodecSession::open(&mut self.codec, &plan, &self.options, log)?;

        // Declared after the session so an early return frees it first.
        let mut buffer =
            AcquisitionBuffer::allocate(&mut self.allocator, plan.chunk_bytes(), self.options.memory_class)
                .map_err(|e| {
                    log.error(format_args!("{}", e));
                    e
                })?;

        let chunk_count = self.options.chunk_count;
        log.debug(format_args!(
            "reading {} chunks of {} samples each (total {} samples per channel)",
            chunk_count,
            plan.chunk_samples(),
            u64::from(chunk_count) * plan.chunk_samples() as u64
        ));

        let summary = ChunkReader::new(&mut self.watchdog, &mut self.scheduler, log)
            .yield_interval(self.options.yield_interval)
            .debug_chunks(self.options.debug_chunks)
            .run(&mut session, buffer.as_mut_slice(), chunk_count);

        let range = summary
            .stats
            .range()
            .map_or_else(|| "n/a".to_string(), |r| r.to_string());
        log.info(format_args!(
            "after {} of {} chunks: min {}, max {}, range {}",
            summary.chunks_read, chunk_count, summary.stats.min, summary.stats.max, range
        ));

        let result = ResultPacker::new(&plan).pack(&summary, buffer.as_slice());

        buffer.release();
        session.close();

        log.debug(format_args!("acquisition completed: {} bytes", result.len()));
        Ok(result)
    }
}
