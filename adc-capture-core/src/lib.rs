//! # adc-capture-core
//!
//! Platform-agnostic ADC audio acquisition core.
//!
//! Validates acquisition parameters, opens a codec session on the ADC,
//! reads fixed-size chunks of interleaved 16-bit samples while servicing
//! the watchdog, and releases every hardware and memory resource on every
//! exit path. Platform backends implement the collaborator traits
//! (`CodecBackend`, `SampleAllocator`, `Watchdog`, `Scheduler`) and plug
//! into the generic `Acquirer`.
//!
//! ## Architecture
//!
//! ```text
//! adc-capture-core (this crate)
//! ├── traits/       ← CodecBackend, SampleAllocator, Watchdog, Scheduler, CaptureLog
//! ├── models/       ← AcquisitionConfig, AdcError, SessionState, RunningStats, CaptureResult
//! ├── processing/   ← AcquisitionBuffer, ChunkReader, ResultPacker, PCM helpers
//! ├── session/      ← CodecSession (release guard), Acquirer (orchestrator)
//! ├── logging       ← FacadeLog, NullLog
//! └── mocks/        ← instrumented mock platform (tests, `mock` feature)
//! ```

pub mod logging;
pub mod mocks;
pub mod models;
pub mod processing;
pub mod session;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use logging::{FacadeLog, NullLog};
pub use models::capture_result::{AcquisitionReport, CaptureResult};
pub use models::config::{
    AcquireOptions, AcquisitionConfig, AcquisitionPlan, Attenuation, ChannelList, MAX_CHANNELS,
};
pub use models::error::{AdcError, CodecStatus};
pub use models::state::SessionState;
pub use models::stats::RunningStats;
pub use processing::buffer::AcquisitionBuffer;
pub use processing::chunk_reader::{ChunkReader, ChunkSource, ReadSummary};
pub use processing::result_packer::ResultPacker;
pub use session::acquirer::Acquirer;
pub use session::codec_session::CodecSession;
pub use traits::allocator::{MemoryClass, SampleAllocator};
pub use traits::codec::{CodecBackend, DataInterfaceConfig, DeviceDirection, SampleFormat};
pub use traits::log_sink::CaptureLog;
pub use traits::platform::{Scheduler, Watchdog};
