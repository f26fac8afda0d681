//! # adc-capture-sim
//!
//! Host-side backend for adc-capture-core.
//!
//! Provides:
//! - `SimulatedAdc`: codec producing a 440 Hz tone on every channel, with fault injection
//! - `HeapAllocator`: process-heap sample buffers with an optional internal-RAM cap
//! - `HostWatchdog`, `ThreadScheduler`: desktop stand-ins for the RTOS primitives
//!
//! ## Usage
//! ```no_run
//! use adc_capture_core::AcquisitionConfig;
//! use adc_capture_sim::{host_acquirer, HeapAllocator, SimulatedAdc};
//!
//! let mut acquirer = host_acquirer(SimulatedAdc::new(), HeapAllocator::new());
//! let config = AcquisitionConfig::new(10240, 0, &[0, 3], 2, 16000, 0);
//! let capture = acquirer.acquire(&config).unwrap();
//! assert_eq!(capture.len(), 40960);
//! ```

pub mod heap_allocator;
pub mod host;
pub mod simulated_adc;

pub use heap_allocator::{HeapAllocator, HeapStats};
pub use host::{HostWatchdog, ThreadScheduler};
pub use simulated_adc::{SimCounters, SimFaults, SimulatedAdc};

use adc_capture_core::Acquirer;

pub type SimAcquirer = Acquirer<SimulatedAdc, HeapAllocator, HostWatchdog, ThreadScheduler>;

/// Wire a simulated codec and heap allocator into an `Acquirer`.
pub fn host_acquirer(adc: SimulatedAdc, allocator: HeapAllocator) -> SimAcquirer {
    Acquirer::new(adc, allocator, HostWatchdog::new(), ThreadScheduler)
}
