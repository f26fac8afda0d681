//! Mock implementations for testing
//!
//! Every collaborator records its calls into a shared `Journal`, so tests
//! can assert call order, count hardware calls and check that every
//! acquired resource was released.

#![cfg(any(test, feature = "mock"))]

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::Level;
use parking_lot::Mutex;

use crate::models::error::CodecStatus;
use crate::session::acquirer::Acquirer;
use crate::traits::allocator::{MemoryClass, SampleAllocator};
use crate::traits::codec::{CodecBackend, DataInterfaceConfig, DeviceDirection, SampleFormat};
use crate::traits::log_sink::CaptureLog;
use crate::traits::platform::{Scheduler, Watchdog};

/// One call made into a mock collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    NewDataInterface,
    NewDataInterfaceFailed,
    NewDevice(DeviceDirection),
    NewDeviceFailed,
    Open(SampleFormat),
    OpenFailed(i32),
    Read,
    ReadFailed(i32),
    Close,
    DeleteDevice,
    DeleteDataInterface,
    Allocate(usize, MemoryClass),
    AllocateFailed(usize),
    Free,
    WatchdogReset,
    Sleep(Duration),
}

impl PlatformCall {
    /// Calls into the codec, successful or not.
    pub fn is_hardware(&self) -> bool {
        !matches!(
            self,
            Self::Allocate(..)
                | Self::AllocateFailed(_)
                | Self::Free
                | Self::WatchdogReset
                | Self::Sleep(_)
        )
    }
}

/// Shared, ordered record of platform calls.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<PlatformCall>>>);

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, call: PlatformCall) {
        self.0.lock().push(call);
    }

    pub fn calls(&self) -> Vec<PlatformCall> {
        self.0.lock().clone()
    }

    pub fn count(&self, pred: impl Fn(&PlatformCall) -> bool) -> usize {
        self.0.lock().iter().filter(|c| pred(c)).count()
    }

    pub fn hardware_calls(&self) -> usize {
        self.count(PlatformCall::is_hardware)
    }

    /// Every created handle deleted, every opened device closed, every
    /// allocated block freed.
    pub fn is_balanced(&self) -> bool {
        let n = |pred: fn(&PlatformCall) -> bool| self.count(pred);
        n(|c| matches!(c, PlatformCall::NewDataInterface))
            == n(|c| matches!(c, PlatformCall::DeleteDataInterface))
            && n(|c| matches!(c, PlatformCall::NewDevice(_)))
                == n(|c| matches!(c, PlatformCall::DeleteDevice))
            && n(|c| matches!(c, PlatformCall::Open(_))) == n(|c| matches!(c, PlatformCall::Close))
            && n(|c| matches!(c, PlatformCall::Allocate(..))) == n(|c| matches!(c, PlatformCall::Free))
    }

    /// Index of the first call matching `pred`.
    pub fn position(&self, pred: impl Fn(&PlatformCall) -> bool) -> Option<usize> {
        self.0.lock().iter().position(|c| pred(c))
    }
}

/// Opaque handle handed out by `MockCodec`.
#[derive(Debug, PartialEq, Eq)]
pub struct MockHandle(pub u32);

/// Scriptable codec.
pub struct MockCodec {
    journal: Journal,
    pub fail_data_interface: bool,
    pub fail_device: bool,
    pub open_status: CodecStatus,
    /// Zero-based read indexes that fail with `read_error`.
    pub failing_reads: Vec<u32>,
    pub read_error: CodecStatus,
    /// Zero-based read indexes that report only half the buffer.
    pub short_reads: Vec<u32>,
    /// Samples cycled into every read; zeros if empty.
    pub pattern: Vec<i16>,
    pub last_interface_config: Option<DataInterfaceConfig>,
    pub last_format: Option<SampleFormat>,
    reads: u32,
    next_handle: u32,
}

impl MockCodec {
    pub fn new() -> Self {
        Self::with_journal(Journal::new())
    }

    pub fn with_journal(journal: Journal) -> Self {
        Self {
            journal,
            fail_data_interface: false,
            fail_device: false,
            open_status: CodecStatus::OK,
            failing_reads: Vec::new(),
            read_error: CodecStatus::DRIVER_ERROR,
            short_reads: Vec::new(),
            pattern: Vec::new(),
            last_interface_config: None,
            last_format: None,
            reads: 0,
            next_handle: 1,
        }
    }

    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }

    fn handle(&mut self) -> MockHandle {
        let handle = MockHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }
}

impl Default for MockCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl CodecBackend for MockCodec {
    type DataInterface = MockHandle;
    type Device = MockHandle;

    fn new_data_interface(&mut self, cfg: &DataInterfaceConfig) -> Option<MockHandle> {
        self.last_interface_config = Some(cfg.clone());
        if self.fail_data_interface {
            self.journal.record(PlatformCall::NewDataInterfaceFailed);
            return None;
        }
        self.journal.record(PlatformCall::NewDataInterface);
        Some(self.handle())
    }

    fn new_device(&mut self, direction: DeviceDirection, _data_if: &MockHandle) -> Option<MockHandle> {
        if self.fail_device {
            self.journal.record(PlatformCall::NewDeviceFailed);
            return None;
        }
        self.journal.record(PlatformCall::NewDevice(direction));
        Some(self.handle())
    }

    fn open(&mut self, _device: &mut MockHandle, format: &SampleFormat) -> Result<(), CodecStatus> {
        self.last_format = Some(*format);
        if !self.open_status.is_ok() {
            self.journal.record(PlatformCall::OpenFailed(self.open_status.code()));
            return Err(self.open_status);
        }
        self.journal.record(PlatformCall::Open(*format));
        Ok(())
    }

    fn read(&mut self, _device: &mut MockHandle, buf: &mut [u8]) -> Result<usize, CodecStatus> {
        let index = self.reads;
        self.reads += 1;
        if self.failing_reads.contains(&index) {
            self.journal.record(PlatformCall::ReadFailed(self.read_error.code()));
            return Err(self.read_error);
        }
        self.journal.record(PlatformCall::Read);

        if self.pattern.is_empty() {
            buf.fill(0);
        } else {
            for (slot, sample) in buf.chunks_exact_mut(2).zip(self.pattern.iter().cycle()) {
                slot.copy_from_slice(&sample.to_le_bytes());
            }
        }
        if self.short_reads.contains(&index) {
            return Ok(buf.len() / 2);
        }
        Ok(buf.len())
    }

    fn close(&mut self, _device: &mut MockHandle) {
        self.journal.record(PlatformCall::Close);
    }

    fn delete_device(&mut self, _device: MockHandle) {
        self.journal.record(PlatformCall::DeleteDevice);
    }

    fn delete_data_interface(&mut self, _data_if: MockHandle) {
        self.journal.record(PlatformCall::DeleteDataInterface);
    }
}

/// Heap-backed allocator that can refuse or short-change allocations.
pub struct MockAllocator {
    journal: Journal,
    pub fail_allocation: bool,
    /// Bytes to withhold from every block.
    pub short_by: usize,
}

impl MockAllocator {
    pub fn new() -> Self {
        Self::with_journal(Journal::new())
    }

    pub fn with_journal(journal: Journal) -> Self {
        Self {
            journal,
            fail_allocation: false,
            short_by: 0,
        }
    }

    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }
}

impl Default for MockAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleAllocator for MockAllocator {
    type Block = Vec<u8>;

    fn allocate(&mut self, size: usize, class: MemoryClass) -> Option<Vec<u8>> {
        if self.fail_allocation {
            self.journal.record(PlatformCall::AllocateFailed(size));
            return None;
        }
        self.journal.record(PlatformCall::Allocate(size, class));
        Some(vec![0; size.saturating_sub(self.short_by)])
    }

    fn free(&mut self, _block: Vec<u8>) {
        self.journal.record(PlatformCall::Free);
    }
}

#[derive(Default)]
pub struct MockWatchdog {
    journal: Journal,
    pub resets: u32,
}

impl MockWatchdog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_journal(journal: Journal) -> Self {
        Self { journal, resets: 0 }
    }
}

impl Watchdog for MockWatchdog {
    fn reset(&mut self) {
        self.resets += 1;
        self.journal.record(PlatformCall::WatchdogReset);
    }
}

/// Records yields instead of sleeping.
#[derive(Default)]
pub struct MockScheduler {
    journal: Journal,
    pub slept: Duration,
}

impl MockScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_journal(journal: Journal) -> Self {
        Self {
            journal,
            slept: Duration::ZERO,
        }
    }
}

impl Scheduler for MockScheduler {
    fn sleep(&mut self, duration: Duration) {
        self.slept += duration;
        self.journal.record(PlatformCall::Sleep(duration));
    }
}

/// Captures log lines in memory.
#[derive(Debug, Default)]
pub struct RecordingLog {
    entries: Mutex<Vec<(Level, String)>>,
}

impl RecordingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.entries.lock().iter().map(|(_, line)| line.clone()).collect()
    }

    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries.lock().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries.lock().iter().any(|(_, line)| line.contains(needle))
    }
}

impl CaptureLog for RecordingLog {
    fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        self.entries.lock().push((level, args.to_string()));
    }
}

/// Full mock platform sharing one journal.
pub struct MockPlatform {
    pub journal: Journal,
    pub codec: MockCodec,
    pub allocator: MockAllocator,
    pub watchdog: MockWatchdog,
    pub scheduler: MockScheduler,
}

pub type MockAcquirer = Acquirer<MockCodec, MockAllocator, MockWatchdog, MockScheduler>;

impl MockPlatform {
    pub fn new() -> Self {
        let journal = Journal::new();
        Self {
            codec: MockCodec::with_journal(journal.clone()),
            allocator: MockAllocator::with_journal(journal.clone()),
            watchdog: MockWatchdog::with_journal(journal.clone()),
            scheduler: MockScheduler::with_journal(journal.clone()),
            journal,
        }
    }

    pub fn into_acquirer(self) -> (Journal, MockAcquirer) {
        let acquirer = Acquirer::new(self.codec, self.allocator, self.watchdog, self.scheduler);
        (self.journal, acquirer)
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}
