use std::fmt;

use thiserror::Error;

/// Errors that can occur during an ADC acquisition.
///
/// Configuration errors are raised before any hardware resource is
/// requested. Resource-setup errors are raised after everything acquired
/// so far has been released. Read failures inside the chunk loop are not
/// errors; they only shape the returned `CaptureResult`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdcError {
    #[error("too many channels: {requested} (max {max})")]
    InvalidChannelCount { requested: usize, max: usize },

    #[error("channel list shorter than channel count: {provided} < {required}")]
    InvalidChannelList { provided: usize, required: usize },

    #[error("chunk size overflows: {chunk_samples} samples x {channels} channels")]
    InvalidChunkSize { chunk_samples: usize, channels: usize },

    #[error("sample rate must be positive")]
    InvalidSampleRate,

    #[error("failed to init ADC data interface")]
    CodecInterfaceInitFailed,

    #[error("failed to create codec device")]
    CodecDeviceCreateFailed,

    #[error("codec device open failed: {0}")]
    CodecOpenFailed(i32),

    #[error("out of memory allocating {bytes} byte sample buffer")]
    OutOfMemory { bytes: usize },
}

impl AdcError {
    /// True for errors raised by validation, before any hardware call.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidChannelCount { .. }
                | Self::InvalidChannelList { .. }
                | Self::InvalidChunkSize { .. }
                | Self::InvalidSampleRate
        )
    }
}

/// Raw status code reported by the codec layer.
///
/// Zero is success; negative values are driver errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodecStatus(pub i32);

impl CodecStatus {
    pub const OK: Self = Self(0);
    pub const DRIVER_ERROR: Self = Self(-1);
    pub const WRONG_STATE: Self = Self(-5);

    pub fn is_ok(self) -> bool {
        self.0 == 0
    }

    pub fn code(self) -> i32 {
        self.0
    }
}

impl fmt::Display for CodecStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
