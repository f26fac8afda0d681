//! Built-in `CaptureLog` sinks.

use std::fmt;

use log::Level;

use crate::traits::log_sink::CaptureLog;

/// Log target used by `FacadeLog`.
pub const LOG_TARGET: &str = "adc_capture";

/// Forwards to the `log` crate facade under the `adc_capture` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct FacadeLog;

impl CaptureLog for FacadeLog {
    fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        log::log!(target: LOG_TARGET, level, "{}", args);
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLog;

impl CaptureLog for NullLog {
    fn log(&self, _level: Level, _args: fmt::Arguments<'_>) {}
}
