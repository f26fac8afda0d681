use std::fmt;

use log::Level;

/// Injectable logging sink for an acquisition.
///
/// Passed into the `Acquirer` instead of logging through process-wide state,
/// so tests can capture output and firmware builds can route it anywhere.
pub trait CaptureLog: Send + Sync {
    fn log(&self, level: Level, args: fmt::Arguments<'_>);

    fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args);
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args);
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args);
    }

    fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args);
    }
}
