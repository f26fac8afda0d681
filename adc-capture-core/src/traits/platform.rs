use std::time::Duration;

/// Liveness primitive. If not reset periodically the system is presumed hung.
pub trait Watchdog {
    fn reset(&mut self);
}

/// Cooperative yield primitive of the scheduler the acquisition runs on.
pub trait Scheduler {
    fn sleep(&mut self, duration: Duration);
}
