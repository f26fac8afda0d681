pub mod allocator;
pub mod codec;
pub mod log_sink;
pub mod platform;
