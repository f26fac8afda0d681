/// Memory region a sample buffer is allocated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryClass {
    /// Internal 8-bit addressable RAM, usable for low-latency device transfer.
    Internal,
    /// DMA-capable RAM.
    Dma,
    /// External PSRAM. Larger, but slower to reach from the ADC driver.
    External,
}

/// Allocator for sample buffers.
///
/// Returning `None` signals out-of-memory. Every block returned by
/// `allocate` is handed back to `free` exactly once.
pub trait SampleAllocator {
    type Block: AsRef<[u8]> + AsMut<[u8]>;

    fn allocate(&mut self, size: usize, class: MemoryClass) -> Option<Self::Block>;

    fn free(&mut self, block: Self::Block);
}
