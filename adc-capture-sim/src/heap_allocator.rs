//! Host heap allocator for sample buffers.

use std::sync::Arc;

use parking_lot::Mutex;

use adc_capture_core::traits::allocator::{MemoryClass, SampleAllocator};

/// Allocation counters, shared with the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeapStats {
    pub allocations: u32,
    pub frees: u32,
    pub refused: u32,
    pub outstanding_bytes: usize,
    pub peak_bytes: usize,
}

impl HeapStats {
    pub fn is_balanced(&self) -> bool {
        self.allocations == self.frees && self.outstanding_bytes == 0
    }
}

/// `SampleAllocator` over the process heap.
///
/// Optionally caps internal (and DMA) memory to mimic the small on-chip RAM
/// of the target; external memory is never capped.
pub struct HeapAllocator {
    internal_limit: Option<usize>,
    stats: Arc<Mutex<HeapStats>>,
}

impl HeapAllocator {
    pub fn new() -> Self {
        Self {
            internal_limit: None,
            stats: Arc::new(Mutex::new(HeapStats::default())),
        }
    }

    /// Refuse internal/DMA allocations that would exceed `bytes` outstanding.
    pub fn with_internal_limit(mut self, bytes: usize) -> Self {
        self.internal_limit = Some(bytes);
        self
    }

    pub fn stats(&self) -> Arc<Mutex<HeapStats>> {
        Arc::clone(&self.stats)
    }
}

impl Default for HeapAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleAllocator for HeapAllocator {
    type Block = Vec<u8>;

    fn allocate(&mut self, size: usize, class: MemoryClass) -> Option<Vec<u8>> {
        let mut stats = self.stats.lock();

        if let (Some(limit), MemoryClass::Internal | MemoryClass::Dma) = (self.internal_limit, class) {
            if stats.outstanding_bytes.saturating_add(size) > limit {
                stats.refused += 1;
                log::warn!("heap: refusing {} bytes of {:?} memory (limit {})", size, class, limit);
                return None;
            }
        }

        let mut block = Vec::new();
        if block.try_reserve_exact(size).is_err() {
            stats.refused += 1;
            log::warn!("heap: allocation of {} bytes failed", size);
            return None;
        }
        block.resize(size, 0);

        stats.allocations += 1;
        stats.outstanding_bytes += size;
        stats.peak_bytes = stats.peak_bytes.max(stats.outstanding_bytes);
        Some(block)
    }

    fn free(&mut self, block: Vec<u8>) {
        let mut stats = self.stats.lock();
        stats.frees += 1;
        stats.outstanding_bytes = stats.outstanding_bytes.saturating_sub(block.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_zeroed_block() {
        let mut heap = HeapAllocator::new();

        let block = heap.allocate(32, MemoryClass::Internal).unwrap();

        assert_eq!(block.len(), 32);
        assert!(block.iter().all(|&b| b == 0));
        heap.free(block);
        assert!(heap.stats().lock().is_balanced());
    }

    #[test]
    fn internal_limit_refuses_oversized() {
        let mut heap = HeapAllocator::new().with_internal_limit(100);

        assert!(heap.allocate(101, MemoryClass::Internal).is_none());
        assert!(heap.allocate(101, MemoryClass::Dma).is_none());
        assert_eq!(heap.stats().lock().refused, 2);
    }

    #[test]
    fn external_memory_ignores_limit() {
        let mut heap = HeapAllocator::new().with_internal_limit(16);

        let block = heap.allocate(1024, MemoryClass::External).unwrap();
        assert_eq!(heap.stats().lock().peak_bytes, 1024);
        heap.free(block);
    }

    #[test]
    fn limit_counts_outstanding_blocks() {
        let mut heap = HeapAllocator::new().with_internal_limit(100);

        let first = heap.allocate(60, MemoryClass::Internal).unwrap();
        assert!(heap.allocate(60, MemoryClass::Internal).is_none());
        heap.free(first);
        assert!(heap.allocate(60, MemoryClass::Internal).is_some());
    }
}
