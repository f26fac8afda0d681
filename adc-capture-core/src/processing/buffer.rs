use crate::models::error::AdcError;
use crate::traits::allocator::{MemoryClass, SampleAllocator};

/// Fixed-size sample buffer for one acquisition.
///
/// Borrows the allocator for its lifetime and hands the block back on
/// `release` or drop, whichever comes first. The size is fixed at
/// allocation.
pub struct AcquisitionBuffer<'a, A: SampleAllocator> {
    allocator: &'a mut A,
    block: Option<A::Block>,
    size: usize,
}

impl<'a, A: SampleAllocator> AcquisitionBuffer<'a, A> {
    /// Allocate `size` bytes of `class` memory.
    ///
    /// A refused allocation, or a block smaller than requested, is `OutOfMemory`.
    pub fn allocate(allocator: &'a mut A, size: usize, class: MemoryClass) -> Result<Self, AdcError> {
        let block = allocator
            .allocate(size, class)
            .ok_or(AdcError::OutOfMemory { bytes: size })?;

        if block.as_ref().len() < size {
            allocator.free(block);
            return Err(AdcError::OutOfMemory { bytes: size });
        }

        Ok(Self {
            allocator,
            block: Some(block),
            size,
        })
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn is_released(&self) -> bool {
        self.block.is_none()
    }

    /// Buffer contents; empty once released.
    pub fn as_slice(&self) -> &[u8] {
        match self.block.as_ref() {
            Some(block) => block.as_ref().get(..self.size).unwrap_or_default(),
            None => &[],
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        let size = self.size;
        match self.block.as_mut() {
            Some(block) => block.as_mut().get_mut(..size).unwrap_or_default(),
            None => &mut [],
        }
    }

    /// Return the block to the allocator. Safe to call more than once.
    pub fn release(&mut self) {
        if let Some(block) = self.block.take() {
            self.allocator.free(block);
        }
    }
}

impl<A: SampleAllocator> Drop for AcquisitionBuffer<'_, A> {
    fn drop(&mut self) {
        self.release();
    }
}
