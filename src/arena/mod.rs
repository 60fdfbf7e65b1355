//! Growable byte arena backing an op buffer.
//!
//! The arena hands out no individual allocations: the op buffer owns the write cursor and asks
//! the arena to make sure enough bytes exist behind it. Capacity only ever grows, in whole
//! pages, and is kept across buffer resets so steady-state frames do not allocate.

use crate::foundation::config::OpBufferConfig;
use crate::foundation::error::{CanvasError, CanvasResult};

/// Round `n` up to a multiple of `align` (a power of two). `None` on overflow.
pub(crate) fn align_up(n: usize, align: usize) -> Option<usize> {
    debug_assert!(align.is_power_of_two());
    n.checked_add(align - 1).map(|v| v & !(align - 1))
}

/// `count * elem_size` computed in 128 bits and narrowed back, `None` when it does not fit.
pub fn checked_size(count: usize, elem_size: usize) -> Option<usize> {
    let wide = (count as u128) * (elem_size as u128);
    usize::try_from(wide).ok()
}

/// Contiguous, zero-initialized byte storage that grows in page-size steps.
#[derive(Debug)]
pub struct ByteArena {
    bytes: Vec<u8>,
    page_size: usize,
    grow_events: usize,
}

impl ByteArena {
    /// Create an empty arena growing in `page_size` steps (a power of two).
    pub fn new(page_size: usize) -> Self {
        debug_assert!(page_size.is_power_of_two());
        Self {
            bytes: Vec::new(),
            page_size,
            grow_events: 0,
        }
    }

    /// Create an arena from a validated config, reserving its initial capacity.
    pub fn with_config(config: &OpBufferConfig) -> CanvasResult<Self> {
        config.validate()?;
        let mut arena = Self::new(config.page_size);
        arena.reserve(config.initial_capacity)?;
        Ok(arena)
    }

    /// Ensure at least `capacity` bytes exist, growing to the next page multiple if short.
    ///
    /// Existing bytes keep their values. On failure the arena is left untouched.
    pub fn reserve(&mut self, capacity: usize) -> CanvasResult<()> {
        let reserved = self.bytes.len();
        if capacity <= reserved {
            return Ok(());
        }
        let Some(target) = align_up(capacity, self.page_size) else {
            tracing::error!(capacity, "op arena size overflow");
            return Err(CanvasError::allocation(capacity));
        };
        if let Err(e) = self.bytes.try_reserve_exact(target - reserved) {
            tracing::error!(target, error = %e, "op arena allocation failed");
            return Err(CanvasError::allocation(target));
        }
        self.bytes.resize(target, 0);
        self.grow_events += 1;
        tracing::trace!(old = reserved, new = target, "op arena grew");
        Ok(())
    }

    /// Ensure room for `count` elements of `elem_size` bytes each.
    pub fn reserve_elements(&mut self, count: usize, elem_size: usize) -> CanvasResult<()> {
        let bytes = checked_size(count, elem_size).ok_or_else(|| {
            tracing::error!(count, elem_size, "op arena element count overflow");
            CanvasError::allocation(usize::MAX)
        })?;
        self.reserve(bytes)
    }

    /// All reserved bytes.
    pub fn data(&self) -> &[u8] {
        &self.bytes
    }

    /// All reserved bytes, mutably.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Number of reserved bytes.
    pub fn reserved(&self) -> usize {
        self.bytes.len()
    }

    /// Growth quantum in bytes.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// How many times the backing allocation has grown.
    pub fn grow_events(&self) -> usize {
        self.grow_events
    }

    /// Free the backing allocation.
    pub fn release(&mut self) {
        self.bytes = Vec::new();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/arena/arena.rs"]
mod tests;
