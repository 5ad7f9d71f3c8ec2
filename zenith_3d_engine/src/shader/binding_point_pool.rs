use crate::error::{Error, Result};
use crate::graphics_device::BufferKind;

/// Allocates and recycles hardware binding points.
///
/// One pool exists per buffer kind. Capacity is fixed when the pool is
/// created (the hardware maximum, optionally capped by configuration) and
/// the lowest free index is always handed out first.
///
/// # Example
///
/// ```ignore
/// let mut pool = BindingPointPool::new(BufferKind::Uniform, 4);
/// let a = pool.acquire()?;  // 0
/// let b = pool.acquire()?;  // 1
/// pool.release(a);          // 0 is now available
/// let c = pool.acquire()?;  // 0 (lowest free)
/// ```
#[derive(Debug)]
pub struct BindingPointPool {
    kind: BufferKind,
    slots: Vec<bool>,
    len: u32,
}

impl BindingPointPool {
    /// Create a pool with `capacity` free binding points
    pub fn new(kind: BufferKind, capacity: u32) -> Self {
        Self {
            kind,
            slots: vec![false; capacity as usize],
            len: 0,
        }
    }

    /// Acquire the lowest free binding point
    pub fn acquire(&mut self) -> Result<u32> {
        match self.slots.iter().position(|taken| !taken) {
            Some(index) => {
                self.slots[index] = true;
                self.len += 1;
                Ok(index as u32)
            }
            None => Err(Error::ResourceExhausted {
                kind: self.kind,
                capacity: self.capacity(),
            }),
        }
    }

    /// Return a binding point to the pool
    pub fn release(&mut self, index: u32) {
        debug_assert!(
            self.is_acquired(index),
            "releasing a binding point that is not held: {}",
            index
        );
        if let Some(slot) = self.slots.get_mut(index as usize) {
            if *slot {
                *slot = false;
                self.len -= 1;
            }
        }
    }

    /// Whether a binding point is currently held
    pub fn is_acquired(&self, index: u32) -> bool {
        self.slots.get(index as usize).copied().unwrap_or(false)
    }

    /// Total number of binding points
    pub fn capacity(&self) -> u32 {
        self.slots.len() as u32
    }

    /// Number of binding points currently held
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Whether no binding points are held
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn kind(&self) -> BufferKind {
        self.kind
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "binding_point_pool_tests.rs"]
mod tests;
