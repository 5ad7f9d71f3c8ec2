/// Buffer backing - one GPU buffer bound to one pooled binding point

use std::cell::RefCell;
use std::rc::Rc;

use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::graphics_device::{BufferHandle, BufferKind, GraphicsDevice, UniformValue};
use crate::shader::{BindingPointPool, ReflectedVariable};

const SOURCE: &str = "zenith3d::BufferBacking";

/// Descriptor for creating a buffer backing
#[derive(Debug, Clone)]
pub struct BufferBackingDesc {
    /// Block name shared by every program that declares the block
    pub identifier: String,
    /// Size in bytes of the block's fixed portion
    pub size: usize,
    /// Extra bytes allocated behind the fixed portion for an unbounded tail array
    pub tail_reserve: usize,
    /// Reflected block members
    pub variables: Vec<ReflectedVariable>,
}

/// GPU buffer backing a uniform or storage block
///
/// Construction acquires a binding point and dropping releases it, so a
/// binding point is held by exactly one live backing. Not `Clone`: share it
/// through `Rc`.
pub struct BufferBacking {
    device: Rc<dyn GraphicsDevice>,
    pool: Rc<RefCell<BindingPointPool>>,
    handle: BufferHandle,
    kind: BufferKind,
    size: usize,
    capacity: usize,
    binding_point: u32,
    identifier: String,
    variables: Vec<ReflectedVariable>,
}

impl BufferBacking {
    /// Acquire a binding point, allocate the buffer and bind it
    pub fn new(
        device: Rc<dyn GraphicsDevice>,
        pool: Rc<RefCell<BindingPointPool>>,
        desc: BufferBackingDesc,
    ) -> Result<Self> {
        let kind = pool.borrow().kind();
        let acquired = pool.borrow_mut().acquire();
        let binding_point = acquired.map_err(|e| Engine::log_and_return_error(SOURCE, e))?;

        let capacity = desc.size + desc.tail_reserve;
        let handle = match device.create_buffer(kind, capacity) {
            Ok(handle) => handle,
            Err(e) => {
                pool.borrow_mut().release(binding_point);
                return Err(Engine::log_and_return_error(SOURCE, e));
            }
        };
        device.bind_buffer_base(kind, binding_point, handle);

        crate::engine_debug!(
            SOURCE,
            "{:?} backing '{}' created: {} bytes (+{} reserved) at binding point {}",
            kind, desc.identifier, desc.size, desc.tail_reserve, binding_point
        );

        Ok(Self {
            device,
            pool,
            handle,
            kind,
            size: desc.size,
            capacity,
            binding_point,
            identifier: desc.identifier,
            variables: desc.variables,
        })
    }

    // ===== RAW ACCESS =====

    /// Copy bytes into the buffer at `offset`
    pub fn write(&self, offset: usize, data: &[u8]) -> Result<()> {
        self.check_range(offset, data.len())?;
        self.device
            .write_buffer(self.kind, self.handle, offset, data)
            .map_err(|e| Engine::log_and_return_error(SOURCE, e))
    }

    /// Read `len` bytes back from `offset`
    pub fn read(&self, offset: usize, len: usize) -> Result<Vec<u8>> {
        self.check_range(offset, len)?;
        let mut data = vec![0u8; len];
        self.device
            .read_buffer(self.kind, self.handle, offset, &mut data)
            .map_err(|e| Engine::log_and_return_error(SOURCE, e))?;
        Ok(data)
    }

    fn check_range(&self, offset: usize, len: usize) -> Result<()> {
        match offset.checked_add(len) {
            Some(end) if end <= self.capacity => Ok(()),
            _ => Err(Engine::log_and_return_error(
                SOURCE,
                Error::InvalidResource(format!(
                    "range {}+{} exceeds backing '{}' of {} bytes",
                    offset, len, self.identifier, self.capacity
                )),
            )),
        }
    }

    // ===== VARIABLE ACCESS =====

    /// Look up a member of the backed layout
    pub fn variable(&self, name: &str) -> Option<&ReflectedVariable> {
        self.variables.iter().find(|v| v.matches_name(name))
    }

    /// Encode `value` with the variable's layout and write it at `element`
    pub fn write_variable(&self, name: &str, element: u32, value: &UniformValue) -> Result<()> {
        let variable = self.variable(name).ok_or_else(|| {
            Engine::log_and_return_error(
                SOURCE,
                Error::InvalidResource(format!("no variable '{}' in '{}'", name, self.identifier)),
            )
        })?;
        let offset = variable
            .element_offset(element)
            .map_err(|e| Engine::log_and_return_error(SOURCE, e))?;
        let bytes = variable
            .encode(value)
            .map_err(|e| Engine::log_and_return_error(SOURCE, e))?;
        self.write(offset, &bytes)
    }

    /// Read the raw bytes of one element of a variable
    pub fn read_variable(&self, name: &str, element: u32) -> Result<Vec<u8>> {
        let variable = self.variable(name).ok_or_else(|| {
            Engine::log_and_return_error(
                SOURCE,
                Error::InvalidResource(format!("no variable '{}' in '{}'", name, self.identifier)),
            )
        })?;
        let offset = variable
            .element_offset(element)
            .map_err(|e| Engine::log_and_return_error(SOURCE, e))?;
        self.read(offset, variable.encoded_size())
    }

    /// Re-bind the buffer to its binding point
    pub fn bind(&self) {
        self.device.bind_buffer_base(self.kind, self.binding_point, self.handle);
    }

    // ===== ACCESSORS =====

    pub fn handle(&self) -> BufferHandle {
        self.handle
    }

    pub fn kind(&self) -> BufferKind {
        self.kind
    }

    /// Size of the fixed portion in bytes
    pub fn size(&self) -> usize {
        self.size
    }

    /// Allocated bytes (fixed portion plus tail reserve)
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn binding_point(&self) -> u32 {
        self.binding_point
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn variables(&self) -> &[ReflectedVariable] {
        &self.variables
    }
}

impl Drop for BufferBacking {
    fn drop(&mut self) {
        // Don't panic if the pool is borrowed - the buffer must still be deleted
        if let Ok(mut pool) = self.pool.try_borrow_mut() {
            pool.release(self.binding_point);
        }
        self.device.delete_buffer(self.handle);

        crate::engine_debug!(
            SOURCE,
            "{:?} backing '{}' released binding point {}",
            self.kind, self.identifier, self.binding_point
        );
    }
}

impl std::fmt::Debug for BufferBacking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferBacking")
            .field("identifier", &self.identifier)
            .field("kind", &self.kind)
            .field("handle", &self.handle)
            .field("size", &self.size)
            .field("capacity", &self.capacity)
            .field("binding_point", &self.binding_point)
            .finish()
    }
}

#[cfg(test)]
#[path = "buffer_backing_tests.rs"]
mod tests;
