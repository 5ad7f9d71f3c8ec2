/// Interface block - one reflected uniform or storage block of a program

use std::rc::Rc;

use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::graphics_device::{BufferKind, GraphicsDevice, ProgramHandle, ResourceProperty};
use crate::shader::{BufferBacking, BufferBackingDesc, ReflectedVariable, RenderContext};

const SOURCE: &str = "zenith3d::InterfaceBlock";

/// Uniform or storage block as seen by one program
///
/// Created once per (program, block index) at link time. Its layout never
/// changes afterwards; only the contents of the backing do.
#[derive(Debug)]
pub struct InterfaceBlock {
    kind: BufferKind,
    name: String,
    index: u32,
    program: ProgramHandle,
    variables: Vec<ReflectedVariable>,
    backing: Rc<BufferBacking>,
}

impl InterfaceBlock {
    /// Reflect block `index` of `program` and attach it to a shared backing
    ///
    /// `variables` are the members already grouped under this block index.
    pub(crate) fn reflect(
        context: &RenderContext,
        program: ProgramHandle,
        kind: BufferKind,
        index: u32,
        variables: Vec<ReflectedVariable>,
    ) -> Result<Self> {
        let device = context.device();
        let interface = kind.block_interface();
        let name = device.program_resource_name(program, interface, index);

        let properties = [ResourceProperty::BufferDataSize, ResourceProperty::NumActiveVariables];
        let values = device.program_resource_properties(program, interface, index, &properties);
        if values.len() != properties.len() {
            return Err(Engine::log_and_return_error(
                SOURCE,
                Error::InvariantViolation(format!(
                    "{:?} block {} of program {}: expected {} property values, got {}",
                    kind, index, program.0, properties.len(), values.len()
                )),
            ));
        }
        if variables.is_empty() {
            return Err(Engine::log_and_return_error(
                SOURCE,
                Error::InvariantViolation(format!("{:?} block '{}' has no variables", kind, name)),
            ));
        }
        if values[1] as usize != variables.len() {
            return Err(Engine::log_and_return_error(
                SOURCE,
                Error::InvariantViolation(format!(
                    "{:?} block '{}' reports {} active variables, {} reflected",
                    kind, name, values[1], variables.len()
                )),
            ));
        }

        let (size, tail_reserve) =
            Self::layout_size(kind, values[0], &variables, context.config().unbounded_array_capacity);

        let backing = context.backings(kind).request(BufferBackingDesc {
            identifier: name.clone(),
            size,
            tail_reserve,
            variables: variables.clone(),
        })?;

        let block = Self {
            kind,
            name,
            index,
            program,
            variables,
            backing,
        };
        block.set_binding(device, block.backing.binding_point());

        crate::engine_debug!(
            SOURCE,
            "{:?} block '{}' (index {}) of program {} bound to binding point {}",
            block.kind, block.name, block.index, block.program.0, block.backing.binding_point()
        );

        Ok(block)
    }

    /// Fixed-portion size and tail reserve of a block
    ///
    /// A storage block ending in an unbounded array only counts the bytes in
    /// front of the array; `tail_capacity` elements are reserved behind it.
    /// Otherwise the driver's data size wins, falling back to the extent of
    /// the variables when the driver reports 0.
    pub(crate) fn layout_size(
        kind: BufferKind,
        data_size: i32,
        variables: &[ReflectedVariable],
        tail_capacity: u32,
    ) -> (usize, usize) {
        let tail: Vec<&ReflectedVariable> = match kind {
            BufferKind::Storage => variables.iter().filter(|v| v.is_unbounded()).collect(),
            BufferKind::Uniform => Vec::new(),
        };

        if !tail.is_empty() {
            let fixed = tail.iter().map(|v| v.offset.max(0) as usize).min().unwrap_or(0);
            let stride = tail
                .iter()
                .map(|v| {
                    if v.top_level_array_stride > 0 {
                        v.top_level_array_stride
                    } else {
                        v.array_stride.max(0)
                    }
                })
                .max()
                .unwrap_or(0) as usize;
            return (fixed, stride * tail_capacity as usize);
        }

        if data_size > 0 {
            (data_size as usize, 0)
        } else {
            (variables.iter().map(ReflectedVariable::extent).max().unwrap_or(0), 0)
        }
    }

    /// Point this program's block at a binding point
    pub(crate) fn set_binding(&self, device: &dyn GraphicsDevice, binding_point: u32) {
        device.set_block_binding(self.program, self.kind, self.index, binding_point);
    }

    // ===== ACCESSORS =====

    pub fn kind(&self) -> BufferKind {
        self.kind
    }

    /// Block name (the backing identifier)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Block index inside the owning program
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn program(&self) -> ProgramHandle {
        self.program
    }

    pub fn variables(&self) -> &[ReflectedVariable] {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> Option<&ReflectedVariable> {
        self.variables.iter().find(|v| v.matches_name(name))
    }

    pub fn backing(&self) -> &Rc<BufferBacking> {
        &self.backing
    }

    pub fn binding_point(&self) -> u32 {
        self.backing.binding_point()
    }
}

#[cfg(test)]
#[path = "interface_block_tests.rs"]
mod tests;
