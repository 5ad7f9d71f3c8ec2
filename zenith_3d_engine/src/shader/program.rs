/// Shader program - compiled, linked and reflected GPU program

use std::rc::Rc;
use rustc_hash::FxHashMap;

use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::graphics_device::{
    BufferKind, GraphicsDevice, ProgramHandle, ProgramInterface, ShaderHandle, ShaderStage,
    UniformValue,
};
use crate::shader::{
    BufferBacking, InterfaceBlock, ReflectedVariable, RenderContext, ShaderSourceProvider,
    VertexAttributes,
};

const SOURCE: &str = "zenith3d::ShaderProgram";

/// Stage shaders created while building a program, deleted on every exit path
struct StageGuard<'a> {
    device: &'a dyn GraphicsDevice,
    shaders: Vec<ShaderHandle>,
}

impl<'a> StageGuard<'a> {
    fn new(device: &'a dyn GraphicsDevice) -> Self {
        Self { device, shaders: Vec::with_capacity(3) }
    }

    fn compile(&mut self, stage: ShaderStage, source: &str) -> Result<()> {
        let shader = self.device.compile_shader(stage, source)?;
        self.shaders.push(shader);
        Ok(())
    }

    fn shaders(&self) -> &[ShaderHandle] {
        &self.shaders
    }
}

impl Drop for StageGuard<'_> {
    fn drop(&mut self) {
        for shader in self.shaders.drain(..) {
            self.device.delete_shader(shader);
        }
    }
}

/// Linked program plus everything reflection found in it
///
/// Dropping the program deletes the GPU program. Block backings are shared
/// with other programs and go away with the last block referencing them.
pub struct ShaderProgram {
    device: Rc<dyn GraphicsDevice>,
    name: String,
    handle: ProgramHandle,
    vertex_attributes: VertexAttributes,
    uniforms: Vec<ReflectedVariable>,
    uniform_blocks: Vec<InterfaceBlock>,
    storage_blocks: Vec<InterfaceBlock>,
}

impl ShaderProgram {
    /// Compile, link and reflect the program called `name`
    ///
    /// Vertex and fragment sources are required; a geometry source is used
    /// when the provider has one.
    pub fn new(context: &RenderContext, name: &str) -> Result<Self> {
        let log = |e: Error| Engine::log_and_return_error(SOURCE, e);

        let sources = context.sources();
        let vertex = Self::required_source(sources, name, ShaderStage::Vertex)?;
        let fragment = Self::required_source(sources, name, ShaderStage::Fragment)?;
        let geometry = sources.stage_source(name, ShaderStage::Geometry).map_err(log)?;

        let vertex_attributes = VertexAttributes::scan(&vertex);
        let device = context.device_rc().clone();
        let handle = {
            let mut stages = StageGuard::new(device.as_ref());
            stages.compile(ShaderStage::Vertex, &vertex).map_err(log)?;
            stages.compile(ShaderStage::Fragment, &fragment).map_err(log)?;
            if let Some(source) = &geometry {
                stages.compile(ShaderStage::Geometry, source).map_err(log)?;
            }

            if vertex_attributes.is_empty() {
                return Err(log(Error::NoAttributesFound(name.to_string())));
            }

            // Stage shaders are deleted when `stages` goes out of scope
            let handle = device.link_program(stages.shaders()).map_err(log)?;
            handle
        };

        let mut program = Self {
            device,
            name: name.to_string(),
            handle,
            vertex_attributes,
            uniforms: Vec::new(),
            uniform_blocks: Vec::new(),
            storage_blocks: Vec::new(),
        };
        program.reflect(context)?;

        crate::engine_info!(SOURCE, "Shader '{}' loaded given ID: {}", program.name, program.handle.0);
        crate::engine_debug!(
            SOURCE,
            "Shader '{}': {} uniforms, {} uniform blocks, {} storage blocks, attributes {:?}",
            program.name,
            program.uniforms.len(),
            program.uniform_blocks.len(),
            program.storage_blocks.len(),
            program.vertex_attributes
        );

        Ok(program)
    }

    fn required_source(
        sources: &dyn ShaderSourceProvider,
        name: &str,
        stage: ShaderStage,
    ) -> Result<String> {
        match sources.stage_source(name, stage) {
            Ok(Some(source)) => Ok(source),
            Ok(None) => Err(Engine::log_and_return_error(
                SOURCE,
                Error::MissingStageSource { shader: name.to_string(), stage },
            )),
            Err(e) => Err(Engine::log_and_return_error(SOURCE, e)),
        }
    }

    // ===== REFLECTION =====

    fn reflect(&mut self, context: &RenderContext) -> Result<()> {
        let mut uniform_members = self.reflect_variables(context, ProgramInterface::Uniform)?;
        self.uniforms = uniform_members.remove(&-1).unwrap_or_default();

        self.uniform_blocks = Self::reflect_blocks(context, self.handle, BufferKind::Uniform, uniform_members)?;

        let storage_members = self.reflect_variables(context, ProgramInterface::BufferVariable)?;
        self.storage_blocks = Self::reflect_blocks(context, self.handle, BufferKind::Storage, storage_members)?;

        Ok(())
    }

    /// Reflect every variable of an interface, grouped by block index (-1 = loose)
    fn reflect_variables(
        &self,
        context: &RenderContext,
        interface: ProgramInterface,
    ) -> Result<FxHashMap<i32, Vec<ReflectedVariable>>> {
        let device = context.device();
        let count = device.program_resource_count(self.handle, interface);
        let mut grouped: FxHashMap<i32, Vec<ReflectedVariable>> = FxHashMap::default();
        for index in 0..count {
            let variable = ReflectedVariable::reflect(device, self.handle, interface, index)?;
            grouped.entry(variable.block_index).or_default().push(variable);
        }
        Ok(grouped)
    }

    fn reflect_blocks(
        context: &RenderContext,
        program: ProgramHandle,
        kind: BufferKind,
        mut members: FxHashMap<i32, Vec<ReflectedVariable>>,
    ) -> Result<Vec<InterfaceBlock>> {
        let count = context.device().program_resource_count(program, kind.block_interface());
        let mut blocks = Vec::with_capacity(count as usize);
        for index in 0..count {
            let variables = members.remove(&(index as i32)).unwrap_or_default();
            blocks.push(InterfaceBlock::reflect(context, program, kind, index, variables)?);
        }
        for (block_index, orphans) in members {
            crate::engine_warn!(
                SOURCE,
                "{} {:?} variables reference missing block {} in program {}",
                orphans.len(), kind, block_index, program.0
            );
        }
        Ok(blocks)
    }

    // ===== BINDING & UNIFORMS =====

    /// Make this program current
    pub fn bind(&self) {
        self.device.use_program(Some(self.handle));
    }

    /// Location of a loose uniform (`None` if the program has no such uniform)
    pub fn uniform_location(&self, name: &str) -> Option<i32> {
        self.uniform(name).map(|u| u.location)
    }

    /// Reflected loose uniform by name
    pub fn uniform(&self, name: &str) -> Option<&ReflectedVariable> {
        self.uniforms.iter().find(|u| u.matches_name(name))
    }

    /// Set a loose uniform by location
    ///
    /// The program must be bound. Array uniforms accept `location + element`.
    pub fn set_uniform(&self, location: i32, value: impl Into<UniformValue>) -> Result<()> {
        let value = value.into();
        let uniform = self
            .uniforms
            .iter()
            .find(|u| {
                let span = u.array_size.max(1) as i32;
                u.location >= 0 && location >= u.location && location < u.location + span
            })
            .ok_or_else(|| {
                Engine::log_and_return_error(
                    SOURCE,
                    Error::InvalidResource(format!(
                        "shader '{}' has no uniform at location {}",
                        self.name, location
                    )),
                )
            })?;

        if !value.is_compatible_with(uniform.data_type) {
            return Err(Engine::log_and_return_error(
                SOURCE,
                Error::InvalidResource(format!(
                    "cannot set uniform '{}' of type {:?} to {:?}",
                    uniform.name,
                    uniform.data_type,
                    value.data_type()
                )),
            ));
        }

        self.device.set_uniform(location, &value);
        Ok(())
    }

    /// Set a loose uniform by name
    pub fn set_uniform_by_name(&self, name: &str, value: impl Into<UniformValue>) -> Result<()> {
        let location = self.uniform_location(name).ok_or_else(|| {
            Engine::log_and_return_error(
                SOURCE,
                Error::InvalidResource(format!("shader '{}' has no uniform '{}'", self.name, name)),
            )
        })?;
        self.set_uniform(location, value)
    }

    /// Write a member of a uniform or storage block through its shared backing
    pub fn set_block_variable(&self, block: &str, variable: &str, value: impl Into<UniformValue>) -> Result<()> {
        self.set_block_element(block, variable, 0, value)
    }

    /// Write one element of an array member of a uniform or storage block
    pub fn set_block_element(
        &self,
        block: &str,
        variable: &str,
        element: u32,
        value: impl Into<UniformValue>,
    ) -> Result<()> {
        let block = self
            .uniform_block(block)
            .or_else(|| self.storage_block(block))
            .ok_or_else(|| {
                Engine::log_and_return_error(
                    SOURCE,
                    Error::InvalidResource(format!("shader '{}' has no block '{}'", self.name, block)),
                )
            })?;
        block.backing().write_variable(variable, element, &value.into())
    }

    // ===== BLOCK LOOKUP =====

    /// Backing of the storage block called `identifier`
    pub fn get_storage_backing(&self, identifier: &str) -> Option<&Rc<BufferBacking>> {
        self.storage_block(identifier).map(InterfaceBlock::backing)
    }

    /// Backing of the uniform block called `identifier`
    pub fn get_uniform_backing(&self, identifier: &str) -> Option<&Rc<BufferBacking>> {
        self.uniform_block(identifier).map(InterfaceBlock::backing)
    }

    pub fn uniform_block(&self, name: &str) -> Option<&InterfaceBlock> {
        self.uniform_blocks.iter().find(|b| b.name() == name)
    }

    pub fn storage_block(&self, name: &str) -> Option<&InterfaceBlock> {
        self.storage_blocks.iter().find(|b| b.name() == name)
    }

    // ===== ACCESSORS =====

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(&self) -> ProgramHandle {
        self.handle
    }

    pub fn vertex_attributes(&self) -> VertexAttributes {
        self.vertex_attributes
    }

    /// Loose (default-block) uniforms
    pub fn uniforms(&self) -> &[ReflectedVariable] {
        &self.uniforms
    }

    pub fn uniform_blocks(&self) -> &[InterfaceBlock] {
        &self.uniform_blocks
    }

    pub fn storage_blocks(&self) -> &[InterfaceBlock] {
        &self.storage_blocks
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        self.device.delete_program(self.handle);
        crate::engine_debug!(SOURCE, "Shader '{}' (ID {}) deleted", self.name, self.handle.0);
    }
}

impl std::fmt::Debug for ShaderProgram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("name", &self.name)
            .field("handle", &self.handle)
            .field("vertex_attributes", &self.vertex_attributes)
            .field("uniforms", &self.uniforms.len())
            .field("uniform_blocks", &self.uniform_blocks.len())
            .field("storage_blocks", &self.storage_blocks.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "program_tests.rs"]
mod tests;
