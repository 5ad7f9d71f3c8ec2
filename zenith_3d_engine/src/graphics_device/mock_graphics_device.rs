/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Programs get their reflection data from layouts registered up front: a
/// layout applies to every program whose attached sources contain its key.
/// Buffers are plain byte vectors, so writes can be read back exactly.

use std::cell::RefCell;
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::graphics_device::{
    BufferHandle, BufferKind, GraphicsDevice, ProgramHandle, ProgramInterface,
    ResourceProperty, ShaderDataType, ShaderHandle, ShaderStage, TextureHandle,
    UniformValue,
};

// ============================================================================
// Synthetic layouts
// ============================================================================

/// Default-block uniform
#[derive(Debug, Clone)]
pub struct MockUniform {
    pub name: String,
    pub data_type: ShaderDataType,
    pub location: i32,
    pub array_size: i32,
}

impl MockUniform {
    pub fn new(name: &str, data_type: ShaderDataType, location: i32) -> Self {
        Self { name: name.to_string(), data_type, location, array_size: 1 }
    }
}

/// Block member, with values as a driver would report them
#[derive(Debug, Clone)]
pub struct MockVariable {
    pub name: String,
    pub data_type: ShaderDataType,
    pub offset: i32,
    pub array_size: i32,
    pub array_stride: i32,
    pub matrix_stride: i32,
    pub row_major: bool,
    pub top_level_array_size: i32,
    pub top_level_array_stride: i32,
}

impl MockVariable {
    pub fn new(name: &str, data_type: ShaderDataType, offset: i32) -> Self {
        Self {
            name: name.to_string(),
            data_type,
            offset,
            array_size: 1,
            array_stride: 0,
            matrix_stride: 0,
            row_major: false,
            top_level_array_size: 1,
            top_level_array_stride: 0,
        }
    }

    pub fn array(mut self, size: i32, stride: i32) -> Self {
        self.array_size = size;
        self.array_stride = stride;
        self
    }

    pub fn matrix_stride(mut self, stride: i32) -> Self {
        self.matrix_stride = stride;
        self
    }

    pub fn row_major(mut self) -> Self {
        self.row_major = true;
        self
    }

    pub fn top_level(mut self, size: i32, stride: i32) -> Self {
        self.top_level_array_size = size;
        self.top_level_array_stride = stride;
        self
    }
}

/// Uniform or storage block
#[derive(Debug, Clone)]
pub struct MockBlock {
    pub name: String,
    pub data_size: i32,
    pub variables: Vec<MockVariable>,
}

impl MockBlock {
    pub fn new(name: &str, data_size: i32) -> Self {
        Self { name: name.to_string(), data_size, variables: Vec::new() }
    }

    pub fn variable(mut self, variable: MockVariable) -> Self {
        self.variables.push(variable);
        self
    }
}

/// Everything reflection can discover about one program
#[derive(Debug, Clone, Default)]
pub struct MockProgramLayout {
    pub uniforms: Vec<MockUniform>,
    pub uniform_blocks: Vec<MockBlock>,
    pub storage_blocks: Vec<MockBlock>,
}

impl MockProgramLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uniform(mut self, uniform: MockUniform) -> Self {
        self.uniforms.push(uniform);
        self
    }

    pub fn uniform_block(mut self, block: MockBlock) -> Self {
        self.uniform_blocks.push(block);
        self
    }

    pub fn storage_block(mut self, block: MockBlock) -> Self {
        self.storage_blocks.push(block);
        self
    }
}

/// One entry of a program interface
enum MockResource<'a> {
    Loose(&'a MockUniform),
    Member(usize, &'a MockVariable),
    Block(&'a MockBlock),
}

impl MockProgramLayout {
    fn resources(&self, interface: ProgramInterface) -> Vec<MockResource<'_>> {
        fn members(blocks: &[MockBlock]) -> impl Iterator<Item = MockResource<'_>> {
            blocks.iter().enumerate().flat_map(|(block_index, block)| {
                block.variables.iter().map(move |v| MockResource::Member(block_index, v))
            })
        }

        match interface {
            ProgramInterface::Uniform => self
                .uniforms
                .iter()
                .map(MockResource::Loose)
                .chain(members(&self.uniform_blocks))
                .collect(),
            ProgramInterface::BufferVariable => members(&self.storage_blocks).collect(),
            ProgramInterface::UniformBlock => {
                self.uniform_blocks.iter().map(MockResource::Block).collect()
            }
            ProgramInterface::ShaderStorageBlock => {
                self.storage_blocks.iter().map(MockResource::Block).collect()
            }
        }
    }
}

impl MockResource<'_> {
    fn name(&self) -> &str {
        match self {
            MockResource::Loose(u) => &u.name,
            MockResource::Member(_, v) => &v.name,
            MockResource::Block(b) => &b.name,
        }
    }

    fn property(&self, property: ResourceProperty) -> i32 {
        use ResourceProperty as P;
        match (self, property) {
            (MockResource::Loose(u), P::Type) => u.data_type.gl_enum() as i32,
            (MockResource::Loose(u), P::Location) => u.location,
            (MockResource::Loose(u), P::ArraySize) => u.array_size,
            (MockResource::Loose(_), P::IsRowMajor) => 0,
            (MockResource::Loose(_), _) => -1,

            (MockResource::Member(_, v), P::Type) => v.data_type.gl_enum() as i32,
            (MockResource::Member(_, _), P::Location) => -1,
            (MockResource::Member(block, _), P::BlockIndex) => *block as i32,
            (MockResource::Member(_, v), P::Offset) => v.offset,
            (MockResource::Member(_, v), P::ArraySize) => v.array_size,
            (MockResource::Member(_, v), P::ArrayStride) => v.array_stride,
            (MockResource::Member(_, v), P::MatrixStride) => v.matrix_stride,
            (MockResource::Member(_, v), P::IsRowMajor) => v.row_major as i32,
            (MockResource::Member(_, v), P::TopLevelArraySize) => v.top_level_array_size,
            (MockResource::Member(_, v), P::TopLevelArrayStride) => v.top_level_array_stride,
            (MockResource::Member(_, _), _) => -1,

            (MockResource::Block(b), P::BufferDataSize) => b.data_size,
            (MockResource::Block(b), P::NumActiveVariables) => b.variables.len() as i32,
            (MockResource::Block(_), _) => -1,
        }
    }
}

// ============================================================================
// Mock device
// ============================================================================

#[derive(Debug)]
struct MockBuffer {
    kind: BufferKind,
    data: Vec<u8>,
}

#[derive(Default)]
struct MockState {
    next_id: u32,
    layouts: Vec<(String, MockProgramLayout)>,
    max_uniform_bindings: u32,
    max_storage_bindings: u32,

    shaders: FxHashMap<ShaderHandle, (ShaderStage, String)>,
    programs: FxHashMap<ProgramHandle, MockProgramLayout>,
    buffers: FxHashMap<BufferHandle, MockBuffer>,

    fail_compile: Option<ShaderStage>,
    fail_link: bool,
    fail_buffer_creation: bool,

    compiled_stages: Vec<ShaderStage>,
    deleted_shaders: Vec<ShaderHandle>,
    deleted_programs: Vec<ProgramHandle>,
    current_program: Option<ProgramHandle>,
    block_bindings: FxHashMap<(ProgramHandle, BufferKind, u32), u32>,
    bound_buffers: FxHashMap<(BufferKind, u32), BufferHandle>,
    bound_textures: FxHashMap<u32, TextureHandle>,
    uniform_calls: Vec<(Option<ProgramHandle>, i32, UniformValue)>,
}

/// Headless device with synthetic reflection
pub struct MockGraphicsDevice {
    state: RefCell<MockState>,
}

impl MockGraphicsDevice {
    /// Create a device with the given binding-point maximums
    pub fn new(max_uniform_bindings: u32, max_storage_bindings: u32) -> Self {
        Self {
            state: RefCell::new(MockState {
                next_id: 1,
                max_uniform_bindings,
                max_storage_bindings,
                ..MockState::default()
            }),
        }
    }

    /// Register the layout used by programs whose sources contain `key`
    pub fn register_layout(&self, key: &str, layout: MockProgramLayout) {
        self.state.borrow_mut().layouts.push((key.to_string(), layout));
    }

    pub fn fail_compile(&self, stage: Option<ShaderStage>) {
        self.state.borrow_mut().fail_compile = stage;
    }

    pub fn fail_link(&self, fail: bool) {
        self.state.borrow_mut().fail_link = fail;
    }

    pub fn fail_buffer_creation(&self, fail: bool) {
        self.state.borrow_mut().fail_buffer_creation = fail;
    }

    // ===== INSPECTION =====

    pub fn buffer_contents(&self, buffer: BufferHandle) -> Option<Vec<u8>> {
        self.state.borrow().buffers.get(&buffer).map(|b| b.data.clone())
    }

    pub fn buffer_size(&self, buffer: BufferHandle) -> Option<usize> {
        self.state.borrow().buffers.get(&buffer).map(|b| b.data.len())
    }

    pub fn live_buffer_count(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    pub fn live_shader_count(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_program_count(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn compiled_stages(&self) -> Vec<ShaderStage> {
        self.state.borrow().compiled_stages.clone()
    }

    pub fn deleted_shaders(&self) -> Vec<ShaderHandle> {
        self.state.borrow().deleted_shaders.clone()
    }

    pub fn deleted_programs(&self) -> Vec<ProgramHandle> {
        self.state.borrow().deleted_programs.clone()
    }

    pub fn current_program(&self) -> Option<ProgramHandle> {
        self.state.borrow().current_program
    }

    pub fn block_binding(&self, program: ProgramHandle, kind: BufferKind, block_index: u32) -> Option<u32> {
        self.state.borrow().block_bindings.get(&(program, kind, block_index)).copied()
    }

    pub fn bound_buffer(&self, kind: BufferKind, binding_point: u32) -> Option<BufferHandle> {
        self.state.borrow().bound_buffers.get(&(kind, binding_point)).copied()
    }

    pub fn bound_texture(&self, unit: u32) -> Option<TextureHandle> {
        self.state.borrow().bound_textures.get(&unit).copied()
    }

    pub fn uniform_calls(&self) -> Vec<(Option<ProgramHandle>, i32, UniformValue)> {
        self.state.borrow().uniform_calls.clone()
    }

    fn next_id(state: &mut MockState) -> u32 {
        let id = state.next_id;
        state.next_id += 1;
        id
    }

    fn buffer_range(state: &MockState, kind: BufferKind, buffer: BufferHandle, offset: usize, len: usize) -> Result<()> {
        let stored = state
            .buffers
            .get(&buffer)
            .ok_or_else(|| Error::InvalidResource(format!("unknown buffer {}", buffer.0)))?;
        if stored.kind != kind {
            return Err(Error::InvalidResource(format!("buffer {} is not a {:?} buffer", buffer.0, kind)));
        }
        if offset + len > stored.data.len() {
            return Err(Error::BackendError(format!(
                "range {}..{} outside buffer {} of {} bytes",
                offset, offset + len, buffer.0, stored.data.len()
            )));
        }
        Ok(())
    }
}

impl Default for MockGraphicsDevice {
    fn default() -> Self {
        Self::new(16, 16)
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<ShaderHandle> {
        let mut state = self.state.borrow_mut();
        if state.fail_compile == Some(stage) {
            return Err(Error::CompileError {
                stage,
                log: "0:1: error: mock compile failure".to_string(),
            });
        }
        let handle = ShaderHandle(Self::next_id(&mut state));
        state.shaders.insert(handle, (stage, source.to_string()));
        state.compiled_stages.push(stage);
        Ok(handle)
    }

    fn delete_shader(&self, shader: ShaderHandle) {
        let mut state = self.state.borrow_mut();
        state.shaders.remove(&shader);
        state.deleted_shaders.push(shader);
    }

    fn link_program(&self, shaders: &[ShaderHandle]) -> Result<ProgramHandle> {
        let mut state = self.state.borrow_mut();
        if state.fail_link {
            return Err(Error::LinkError("mock link failure".to_string()));
        }

        let mut sources = Vec::with_capacity(shaders.len());
        for shader in shaders {
            match state.shaders.get(shader) {
                Some((_, source)) => sources.push(source.clone()),
                None => return Err(Error::LinkError(format!("shader {} is not compiled", shader.0))),
            }
        }

        let layout = state
            .layouts
            .iter()
            .find(|(key, _)| sources.iter().any(|s| s.contains(key.as_str())))
            .map(|(_, layout)| layout.clone())
            .unwrap_or_default();

        let handle = ProgramHandle(Self::next_id(&mut state));
        state.programs.insert(handle, layout);
        Ok(handle)
    }

    fn delete_program(&self, program: ProgramHandle) {
        let mut state = self.state.borrow_mut();
        state.programs.remove(&program);
        state.deleted_programs.push(program);
        if state.current_program == Some(program) {
            state.current_program = None;
        }
    }

    fn use_program(&self, program: Option<ProgramHandle>) {
        self.state.borrow_mut().current_program = program;
    }

    fn program_resource_count(&self, program: ProgramHandle, interface: ProgramInterface) -> u32 {
        let state = self.state.borrow();
        state
            .programs
            .get(&program)
            .map(|layout| layout.resources(interface).len() as u32)
            .unwrap_or(0)
    }

    fn program_resource_name(&self, program: ProgramHandle, interface: ProgramInterface, index: u32) -> String {
        let state = self.state.borrow();
        state
            .programs
            .get(&program)
            .and_then(|layout| {
                layout
                    .resources(interface)
                    .get(index as usize)
                    .map(|r| r.name().to_string())
            })
            .unwrap_or_default()
    }

    fn program_resource_properties(
        &self,
        program: ProgramHandle,
        interface: ProgramInterface,
        index: u32,
        properties: &[ResourceProperty],
    ) -> Vec<i32> {
        let state = self.state.borrow();
        let Some(layout) = state.programs.get(&program) else {
            return Vec::new();
        };
        let resources = layout.resources(interface);
        match resources.get(index as usize) {
            Some(resource) => properties.iter().map(|p| resource.property(*p)).collect(),
            None => Vec::new(),
        }
    }

    fn set_block_binding(&self, program: ProgramHandle, kind: BufferKind, block_index: u32, binding_point: u32) {
        self.state
            .borrow_mut()
            .block_bindings
            .insert((program, kind, block_index), binding_point);
    }

    fn max_binding_points(&self, kind: BufferKind) -> u32 {
        let state = self.state.borrow();
        match kind {
            BufferKind::Uniform => state.max_uniform_bindings,
            BufferKind::Storage => state.max_storage_bindings,
        }
    }

    fn create_buffer(&self, kind: BufferKind, size: usize) -> Result<BufferHandle> {
        let mut state = self.state.borrow_mut();
        if state.fail_buffer_creation {
            return Err(Error::OutOfMemory);
        }
        let handle = BufferHandle(Self::next_id(&mut state));
        state.buffers.insert(handle, MockBuffer { kind, data: vec![0; size] });
        Ok(handle)
    }

    fn delete_buffer(&self, buffer: BufferHandle) {
        let mut state = self.state.borrow_mut();
        state.buffers.remove(&buffer);
        state.bound_buffers.retain(|_, bound| *bound != buffer);
    }

    fn bind_buffer_base(&self, kind: BufferKind, binding_point: u32, buffer: BufferHandle) {
        self.state.borrow_mut().bound_buffers.insert((kind, binding_point), buffer);
    }

    fn write_buffer(&self, kind: BufferKind, buffer: BufferHandle, offset: usize, data: &[u8]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        Self::buffer_range(&state, kind, buffer, offset, data.len())?;
        if let Some(stored) = state.buffers.get_mut(&buffer) {
            stored.data[offset..offset + data.len()].copy_from_slice(data);
        }
        Ok(())
    }

    fn read_buffer(&self, kind: BufferKind, buffer: BufferHandle, offset: usize, data: &mut [u8]) -> Result<()> {
        let state = self.state.borrow();
        Self::buffer_range(&state, kind, buffer, offset, data.len())?;
        if let Some(stored) = state.buffers.get(&buffer) {
            data.copy_from_slice(&stored.data[offset..offset + data.len()]);
        }
        Ok(())
    }

    fn set_uniform(&self, location: i32, value: &UniformValue) {
        let mut state = self.state.borrow_mut();
        let current = state.current_program;
        state.uniform_calls.push((current, location, *value));
    }

    fn bind_texture(&self, unit: u32, texture: TextureHandle) {
        self.state.borrow_mut().bound_textures.insert(unit, texture);
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
