#![allow(dead_code)]
//! Headless graphics device shared by the integration tests
//!
//! Every linked program reports the same layout: a loose `model` matrix at
//! location 0 and a `Light { vec3 pos; float intensity; }` storage block.
//! Buffers live in CPU memory so writes can be read back.

use std::cell::RefCell;
use rustc_hash::FxHashMap;
use zenith_3d_engine::zenith3d::device::{
    BufferHandle, BufferKind, ProgramHandle, ProgramInterface, ResourceProperty, ShaderDataType,
    ShaderHandle, ShaderStage, TextureHandle, UniformValue,
};
use zenith_3d_engine::zenith3d::{Error, GraphicsDevice, Result};

/// Vertex source consuming position and normal
pub const VERTEX_SOURCE: &str = "#version 430 core\nlayout(location = 0) in vec3 VertexPosition;\nlayout(location = 1) in vec3 VertexNormal;\nvoid main() {}\n";

pub const FRAGMENT_SOURCE: &str = "#version 430 core\nout vec4 colour;\nvoid main() { colour = vec4(1.0); }\n";

/// Light block members: (name, type, offset)
const LIGHT_MEMBERS: [(&str, ShaderDataType, i32); 2] = [
    ("pos", ShaderDataType::Vec3, 0),
    ("intensity", ShaderDataType::Float, 12),
];

#[derive(Default)]
struct HeadlessState {
    next_id: u32,
    live_shaders: usize,
    live_programs: usize,
    buffers: FxHashMap<BufferHandle, Vec<u8>>,
    block_bindings: FxHashMap<(ProgramHandle, BufferKind, u32), u32>,
    current_program: Option<ProgramHandle>,
    uniform_calls: Vec<(i32, UniformValue)>,
}

pub struct HeadlessDevice {
    state: RefCell<HeadlessState>,
}

impl HeadlessDevice {
    pub fn new() -> Self {
        Self { state: RefCell::new(HeadlessState::default()) }
    }

    fn next_id(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        state.next_id
    }

    pub fn live_buffer_count(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    pub fn live_shader_count(&self) -> usize {
        self.state.borrow().live_shaders
    }

    pub fn live_program_count(&self) -> usize {
        self.state.borrow().live_programs
    }

    pub fn block_binding(&self, program: ProgramHandle, kind: BufferKind, block_index: u32) -> Option<u32> {
        self.state.borrow().block_bindings.get(&(program, kind, block_index)).copied()
    }

    pub fn current_program(&self) -> Option<ProgramHandle> {
        self.state.borrow().current_program
    }

    pub fn uniform_calls(&self) -> Vec<(i32, UniformValue)> {
        self.state.borrow().uniform_calls.clone()
    }

    fn member_property(index: usize, property: ResourceProperty) -> i32 {
        let (_, data_type, offset) = LIGHT_MEMBERS[index];
        match property {
            ResourceProperty::Type => data_type.gl_enum() as i32,
            ResourceProperty::ArraySize | ResourceProperty::TopLevelArraySize => 1,
            ResourceProperty::Offset => offset,
            ResourceProperty::BlockIndex => 0,
            ResourceProperty::ArrayStride
            | ResourceProperty::MatrixStride
            | ResourceProperty::IsRowMajor
            | ResourceProperty::TopLevelArrayStride => 0,
            _ => -1,
        }
    }

    fn loose_property(property: ResourceProperty) -> i32 {
        match property {
            ResourceProperty::Type => ShaderDataType::Mat4.gl_enum() as i32,
            ResourceProperty::ArraySize => 1,
            ResourceProperty::Location => 0,
            ResourceProperty::IsRowMajor => 0,
            _ => -1,
        }
    }
}

impl GraphicsDevice for HeadlessDevice {
    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<ShaderHandle> {
        if source.contains("#error") {
            return Err(Error::CompileError { stage, log: "0:1: '#error' : forced".to_string() });
        }
        let id = self.next_id();
        self.state.borrow_mut().live_shaders += 1;
        Ok(ShaderHandle(id))
    }

    fn delete_shader(&self, _shader: ShaderHandle) {
        self.state.borrow_mut().live_shaders -= 1;
    }

    fn link_program(&self, _shaders: &[ShaderHandle]) -> Result<ProgramHandle> {
        let id = self.next_id();
        self.state.borrow_mut().live_programs += 1;
        Ok(ProgramHandle(id))
    }

    fn delete_program(&self, _program: ProgramHandle) {
        self.state.borrow_mut().live_programs -= 1;
    }

    fn use_program(&self, program: Option<ProgramHandle>) {
        self.state.borrow_mut().current_program = program;
    }

    fn program_resource_count(&self, _program: ProgramHandle, interface: ProgramInterface) -> u32 {
        match interface {
            ProgramInterface::Uniform => 1,
            ProgramInterface::UniformBlock => 0,
            ProgramInterface::BufferVariable => LIGHT_MEMBERS.len() as u32,
            ProgramInterface::ShaderStorageBlock => 1,
        }
    }

    fn program_resource_name(&self, _program: ProgramHandle, interface: ProgramInterface, index: u32) -> String {
        match interface {
            ProgramInterface::Uniform => "model".to_string(),
            ProgramInterface::BufferVariable => LIGHT_MEMBERS[index as usize].0.to_string(),
            ProgramInterface::ShaderStorageBlock => "Light".to_string(),
            ProgramInterface::UniformBlock => String::new(),
        }
    }

    fn program_resource_properties(
        &self,
        _program: ProgramHandle,
        interface: ProgramInterface,
        index: u32,
        properties: &[ResourceProperty],
    ) -> Vec<i32> {
        properties
            .iter()
            .map(|property| match interface {
                ProgramInterface::Uniform => Self::loose_property(*property),
                ProgramInterface::BufferVariable => Self::member_property(index as usize, *property),
                _ => match property {
                    ResourceProperty::BufferDataSize => 16,
                    ResourceProperty::NumActiveVariables => LIGHT_MEMBERS.len() as i32,
                    _ => -1,
                },
            })
            .collect()
    }

    fn set_block_binding(&self, program: ProgramHandle, kind: BufferKind, block_index: u32, binding_point: u32) {
        self.state
            .borrow_mut()
            .block_bindings
            .insert((program, kind, block_index), binding_point);
    }

    fn max_binding_points(&self, _kind: BufferKind) -> u32 {
        4
    }

    fn create_buffer(&self, _kind: BufferKind, size: usize) -> Result<BufferHandle> {
        let handle = BufferHandle(self.next_id());
        self.state.borrow_mut().buffers.insert(handle, vec![0; size]);
        Ok(handle)
    }

    fn delete_buffer(&self, buffer: BufferHandle) {
        self.state.borrow_mut().buffers.remove(&buffer);
    }

    fn bind_buffer_base(&self, _kind: BufferKind, _binding_point: u32, _buffer: BufferHandle) {}

    fn write_buffer(&self, _kind: BufferKind, buffer: BufferHandle, offset: usize, data: &[u8]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let storage = state
            .buffers
            .get_mut(&buffer)
            .ok_or_else(|| Error::InvalidResource(format!("unknown buffer {}", buffer.0)))?;
        storage[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn read_buffer(&self, _kind: BufferKind, buffer: BufferHandle, offset: usize, data: &mut [u8]) -> Result<()> {
        let state = self.state.borrow();
        let storage = state
            .buffers
            .get(&buffer)
            .ok_or_else(|| Error::InvalidResource(format!("unknown buffer {}", buffer.0)))?;
        data.copy_from_slice(&storage[offset..offset + data.len()]);
        Ok(())
    }

    fn set_uniform(&self, location: i32, value: &UniformValue) {
        self.state.borrow_mut().uniform_calls.push((location, *value));
    }

    fn bind_texture(&self, _unit: u32, _texture: TextureHandle) {}
}
