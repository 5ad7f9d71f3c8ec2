/// GraphicsDevice trait - the driver boundary
///
/// Everything the shader layer needs from the GPU driver goes through this
/// trait: stage compilation, program linking, program-interface reflection,
/// block bindings, buffer storage and uniform uploads. The OpenGL backend
/// implements it with glow; tests use a mock device.

use crate::error::Result;
use crate::graphics_device::{
    BufferHandle, BufferKind, ProgramHandle, ProgramInterface, ResourceProperty,
    ShaderHandle, ShaderStage, TextureHandle, UniformValue,
};

/// Driver interface used by the shader/buffer layer
///
/// All calls happen on the thread owning the GL context.
pub trait GraphicsDevice {
    // ===== SHADERS & PROGRAMS =====

    /// Compile one stage
    ///
    /// Fails with `Error::CompileError` carrying the driver's info log.
    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<ShaderHandle>;

    /// Delete a stage shader object
    fn delete_shader(&self, shader: ShaderHandle);

    /// Attach the given stages and link them
    ///
    /// Fails with `Error::LinkError` carrying the driver's info log. The stage
    /// shaders are detached again before returning.
    fn link_program(&self, shaders: &[ShaderHandle]) -> Result<ProgramHandle>;

    /// Delete a program object
    fn delete_program(&self, program: ProgramHandle);

    /// Make a program current (`None` unbinds)
    fn use_program(&self, program: Option<ProgramHandle>);

    // ===== REFLECTION =====

    /// Number of active resources in an interface
    fn program_resource_count(&self, program: ProgramHandle, interface: ProgramInterface) -> u32;

    /// Name of a resource
    fn program_resource_name(
        &self,
        program: ProgramHandle,
        interface: ProgramInterface,
        index: u32,
    ) -> String;

    /// Query several properties of one resource (one value per property)
    fn program_resource_properties(
        &self,
        program: ProgramHandle,
        interface: ProgramInterface,
        index: u32,
        properties: &[ResourceProperty],
    ) -> Vec<i32>;

    /// Point a program's block at a binding point
    fn set_block_binding(
        &self,
        program: ProgramHandle,
        kind: BufferKind,
        block_index: u32,
        binding_point: u32,
    );

    // ===== BUFFERS =====

    /// Hardware maximum number of binding points for a buffer kind
    fn max_binding_points(&self, kind: BufferKind) -> u32;

    /// Allocate a zero-initialized buffer of `size` bytes
    fn create_buffer(&self, kind: BufferKind, size: usize) -> Result<BufferHandle>;

    /// Delete a buffer
    fn delete_buffer(&self, buffer: BufferHandle);

    /// Bind a buffer to an indexed binding point
    fn bind_buffer_base(&self, kind: BufferKind, binding_point: u32, buffer: BufferHandle);

    /// Upload bytes at a byte offset
    fn write_buffer(
        &self,
        kind: BufferKind,
        buffer: BufferHandle,
        offset: usize,
        data: &[u8],
    ) -> Result<()>;

    /// Read bytes back from a byte offset
    fn read_buffer(
        &self,
        kind: BufferKind,
        buffer: BufferHandle,
        offset: usize,
        data: &mut [u8],
    ) -> Result<()>;

    // ===== UNIFORMS & TEXTURES =====

    /// Set a default-block uniform of the current program
    fn set_uniform(&self, location: i32, value: &UniformValue);

    /// Bind a 2D texture to a texture unit
    fn bind_texture(&self, unit: u32, texture: TextureHandle);
}
