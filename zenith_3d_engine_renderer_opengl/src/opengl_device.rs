/// GlowDevice - OpenGL implementation of the GraphicsDevice trait

use std::ffi::c_void;
use std::num::NonZeroU32;

use glow::HasContext;
use zenith_3d_engine::zenith3d::{
    device::{
        BufferHandle, BufferKind, ProgramHandle, ProgramInterface, ResourceProperty,
        ShaderHandle, ShaderStage, TextureHandle, UniformValue,
    },
    Error, GraphicsDevice, Result,
};
use zenith_3d_engine::{engine_bail, engine_err, engine_error, engine_info, engine_warn};

use crate::program_interface::ProgramInterfaceQueries;

const SOURCE: &str = "zenith3d::opengl";

/// OpenGL device wrapping a current glow context
///
/// All calls must happen on the thread that owns the context.
pub struct GlowDevice {
    gl: glow::Context,
    queries: ProgramInterfaceQueries,
    max_uniform_bindings: u32,
    max_storage_bindings: u32,
}

impl GlowDevice {
    /// Load OpenGL through `loader` (typically the windowing library's
    /// `get_proc_address`)
    ///
    /// Fails with `InitializationFailed` when the context lacks the OpenGL 4.3
    /// program-interface queries or shader-storage binding points.
    ///
    /// # Safety
    ///
    /// The context must be current on this thread and `loader` must return
    /// null or a pointer to the named GL function.
    pub unsafe fn new<F>(mut loader: F) -> Result<Self>
    where
        F: FnMut(&str) -> *const c_void,
    {
        let queries = ProgramInterfaceQueries::load(&mut loader)?;
        let gl = glow::Context::from_loader_function(&mut loader);

        let version = gl.get_parameter_string(glow::VERSION);
        let renderer = gl.get_parameter_string(glow::RENDERER);
        let max_uniform_bindings = gl.get_parameter_i32(glow::MAX_UNIFORM_BUFFER_BINDINGS).max(0) as u32;
        let max_storage_bindings = gl.get_parameter_i32(glow::MAX_SHADER_STORAGE_BUFFER_BINDINGS).max(0) as u32;

        engine_info!(SOURCE, "OpenGL {} on {}", version, renderer);
        if max_storage_bindings == 0 {
            let message = format!("OpenGL {} exposes no shader-storage binding points", version);
            engine_error!(SOURCE, "{}", message);
            return Err(Error::InitializationFailed(message));
        }
        engine_info!(
            SOURCE,
            "Max binding points: {} uniform, {} storage",
            max_uniform_bindings, max_storage_bindings
        );

        Ok(Self { gl, queries, max_uniform_bindings, max_storage_bindings })
    }

    /// Underlying glow context
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    #[cfg(feature = "gl-debug-output")]
    pub(crate) fn gl_mut(&mut self) -> &mut glow::Context {
        &mut self.gl
    }
}

// ============================================================================
// Enum and handle conversion
// ============================================================================

pub(crate) fn stage_enum(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        ShaderStage::Geometry => glow::GEOMETRY_SHADER,
    }
}

pub(crate) fn buffer_target(kind: BufferKind) -> u32 {
    match kind {
        BufferKind::Uniform => glow::UNIFORM_BUFFER,
        BufferKind::Storage => glow::SHADER_STORAGE_BUFFER,
    }
}

pub(crate) fn interface_enum(interface: ProgramInterface) -> u32 {
    match interface {
        ProgramInterface::Uniform => glow::UNIFORM,
        ProgramInterface::UniformBlock => glow::UNIFORM_BLOCK,
        ProgramInterface::BufferVariable => glow::BUFFER_VARIABLE,
        ProgramInterface::ShaderStorageBlock => glow::SHADER_STORAGE_BLOCK,
    }
}

pub(crate) fn property_enum(property: ResourceProperty) -> u32 {
    match property {
        ResourceProperty::Type => glow::TYPE,
        ResourceProperty::Location => glow::LOCATION,
        ResourceProperty::BlockIndex => glow::BLOCK_INDEX,
        ResourceProperty::Offset => glow::OFFSET,
        ResourceProperty::ArraySize => glow::ARRAY_SIZE,
        ResourceProperty::ArrayStride => glow::ARRAY_STRIDE,
        ResourceProperty::MatrixStride => glow::MATRIX_STRIDE,
        ResourceProperty::IsRowMajor => glow::IS_ROW_MAJOR,
        ResourceProperty::TopLevelArraySize => glow::TOP_LEVEL_ARRAY_SIZE,
        ResourceProperty::TopLevelArrayStride => glow::TOP_LEVEL_ARRAY_STRIDE,
        ResourceProperty::BufferDataSize => glow::BUFFER_DATA_SIZE,
        ResourceProperty::NumActiveVariables => glow::NUM_ACTIVE_VARIABLES,
    }
}

/// Boolean vector as the 0/1 integers glUniform*iv expects
pub(crate) fn bool_ints<const N: usize>(flags: [bool; N]) -> [i32; N] {
    flags.map(i32::from)
}

pub(crate) fn native_shader(handle: ShaderHandle) -> Option<glow::NativeShader> {
    NonZeroU32::new(handle.0).map(glow::NativeShader)
}

pub(crate) fn native_program(handle: ProgramHandle) -> Option<glow::NativeProgram> {
    NonZeroU32::new(handle.0).map(glow::NativeProgram)
}

pub(crate) fn native_buffer(handle: BufferHandle) -> Option<glow::NativeBuffer> {
    NonZeroU32::new(handle.0).map(glow::NativeBuffer)
}

pub(crate) fn native_texture(handle: TextureHandle) -> Option<glow::NativeTexture> {
    NonZeroU32::new(handle.0).map(glow::NativeTexture)
}

// ============================================================================
// GraphicsDevice implementation
// ============================================================================

impl GraphicsDevice for GlowDevice {
    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<ShaderHandle> {
        unsafe {
            let shader = self
                .gl
                .create_shader(stage_enum(stage))
                .map_err(|e| engine_err!(SOURCE, "glCreateShader({:?}) failed: {}", stage, e))?;
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);

            if !self.gl.get_shader_compile_status(shader) {
                let log = self.gl.get_shader_info_log(shader);
                self.gl.delete_shader(shader);
                return Err(Error::CompileError { stage, log });
            }

            Ok(ShaderHandle(shader.0.get()))
        }
    }

    fn delete_shader(&self, shader: ShaderHandle) {
        if let Some(shader) = native_shader(shader) {
            unsafe { self.gl.delete_shader(shader) };
        }
    }

    fn link_program(&self, shaders: &[ShaderHandle]) -> Result<ProgramHandle> {
        let natives: Vec<glow::NativeShader> = shaders.iter().filter_map(|s| native_shader(*s)).collect();
        unsafe {
            let program = self
                .gl
                .create_program()
                .map_err(|e| engine_err!(SOURCE, "glCreateProgram failed: {}", e))?;

            for shader in &natives {
                self.gl.attach_shader(program, *shader);
            }
            self.gl.link_program(program);
            for shader in &natives {
                self.gl.detach_shader(program, *shader);
            }

            if !self.gl.get_program_link_status(program) {
                let log = self.gl.get_program_info_log(program);
                self.gl.delete_program(program);
                return Err(Error::LinkError(log));
            }

            Ok(ProgramHandle(program.0.get()))
        }
    }

    fn delete_program(&self, program: ProgramHandle) {
        if let Some(program) = native_program(program) {
            unsafe { self.gl.delete_program(program) };
        }
    }

    fn use_program(&self, program: Option<ProgramHandle>) {
        unsafe { self.gl.use_program(program.and_then(native_program)) };
    }

    fn program_resource_count(&self, program: ProgramHandle, interface: ProgramInterface) -> u32 {
        match native_program(program) {
            Some(_) => self.queries.active_resources(program.0, interface_enum(interface)),
            None => 0,
        }
    }

    fn program_resource_name(&self, program: ProgramHandle, interface: ProgramInterface, index: u32) -> String {
        let Some(native) = native_program(program) else {
            return String::new();
        };
        let interface = interface_enum(interface);
        let name_length = unsafe {
            self.gl
                .get_program_resource_i32(native, interface, index, &[glow::NAME_LENGTH])
        };
        match name_length.first() {
            Some(&length) => self.queries.resource_name(program.0, interface, index, length),
            None => String::new(),
        }
    }

    fn program_resource_properties(
        &self,
        program: ProgramHandle,
        interface: ProgramInterface,
        index: u32,
        properties: &[ResourceProperty],
    ) -> Vec<i32> {
        let Some(program) = native_program(program) else {
            return Vec::new();
        };
        let properties: Vec<u32> = properties.iter().map(|p| property_enum(*p)).collect();
        unsafe {
            self.gl
                .get_program_resource_i32(program, interface_enum(interface), index, &properties)
        }
    }

    fn set_block_binding(&self, program: ProgramHandle, kind: BufferKind, block_index: u32, binding_point: u32) {
        let Some(program) = native_program(program) else {
            engine_warn!(SOURCE, "Block binding requested for null program");
            return;
        };
        unsafe {
            match kind {
                BufferKind::Uniform => self.gl.uniform_block_binding(program, block_index, binding_point),
                BufferKind::Storage => self.gl.shader_storage_block_binding(program, block_index, binding_point),
            }
        }
    }

    fn max_binding_points(&self, kind: BufferKind) -> u32 {
        match kind {
            BufferKind::Uniform => self.max_uniform_bindings,
            BufferKind::Storage => self.max_storage_bindings,
        }
    }

    fn create_buffer(&self, kind: BufferKind, size: usize) -> Result<BufferHandle> {
        let target = buffer_target(kind);
        unsafe {
            let buffer = self
                .gl
                .create_buffer()
                .map_err(|e| engine_err!(SOURCE, "glCreateBuffer failed: {}", e))?;

            // Drain stale errors so the check below only sees this allocation
            while self.gl.get_error() != glow::NO_ERROR {}

            self.gl.bind_buffer(target, Some(buffer));
            self.gl.buffer_data_u8_slice(target, &vec![0u8; size], glow::DYNAMIC_DRAW);
            self.gl.bind_buffer(target, None);

            match self.gl.get_error() {
                glow::NO_ERROR => Ok(BufferHandle(buffer.0.get())),
                glow::OUT_OF_MEMORY => {
                    self.gl.delete_buffer(buffer);
                    Err(Error::OutOfMemory)
                }
                code => {
                    self.gl.delete_buffer(buffer);
                    Err(engine_err!(SOURCE, "glBufferData({} bytes) failed: 0x{:04X}", size, code))
                }
            }
        }
    }

    fn delete_buffer(&self, buffer: BufferHandle) {
        if let Some(buffer) = native_buffer(buffer) {
            unsafe { self.gl.delete_buffer(buffer) };
        }
    }

    fn bind_buffer_base(&self, kind: BufferKind, binding_point: u32, buffer: BufferHandle) {
        unsafe {
            self.gl
                .bind_buffer_base(buffer_target(kind), binding_point, native_buffer(buffer))
        };
    }

    fn write_buffer(&self, kind: BufferKind, buffer: BufferHandle, offset: usize, data: &[u8]) -> Result<()> {
        let Some(native) = native_buffer(buffer) else {
            engine_bail!(SOURCE, "Write to null buffer");
        };
        let target = buffer_target(kind);
        unsafe {
            self.gl.bind_buffer(target, Some(native));
            self.gl.buffer_sub_data_u8_slice(target, offset as i32, data);
            self.gl.bind_buffer(target, None);
        }
        Ok(())
    }

    fn read_buffer(&self, kind: BufferKind, buffer: BufferHandle, offset: usize, data: &mut [u8]) -> Result<()> {
        let Some(native) = native_buffer(buffer) else {
            engine_bail!(SOURCE, "Read from null buffer");
        };
        let target = buffer_target(kind);
        unsafe {
            self.gl.bind_buffer(target, Some(native));
            self.gl.get_buffer_sub_data(target, offset as i32, data);
            self.gl.bind_buffer(target, None);
        }
        Ok(())
    }

    fn set_uniform(&self, location: i32, value: &UniformValue) {
        // Location -1 is silently ignored, as glUniform* does
        if location < 0 {
            return;
        }
        let location = glow::NativeUniformLocation(location as u32);
        let loc = Some(&location);
        unsafe {
            match value {
                UniformValue::Bool(v) => self.gl.uniform_1_i32(loc, *v as i32),
                UniformValue::Int(v) => self.gl.uniform_1_i32(loc, *v),
                UniformValue::UInt(v) => self.gl.uniform_1_u32(loc, *v),
                UniformValue::Float(v) => self.gl.uniform_1_f32(loc, *v),
                UniformValue::IVec2(v) => self.gl.uniform_2_i32_slice(loc, &v.to_array()),
                UniformValue::IVec3(v) => self.gl.uniform_3_i32_slice(loc, &v.to_array()),
                UniformValue::IVec4(v) => self.gl.uniform_4_i32_slice(loc, &v.to_array()),
                UniformValue::UVec2(v) => self.gl.uniform_2_u32_slice(loc, &v.to_array()),
                UniformValue::UVec3(v) => self.gl.uniform_3_u32_slice(loc, &v.to_array()),
                UniformValue::UVec4(v) => self.gl.uniform_4_u32_slice(loc, &v.to_array()),
                UniformValue::BVec2(v) => self.gl.uniform_2_i32_slice(loc, &bool_ints([v.x, v.y])),
                UniformValue::BVec3(v) => self.gl.uniform_3_i32_slice(loc, &bool_ints([v.x, v.y, v.z])),
                UniformValue::BVec4(v) => self.gl.uniform_4_i32_slice(loc, &bool_ints([v.x, v.y, v.z, v.w])),
                UniformValue::Vec2(v) => self.gl.uniform_2_f32_slice(loc, &v.to_array()),
                UniformValue::Vec3(v) => self.gl.uniform_3_f32_slice(loc, &v.to_array()),
                UniformValue::Vec4(v) => self.gl.uniform_4_f32_slice(loc, &v.to_array()),
                UniformValue::Mat2(m) => self.gl.uniform_matrix_2_f32_slice(loc, false, &m.to_cols_array()),
                UniformValue::Mat3(m) => self.gl.uniform_matrix_3_f32_slice(loc, false, &m.to_cols_array()),
                UniformValue::Mat4(m) => self.gl.uniform_matrix_4_f32_slice(loc, false, &m.to_cols_array()),
            }
        }
    }

    fn bind_texture(&self, unit: u32, texture: TextureHandle) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, native_texture(texture));
        }
    }
}

#[cfg(test)]
#[path = "opengl_device_tests.rs"]
mod tests;
