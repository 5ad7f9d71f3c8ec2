/// Reflection and pipeline-stage types shared by the core and the backends

// ============================================================================
// Shader stages
// ============================================================================

/// Programmable pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Geometry,
}

impl ShaderStage {
    /// File extension of the stage source (`<name>.<ext>`)
    pub fn extension(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vert",
            ShaderStage::Fragment => "frag",
            ShaderStage::Geometry => "geom",
        }
    }
}

// ============================================================================
// Buffer kinds and program interfaces
// ============================================================================

/// Kind of interface-block buffer
///
/// Each kind has its own binding-point namespace, pool and registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    /// Uniform buffer object (std140 blocks)
    Uniform,
    /// Shader storage buffer object (std430 blocks)
    Storage,
}

impl BufferKind {
    /// Program interface enumerating the blocks of this kind
    pub fn block_interface(self) -> ProgramInterface {
        match self {
            BufferKind::Uniform => ProgramInterface::UniformBlock,
            BufferKind::Storage => ProgramInterface::ShaderStorageBlock,
        }
    }

    /// Program interface enumerating the members of blocks of this kind
    pub fn variable_interface(self) -> ProgramInterface {
        match self {
            BufferKind::Uniform => ProgramInterface::Uniform,
            BufferKind::Storage => ProgramInterface::BufferVariable,
        }
    }
}

/// Program interface that can be enumerated through resource queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgramInterface {
    /// Default-block uniforms and uniform-block members
    Uniform,
    UniformBlock,
    /// Shader-storage block members
    BufferVariable,
    ShaderStorageBlock,
}

/// Property of a program resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceProperty {
    Type,
    Location,
    BlockIndex,
    Offset,
    ArraySize,
    ArrayStride,
    MatrixStride,
    IsRowMajor,
    TopLevelArraySize,
    TopLevelArrayStride,
    BufferDataSize,
    NumActiveVariables,
}

// ============================================================================
// Shader data types
// ============================================================================

/// Basic type of a reflected variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderDataType {
    Bool,
    BVec2,
    BVec3,
    BVec4,
    Int,
    IVec2,
    IVec3,
    IVec4,
    UInt,
    UVec2,
    UVec3,
    UVec4,
    Float,
    Vec2,
    Vec3,
    Vec4,
    Double,
    Mat2,
    Mat3,
    Mat4,
    Sampler2D,
    SamplerCube,
    Sampler2DShadow,
    /// Type enum not understood by the engine (kept for diagnostics)
    Other(u32),
}

// GL type enums (from the OpenGL registry)
const GL_INT: u32 = 0x1404;
const GL_UNSIGNED_INT: u32 = 0x1405;
const GL_FLOAT: u32 = 0x1406;
const GL_DOUBLE: u32 = 0x140A;
const GL_FLOAT_VEC2: u32 = 0x8B50;
const GL_FLOAT_VEC3: u32 = 0x8B51;
const GL_FLOAT_VEC4: u32 = 0x8B52;
const GL_INT_VEC2: u32 = 0x8B53;
const GL_INT_VEC3: u32 = 0x8B54;
const GL_INT_VEC4: u32 = 0x8B55;
const GL_BOOL: u32 = 0x8B56;
const GL_BOOL_VEC2: u32 = 0x8B57;
const GL_BOOL_VEC3: u32 = 0x8B58;
const GL_BOOL_VEC4: u32 = 0x8B59;
const GL_FLOAT_MAT2: u32 = 0x8B5A;
const GL_FLOAT_MAT3: u32 = 0x8B5B;
const GL_FLOAT_MAT4: u32 = 0x8B5C;
const GL_SAMPLER_2D: u32 = 0x8B5E;
const GL_SAMPLER_CUBE: u32 = 0x8B60;
const GL_SAMPLER_2D_SHADOW: u32 = 0x8B62;
const GL_UNSIGNED_INT_VEC2: u32 = 0x8DC6;
const GL_UNSIGNED_INT_VEC3: u32 = 0x8DC7;
const GL_UNSIGNED_INT_VEC4: u32 = 0x8DC8;

impl ShaderDataType {
    /// Map a GL type enum (as returned by the `TYPE` property)
    pub fn from_gl_enum(value: u32) -> Self {
        match value {
            GL_BOOL => ShaderDataType::Bool,
            GL_BOOL_VEC2 => ShaderDataType::BVec2,
            GL_BOOL_VEC3 => ShaderDataType::BVec3,
            GL_BOOL_VEC4 => ShaderDataType::BVec4,
            GL_INT => ShaderDataType::Int,
            GL_INT_VEC2 => ShaderDataType::IVec2,
            GL_INT_VEC3 => ShaderDataType::IVec3,
            GL_INT_VEC4 => ShaderDataType::IVec4,
            GL_UNSIGNED_INT => ShaderDataType::UInt,
            GL_UNSIGNED_INT_VEC2 => ShaderDataType::UVec2,
            GL_UNSIGNED_INT_VEC3 => ShaderDataType::UVec3,
            GL_UNSIGNED_INT_VEC4 => ShaderDataType::UVec4,
            GL_FLOAT => ShaderDataType::Float,
            GL_FLOAT_VEC2 => ShaderDataType::Vec2,
            GL_FLOAT_VEC3 => ShaderDataType::Vec3,
            GL_FLOAT_VEC4 => ShaderDataType::Vec4,
            GL_DOUBLE => ShaderDataType::Double,
            GL_FLOAT_MAT2 => ShaderDataType::Mat2,
            GL_FLOAT_MAT3 => ShaderDataType::Mat3,
            GL_FLOAT_MAT4 => ShaderDataType::Mat4,
            GL_SAMPLER_2D => ShaderDataType::Sampler2D,
            GL_SAMPLER_CUBE => ShaderDataType::SamplerCube,
            GL_SAMPLER_2D_SHADOW => ShaderDataType::Sampler2DShadow,
            other => ShaderDataType::Other(other),
        }
    }

    /// GL type enum for this type
    pub fn gl_enum(self) -> u32 {
        match self {
            ShaderDataType::Bool => GL_BOOL,
            ShaderDataType::BVec2 => GL_BOOL_VEC2,
            ShaderDataType::BVec3 => GL_BOOL_VEC3,
            ShaderDataType::BVec4 => GL_BOOL_VEC4,
            ShaderDataType::Int => GL_INT,
            ShaderDataType::IVec2 => GL_INT_VEC2,
            ShaderDataType::IVec3 => GL_INT_VEC3,
            ShaderDataType::IVec4 => GL_INT_VEC4,
            ShaderDataType::UInt => GL_UNSIGNED_INT,
            ShaderDataType::UVec2 => GL_UNSIGNED_INT_VEC2,
            ShaderDataType::UVec3 => GL_UNSIGNED_INT_VEC3,
            ShaderDataType::UVec4 => GL_UNSIGNED_INT_VEC4,
            ShaderDataType::Float => GL_FLOAT,
            ShaderDataType::Vec2 => GL_FLOAT_VEC2,
            ShaderDataType::Vec3 => GL_FLOAT_VEC3,
            ShaderDataType::Vec4 => GL_FLOAT_VEC4,
            ShaderDataType::Double => GL_DOUBLE,
            ShaderDataType::Mat2 => GL_FLOAT_MAT2,
            ShaderDataType::Mat3 => GL_FLOAT_MAT3,
            ShaderDataType::Mat4 => GL_FLOAT_MAT4,
            ShaderDataType::Sampler2D => GL_SAMPLER_2D,
            ShaderDataType::SamplerCube => GL_SAMPLER_CUBE,
            ShaderDataType::Sampler2DShadow => GL_SAMPLER_2D_SHADOW,
            ShaderDataType::Other(value) => value,
        }
    }

    /// Number of scalar components per column (1 for scalars)
    pub fn components(self) -> u32 {
        match self {
            ShaderDataType::BVec2 | ShaderDataType::IVec2 | ShaderDataType::UVec2
            | ShaderDataType::Vec2 | ShaderDataType::Mat2 => 2,
            ShaderDataType::BVec3 | ShaderDataType::IVec3 | ShaderDataType::UVec3
            | ShaderDataType::Vec3 | ShaderDataType::Mat3 => 3,
            ShaderDataType::BVec4 | ShaderDataType::IVec4 | ShaderDataType::UVec4
            | ShaderDataType::Vec4 | ShaderDataType::Mat4 => 4,
            ShaderDataType::Other(_) => 0,
            _ => 1,
        }
    }

    /// Number of matrix columns (0 for non-matrix types)
    pub fn matrix_columns(self) -> u32 {
        match self {
            ShaderDataType::Mat2 => 2,
            ShaderDataType::Mat3 => 3,
            ShaderDataType::Mat4 => 4,
            _ => 0,
        }
    }

    /// Whether the type is a float matrix
    pub fn is_matrix(self) -> bool {
        self.matrix_columns() > 0
    }

    /// Whether the type is an opaque sampler (set through a texture unit)
    pub fn is_sampler(self) -> bool {
        matches!(
            self,
            ShaderDataType::Sampler2D | ShaderDataType::SamplerCube | ShaderDataType::Sampler2DShadow
        )
    }

    /// Whether the type is a boolean scalar or vector
    pub fn is_bool(self) -> bool {
        matches!(
            self,
            ShaderDataType::Bool | ShaderDataType::BVec2 | ShaderDataType::BVec3 | ShaderDataType::BVec4
        )
    }

    /// Tightly packed size in bytes (booleans occupy 4 bytes on the GPU)
    pub fn size_bytes(self) -> u32 {
        match self {
            ShaderDataType::Double => 8,
            ShaderDataType::Other(_) => 0,
            ShaderDataType::Mat2 | ShaderDataType::Mat3 | ShaderDataType::Mat4 => {
                self.matrix_columns() * self.components() * 4
            }
            _ => self.components() * 4,
        }
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
