/// Opaque GPU object handles
///
/// Handles are plain names handed out by the device. Ownership (and the
/// matching delete call) lives in the RAII type that wraps them:
/// `ShaderProgram` for programs, `BufferBacking` for buffers.

/// Linked program object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramHandle(pub u32);

/// Compiled stage shader object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderHandle(pub u32);

/// Buffer object (UBO or SSBO storage)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferHandle(pub u32);

/// Texture object owned by the caller (e.g. a shadow map)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub u32);
