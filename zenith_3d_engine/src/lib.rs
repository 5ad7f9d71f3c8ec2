/*!
# Zenith 3D Engine

Core types for the Zenith 3D engine's OpenGL resource layer.

At link time every shader program is introspected: loose uniforms, uniform
blocks and shader-storage blocks are discovered, and each block is backed by
a pooled GPU buffer that programs declaring the same block share.

## Architecture

- **GraphicsDevice**: Driver boundary (compile, link, reflect, buffers)
- **RenderContext**: Owns the device, binding-point pools and backing registries
- **ShaderProgram**: Compiled program plus its reflected interface
- **InterfaceBlock**: One reflected uniform or storage block
- **BufferBacking**: GPU buffer bound to one binding point
- **LightUploader**: Packs light arrays into reflected storage blocks

Backend implementations (OpenGL via glow) provide the concrete device.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod config;
pub mod graphics_device;
pub mod shader;
pub mod lighting;

// Main zenith3d namespace module
pub mod zenith3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging facade
    pub use crate::engine::Engine;

    // Configuration
    pub use crate::config::Config;

    // Driver boundary and shader context
    pub use crate::graphics_device::GraphicsDevice;
    pub use crate::shader::RenderContext;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Device sub-module (handles, reflection enums, uniform values)
    pub mod device {
        pub use crate::graphics_device::*;
    }

    // Shader sub-module
    pub mod shader {
        pub use crate::shader::*;
    }

    // Lighting sub-module
    pub mod lighting {
        pub use crate::lighting::*;
    }
}

// Re-export math library at crate root
pub use glam;
