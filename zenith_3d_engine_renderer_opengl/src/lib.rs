/*!
# Zenith 3D Engine - OpenGL Renderer Backend

OpenGL 4.3+ implementation of the zenith_3d_engine `GraphicsDevice` trait.

This crate drives the driver through `glow`: stage compilation, program
linking, program-interface queries (`glGetProgramInterfaceiv`,
`glGetProgramResourceName`, `glGetProgramResourceiv`), block bindings and
buffer storage for uniform and shader-storage blocks.

Enable the `gl-debug-output` feature to route `KHR_debug` messages into the
engine logger.
*/

mod opengl_device;
mod program_interface;
#[cfg(feature = "gl-debug-output")]
mod debug;

pub use opengl_device::GlowDevice;

// Re-export debug utilities
#[cfg(feature = "gl-debug-output")]
pub use debug::{install_debug_output, get_debug_message_stats, print_debug_message_report, DebugMessageStats};
