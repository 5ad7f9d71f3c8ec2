/// Shader module - programs, reflection and block buffer backings

pub mod binding_point_pool;
pub mod variable;
pub mod buffer_backing;
pub mod backing_registry;
pub mod interface_block;
pub mod shader_source;
pub mod vertex_attribute;
pub mod render_context;
pub mod program;

pub use binding_point_pool::*;
pub use variable::*;
pub use buffer_backing::*;
pub use backing_registry::*;
pub use interface_block::*;
pub use shader_source::*;
pub use vertex_attribute::*;
pub use render_context::*;
pub use program::*;

// Shared fixtures for program-level tests
#[cfg(test)]
pub(crate) mod test_support;
