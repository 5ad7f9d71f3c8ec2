/// Engine configuration for the shader/buffer layer

use std::path::PathBuf;

/// Configuration consumed by `RenderContext`
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding `<name>.vert`, `<name>.frag` and optional `<name>.geom`
    pub shader_directory: PathBuf,

    /// Upper bound on uniform-buffer binding points (clamped to the hardware maximum)
    pub max_uniform_binding_points: Option<u32>,

    /// Upper bound on storage-buffer binding points (clamped to the hardware maximum)
    pub max_storage_binding_points: Option<u32>,

    /// Elements reserved behind a storage block's trailing unbounded array
    pub unbounded_array_capacity: u32,

    /// Texture unit the light uploader binds the shadow map to
    pub shadow_map_texture_unit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shader_directory: PathBuf::from("shaders"),
            max_uniform_binding_points: None,
            max_storage_binding_points: None,
            unbounded_array_capacity: 64,
            shadow_map_texture_unit: 0,
        }
    }
}

impl Config {
    /// Clamp an optional cap against the hardware-reported maximum
    pub(crate) fn clamp_binding_points(cap: Option<u32>, hardware: u32) -> u32 {
        match cap {
            Some(cap) => cap.min(hardware),
            None => hardware,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
