/// Shader source lookup
///
/// Programs are named logically (`"phong"`); a provider turns a name and a
/// stage into source text. The directory provider reads
/// `<dir>/<name>.vert`, `<dir>/<name>.frag` and `<dir>/<name>.geom`.

use std::path::{Path, PathBuf};
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::graphics_device::ShaderStage;

/// Source text lookup by logical shader name and stage
pub trait ShaderSourceProvider {
    /// Source of one stage, `None` when the stage does not exist
    fn stage_source(&self, name: &str, stage: ShaderStage) -> Result<Option<String>>;
}

// ============================================================================
// Directory provider
// ============================================================================

/// Reads stage sources from files next to each other in one directory
#[derive(Debug, Clone)]
pub struct DirectoryShaderSource {
    directory: PathBuf,
}

impl DirectoryShaderSource {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self { directory: directory.into() }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of a stage file (the stage extension replaces any extension on `name`)
    pub fn stage_path(&self, name: &str, stage: ShaderStage) -> PathBuf {
        let mut path = self.directory.join(name);
        path.set_extension(stage.extension());
        path
    }
}

impl ShaderSourceProvider for DirectoryShaderSource {
    fn stage_source(&self, name: &str, stage: ShaderStage) -> Result<Option<String>> {
        let path = self.stage_path(name, stage);
        if !path.is_file() {
            return Ok(None);
        }
        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| Error::InvalidResource(format!("cannot read '{}': {}", path.display(), e)))
    }
}

// ============================================================================
// In-memory provider
// ============================================================================

/// Sources held in memory (embedded shaders, tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryShaderSource {
    sources: FxHashMap<(String, ShaderStage), String>,
}

impl MemoryShaderSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the source of one stage
    pub fn insert(&mut self, name: &str, stage: ShaderStage, source: &str) -> &mut Self {
        self.sources.insert((name.to_string(), stage), source.to_string());
        self
    }

    /// Builder form of `insert`
    pub fn with(mut self, name: &str, stage: ShaderStage, source: &str) -> Self {
        self.insert(name, stage, source);
        self
    }
}

impl ShaderSourceProvider for MemoryShaderSource {
    fn stage_source(&self, name: &str, stage: ShaderStage) -> Result<Option<String>> {
        Ok(self.sources.get(&(name.to_string(), stage)).cloned())
    }
}

#[cfg(test)]
#[path = "shader_source_tests.rs"]
mod tests;
