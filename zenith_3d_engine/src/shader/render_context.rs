/// Render context - the explicit owner of shared GPU bookkeeping
///
/// Holds the device, one binding-point pool and backing registry per buffer
/// kind, the configuration and the shader source provider. It is passed to
/// every `ShaderProgram` constructor.

use std::rc::Rc;

use crate::config::Config;
use crate::graphics_device::{BufferKind, GraphicsDevice};
use crate::shader::{BackingRegistry, BindingPointPool, DirectoryShaderSource, ShaderSourceProvider};

const SOURCE: &str = "zenith3d::RenderContext";

pub struct RenderContext {
    device: Rc<dyn GraphicsDevice>,
    config: Config,
    sources: Box<dyn ShaderSourceProvider>,
    uniform_backings: BackingRegistry,
    storage_backings: BackingRegistry,
}

impl RenderContext {
    /// Create a context
    ///
    /// Pool capacities are the hardware maximums, capped by the configuration.
    pub fn new(
        device: Rc<dyn GraphicsDevice>,
        config: Config,
        sources: Box<dyn ShaderSourceProvider>,
    ) -> Self {
        let uniform_points = Config::clamp_binding_points(
            config.max_uniform_binding_points,
            device.max_binding_points(BufferKind::Uniform),
        );
        let storage_points = Config::clamp_binding_points(
            config.max_storage_binding_points,
            device.max_binding_points(BufferKind::Storage),
        );

        crate::engine_info!(
            SOURCE,
            "Binding points available: {} uniform, {} storage",
            uniform_points, storage_points
        );

        Self {
            uniform_backings: BackingRegistry::new(
                device.clone(),
                BindingPointPool::new(BufferKind::Uniform, uniform_points),
            ),
            storage_backings: BackingRegistry::new(
                device.clone(),
                BindingPointPool::new(BufferKind::Storage, storage_points),
            ),
            device,
            config,
            sources,
        }
    }

    /// Create a context reading sources from `config.shader_directory`
    pub fn with_shader_directory(device: Rc<dyn GraphicsDevice>, config: Config) -> Self {
        let sources = DirectoryShaderSource::new(config.shader_directory.clone());
        Self::new(device, config, Box::new(sources))
    }

    pub fn device(&self) -> &dyn GraphicsDevice {
        self.device.as_ref()
    }

    pub(crate) fn device_rc(&self) -> &Rc<dyn GraphicsDevice> {
        &self.device
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sources(&self) -> &dyn ShaderSourceProvider {
        self.sources.as_ref()
    }

    /// Registry (and pool) for a buffer kind
    pub fn backings(&self, kind: BufferKind) -> &BackingRegistry {
        match kind {
            BufferKind::Uniform => &self.uniform_backings,
            BufferKind::Storage => &self.storage_backings,
        }
    }
}

#[cfg(test)]
#[path = "render_context_tests.rs"]
mod tests;
