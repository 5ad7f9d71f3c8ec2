//! Unit tests for render_context.rs

use std::path::PathBuf;
use std::rc::Rc;

use crate::config::Config;
use crate::graphics_device::mock_graphics_device::MockGraphicsDevice;
use crate::graphics_device::{BufferKind, GraphicsDevice, ShaderStage};
use crate::shader::{MemoryShaderSource, RenderContext, ShaderSourceProvider};

fn device(uniform: u32, storage: u32) -> Rc<dyn GraphicsDevice> {
    Rc::new(MockGraphicsDevice::new(uniform, storage))
}

#[test]
fn test_pools_use_hardware_maximums() {
    let context = RenderContext::new(device(12, 24), Config::default(), Box::new(MemoryShaderSource::new()));

    assert_eq!(context.backings(BufferKind::Uniform).pool().borrow().capacity(), 12);
    assert_eq!(context.backings(BufferKind::Storage).pool().borrow().capacity(), 24);
    assert_eq!(context.backings(BufferKind::Uniform).kind(), BufferKind::Uniform);
    assert_eq!(context.backings(BufferKind::Storage).kind(), BufferKind::Storage);
}

#[test]
fn test_config_caps_are_clamped() {
    let config = Config {
        max_uniform_binding_points: Some(4),
        max_storage_binding_points: Some(100),
        ..Config::default()
    };
    let context = RenderContext::new(device(12, 24), config, Box::new(MemoryShaderSource::new()));

    assert_eq!(context.backings(BufferKind::Uniform).pool().borrow().capacity(), 4);
    assert_eq!(context.backings(BufferKind::Storage).pool().borrow().capacity(), 24);
}

#[test]
fn test_sources_are_reachable() {
    let sources = MemoryShaderSource::new().with("quad", ShaderStage::Vertex, "v");
    let context = RenderContext::new(device(1, 1), Config::default(), Box::new(sources));

    assert_eq!(
        context.sources().stage_source("quad", ShaderStage::Vertex).unwrap(),
        Some("v".to_string())
    );
}

#[test]
fn test_with_shader_directory() {
    let config = Config { shader_directory: PathBuf::from("/no/such/shaders"), ..Config::default() };
    let context = RenderContext::with_shader_directory(device(1, 1), config);

    assert_eq!(context.config().shader_directory, PathBuf::from("/no/such/shaders"));
    assert_eq!(context.sources().stage_source("phong", ShaderStage::Vertex).unwrap(), None);
}
