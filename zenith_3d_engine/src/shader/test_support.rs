//! Fixtures shared by shader and lighting tests

use std::rc::Rc;

use crate::config::Config;
use crate::graphics_device::mock_graphics_device::{
    MockBlock, MockGraphicsDevice, MockProgramLayout, MockUniform, MockVariable,
};
use crate::graphics_device::{GraphicsDevice, ShaderDataType, ShaderStage};
use crate::shader::{MemoryShaderSource, RenderContext};

/// Vertex source declaring position and normal; `tag` selects the mock layout
pub fn vertex_source(tag: &str) -> String {
    format!(
        "#version 430 core\n// {}\nlayout(location = 0) in vec3 VertexPosition;\nlayout(location = 1) in vec3 VertexNormal;\nvoid main() {{}}\n",
        tag
    )
}

pub const FRAGMENT_SOURCE: &str = "#version 430 core\nout vec4 colour;\nvoid main() { colour = vec4(1.0); }\n";

/// `Light { vec3 pos; float intensity; }` storage block
pub fn light_block() -> MockBlock {
    MockBlock::new("Light", 16)
        .variable(MockVariable::new("pos", ShaderDataType::Vec3, 0))
        .variable(MockVariable::new("intensity", ShaderDataType::Float, 12))
}

/// std140 camera block
pub fn camera_block() -> MockBlock {
    MockBlock::new("Camera", 80)
        .variable(MockVariable::new("view_proj", ShaderDataType::Mat4, 0).matrix_stride(16))
        .variable(MockVariable::new("eye", ShaderDataType::Vec3, 64))
}

pub fn standard_layout() -> MockProgramLayout {
    MockProgramLayout::new()
        .uniform(MockUniform::new("model", ShaderDataType::Mat4, 0))
        .uniform(MockUniform::new("tint", ShaderDataType::Vec4, 4))
        .uniform(MockUniform::new("shadow_map", ShaderDataType::Sampler2DShadow, 5))
        .uniform_block(camera_block())
        .storage_block(light_block())
}

/// Mock device plus a context reading from `sources`
pub fn context_with(
    sources: MemoryShaderSource,
    config: Config,
) -> (Rc<MockGraphicsDevice>, RenderContext) {
    let device = Rc::new(MockGraphicsDevice::new(8, 8));
    let dyn_device: Rc<dyn GraphicsDevice> = device.clone();
    let context = RenderContext::new(dyn_device, config, Box::new(sources));
    (device, context)
}

/// Memory sources with vertex + fragment stages for each name (tagged by name)
pub fn sources_for(names: &[&str]) -> MemoryShaderSource {
    let mut sources = MemoryShaderSource::new();
    for name in names {
        sources.insert(name, ShaderStage::Vertex, &vertex_source(name));
        sources.insert(name, ShaderStage::Fragment, FRAGMENT_SOURCE);
    }
    sources
}
