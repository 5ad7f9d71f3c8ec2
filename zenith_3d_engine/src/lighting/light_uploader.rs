/// Light uploader - packs light arrays into the reflected storage blocks
///
/// Offsets and strides are resolved once from the program's reflection;
/// each upload then costs one count write and one array write per block.

use std::marker::PhantomData;
use std::rc::Rc;

use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::graphics_device::{GraphicsDevice, ShaderDataType, TextureHandle, UniformValue};
use crate::lighting::{DirectionalLight, LightRecord, LightSource, PointLight, SpotLight};
use crate::shader::{BufferBacking, ReflectedVariable, RenderContext, ShaderProgram};

const SOURCE: &str = "zenith3d::LightUploader";

/// Sampler uniform pointed at the shadow-map texture unit
const SHADOW_MAP_UNIFORM: &str = "shadow_map";

// ============================================================================
// Per-block layout
// ============================================================================

/// Resolved layout of one light storage block
struct LightArrayLayout<L: LightRecord> {
    backing: Rc<BufferBacking>,
    count: ReflectedVariable,
    fields: Vec<ReflectedVariable>,
    array_start: usize,
    stride: usize,
    _record: PhantomData<L>,
}

impl<L: LightRecord> LightArrayLayout<L> {
    fn resolve(program: &ShaderProgram) -> Result<Self> {
        let backing = program.get_storage_backing(L::BLOCK).cloned().ok_or_else(|| {
            Engine::log_and_return_error(
                SOURCE,
                Error::InvalidResource(format!(
                    "shader '{}' has no storage block '{}'",
                    program.name(),
                    L::BLOCK
                )),
            )
        })?;

        let lookup = |name: &str| -> Result<ReflectedVariable> {
            backing.variable(name).cloned().ok_or_else(|| {
                Engine::log_and_return_error(
                    SOURCE,
                    Error::InvalidResource(format!("no variable '{}' in '{}'", name, L::BLOCK)),
                )
            })
        };

        let count = lookup(L::COUNT)?;
        let fields = L::FIELDS
            .iter()
            .map(|field| lookup(&format!("{}[0].{}", L::ARRAY, field)))
            .collect::<Result<Vec<_>>>()?;

        let stride = fields
            .iter()
            .map(|f| f.top_level_array_stride)
            .max()
            .unwrap_or(0);
        if stride <= 0 {
            return Err(Engine::log_and_return_error(
                SOURCE,
                Error::InvariantViolation(format!("'{}' in '{}' has no array stride", L::ARRAY, L::BLOCK)),
            ));
        }
        let array_start = fields.iter().map(|f| f.offset.max(0) as usize).min().unwrap_or(0);

        crate::engine_debug!(
            SOURCE,
            "'{}': count at {}, array at {} stride {}, room for {} lights",
            L::BLOCK, count.offset, array_start, stride,
            backing.capacity().saturating_sub(array_start) / stride as usize
        );

        Ok(Self {
            backing,
            count,
            fields,
            array_start,
            stride: stride as usize,
            _record: PhantomData,
        })
    }

    /// Number of lights the backing has room for
    fn capacity(&self) -> usize {
        self.backing.capacity().saturating_sub(self.array_start) / self.stride
    }

    /// Pack and upload; returns the number of lights written
    fn upload(&self, lights: &[L]) -> Result<usize> {
        let count = lights.len().min(self.capacity());
        if count < lights.len() {
            crate::engine_warn!(
                SOURCE,
                "'{}' holds {} lights, dropping {}",
                L::BLOCK, count, lights.len() - count
            );
        }

        let mut staging = vec![0u8; count * self.stride];
        for (i, light) in lights[..count].iter().enumerate() {
            for (field, value) in self.fields.iter().zip(light.field_values()) {
                let bytes = field
                    .encode(&value)
                    .map_err(|e| Engine::log_and_return_error(SOURCE, e))?;
                let start = i * self.stride + field.offset.max(0) as usize - self.array_start;
                let end = start + bytes.len();
                if end > staging.len() {
                    return Err(Engine::log_and_return_error(
                        SOURCE,
                        Error::InvariantViolation(format!(
                            "'{}' overflows the {} byte stride of '{}'",
                            field.name, self.stride, L::BLOCK
                        )),
                    ));
                }
                staging[start..end].copy_from_slice(&bytes);
            }
        }

        let count_value = match self.count.data_type {
            ShaderDataType::Int => UniformValue::Int(count as i32),
            _ => UniformValue::UInt(count as u32),
        };
        let count_bytes = self
            .count
            .encode(&count_value)
            .map_err(|e| Engine::log_and_return_error(SOURCE, e))?;
        self.backing.write(self.count.offset.max(0) as usize, &count_bytes)?;
        if !staging.is_empty() {
            self.backing.write(self.array_start, &staging)?;
        }

        Ok(count)
    }
}

// ============================================================================
// Uploader
// ============================================================================

/// Number of lights written by one upload, per block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LightUploadStats {
    pub directional: usize,
    pub point: usize,
    pub spot: usize,
}

/// Uploads scene lights into the directional, point and spot light blocks
pub struct LightUploader {
    device: Rc<dyn GraphicsDevice>,
    directional: LightArrayLayout<DirectionalLight>,
    point: LightArrayLayout<PointLight>,
    spot: LightArrayLayout<SpotLight>,
    shadow_map_unit: u32,
}

impl LightUploader {
    /// Resolve the light blocks of `program`
    ///
    /// The blocks are shared, so the uploader serves every program that
    /// declares them. If `program` has a `shadow_map` sampler it is pointed
    /// at the configured texture unit (this binds `program`).
    pub fn new(context: &RenderContext, program: &ShaderProgram) -> Result<Self> {
        let shadow_map_unit = context.config().shadow_map_texture_unit;
        let uploader = Self {
            device: context.device_rc().clone(),
            directional: LightArrayLayout::resolve(program)?,
            point: LightArrayLayout::resolve(program)?,
            spot: LightArrayLayout::resolve(program)?,
            shadow_map_unit,
        };

        if program.uniform(SHADOW_MAP_UNIFORM).is_some() {
            program.bind();
            program.set_uniform_by_name(SHADOW_MAP_UNIFORM, shadow_map_unit as i32)?;
        }

        crate::engine_info!(
            SOURCE,
            "Light uploader ready for shader '{}' (room for {} directional, {} point, {} spot lights)",
            program.name(),
            uploader.directional.capacity(),
            uploader.point.capacity(),
            uploader.spot.capacity()
        );

        Ok(uploader)
    }

    /// Upload every light of `lights` and bind the shadow map
    ///
    /// Only needs to run once per frame, or when a light changes.
    pub fn upload(&self, lights: &dyn LightSource, shadow_map: Option<TextureHandle>) -> Result<LightUploadStats> {
        let stats = LightUploadStats {
            directional: self.directional.upload(&lights.directional_lights())?,
            point: self.point.upload(&lights.point_lights())?,
            spot: self.spot.upload(&lights.spot_lights())?,
        };

        if let Some(texture) = shadow_map {
            self.device.bind_texture(self.shadow_map_unit, texture);
        }

        crate::engine_trace!(
            SOURCE,
            "Uploaded {} directional, {} point, {} spot lights",
            stats.directional, stats.point, stats.spot
        );

        Ok(stats)
    }

    /// Maximum lights per block (directional, point, spot)
    pub fn capacities(&self) -> LightUploadStats {
        LightUploadStats {
            directional: self.directional.capacity(),
            point: self.point.capacity(),
            spot: self.spot.capacity(),
        }
    }

    pub fn shadow_map_unit(&self) -> u32 {
        self.shadow_map_unit
    }
}

#[cfg(test)]
#[path = "light_uploader_tests.rs"]
mod tests;
