/// Light records as the shaders see them

use glam::Vec3;
use crate::graphics_device::UniformValue;

/// Light type with a storage-block representation
///
/// The block `BLOCK` holds a count variable `COUNT` followed by an array
/// `ARRAY` of structs whose members are named `FIELDS`, in the same order as
/// `field_values` returns them.
pub trait LightRecord {
    const BLOCK: &'static str;
    const COUNT: &'static str;
    const ARRAY: &'static str;
    const FIELDS: &'static [&'static str];

    fn field_values(&self) -> Vec<UniformValue>;
}

// ============================================================================
// Light types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl LightRecord for DirectionalLight {
    const BLOCK: &'static str = "DirectionalLightsBuffer";
    const COUNT: &'static str = "number_of_directional_lights";
    const ARRAY: &'static str = "directional_lights";
    const FIELDS: &'static [&'static str] = &["direction", "ambient", "diffuse", "specular"];

    fn field_values(&self) -> Vec<UniformValue> {
        vec![
            self.direction.into(),
            self.ambient.into(),
            self.diffuse.into(),
            self.specular.into(),
        ]
    }
}

/// Point light with constant/linear/quadratic attenuation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl LightRecord for PointLight {
    const BLOCK: &'static str = "PointLightsBuffer";
    const COUNT: &'static str = "number_of_point_lights";
    const ARRAY: &'static str = "point_lights";
    const FIELDS: &'static [&'static str] = &[
        "position", "constant", "linear", "quadratic", "ambient", "diffuse", "specular",
    ];

    fn field_values(&self) -> Vec<UniformValue> {
        vec![
            self.position.into(),
            self.constant.into(),
            self.linear.into(),
            self.quadratic.into(),
            self.ambient.into(),
            self.diffuse.into(),
            self.specular.into(),
        ]
    }
}

/// Spot light; `cutoff` and `outer_cutoff` are cosines of the cone half-angles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    pub position: Vec3,
    pub direction: Vec3,
    pub cutoff: f32,
    pub outer_cutoff: f32,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl LightRecord for SpotLight {
    const BLOCK: &'static str = "SpotLightsBuffer";
    const COUNT: &'static str = "number_of_spot_lights";
    const ARRAY: &'static str = "spot_lights";
    const FIELDS: &'static [&'static str] = &[
        "position", "direction", "cutoff", "outer_cutoff", "constant", "linear", "quadratic",
        "ambient", "diffuse", "specular",
    ];

    fn field_values(&self) -> Vec<UniformValue> {
        vec![
            self.position.into(),
            self.direction.into(),
            self.cutoff.into(),
            self.outer_cutoff.into(),
            self.constant.into(),
            self.linear.into(),
            self.quadratic.into(),
            self.ambient.into(),
            self.diffuse.into(),
            self.specular.into(),
        ]
    }
}

// ============================================================================
// Light sources
// ============================================================================

/// Scene query yielding the lights to upload, in upload order
pub trait LightSource {
    fn directional_lights(&self) -> Vec<DirectionalLight>;
    fn point_lights(&self) -> Vec<PointLight>;
    fn spot_lights(&self) -> Vec<SpotLight>;
}

/// Plain list of lights
#[derive(Debug, Clone, Default)]
pub struct LightSet {
    pub directional: Vec<DirectionalLight>,
    pub point: Vec<PointLight>,
    pub spot: Vec<SpotLight>,
}

impl LightSource for LightSet {
    fn directional_lights(&self) -> Vec<DirectionalLight> {
        self.directional.clone()
    }

    fn point_lights(&self) -> Vec<PointLight> {
        self.point.clone()
    }

    fn spot_lights(&self) -> Vec<SpotLight> {
        self.spot.clone()
    }
}
