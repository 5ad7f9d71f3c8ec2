/// Typed values written to uniforms and block variables

use glam::{BVec2, BVec3, BVec4, IVec2, IVec3, IVec4, Mat2, Mat3, Mat4, UVec2, UVec3, UVec4, Vec2, Vec3, Vec4};
use crate::graphics_device::ShaderDataType;

/// A scalar, vector or matrix value
///
/// Matrices are column-major, as in glam. `double` variables have no
/// value type: they are reflected but can only be read back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    UInt(u32),
    Float(f32),
    IVec2(IVec2),
    IVec3(IVec3),
    IVec4(IVec4),
    UVec2(UVec2),
    UVec3(UVec3),
    UVec4(UVec4),
    BVec2(BVec2),
    BVec3(BVec3),
    BVec4(BVec4),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat2(Mat2),
    Mat3(Mat3),
    Mat4(Mat4),
}

impl UniformValue {
    /// Shader type this value is written as
    pub fn data_type(&self) -> ShaderDataType {
        match self {
            UniformValue::Bool(_) => ShaderDataType::Bool,
            UniformValue::Int(_) => ShaderDataType::Int,
            UniformValue::UInt(_) => ShaderDataType::UInt,
            UniformValue::Float(_) => ShaderDataType::Float,
            UniformValue::IVec2(_) => ShaderDataType::IVec2,
            UniformValue::IVec3(_) => ShaderDataType::IVec3,
            UniformValue::IVec4(_) => ShaderDataType::IVec4,
            UniformValue::UVec2(_) => ShaderDataType::UVec2,
            UniformValue::UVec3(_) => ShaderDataType::UVec3,
            UniformValue::UVec4(_) => ShaderDataType::UVec4,
            UniformValue::BVec2(_) => ShaderDataType::BVec2,
            UniformValue::BVec3(_) => ShaderDataType::BVec3,
            UniformValue::BVec4(_) => ShaderDataType::BVec4,
            UniformValue::Vec2(_) => ShaderDataType::Vec2,
            UniformValue::Vec3(_) => ShaderDataType::Vec3,
            UniformValue::Vec4(_) => ShaderDataType::Vec4,
            UniformValue::Mat2(_) => ShaderDataType::Mat2,
            UniformValue::Mat3(_) => ShaderDataType::Mat3,
            UniformValue::Mat4(_) => ShaderDataType::Mat4,
        }
    }

    /// Whether the value can be written to a variable of type `target`
    ///
    /// Samplers accept an `Int` (the texture unit).
    pub fn is_compatible_with(&self, target: ShaderDataType) -> bool {
        match (self, target) {
            (UniformValue::Int(_), t) if t.is_sampler() => true,
            _ => self.data_type() == target,
        }
    }

    /// Tightly packed bytes (column-major for matrices, booleans as u32)
    pub fn packed_bytes(&self) -> Vec<u8> {
        match self {
            UniformValue::Bool(v) => (*v as u32).to_ne_bytes().to_vec(),
            UniformValue::Int(v) => v.to_ne_bytes().to_vec(),
            UniformValue::UInt(v) => v.to_ne_bytes().to_vec(),
            UniformValue::Float(v) => v.to_ne_bytes().to_vec(),
            UniformValue::IVec2(v) => bytemuck::cast_slice(&v.to_array()).to_vec(),
            UniformValue::IVec3(v) => bytemuck::cast_slice(&v.to_array()).to_vec(),
            UniformValue::IVec4(v) => bytemuck::cast_slice(&v.to_array()).to_vec(),
            UniformValue::UVec2(v) => bytemuck::cast_slice(&v.to_array()).to_vec(),
            UniformValue::UVec3(v) => bytemuck::cast_slice(&v.to_array()).to_vec(),
            UniformValue::UVec4(v) => bytemuck::cast_slice(&v.to_array()).to_vec(),
            UniformValue::BVec2(_) | UniformValue::BVec3(_) | UniformValue::BVec4(_) => {
                let flags = self.bool_components().unwrap_or_default();
                bytemuck::cast_slice(flags.as_slice()).to_vec()
            }
            UniformValue::Vec2(v) => bytemuck::cast_slice(&v.to_array()).to_vec(),
            UniformValue::Vec3(v) => bytemuck::cast_slice(&v.to_array()).to_vec(),
            UniformValue::Vec4(v) => bytemuck::cast_slice(&v.to_array()).to_vec(),
            UniformValue::Mat2(m) => bytemuck::cast_slice(&m.to_cols_array()).to_vec(),
            UniformValue::Mat3(m) => bytemuck::cast_slice(&m.to_cols_array()).to_vec(),
            UniformValue::Mat4(m) => bytemuck::cast_slice(&m.to_cols_array()).to_vec(),
        }
    }

    /// Boolean vector components as 0/1 integers, the way GL stores them
    ///
    /// Returns `None` for anything but `BVec2`, `BVec3` and `BVec4`.
    pub fn bool_components(&self) -> Option<Vec<u32>> {
        let flags: Vec<bool> = match self {
            UniformValue::BVec2(v) => vec![v.x, v.y],
            UniformValue::BVec3(v) => vec![v.x, v.y, v.z],
            UniformValue::BVec4(v) => vec![v.x, v.y, v.z, v.w],
            _ => return None,
        };
        Some(flags.into_iter().map(u32::from).collect())
    }

    /// Matrix as a list of major vectors (columns, or rows when `row_major`)
    ///
    /// Returns `None` for non-matrix values.
    pub fn matrix_vectors(&self, row_major: bool) -> Option<Vec<Vec<f32>>> {
        let vectors: Vec<Vec<f32>> = match self {
            UniformValue::Mat2(m) => {
                let m = if row_major { m.transpose() } else { *m };
                m.to_cols_array_2d().iter().map(|c| c.to_vec()).collect()
            }
            UniformValue::Mat3(m) => {
                let m = if row_major { m.transpose() } else { *m };
                m.to_cols_array_2d().iter().map(|c| c.to_vec()).collect()
            }
            UniformValue::Mat4(m) => {
                let m = if row_major { m.transpose() } else { *m };
                m.to_cols_array_2d().iter().map(|c| c.to_vec()).collect()
            }
            _ => return None,
        };
        Some(vectors)
    }
}

// ===== CONVERSIONS =====

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for UniformValue {
                fn from(value: $ty) -> Self {
                    UniformValue::$variant(value)
                }
            }
        )*
    };
}

impl_from_value! {
    bool => Bool,
    i32 => Int,
    u32 => UInt,
    f32 => Float,
    IVec2 => IVec2,
    IVec3 => IVec3,
    IVec4 => IVec4,
    UVec2 => UVec2,
    UVec3 => UVec3,
    UVec4 => UVec4,
    BVec2 => BVec2,
    BVec3 => BVec3,
    BVec4 => BVec4,
    Vec2 => Vec2,
    Vec3 => Vec3,
    Vec4 => Vec4,
    Mat2 => Mat2,
    Mat3 => Mat3,
    Mat4 => Mat4,
}

#[cfg(test)]
#[path = "uniform_value_tests.rs"]
mod tests;
