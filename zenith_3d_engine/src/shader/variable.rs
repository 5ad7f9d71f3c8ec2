/// Reflected variable - one loose uniform or interface-block member

use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::graphics_device::{
    GraphicsDevice, ProgramHandle, ProgramInterface, ResourceProperty, ShaderDataType, UniformValue,
};

const SOURCE: &str = "zenith3d::ReflectedVariable";

/// Properties queried for the uniform interface (loose uniforms and uniform-block members)
const UNIFORM_PROPERTIES: [ResourceProperty; 8] = [
    ResourceProperty::Type,
    ResourceProperty::ArraySize,
    ResourceProperty::Offset,
    ResourceProperty::BlockIndex,
    ResourceProperty::ArrayStride,
    ResourceProperty::MatrixStride,
    ResourceProperty::IsRowMajor,
    ResourceProperty::Location,
];

/// Properties queried for shader-storage block members
const BUFFER_VARIABLE_PROPERTIES: [ResourceProperty; 9] = [
    ResourceProperty::Type,
    ResourceProperty::ArraySize,
    ResourceProperty::Offset,
    ResourceProperty::BlockIndex,
    ResourceProperty::ArrayStride,
    ResourceProperty::MatrixStride,
    ResourceProperty::IsRowMajor,
    ResourceProperty::TopLevelArraySize,
    ResourceProperty::TopLevelArrayStride,
];

/// Layout of one variable as reported by the driver
///
/// Negative values mean "not applicable": `offset`, `array_stride` and
/// `matrix_stride` are -1 for loose uniforms, `location` is -1 for block
/// members and `block_index` is -1 for loose uniforms.
#[derive(Debug, Clone, PartialEq)]
pub struct ReflectedVariable {
    /// Name as reported (array variables end in `[0]`)
    pub name: String,
    pub data_type: ShaderDataType,
    /// Byte offset inside the owning block
    pub offset: i32,
    /// Element count, 0 when the variable is not an array (or is unbounded)
    pub array_size: u32,
    pub array_stride: i32,
    pub matrix_stride: i32,
    pub is_row_major: bool,
    pub location: i32,
    pub block_index: i32,
    /// Storage members only: size of the outermost array (0 = unbounded, 1 = not an array)
    pub top_level_array_size: i32,
    pub top_level_array_stride: i32,
}

impl ReflectedVariable {
    /// Query one resource of `interface` (`Uniform` or `BufferVariable`)
    pub fn reflect(
        device: &dyn GraphicsDevice,
        program: ProgramHandle,
        interface: ProgramInterface,
        index: u32,
    ) -> Result<Self> {
        let properties: &[ResourceProperty] = match interface {
            ProgramInterface::Uniform => &UNIFORM_PROPERTIES,
            ProgramInterface::BufferVariable => &BUFFER_VARIABLE_PROPERTIES,
            other => {
                return Err(Engine::log_and_return_error(
                    SOURCE,
                    Error::InvariantViolation(format!("{:?} does not enumerate variables", other)),
                ));
            }
        };

        let values = device.program_resource_properties(program, interface, index, properties);
        if values.len() != properties.len() {
            return Err(Engine::log_and_return_error(
                SOURCE,
                Error::InvariantViolation(format!(
                    "{:?} resource {} of program {}: expected {} property values, got {}",
                    interface, index, program.0, properties.len(), values.len()
                )),
            ));
        }

        let name = device.program_resource_name(program, interface, index);
        if name.is_empty() {
            return Err(Engine::log_and_return_error(
                SOURCE,
                Error::InvariantViolation(format!(
                    "{:?} resource {} of program {} has no name",
                    interface, index, program.0
                )),
            ));
        }

        let array_size = if name.ends_with("[0]") { values[1].max(0) as u32 } else { 0 };
        let (location, top_level_array_size, top_level_array_stride) = match interface {
            ProgramInterface::BufferVariable => (-1, values[7], values[8]),
            _ => (values[7], 1, 0),
        };

        let variable = Self {
            name,
            data_type: ShaderDataType::from_gl_enum(values[0] as u32),
            offset: values[2],
            array_size,
            array_stride: values[4],
            matrix_stride: values[5],
            is_row_major: values[6] != 0,
            location,
            block_index: values[3],
            top_level_array_size,
            top_level_array_stride,
        };

        crate::engine_trace!(
            SOURCE,
            "'{}' {:?} offset {} array {}x{} matrix stride {} row major {}",
            variable.name,
            variable.data_type,
            variable.offset,
            variable.array_size,
            variable.array_stride,
            variable.matrix_stride,
            variable.is_row_major
        );

        Ok(variable)
    }

    // ===== NAMING =====

    /// Whether the variable is an array (name ends in `[0]`)
    pub fn is_array(&self) -> bool {
        self.name.ends_with("[0]")
    }

    /// Name without the trailing `[0]`
    pub fn base_name(&self) -> &str {
        self.name.strip_suffix("[0]").unwrap_or(&self.name)
    }

    /// Accept both `weights` and `weights[0]` for array variables
    pub fn matches_name(&self, name: &str) -> bool {
        self.name == name || self.base_name() == name
    }

    /// Default-block uniform (not backed by a buffer)
    pub fn is_loose(&self) -> bool {
        self.block_index < 0
    }

    /// Member of a storage block's trailing unbounded array
    pub fn is_unbounded(&self) -> bool {
        self.top_level_array_size == 0 || (self.is_array() && self.array_size == 0)
    }

    /// Same memory layout, ignoring where the variable sits in a particular program
    pub fn same_layout(&self, other: &ReflectedVariable) -> bool {
        self.name == other.name
            && self.data_type == other.data_type
            && self.offset == other.offset
            && self.array_size == other.array_size
            && self.array_stride == other.array_stride
            && self.matrix_stride == other.matrix_stride
            && self.is_row_major == other.is_row_major
            && self.top_level_array_size == other.top_level_array_size
            && self.top_level_array_stride == other.top_level_array_stride
    }

    // ===== LAYOUT =====

    /// Bytes written for one element by `encode`
    pub fn encoded_size(&self) -> usize {
        let columns = self.data_type.matrix_columns() as usize;
        if columns > 0 && self.matrix_stride > 0 {
            let major = self.data_type.components() as usize * 4;
            self.matrix_stride as usize * (columns - 1) + major
        } else {
            self.data_type.size_bytes() as usize
        }
    }

    /// Byte offset of one element
    ///
    /// Arrays use the array stride. Members of a storage block's top-level
    /// array of structs use the top-level stride. Anything else only has
    /// element 0.
    pub fn element_offset(&self, element: u32) -> Result<usize> {
        if self.offset < 0 {
            return Err(Error::InvalidResource(format!(
                "'{}' is not backed by a buffer",
                self.name
            )));
        }
        let base = self.offset as usize;
        if element == 0 {
            return Ok(base);
        }

        let (stride, count) = if self.is_array() && self.array_stride > 0 {
            (self.array_stride, self.array_size as i32)
        } else if self.top_level_array_stride > 0 {
            (self.top_level_array_stride, self.top_level_array_size)
        } else {
            return Err(Error::InvalidResource(format!(
                "'{}' is not an array (element {})",
                self.name, element
            )));
        };

        // A count of 0 is an unbounded array, checked against the buffer capacity instead
        if count > 0 && element as i32 >= count {
            return Err(Error::InvalidResource(format!(
                "element {} out of range for '{}' ({} elements)",
                element, self.name, count
            )));
        }

        Ok(base + stride as usize * element as usize)
    }

    /// End of the last fixed-size element, relative to the block start
    pub fn extent(&self) -> usize {
        let mut end = self.offset.max(0) as usize + self.encoded_size();
        if self.is_array() && self.array_size > 1 && self.array_stride > 0 {
            end += self.array_stride as usize * (self.array_size as usize - 1);
        }
        if self.top_level_array_size > 1 && self.top_level_array_stride > 0 {
            end += self.top_level_array_stride as usize * (self.top_level_array_size as usize - 1);
        }
        end
    }

    // ===== ENCODING =====

    /// Encode a value in this variable's memory layout
    ///
    /// Matrices honor the matrix stride and the row-major flag. Padding
    /// between columns is zero-filled.
    pub fn encode(&self, value: &UniformValue) -> Result<Vec<u8>> {
        if !value.is_compatible_with(self.data_type) {
            return Err(Error::InvalidResource(format!(
                "cannot write {:?} to '{}' of type {:?}",
                value.data_type(),
                self.name,
                self.data_type
            )));
        }

        match value.matrix_vectors(self.is_row_major) {
            Some(vectors) if self.matrix_stride > 0 => {
                let stride = self.matrix_stride as usize;
                let mut bytes = vec![0u8; self.encoded_size()];
                for (i, vector) in vectors.iter().enumerate() {
                    let raw: &[u8] = bytemuck::cast_slice(vector.as_slice());
                    let start = i * stride;
                    bytes[start..start + raw.len()].copy_from_slice(raw);
                }
                Ok(bytes)
            }
            Some(vectors) => {
                let flat: Vec<f32> = vectors.concat();
                Ok(bytemuck::cast_slice(flat.as_slice()).to_vec())
            }
            None => Ok(value.packed_bytes()),
        }
    }
}

#[cfg(test)]
#[path = "variable_tests.rs"]
mod tests;
