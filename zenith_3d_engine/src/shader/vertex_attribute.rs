/// Per-vertex attributes recognized in vertex-stage sources

use bitflags::bitflags;
use crate::graphics_device::ShaderDataType;

/// Vertex attribute with a fixed identifier and location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttribute {
    Position3D,
    Normal3D,
    ColourRGBA,
    TextureCoordinate2D,
}

impl VertexAttribute {
    pub const ALL: [VertexAttribute; 4] = [
        VertexAttribute::Position3D,
        VertexAttribute::Normal3D,
        VertexAttribute::ColourRGBA,
        VertexAttribute::TextureCoordinate2D,
    ];

    /// Identifier the vertex stage declares the attribute as
    pub fn identifier(self) -> &'static str {
        match self {
            VertexAttribute::Position3D => "VertexPosition",
            VertexAttribute::Normal3D => "VertexNormal",
            VertexAttribute::ColourRGBA => "VertexColour",
            VertexAttribute::TextureCoordinate2D => "VertexTexCoord",
        }
    }

    /// Attribute location (`layout(location = N)`)
    pub fn location(self) -> u32 {
        match self {
            VertexAttribute::Position3D => 0,
            VertexAttribute::Normal3D => 1,
            VertexAttribute::ColourRGBA => 2,
            VertexAttribute::TextureCoordinate2D => 3,
        }
    }

    pub fn data_type(self) -> ShaderDataType {
        match self {
            VertexAttribute::Position3D | VertexAttribute::Normal3D => ShaderDataType::Vec3,
            VertexAttribute::ColourRGBA => ShaderDataType::Vec4,
            VertexAttribute::TextureCoordinate2D => ShaderDataType::Vec2,
        }
    }

    pub fn flag(self) -> VertexAttributes {
        match self {
            VertexAttribute::Position3D => VertexAttributes::POSITION_3D,
            VertexAttribute::Normal3D => VertexAttributes::NORMAL_3D,
            VertexAttribute::ColourRGBA => VertexAttributes::COLOUR_RGBA,
            VertexAttribute::TextureCoordinate2D => VertexAttributes::TEXTURE_COORDINATE_2D,
        }
    }
}

bitflags! {
    /// Set of vertex attributes a program consumes
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct VertexAttributes: u32 {
        const POSITION_3D = 1 << 0;
        const NORMAL_3D = 1 << 1;
        const COLOUR_RGBA = 1 << 2;
        const TEXTURE_COORDINATE_2D = 1 << 3;
    }
}

impl VertexAttributes {
    /// Scan a vertex-stage source for attribute identifiers (whole words only)
    pub fn scan(source: &str) -> Self {
        VertexAttribute::ALL
            .iter()
            .filter(|attribute| contains_word(source, attribute.identifier()))
            .fold(VertexAttributes::empty(), |set, attribute| set | attribute.flag())
    }

    /// Attributes in the set, ordered by location
    pub fn attributes(self) -> impl Iterator<Item = VertexAttribute> {
        VertexAttribute::ALL
            .into_iter()
            .filter(move |attribute| self.contains(attribute.flag()))
    }
}

fn contains_word(source: &str, word: &str) -> bool {
    let is_ident = |c: char| c.is_ascii_alphanumeric() || c == '_';
    source.match_indices(word).any(|(start, _)| {
        let before = source[..start].chars().next_back();
        let after = source[start + word.len()..].chars().next();
        !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
    })
}

#[cfg(test)]
#[path = "vertex_attribute_tests.rs"]
mod tests;
