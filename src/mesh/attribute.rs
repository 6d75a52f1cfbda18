//! Index and vertex attribute descriptors.
//!
//! Descriptors carry no bytes of their own. They name a location inside the
//! mesh's index or vertex buffer (offset, stride, count) together with the
//! element format, and [`MeshData`](super::MeshData) validates at
//! construction that every described range fits its buffer.

use bytemuck::Pod;

use crate::math::{IVec2, IVec3, IVec4, UVec2, UVec3, UVec4, Vec2, Vec3, Vec4};

// ===== Indices =====

/// Element type of an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexFormat {
    /// 8-bit unsigned indices.
    Uint8,
    /// 16-bit unsigned indices.
    Uint16,
    /// 32-bit unsigned indices.
    Uint32,
}

impl IndexFormat {
    /// Get the size of one index in bytes.
    pub fn size(&self) -> usize {
        match self {
            IndexFormat::Uint8 => 1,
            IndexFormat::Uint16 => 2,
            IndexFormat::Uint32 => 4,
        }
    }
}

/// Location of tightly packed indices inside an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshIndices {
    format: IndexFormat,
    offset: usize,
    byte_len: usize,
}

impl MeshIndices {
    /// Describe `byte_len` bytes of indices starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `byte_len` is not a multiple of the index size.
    pub fn new(format: IndexFormat, offset: usize, byte_len: usize) -> Self {
        assert!(
            byte_len % format.size() == 0,
            "index byte length {} is not a multiple of the {}-byte index size",
            byte_len,
            format.size()
        );
        Self {
            format,
            offset,
            byte_len,
        }
    }

    /// Get the index format.
    pub fn format(&self) -> IndexFormat {
        self.format
    }

    /// Get the byte offset of the first index.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Get the described length in bytes.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// Get the number of indices.
    pub fn count(&self) -> usize {
        self.byte_len / self.format.size()
    }

    /// Check if the range describes no indices.
    pub fn is_empty(&self) -> bool {
        self.byte_len == 0
    }
}

// ===== Vertex attributes =====

/// Meaning of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexSemantic {
    /// Vertex position, 2D or 3D.
    Position,
    /// Vertex normal.
    Normal,
    /// Texture coordinates.
    TexCoord,
    /// Vertex color, with or without alpha.
    Color,
    /// Application-specific attribute, distinguished by its tag.
    Custom(u8),
}

impl VertexSemantic {
    /// Check if `format` is an allowed element format for this semantic.
    pub fn accepts(&self, format: VertexFormat) -> bool {
        use VertexFormat::*;
        match self {
            VertexSemantic::Position => matches!(format, Float2 | Float3),
            VertexSemantic::Normal => matches!(format, Float3),
            VertexSemantic::TexCoord => matches!(format, Float2),
            VertexSemantic::Color => matches!(format, Float3 | Float4),
            VertexSemantic::Custom(_) => true,
        }
    }
}

/// Element format of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    /// One 32-bit float.
    Float,
    /// Two 32-bit floats.
    Float2,
    /// Three 32-bit floats.
    Float3,
    /// Four 32-bit floats.
    Float4,
    /// One 32-bit unsigned integer.
    Uint,
    /// Two 32-bit unsigned integers.
    Uint2,
    /// Three 32-bit unsigned integers.
    Uint3,
    /// Four 32-bit unsigned integers.
    Uint4,
    /// One 32-bit signed integer.
    Int,
    /// Two 32-bit signed integers.
    Int2,
    /// Three 32-bit signed integers.
    Int3,
    /// Four 32-bit signed integers.
    Int4,
}

impl VertexFormat {
    /// Get the size of one element in bytes.
    pub fn size(&self) -> usize {
        use VertexFormat::*;
        match self {
            Float | Uint | Int => 4,
            Float2 | Uint2 | Int2 => 8,
            Float3 | Uint3 | Int3 => 12,
            Float4 | Uint4 | Int4 => 16,
        }
    }
}

/// Location of one vertex attribute inside a vertex buffer.
///
/// `offset` addresses the first element, consecutive elements are `stride`
/// bytes apart. Several attributes may share a stride and differ only in
/// offset, which is the usual interleaved layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    semantic: VertexSemantic,
    format: VertexFormat,
    offset: usize,
    stride: usize,
    count: u32,
}

impl VertexAttribute {
    /// Describe `count` elements of `format` starting at `offset`, spaced
    /// `stride` bytes apart.
    ///
    /// # Panics
    ///
    /// Panics if the semantic does not accept the format, or if the stride
    /// is smaller than the element size for more than one element.
    pub fn new(
        semantic: VertexSemantic,
        format: VertexFormat,
        offset: usize,
        stride: usize,
        count: u32,
    ) -> Self {
        assert!(
            semantic.accepts(format),
            "{:?} is not a valid format for {:?}",
            format,
            semantic
        );
        assert!(
            count <= 1 || stride >= format.size(),
            "stride {} is smaller than the {}-byte element size",
            stride,
            format.size()
        );
        Self {
            semantic,
            format,
            offset,
            stride,
            count,
        }
    }

    /// Describe 3D float positions.
    pub fn position(offset: usize, stride: usize, count: u32) -> Self {
        Self::new(VertexSemantic::Position, VertexFormat::Float3, offset, stride, count)
    }

    /// Describe float normals.
    pub fn normal(offset: usize, stride: usize, count: u32) -> Self {
        Self::new(VertexSemantic::Normal, VertexFormat::Float3, offset, stride, count)
    }

    /// Describe 2D float texture coordinates.
    pub fn texcoord(offset: usize, stride: usize, count: u32) -> Self {
        Self::new(VertexSemantic::TexCoord, VertexFormat::Float2, offset, stride, count)
    }

    /// Describe RGBA float colors.
    pub fn color(offset: usize, stride: usize, count: u32) -> Self {
        Self::new(VertexSemantic::Color, VertexFormat::Float4, offset, stride, count)
    }

    /// Get the attribute semantic.
    pub fn semantic(&self) -> VertexSemantic {
        self.semantic
    }

    /// Get the element format.
    pub fn format(&self) -> VertexFormat {
        self.format
    }

    /// Get the byte offset of the first element.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Get the byte stride between elements.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Get the number of elements.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Get the span in bytes from the first element to the end of the last.
    pub fn byte_len(&self) -> usize {
        if self.count == 0 {
            0
        } else {
            (self.count as usize - 1) * self.stride + self.format.size()
        }
    }

    /// One past the last byte the attribute touches, or `None` on overflow.
    pub(crate) fn end_offset(&self) -> Option<usize> {
        if self.count == 0 {
            return Some(self.offset);
        }
        (self.count as usize - 1)
            .checked_mul(self.stride)
            .and_then(|span| span.checked_add(self.format.size()))
            .and_then(|span| span.checked_add(self.offset))
    }
}

// ===== Typed element access =====

/// Rust types that can be read from an index buffer.
pub trait IndexValue: Pod {
    /// The matching index format.
    const FORMAT: IndexFormat;

    /// Widen the index to 32 bits.
    fn to_u32(self) -> u32;
}

impl IndexValue for u8 {
    const FORMAT: IndexFormat = IndexFormat::Uint8;

    fn to_u32(self) -> u32 {
        u32::from(self)
    }
}

impl IndexValue for u16 {
    const FORMAT: IndexFormat = IndexFormat::Uint16;

    fn to_u32(self) -> u32 {
        u32::from(self)
    }
}

impl IndexValue for u32 {
    const FORMAT: IndexFormat = IndexFormat::Uint32;

    fn to_u32(self) -> u32 {
        self
    }
}

/// Rust types that can be read from a vertex attribute.
pub trait VertexValue: Pod {
    /// The matching vertex format.
    const FORMAT: VertexFormat;
}

macro_rules! impl_vertex_value {
    ($($type:ty => $format:ident,)*) => {
        $(
            impl VertexValue for $type {
                const FORMAT: VertexFormat = VertexFormat::$format;
            }
        )*
    };
}

impl_vertex_value! {
    f32 => Float,
    Vec2 => Float2,
    Vec3 => Float3,
    Vec4 => Float4,
    u32 => Uint,
    UVec2 => Uint2,
    UVec3 => Uint3,
    UVec4 => Uint4,
    i32 => Int,
    IVec2 => Int2,
    IVec3 => Int3,
    IVec4 => Int4,
}
