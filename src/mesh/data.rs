//! CPU-side mesh container.
//!
//! [`MeshData`] pairs up to two raw byte buffers (index, vertex) with
//! descriptors locating typed data inside them. All ranges are validated
//! once at construction, so accessors can hand out views without further
//! checks. Buffers can be owned or borrowed, see
//! [`BufferData`](crate::buffer::BufferData).

use std::any::Any;
use std::fmt;
use std::mem;
use std::sync::Arc;

use crate::buffer::{BufferData, DataFlags, StridedSlice, StridedSliceMut};
use crate::math::{Vec2, Vec3, Vec4};
use crate::mesh::attribute::{
    IndexFormat, IndexValue, MeshIndices, VertexAttribute, VertexFormat, VertexSemantic,
    VertexValue,
};
use crate::mesh::error::MeshDataError;

/// How vertices are assembled into primitives.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTopology {
    /// Each vertex is a point.
    PointList,
    /// Every two vertices form a line.
    LineList,
    /// Consecutive vertices form connected lines.
    LineStrip,
    /// Every three vertices form a triangle.
    #[default]
    TriangleList,
    /// Consecutive vertices form connected triangles.
    TriangleStrip,
}

impl PrimitiveTopology {
    /// Get the vertex count of one primitive, or `None` for strips.
    pub fn vertices_per_primitive(&self) -> Option<u32> {
        match self {
            PrimitiveTopology::PointList => Some(1),
            PrimitiveTopology::LineList => Some(2),
            PrimitiveTopology::TriangleList => Some(3),
            PrimitiveTopology::LineStrip | PrimitiveTopology::TriangleStrip => None,
        }
    }
}

/// Indexed or non-indexed mesh data with arbitrary vertex layout.
///
/// The container holds an index buffer, a vertex buffer, an optional
/// [`MeshIndices`] range into the former and a list of [`VertexAttribute`]
/// descriptors into the latter. Construction validates that:
///
/// - the index range is contained in the index buffer, and a non-empty
///   index buffer is actually described by a range
/// - every attribute range is contained in the vertex buffer
/// - all attributes agree on the element count, which becomes the vertex
///   count
/// - an explicit vertex count is given exactly when there are no
///   attributes to infer it from (an indexed attribute-less mesh defaults
///   to zero vertices)
///
/// A zero-length index range is treated the same as no range, so importers
/// can pass through whatever their source format stores.
pub struct MeshData<'a> {
    primitive: PrimitiveTopology,
    index_data: BufferData<'a>,
    vertex_data: BufferData<'a>,
    indices: Option<MeshIndices>,
    attributes: Vec<VertexAttribute>,
    vertex_count: u32,
    importer_state: Option<Arc<dyn Any + Send + Sync>>,
}

impl<'a> MeshData<'a> {
    /// Create mesh data, validating all ranges.
    ///
    /// `vertex_count` may only be supplied for an attribute-less mesh and
    /// must be supplied for an attribute-less non-indexed one.
    pub fn try_new(
        primitive: PrimitiveTopology,
        index_data: impl Into<BufferData<'a>>,
        indices: Option<MeshIndices>,
        vertex_data: impl Into<BufferData<'a>>,
        attributes: Vec<VertexAttribute>,
        vertex_count: Option<u32>,
    ) -> Result<Self, MeshDataError> {
        let index_data = index_data.into();
        let vertex_data = vertex_data.into();

        // A zero-length index range describes the same mesh as no range.
        let indices = indices.filter(|indices| !indices.is_empty());

        match indices {
            Some(range) => {
                let end = range.offset().checked_add(range.byte_len());
                if end.map_or(true, |end| end > index_data.len()) {
                    return Err(MeshDataError::IndicesOutOfBounds {
                        offset: range.offset(),
                        byte_len: range.byte_len(),
                        buffer_len: index_data.len(),
                    });
                }
            }
            None => {
                if !index_data.is_empty() {
                    return Err(MeshDataError::UnexpectedIndexData {
                        buffer_len: index_data.len(),
                    });
                }
            }
        }

        let resolved_count = match (attributes.first(), vertex_count) {
            (Some(_), Some(_)) => return Err(MeshDataError::UnexpectedVertexCount),
            (Some(first), None) => first.count(),
            (None, Some(count)) => count,
            (None, None) if indices.is_some() => 0,
            (None, None) => return Err(MeshDataError::MissingVertexCount),
        };

        if attributes.is_empty() && !vertex_data.is_empty() {
            return Err(MeshDataError::UnexpectedVertexData {
                buffer_len: vertex_data.len(),
            });
        }

        for (index, attribute) in attributes.iter().enumerate() {
            if attribute.count() != resolved_count {
                return Err(MeshDataError::VertexCountMismatch {
                    index,
                    count: attribute.count(),
                    expected: resolved_count,
                });
            }
            let end = attribute.end_offset();
            if end.map_or(true, |end| end > vertex_data.len()) {
                return Err(MeshDataError::AttributeOutOfBounds {
                    index,
                    buffer_len: vertex_data.len(),
                });
            }
        }

        Ok(Self {
            primitive,
            index_data,
            vertex_data,
            indices,
            attributes,
            vertex_count: resolved_count,
            importer_state: None,
        })
    }

    /// Create mesh data, validating all ranges.
    ///
    /// # Panics
    ///
    /// Panics on any validation failure, see [`try_new`](Self::try_new)
    /// for the soft variant.
    pub fn new(
        primitive: PrimitiveTopology,
        index_data: impl Into<BufferData<'a>>,
        indices: Option<MeshIndices>,
        vertex_data: impl Into<BufferData<'a>>,
        attributes: Vec<VertexAttribute>,
        vertex_count: Option<u32>,
    ) -> Self {
        match Self::try_new(primitive, index_data, indices, vertex_data, attributes, vertex_count)
        {
            Ok(mesh) => mesh,
            Err(error) => panic!("{}", error),
        }
    }

    /// Create non-indexed mesh data.
    pub fn non_indexed(
        primitive: PrimitiveTopology,
        vertex_data: impl Into<BufferData<'a>>,
        attributes: Vec<VertexAttribute>,
    ) -> Self {
        Self::new(primitive, BufferData::default(), None, vertex_data, attributes, None)
    }

    /// Create mesh data with no buffers, just a vertex count.
    ///
    /// Useful for fully procedural geometry where a shader derives
    /// everything from the vertex index.
    pub fn attributeless(primitive: PrimitiveTopology, vertex_count: u32) -> MeshData<'static> {
        MeshData::new(
            primitive,
            BufferData::default(),
            None,
            BufferData::default(),
            Vec::new(),
            Some(vertex_count),
        )
    }

    // ===== Mesh-wide properties =====

    /// Get the primitive topology.
    pub fn primitive(&self) -> PrimitiveTopology {
        self.primitive
    }

    /// Get the vertex count.
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Check if the mesh is indexed.
    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    /// Get the number of primitives assembled from the mesh.
    pub fn primitive_count(&self) -> usize {
        let elements = if self.is_indexed() {
            self.index_count()
        } else {
            self.vertex_count as usize
        };
        match self.primitive {
            PrimitiveTopology::PointList => elements,
            PrimitiveTopology::LineList => elements / 2,
            PrimitiveTopology::LineStrip => elements.saturating_sub(1),
            PrimitiveTopology::TriangleList => elements / 3,
            PrimitiveTopology::TriangleStrip => elements.saturating_sub(2),
        }
    }

    // ===== Index access =====

    fn indices_checked(&self) -> MeshIndices {
        match self.indices {
            Some(indices) => indices,
            None => panic!("the mesh is not indexed"),
        }
    }

    /// Get the number of indices.
    ///
    /// # Panics
    ///
    /// Panics if the mesh is not indexed.
    pub fn index_count(&self) -> usize {
        self.indices_checked().count()
    }

    /// Get the index format.
    ///
    /// # Panics
    ///
    /// Panics if the mesh is not indexed.
    pub fn index_format(&self) -> IndexFormat {
        self.indices_checked().format()
    }

    /// Get the byte offset of the first index in the index buffer.
    ///
    /// # Panics
    ///
    /// Panics if the mesh is not indexed.
    pub fn index_offset(&self) -> usize {
        self.indices_checked().offset()
    }

    /// Get a typed view of the indices.
    ///
    /// # Panics
    ///
    /// Panics if the mesh is not indexed or `T` does not match the index
    /// format.
    pub fn indices<T: IndexValue>(&self) -> StridedSlice<'_, T> {
        let range = self.indices_checked();
        assert!(
            T::FORMAT == range.format(),
            "the indices are {:?} but {:?} was requested",
            range.format(),
            T::FORMAT
        );
        let bytes =
            &self.index_data.as_slice()[range.offset()..range.offset() + range.byte_len()];
        StridedSlice::new(bytes, range.count(), range.format().size())
    }

    /// Get a mutable typed view of the indices.
    ///
    /// # Panics
    ///
    /// Panics if the mesh is not indexed, `T` does not match the index
    /// format or the index data is not mutable.
    pub fn mutable_indices<T: IndexValue>(&mut self) -> StridedSliceMut<'_, T> {
        let range = self.indices_checked();
        assert!(
            T::FORMAT == range.format(),
            "the indices are {:?} but {:?} was requested",
            range.format(),
            T::FORMAT
        );
        assert!(self.index_data.is_mutable(), "index data is not mutable");
        let bytes = &mut self.index_data.as_mut_slice()
            [range.offset()..range.offset() + range.byte_len()];
        StridedSliceMut::new(bytes, range.count(), range.format().size())
    }

    /// Copy the indices into `destination`, widened to 32 bits.
    ///
    /// # Panics
    ///
    /// Panics if the mesh is not indexed or the destination size does not
    /// match the index count.
    pub fn indices_into(&self, destination: &mut [u32]) {
        let range = self.indices_checked();
        assert!(
            destination.len() == range.count(),
            "destination has {} elements but the mesh has {} indices",
            destination.len(),
            range.count()
        );
        match range.format() {
            IndexFormat::Uint8 => self.widen_indices::<u8>(destination),
            IndexFormat::Uint16 => self.widen_indices::<u16>(destination),
            IndexFormat::Uint32 => self.widen_indices::<u32>(destination),
        }
    }

    /// Get the indices widened to 32 bits.
    ///
    /// # Panics
    ///
    /// Panics if the mesh is not indexed.
    pub fn indices_as_u32(&self) -> Vec<u32> {
        let mut indices = vec![0; self.index_count()];
        self.indices_into(&mut indices);
        indices
    }

    fn widen_indices<T: IndexValue>(&self, destination: &mut [u32]) {
        for (slot, index) in destination.iter_mut().zip(self.indices::<T>().iter()) {
            *slot = index.to_u32();
        }
    }

    // ===== Attribute access =====

    /// Get the number of vertex attributes.
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Get the number of vertex attributes with the given semantic.
    pub fn attribute_count_of(&self, semantic: VertexSemantic) -> usize {
        self.attributes
            .iter()
            .filter(|attribute| attribute.semantic() == semantic)
            .count()
    }

    /// Check if the mesh has an attribute with the given semantic.
    pub fn has_attribute(&self, semantic: VertexSemantic) -> bool {
        self.attribute_count_of(semantic) != 0
    }

    /// Find the absolute id of the `set`-th attribute with the given
    /// semantic.
    pub fn find_attribute(&self, semantic: VertexSemantic, set: usize) -> Option<usize> {
        self.attributes
            .iter()
            .enumerate()
            .filter(|(_, attribute)| attribute.semantic() == semantic)
            .map(|(id, _)| id)
            .nth(set)
    }

    /// Get all attribute descriptors.
    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    fn attribute_checked(&self, id: usize) -> &VertexAttribute {
        assert!(
            id < self.attributes.len(),
            "index {} out of range for {} attributes",
            id,
            self.attributes.len()
        );
        &self.attributes[id]
    }

    fn require_attribute(&self, semantic: VertexSemantic, set: usize) -> usize {
        self.find_attribute(semantic, set).unwrap_or_else(|| {
            panic!(
                "the mesh has {} {:?} attributes but set {} was requested",
                self.attribute_count_of(semantic),
                semantic,
                set
            )
        })
    }

    /// Get the semantic of the attribute with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn attribute_semantic(&self, id: usize) -> VertexSemantic {
        self.attribute_checked(id).semantic()
    }

    /// Get the format of the attribute with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn attribute_format(&self, id: usize) -> VertexFormat {
        self.attribute_checked(id).format()
    }

    /// Get the byte offset of the attribute with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn attribute_offset(&self, id: usize) -> usize {
        self.attribute_checked(id).offset()
    }

    /// Get the byte stride of the attribute with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn attribute_stride(&self, id: usize) -> usize {
        self.attribute_checked(id).stride()
    }

    /// Get a typed view of the `set`-th attribute with the given semantic.
    ///
    /// # Panics
    ///
    /// Panics if the attribute is not present or `T` does not match its
    /// format.
    pub fn attribute<T: VertexValue>(&self, semantic: VertexSemantic, set: usize) -> StridedSlice<'_, T> {
        let id = self.require_attribute(semantic, set);
        self.attribute_at(id)
    }

    /// Get a typed view of the attribute with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range or `T` does not match the attribute
    /// format.
    pub fn attribute_at<T: VertexValue>(&self, id: usize) -> StridedSlice<'_, T> {
        let attribute = self.attribute_checked(id);
        assert!(
            T::FORMAT == attribute.format(),
            "improper type requested for {:?} of {:?}",
            attribute.semantic(),
            attribute.format()
        );
        let bytes = &self.vertex_data.as_slice()
            [attribute.offset()..attribute.offset() + attribute.byte_len()];
        StridedSlice::new(bytes, attribute.count() as usize, attribute.stride())
    }

    /// Get a mutable typed view of the `set`-th attribute with the given
    /// semantic.
    ///
    /// # Panics
    ///
    /// Panics if the attribute is not present, `T` does not match its
    /// format or the vertex data is not mutable.
    pub fn mutable_attribute<T: VertexValue>(
        &mut self,
        semantic: VertexSemantic,
        set: usize,
    ) -> StridedSliceMut<'_, T> {
        let id = self.require_attribute(semantic, set);
        self.mutable_attribute_at(id)
    }

    /// Get a mutable typed view of the attribute with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range, `T` does not match the attribute
    /// format or the vertex data is not mutable.
    pub fn mutable_attribute_at<T: VertexValue>(&mut self, id: usize) -> StridedSliceMut<'_, T> {
        let attribute = *self.attribute_checked(id);
        assert!(
            T::FORMAT == attribute.format(),
            "improper type requested for {:?} of {:?}",
            attribute.semantic(),
            attribute.format()
        );
        assert!(self.vertex_data.is_mutable(), "vertex data is not mutable");
        let bytes = &mut self.vertex_data.as_mut_slice()
            [attribute.offset()..attribute.offset() + attribute.byte_len()];
        StridedSliceMut::new(bytes, attribute.count() as usize, attribute.stride())
    }

    // ===== Convenience extraction =====

    /// Copy 2D positions into `destination`, dropping a 3D z coordinate.
    ///
    /// # Panics
    ///
    /// Panics if the position attribute is not present or the destination
    /// size does not match the vertex count.
    pub fn positions_2d_into(&self, set: usize, destination: &mut [Vec2]) {
        let id = self.require_attribute(VertexSemantic::Position, set);
        self.check_destination(destination.len());
        match self.attributes[id].format() {
            VertexFormat::Float2 => {
                for (slot, value) in destination.iter_mut().zip(self.attribute_at::<Vec2>(id).iter()) {
                    *slot = value;
                }
            }
            VertexFormat::Float3 => {
                for (slot, value) in destination.iter_mut().zip(self.attribute_at::<Vec3>(id).iter()) {
                    *slot = Vec2::new(value.x, value.y);
                }
            }
            _ => unreachable!(),
        }
    }

    /// Get 2D positions, dropping a 3D z coordinate.
    pub fn positions_2d(&self, set: usize) -> Vec<Vec2> {
        let mut positions = vec![Vec2::zeros(); self.vertex_count as usize];
        self.positions_2d_into(set, &mut positions);
        positions
    }

    /// Copy 3D positions into `destination`, padding a 2D z coordinate
    /// with zero.
    ///
    /// # Panics
    ///
    /// Panics if the position attribute is not present or the destination
    /// size does not match the vertex count.
    pub fn positions_3d_into(&self, set: usize, destination: &mut [Vec3]) {
        let id = self.require_attribute(VertexSemantic::Position, set);
        self.check_destination(destination.len());
        match self.attributes[id].format() {
            VertexFormat::Float2 => {
                for (slot, value) in destination.iter_mut().zip(self.attribute_at::<Vec2>(id).iter()) {
                    *slot = Vec3::new(value.x, value.y, 0.0);
                }
            }
            VertexFormat::Float3 => {
                for (slot, value) in destination.iter_mut().zip(self.attribute_at::<Vec3>(id).iter()) {
                    *slot = value;
                }
            }
            _ => unreachable!(),
        }
    }

    /// Get 3D positions, padding a 2D z coordinate with zero.
    pub fn positions_3d(&self, set: usize) -> Vec<Vec3> {
        let mut positions = vec![Vec3::zeros(); self.vertex_count as usize];
        self.positions_3d_into(set, &mut positions);
        positions
    }

    /// Copy normals into `destination`.
    ///
    /// # Panics
    ///
    /// Panics if the normal attribute is not present or the destination
    /// size does not match the vertex count.
    pub fn normals_into(&self, set: usize, destination: &mut [Vec3]) {
        let id = self.require_attribute(VertexSemantic::Normal, set);
        self.check_destination(destination.len());
        for (slot, value) in destination.iter_mut().zip(self.attribute_at::<Vec3>(id).iter()) {
            *slot = value;
        }
    }

    /// Get the normals.
    pub fn normals(&self, set: usize) -> Vec<Vec3> {
        let mut normals = vec![Vec3::zeros(); self.vertex_count as usize];
        self.normals_into(set, &mut normals);
        normals
    }

    /// Copy 2D texture coordinates into `destination`.
    ///
    /// # Panics
    ///
    /// Panics if the texture coordinate attribute is not present or the
    /// destination size does not match the vertex count.
    pub fn texture_coordinates_2d_into(&self, set: usize, destination: &mut [Vec2]) {
        let id = self.require_attribute(VertexSemantic::TexCoord, set);
        self.check_destination(destination.len());
        for (slot, value) in destination.iter_mut().zip(self.attribute_at::<Vec2>(id).iter()) {
            *slot = value;
        }
    }

    /// Get 2D texture coordinates.
    pub fn texture_coordinates_2d(&self, set: usize) -> Vec<Vec2> {
        let mut coordinates = vec![Vec2::zeros(); self.vertex_count as usize];
        self.texture_coordinates_2d_into(set, &mut coordinates);
        coordinates
    }

    /// Copy RGBA colors into `destination`, padding RGB alpha with one.
    ///
    /// # Panics
    ///
    /// Panics if the color attribute is not present or the destination
    /// size does not match the vertex count.
    pub fn colors_into(&self, set: usize, destination: &mut [Vec4]) {
        let id = self.require_attribute(VertexSemantic::Color, set);
        self.check_destination(destination.len());
        match self.attributes[id].format() {
            VertexFormat::Float3 => {
                for (slot, value) in destination.iter_mut().zip(self.attribute_at::<Vec3>(id).iter()) {
                    *slot = Vec4::new(value.x, value.y, value.z, 1.0);
                }
            }
            VertexFormat::Float4 => {
                for (slot, value) in destination.iter_mut().zip(self.attribute_at::<Vec4>(id).iter()) {
                    *slot = value;
                }
            }
            _ => unreachable!(),
        }
    }

    /// Get RGBA colors, padding RGB alpha with one.
    pub fn colors(&self, set: usize) -> Vec<Vec4> {
        let mut colors = vec![Vec4::zeros(); self.vertex_count as usize];
        self.colors_into(set, &mut colors);
        colors
    }

    fn check_destination(&self, len: usize) {
        assert!(
            len == self.vertex_count as usize,
            "destination has {} elements but the mesh has {} vertices",
            len,
            self.vertex_count
        );
    }

    // ===== Raw data access =====

    /// Get the raw index buffer.
    pub fn index_data(&self) -> &[u8] {
        self.index_data.as_slice()
    }

    /// Get the raw vertex buffer.
    pub fn vertex_data(&self) -> &[u8] {
        self.vertex_data.as_slice()
    }

    /// Get the ownership and mutability flags of the index buffer.
    pub fn index_data_flags(&self) -> DataFlags {
        self.index_data.flags()
    }

    /// Get the ownership and mutability flags of the vertex buffer.
    pub fn vertex_data_flags(&self) -> DataFlags {
        self.vertex_data.flags()
    }

    /// Get the raw index buffer mutably.
    ///
    /// # Panics
    ///
    /// Panics if the index data is not mutable.
    pub fn mutable_index_data(&mut self) -> &mut [u8] {
        assert!(self.index_data.is_mutable(), "index data is not mutable");
        self.index_data.as_mut_slice()
    }

    /// Get the raw vertex buffer mutably.
    ///
    /// # Panics
    ///
    /// Panics if the vertex data is not mutable.
    pub fn mutable_vertex_data(&mut self) -> &mut [u8] {
        assert!(self.vertex_data.is_mutable(), "vertex data is not mutable");
        self.vertex_data.as_mut_slice()
    }

    // ===== Ownership transfer =====

    /// Take the index buffer out of the mesh.
    ///
    /// The mesh becomes non-indexed; everything else is untouched.
    pub fn release_index_data(&mut self) -> BufferData<'a> {
        self.indices = None;
        mem::take(&mut self.index_data)
    }

    /// Take the vertex buffer out of the mesh.
    ///
    /// The attribute descriptors are dropped but the vertex count stays,
    /// so primitive counts remain meaningful.
    pub fn release_vertex_data(&mut self) -> BufferData<'a> {
        self.attributes.clear();
        mem::take(&mut self.vertex_data)
    }

    // ===== Importer state =====

    /// Attach an importer-specific state object.
    #[must_use]
    pub fn with_importer_state(mut self, state: Arc<dyn Any + Send + Sync>) -> Self {
        self.importer_state = Some(state);
        self
    }

    /// Get the importer-specific state object, if any.
    pub fn importer_state(&self) -> Option<&(dyn Any + Send + Sync)> {
        self.importer_state.as_deref()
    }
}

impl fmt::Debug for MeshData<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeshData")
            .field("primitive", &self.primitive)
            .field("vertex_count", &self.vertex_count)
            .field("indices", &self.indices)
            .field("attributes", &self.attributes)
            .field("index_data", &self.index_data)
            .field("vertex_data", &self.vertex_data)
            .finish()
    }
}

// Ensure the container can be handed between worker threads.
static_assertions::assert_impl_all!(MeshData<'static>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    fn interleaved_bytes() -> Vec<u8> {
        // Three vertices of {position, normal, uv}, 32 bytes each.
        let vertices: [f32; 24] = [
            0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, //
            1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, //
            1.0, 1.0, 0.5, 0.0, 0.0, 1.0, 1.0, 0.0,
        ];
        bytemuck::cast_slice(&vertices).to_vec()
    }

    fn interleaved_attributes(count: u32) -> Vec<VertexAttribute> {
        vec![
            VertexAttribute::position(0, 32, count),
            VertexAttribute::normal(12, 32, count),
            VertexAttribute::texcoord(24, 32, count),
        ]
    }

    fn index_bytes() -> Vec<u8> {
        bytemuck::cast_slice(&[0u16, 1, 2, 2, 1, 0]).to_vec()
    }

    fn indexed_mesh() -> MeshData<'static> {
        MeshData::new(
            PrimitiveTopology::TriangleList,
            index_bytes(),
            Some(MeshIndices::new(IndexFormat::Uint16, 0, 12)),
            interleaved_bytes(),
            interleaved_attributes(3),
            None,
        )
    }

    #[test]
    fn test_interleaved_mesh() {
        let mesh = indexed_mesh();
        assert_eq!(mesh.vertex_count(), 3);
        assert!(mesh.is_indexed());
        assert_eq!(mesh.index_count(), 6);
        assert_eq!(mesh.index_format(), IndexFormat::Uint16);
        assert_eq!(mesh.attribute_count(), 3);
        assert_eq!(mesh.attribute_semantic(0), VertexSemantic::Position);
        assert_eq!(mesh.attribute_offset(2), 24);
        assert_eq!(mesh.attribute_stride(1), 32);
        assert_eq!(mesh.primitive_count(), 2);

        assert_eq!(
            mesh.indices::<u16>().iter().collect::<Vec<_>>(),
            vec![0, 1, 2, 2, 1, 0]
        );
        let positions = mesh.attribute::<Vec3>(VertexSemantic::Position, 0);
        assert_eq!(positions.get(2), Vec3::new(1.0, 1.0, 0.5));
        let uvs = mesh.attribute::<Vec2>(VertexSemantic::TexCoord, 0);
        assert_eq!(uvs.get(0), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_zero_length_index_range_collapses() {
        let mesh = MeshData::new(
            PrimitiveTopology::TriangleList,
            BufferData::default(),
            Some(MeshIndices::new(IndexFormat::Uint16, 0, 0)),
            interleaved_bytes(),
            interleaved_attributes(3),
            None,
        );
        assert!(!mesh.is_indexed());
        assert_eq!(mesh.primitive_count(), 1);
    }

    #[test]
    fn test_index_range_out_of_bounds() {
        let result = MeshData::try_new(
            PrimitiveTopology::TriangleList,
            vec![0u8; 10],
            Some(MeshIndices::new(IndexFormat::Uint16, 0, 12)),
            interleaved_bytes(),
            interleaved_attributes(3),
            None,
        );
        assert_eq!(
            result.err(),
            Some(MeshDataError::IndicesOutOfBounds {
                offset: 0,
                byte_len: 12,
                buffer_len: 10,
            })
        );
    }

    #[test]
    fn test_unexpected_index_data() {
        let result = MeshData::try_new(
            PrimitiveTopology::TriangleList,
            vec![0u8; 4],
            None,
            interleaved_bytes(),
            interleaved_attributes(3),
            None,
        );
        assert_eq!(
            result.err(),
            Some(MeshDataError::UnexpectedIndexData { buffer_len: 4 })
        );
    }

    #[test]
    fn test_vertex_count_mismatch() {
        let mut attributes = interleaved_attributes(3);
        attributes[1] = VertexAttribute::normal(12, 32, 2);
        let result = MeshData::try_new(
            PrimitiveTopology::TriangleList,
            BufferData::default(),
            None,
            interleaved_bytes(),
            attributes,
            None,
        );
        assert_eq!(
            result.err(),
            Some(MeshDataError::VertexCountMismatch {
                index: 1,
                count: 2,
                expected: 3,
            })
        );
    }

    #[test]
    fn test_attribute_out_of_bounds() {
        let result = MeshData::try_new(
            PrimitiveTopology::TriangleList,
            BufferData::default(),
            None,
            vec![0u8; 64],
            interleaved_attributes(3),
            None,
        );
        assert_eq!(
            result.err(),
            Some(MeshDataError::AttributeOutOfBounds {
                index: 0,
                buffer_len: 64,
            })
        );
    }

    #[test]
    fn test_unexpected_vertex_data() {
        let result = MeshData::try_new(
            PrimitiveTopology::TriangleList,
            BufferData::default(),
            None,
            vec![0u8; 16],
            Vec::new(),
            Some(4),
        );
        assert_eq!(
            result.err(),
            Some(MeshDataError::UnexpectedVertexData { buffer_len: 16 })
        );
    }

    #[test]
    fn test_explicit_count_needs_no_attributes() {
        let result = MeshData::try_new(
            PrimitiveTopology::TriangleList,
            BufferData::default(),
            None,
            interleaved_bytes(),
            interleaved_attributes(3),
            Some(3),
        );
        assert_eq!(result.err(), Some(MeshDataError::UnexpectedVertexCount));

        let result = MeshData::try_new(
            PrimitiveTopology::TriangleList,
            BufferData::default(),
            None,
            BufferData::default(),
            Vec::new(),
            None,
        );
        assert_eq!(result.err(), Some(MeshDataError::MissingVertexCount));
    }

    #[test]
    fn test_attributeless() {
        let mesh = MeshData::attributeless(PrimitiveTopology::TriangleStrip, 9);
        assert_eq!(mesh.vertex_count(), 9);
        assert!(!mesh.is_indexed());
        assert_eq!(mesh.attribute_count(), 0);
        assert_eq!(mesh.primitive_count(), 7);
    }

    #[test]
    fn test_indexed_attributeless_defaults_to_zero_vertices() {
        let mesh = MeshData::new(
            PrimitiveTopology::TriangleList,
            index_bytes(),
            Some(MeshIndices::new(IndexFormat::Uint16, 0, 12)),
            BufferData::default(),
            Vec::new(),
            None,
        );
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.index_count(), 6);
    }

    #[test]
    #[should_panic(expected = "the indices are Uint16 but Uint32 was requested")]
    fn test_wrong_index_type() {
        indexed_mesh().indices::<u32>();
    }

    #[test]
    #[should_panic(expected = "improper type requested for Position of Float3")]
    fn test_wrong_attribute_type() {
        indexed_mesh().attribute::<Vec2>(VertexSemantic::Position, 0);
    }

    #[test]
    #[should_panic(expected = "the mesh has 1 TexCoord attributes but set 1 was requested")]
    fn test_missing_attribute_set() {
        indexed_mesh().attribute::<Vec2>(VertexSemantic::TexCoord, 1);
    }

    #[test]
    #[should_panic(expected = "index 3 out of range for 3 attributes")]
    fn test_attribute_id_out_of_range() {
        indexed_mesh().attribute_format(3);
    }

    #[test]
    #[should_panic(expected = "the mesh is not indexed")]
    fn test_index_access_on_non_indexed_mesh() {
        let mesh = MeshData::non_indexed(
            PrimitiveTopology::TriangleList,
            interleaved_bytes(),
            interleaved_attributes(3),
        );
        mesh.index_count();
    }

    #[test]
    fn test_attribute_sets() {
        let mut bytes = interleaved_bytes();
        bytes.extend_from_slice(bytemuck::cast_slice(&[9.0f32, 8.0, 7.0, 6.0, 5.0, 4.0]));
        let mut attributes = interleaved_attributes(3);
        attributes.push(VertexAttribute::texcoord(96, 8, 3));

        let mesh = MeshData::non_indexed(PrimitiveTopology::TriangleList, bytes, attributes);
        assert_eq!(mesh.attribute_count_of(VertexSemantic::TexCoord), 2);
        assert_eq!(mesh.find_attribute(VertexSemantic::TexCoord, 1), Some(3));
        let second = mesh.attribute::<Vec2>(VertexSemantic::TexCoord, 1);
        assert_eq!(second.get(1), Vec2::new(7.0, 6.0));
    }

    #[test]
    fn test_mutable_attribute_writes_through() {
        let mut mesh = indexed_mesh();
        {
            let mut positions = mesh.mutable_attribute::<Vec3>(VertexSemantic::Position, 0);
            positions.set(1, Vec3::new(-1.0, -2.0, -3.0));
        }
        assert_eq!(
            mesh.attribute::<Vec3>(VertexSemantic::Position, 0).get(1),
            Vec3::new(-1.0, -2.0, -3.0)
        );
    }

    #[test]
    #[should_panic(expected = "vertex data is not mutable")]
    fn test_borrowed_vertex_data_rejects_writes() {
        let bytes = interleaved_bytes();
        let mut mesh = MeshData::non_indexed(
            PrimitiveTopology::TriangleList,
            bytes.as_slice(),
            interleaved_attributes(3),
        );
        mesh.mutable_attribute::<Vec3>(VertexSemantic::Position, 0);
    }

    #[test]
    fn test_data_flags() {
        let bytes = interleaved_bytes();
        let mesh = MeshData::non_indexed(
            PrimitiveTopology::TriangleList,
            bytes.as_slice(),
            interleaved_attributes(3),
        );
        assert_eq!(mesh.vertex_data_flags(), DataFlags::empty());

        let mesh = indexed_mesh();
        assert_eq!(mesh.index_data_flags(), DataFlags::OWNED | DataFlags::MUTABLE);
        assert_eq!(mesh.vertex_data_flags(), DataFlags::OWNED | DataFlags::MUTABLE);
    }

    #[test]
    fn test_release_index_data() {
        let mut mesh = indexed_mesh();
        let buffer = mesh.release_index_data();
        assert_eq!(buffer.len(), 12);
        assert!(!mesh.is_indexed());
        assert_eq!(mesh.vertex_count(), 3);

        // A second release hands out an empty owned buffer.
        assert!(mesh.release_index_data().is_empty());
    }

    #[test]
    fn test_release_vertex_data() {
        let mut mesh = indexed_mesh();
        let buffer = mesh.release_vertex_data();
        assert_eq!(buffer.len(), 96);
        assert_eq!(mesh.attribute_count(), 0);
        assert_eq!(mesh.vertex_count(), 3);
        assert!(mesh.is_indexed());
    }

    #[test]
    fn test_index_widening() {
        let mesh = MeshData::new(
            PrimitiveTopology::TriangleList,
            vec![0u8, 1, 2],
            Some(MeshIndices::new(IndexFormat::Uint8, 0, 3)),
            interleaved_bytes(),
            interleaved_attributes(3),
            None,
        );
        assert_eq!(mesh.indices_as_u32(), vec![0, 1, 2]);
    }

    #[test]
    fn test_convenience_extraction() {
        let mesh = indexed_mesh();
        let positions = mesh.positions_3d(0);
        assert_eq!(positions[2], Vec3::new(1.0, 1.0, 0.5));
        let flattened = mesh.positions_2d(0);
        assert_eq!(flattened[2], Vec2::new(1.0, 1.0));
        let normals = mesh.normals(0);
        assert_eq!(normals[0], Vec3::new(0.0, 0.0, 1.0));
        let uvs = mesh.texture_coordinates_2d(0);
        assert_eq!(uvs[1], Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_color_alpha_padding() {
        let colors: [f32; 6] = [1.0, 0.0, 0.0, 0.0, 0.5, 1.0];
        let mesh = MeshData::non_indexed(
            PrimitiveTopology::PointList,
            bytemuck::cast_slice(&colors).to_vec(),
            vec![VertexAttribute::new(
                VertexSemantic::Color,
                VertexFormat::Float3,
                0,
                12,
                2,
            )],
        );
        assert_eq!(mesh.colors(0)[0], Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(mesh.colors(0)[1], Vec4::new(0.0, 0.5, 1.0, 1.0));
    }

    #[test]
    #[should_panic(expected = "destination has 2 elements but the mesh has 3 vertices")]
    fn test_destination_size_checked() {
        let mut destination = vec![Vec3::zeros(); 2];
        indexed_mesh().positions_3d_into(0, &mut destination);
    }

    #[test]
    fn test_primitive_counts() {
        assert_eq!(MeshData::attributeless(PrimitiveTopology::PointList, 5).primitive_count(), 5);
        assert_eq!(MeshData::attributeless(PrimitiveTopology::LineList, 5).primitive_count(), 2);
        assert_eq!(MeshData::attributeless(PrimitiveTopology::LineStrip, 5).primitive_count(), 4);
        assert_eq!(MeshData::attributeless(PrimitiveTopology::LineStrip, 0).primitive_count(), 0);
        assert_eq!(
            MeshData::attributeless(PrimitiveTopology::TriangleStrip, 1).primitive_count(),
            0
        );
    }

    #[test]
    fn test_importer_state() {
        let mesh = indexed_mesh().with_importer_state(Arc::new(42u32));
        let state = mesh.importer_state().unwrap();
        assert_eq!(state.downcast_ref::<u32>(), Some(&42));
    }
}
