//! Mesh construction errors.

use std::error::Error;
use std::fmt;

/// Reasons a [`MeshData`](super::MeshData) description can be rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshDataError {
    /// The index range reaches past the end of the index buffer.
    IndicesOutOfBounds {
        offset: usize,
        byte_len: usize,
        buffer_len: usize,
    },
    /// An index buffer was supplied but no index range describes it.
    UnexpectedIndexData { buffer_len: usize },
    /// A vertex attribute reaches past the end of the vertex buffer.
    AttributeOutOfBounds { index: usize, buffer_len: usize },
    /// A vertex attribute disagrees with the first attribute on the
    /// vertex count.
    VertexCountMismatch {
        index: usize,
        count: u32,
        expected: u32,
    },
    /// A vertex buffer was supplied but no attribute describes it.
    UnexpectedVertexData { buffer_len: usize },
    /// An explicit vertex count was supplied together with attributes.
    UnexpectedVertexCount,
    /// An attribute-less non-indexed mesh was given no vertex count.
    MissingVertexCount,
}

impl fmt::Display for MeshDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshDataError::IndicesOutOfBounds {
                offset,
                byte_len,
                buffer_len,
            } => write!(
                f,
                "index range [{}, {}) is not contained in the {}-byte index buffer",
                offset,
                offset.saturating_add(*byte_len),
                buffer_len
            ),
            MeshDataError::UnexpectedIndexData { buffer_len } => write!(
                f,
                "the mesh is not indexed but a {}-byte index buffer was supplied",
                buffer_len
            ),
            MeshDataError::AttributeOutOfBounds { index, buffer_len } => write!(
                f,
                "attribute {} is not contained in the {}-byte vertex buffer",
                index, buffer_len
            ),
            MeshDataError::VertexCountMismatch {
                index,
                count,
                expected,
            } => write!(
                f,
                "attribute {} has {} elements but the first attribute has {}",
                index, count, expected
            ),
            MeshDataError::UnexpectedVertexData { buffer_len } => write!(
                f,
                "the mesh has no attributes but a {}-byte vertex buffer was supplied",
                buffer_len
            ),
            MeshDataError::UnexpectedVertexCount => write!(
                f,
                "an explicit vertex count can only be supplied for an attribute-less mesh"
            ),
            MeshDataError::MissingVertexCount => write!(
                f,
                "an attribute-less non-indexed mesh needs an explicit vertex count"
            ),
        }
    }
}

impl Error for MeshDataError {}
