//! Mesh data containers and descriptors.
//!
//! The central type is [`MeshData`], an indexed or non-indexed mesh whose
//! vertex layout is described by [`VertexAttribute`] descriptors over a
//! single raw buffer. [`generators`] produces simple procedural meshes in
//! this representation.

mod attribute;
mod data;
mod error;

pub mod generators;

pub use attribute::{
    IndexFormat, IndexValue, MeshIndices, VertexAttribute, VertexFormat, VertexSemantic,
    VertexValue,
};
pub use data::{MeshData, PrimitiveTopology};
pub use error::MeshDataError;
