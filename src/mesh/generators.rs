//! Procedural mesh generators.
//!
//! Small building blocks producing indexed [`MeshData`] with an
//! interleaved position/normal/uv layout, mainly for tests and demos.

use bytemuck::{Pod, Zeroable};

use crate::mesh::attribute::{IndexFormat, MeshIndices, VertexAttribute};
use crate::mesh::data::{MeshData, PrimitiveTopology};

/// Interleaved vertex with position, normal and texture coordinates.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PnuVertex {
    /// Vertex position.
    pub position: [f32; 3],
    /// Vertex normal.
    pub normal: [f32; 3],
    /// Texture coordinates.
    pub uv: [f32; 2],
}

const PNU_STRIDE: usize = std::mem::size_of::<PnuVertex>();

fn interleaved(vertices: Vec<PnuVertex>, indices: &[u16]) -> MeshData<'static> {
    let count = vertices.len() as u32;
    let attributes = vec![
        VertexAttribute::position(0, PNU_STRIDE, count),
        VertexAttribute::normal(12, PNU_STRIDE, count),
        VertexAttribute::texcoord(24, PNU_STRIDE, count),
    ];
    MeshData::new(
        PrimitiveTopology::TriangleList,
        bytemuck::cast_slice(indices).to_vec(),
        Some(MeshIndices::new(IndexFormat::Uint16, 0, indices.len() * 2)),
        bytemuck::cast_slice(&vertices).to_vec(),
        attributes,
        None,
    )
}

/// Generate a quad in the XY plane, facing +Z.
///
/// # Arguments
///
/// * `half_width` - Half extent along X
/// * `half_height` - Half extent along Y
pub fn quad(half_width: f32, half_height: f32) -> MeshData<'static> {
    let normal = [0.0, 0.0, 1.0];
    let vertices = vec![
        PnuVertex {
            position: [-half_width, -half_height, 0.0],
            normal,
            uv: [0.0, 1.0],
        },
        PnuVertex {
            position: [half_width, -half_height, 0.0],
            normal,
            uv: [1.0, 1.0],
        },
        PnuVertex {
            position: [half_width, half_height, 0.0],
            normal,
            uv: [1.0, 0.0],
        },
        PnuVertex {
            position: [-half_width, half_height, 0.0],
            normal,
            uv: [0.0, 0.0],
        },
    ];
    interleaved(vertices, &[0, 1, 2, 2, 3, 0])
}

/// Generate an axis-aligned cube centered at the origin.
///
/// Each face has its own four vertices so normals and UVs stay flat.
///
/// # Arguments
///
/// * `half_extent` - Half the edge length
pub fn cube(half_extent: f32) -> MeshData<'static> {
    // One entry per face: normal, then the two in-plane axes spanning it.
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];
    let corners: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u_axis, v_axis) in faces {
        let base = vertices.len() as u16;
        for (su, sv) in corners {
            let position = [
                (normal[0] + u_axis[0] * su + v_axis[0] * sv) * half_extent,
                (normal[1] + u_axis[1] * su + v_axis[1] * sv) * half_extent,
                (normal[2] + u_axis[2] * su + v_axis[2] * sv) * half_extent,
            ];
            vertices.push(PnuVertex {
                position,
                normal,
                uv: [(su + 1.0) * 0.5, 1.0 - (sv + 1.0) * 0.5],
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    interleaved(vertices, &indices)
}
