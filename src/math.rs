//! Math type aliases for asset data values.
//!
//! Provides the f32 vector and matrix types used by vertex attributes and
//! material values. Rectangular matrix aliases follow nalgebra's
//! rows-by-columns naming.

pub use nalgebra;

// ===== Vectors =====

/// 2D vector (f32).
pub type Vec2 = nalgebra::Vector2<f32>;

/// 3D vector (f32).
pub type Vec3 = nalgebra::Vector3<f32>;

/// 4D vector (f32).
pub type Vec4 = nalgebra::Vector4<f32>;

/// 2D vector (u32).
pub type UVec2 = nalgebra::Vector2<u32>;

/// 3D vector (u32).
pub type UVec3 = nalgebra::Vector3<u32>;

/// 4D vector (u32).
pub type UVec4 = nalgebra::Vector4<u32>;

/// 2D vector (i32).
pub type IVec2 = nalgebra::Vector2<i32>;

/// 3D vector (i32).
pub type IVec3 = nalgebra::Vector3<i32>;

/// 4D vector (i32).
pub type IVec4 = nalgebra::Vector4<i32>;

// ===== Matrices =====

/// 2x2 matrix (f32).
pub type Mat2 = nalgebra::Matrix2<f32>;

/// 3x3 matrix (f32).
pub type Mat3 = nalgebra::Matrix3<f32>;

/// 4x4 matrix (f32).
pub type Mat4 = nalgebra::Matrix4<f32>;

/// 2x3 matrix (f32).
pub type Mat2x3 = nalgebra::Matrix2x3<f32>;

/// 2x4 matrix (f32).
pub type Mat2x4 = nalgebra::Matrix2x4<f32>;

/// 3x2 matrix (f32).
pub type Mat3x2 = nalgebra::Matrix3x2<f32>;

/// 3x4 matrix (f32).
pub type Mat3x4 = nalgebra::Matrix3x4<f32>;

/// 4x2 matrix (f32).
pub type Mat4x2 = nalgebra::Matrix4x2<f32>;

/// 4x3 matrix (f32).
pub type Mat4x3 = nalgebra::Matrix4x3<f32>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn alias_sizes() {
        assert_eq!(size_of::<Vec2>(), 8);
        assert_eq!(size_of::<Vec3>(), 12);
        assert_eq!(size_of::<Vec4>(), 16);
        assert_eq!(size_of::<Mat3>(), 36);
        assert_eq!(size_of::<Mat3x4>(), 48);
        assert_eq!(size_of::<Mat4x3>(), 48);
    }
}
