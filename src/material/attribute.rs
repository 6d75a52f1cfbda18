//! Material attribute records.
//!
//! A material is a bag of name/value records. Each record is a fixed
//! 64-byte [`MaterialAttributeData`] holding a type tag, a null-terminated
//! name and the value serialized in place, so a whole material is one flat
//! allocation that can be memcpy'd or dumped to disk as-is.

use std::fmt;
use std::mem;

use crate::math::{
    IVec2, IVec3, IVec4, Mat2, Mat2x3, Mat2x4, Mat3, Mat3x2, Mat3x4, Mat4x2, Mat4x3, UVec2, UVec3,
    UVec4, Vec2, Vec3, Vec4,
};

// ===== Value types =====

/// Type of a material attribute value.
///
/// Matrix types are named rows by columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MaterialAttributeType {
    /// One byte, zero or one.
    Bool,
    /// One 32-bit float.
    Float,
    /// One 32-bit unsigned integer.
    UnsignedInt,
    /// One 32-bit signed integer.
    Int,
    /// One 64-bit unsigned integer.
    UnsignedLong,
    /// One 64-bit signed integer.
    Long,
    /// Two 32-bit floats.
    Vector2,
    /// Three 32-bit floats.
    Vector3,
    /// Four 32-bit floats.
    Vector4,
    /// Two 32-bit unsigned integers.
    Vector2u,
    /// Three 32-bit unsigned integers.
    Vector3u,
    /// Four 32-bit unsigned integers.
    Vector4u,
    /// Two 32-bit signed integers.
    Vector2i,
    /// Three 32-bit signed integers.
    Vector3i,
    /// Four 32-bit signed integers.
    Vector4i,
    /// 2x2 float matrix.
    Matrix2x2,
    /// 2x3 float matrix.
    Matrix2x3,
    /// 2x4 float matrix.
    Matrix2x4,
    /// 3x2 float matrix.
    Matrix3x2,
    /// 3x3 float matrix.
    Matrix3x3,
    /// 3x4 float matrix.
    Matrix3x4,
    /// 4x2 float matrix.
    Matrix4x2,
    /// 4x3 float matrix.
    Matrix4x3,
    /// Const pointer, stored as a 64-bit address.
    Pointer,
    /// Mutable pointer, stored as a 64-bit address.
    MutablePointer,
    /// UTF-8 string with explicit length, at most 60 bytes together with
    /// the record name.
    String,
    /// Texture channel swizzle.
    TextureSwizzle,
}

impl MaterialAttributeType {
    const ALL: [MaterialAttributeType; 27] = {
        use MaterialAttributeType::*;
        [
            Bool,
            Float,
            UnsignedInt,
            Int,
            UnsignedLong,
            Long,
            Vector2,
            Vector3,
            Vector4,
            Vector2u,
            Vector3u,
            Vector4u,
            Vector2i,
            Vector3i,
            Vector4i,
            Matrix2x2,
            Matrix2x3,
            Matrix2x4,
            Matrix3x2,
            Matrix3x3,
            Matrix3x4,
            Matrix4x2,
            Matrix4x3,
            Pointer,
            MutablePointer,
            String,
            TextureSwizzle,
        ]
    };

    pub(crate) fn from_u8(value: u8) -> Self {
        Self::ALL[value as usize]
    }

    /// Get the serialized value size in bytes.
    ///
    /// # Panics
    ///
    /// Panics for [`String`](Self::String), whose size is per-value.
    pub fn size(&self) -> usize {
        use MaterialAttributeType::*;
        match self {
            Bool => 1,
            Float | UnsignedInt | Int | TextureSwizzle => 4,
            UnsignedLong | Long | Pointer | MutablePointer => 8,
            Vector2 | Vector2u | Vector2i => 8,
            Vector3 | Vector3u | Vector3i => 12,
            Vector4 | Vector4u | Vector4i | Matrix2x2 => 16,
            Matrix2x3 | Matrix3x2 => 24,
            Matrix2x4 | Matrix4x2 => 32,
            Matrix3x3 => 36,
            Matrix3x4 | Matrix4x3 => 48,
            String => panic!("the string type has no fixed size"),
        }
    }
}

/// Texture channel swizzle.
///
/// The numeric value is the channel letters packed as a little-endian
/// fourCC, so the stored bytes spell the swizzle out in an ASCII dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum TextureSwizzle {
    /// Red channel only.
    R = u32::from_le_bytes(*b"R\0\0\0"),
    /// Green channel only.
    G = u32::from_le_bytes(*b"G\0\0\0"),
    /// Blue channel only.
    B = u32::from_le_bytes(*b"B\0\0\0"),
    /// Alpha channel only.
    A = u32::from_le_bytes(*b"A\0\0\0"),
    /// Red and green.
    Rg = u32::from_le_bytes(*b"RG\0\0"),
    /// Green and blue.
    Gb = u32::from_le_bytes(*b"GB\0\0"),
    /// Blue and alpha.
    Ba = u32::from_le_bytes(*b"BA\0\0"),
    /// Red, green and blue.
    Rgb = u32::from_le_bytes(*b"RGB\0"),
    /// Green, blue and alpha.
    Gba = u32::from_le_bytes(*b"GBA\0"),
    /// All four channels.
    Rgba = u32::from_le_bytes(*b"RGBA"),
}

impl TextureSwizzle {
    const ALL: [TextureSwizzle; 10] = {
        use TextureSwizzle::*;
        [R, G, B, A, Rg, Gb, Ba, Rgb, Gba, Rgba]
    };

    /// Get the number of channels the swizzle selects.
    pub fn component_count(&self) -> usize {
        (*self as u32)
            .to_le_bytes()
            .iter()
            .filter(|byte| **byte != 0)
            .count()
    }
}

// ===== Well-known attribute names =====

/// Attribute names with agreed-on meaning and type.
///
/// Using these through [`MaterialAttributeData::new`] gets the value type
/// checked against [`expected_type`](Self::expected_type); anything else
/// goes through [`MaterialAttributeData::custom`] with a free-form name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialAttribute {
    /// Name of a material layer, `$LayerName`. [`MaterialAttributeType::String`].
    ///
    /// The `$` prefix sorts it before all regular attributes of a layer.
    LayerName,
    /// Alpha blending is enabled. [`MaterialAttributeType::Bool`].
    AlphaBlend,
    /// Alpha masking cutoff. [`MaterialAttributeType::Float`].
    AlphaMask,
    /// The material renders both faces. [`MaterialAttributeType::Bool`].
    DoubleSided,
    /// Ambient color. [`MaterialAttributeType::Vector4`].
    AmbientColor,
    /// Diffuse color. [`MaterialAttributeType::Vector4`].
    DiffuseColor,
    /// Specular color. [`MaterialAttributeType::Vector4`].
    SpecularColor,
    /// Specular exponent. [`MaterialAttributeType::Float`].
    Shininess,
    /// Ambient texture id. [`MaterialAttributeType::UnsignedInt`].
    AmbientTexture,
    /// Diffuse texture id. [`MaterialAttributeType::UnsignedInt`].
    DiffuseTexture,
    /// Specular texture id. [`MaterialAttributeType::UnsignedInt`].
    SpecularTexture,
    /// Normal map texture id. [`MaterialAttributeType::UnsignedInt`].
    NormalTexture,
    /// Channels of the normal texture holding the normal.
    /// [`MaterialAttributeType::TextureSwizzle`].
    NormalTextureSwizzle,
    /// Ambient texture coordinate transformation.
    /// [`MaterialAttributeType::Matrix3x3`].
    AmbientTextureMatrix,
    /// Diffuse texture coordinate transformation.
    /// [`MaterialAttributeType::Matrix3x3`].
    DiffuseTextureMatrix,
    /// Specular texture coordinate transformation.
    /// [`MaterialAttributeType::Matrix3x3`].
    SpecularTextureMatrix,
    /// Normal texture coordinate transformation.
    /// [`MaterialAttributeType::Matrix3x3`].
    NormalTextureMatrix,
    /// Texture coordinate transformation shared by all textures.
    /// [`MaterialAttributeType::Matrix3x3`].
    TextureMatrix,
    /// Ambient texture coordinate set. [`MaterialAttributeType::UnsignedInt`].
    AmbientTextureCoordinates,
    /// Diffuse texture coordinate set. [`MaterialAttributeType::UnsignedInt`].
    DiffuseTextureCoordinates,
    /// Specular texture coordinate set. [`MaterialAttributeType::UnsignedInt`].
    SpecularTextureCoordinates,
    /// Normal texture coordinate set. [`MaterialAttributeType::UnsignedInt`].
    NormalTextureCoordinates,
    /// Texture coordinate set shared by all textures.
    /// [`MaterialAttributeType::UnsignedInt`].
    TextureCoordinates,
}

impl MaterialAttribute {
    /// Get the attribute name as stored in records.
    pub fn name(&self) -> &'static str {
        match self {
            MaterialAttribute::LayerName => "$LayerName",
            MaterialAttribute::AlphaBlend => "AlphaBlend",
            MaterialAttribute::AlphaMask => "AlphaMask",
            MaterialAttribute::DoubleSided => "DoubleSided",
            MaterialAttribute::AmbientColor => "AmbientColor",
            MaterialAttribute::DiffuseColor => "DiffuseColor",
            MaterialAttribute::SpecularColor => "SpecularColor",
            MaterialAttribute::Shininess => "Shininess",
            MaterialAttribute::AmbientTexture => "AmbientTexture",
            MaterialAttribute::DiffuseTexture => "DiffuseTexture",
            MaterialAttribute::SpecularTexture => "SpecularTexture",
            MaterialAttribute::NormalTexture => "NormalTexture",
            MaterialAttribute::NormalTextureSwizzle => "NormalTextureSwizzle",
            MaterialAttribute::AmbientTextureMatrix => "AmbientTextureMatrix",
            MaterialAttribute::DiffuseTextureMatrix => "DiffuseTextureMatrix",
            MaterialAttribute::SpecularTextureMatrix => "SpecularTextureMatrix",
            MaterialAttribute::NormalTextureMatrix => "NormalTextureMatrix",
            MaterialAttribute::TextureMatrix => "TextureMatrix",
            MaterialAttribute::AmbientTextureCoordinates => "AmbientTextureCoordinates",
            MaterialAttribute::DiffuseTextureCoordinates => "DiffuseTextureCoordinates",
            MaterialAttribute::SpecularTextureCoordinates => "SpecularTextureCoordinates",
            MaterialAttribute::NormalTextureCoordinates => "NormalTextureCoordinates",
            MaterialAttribute::TextureCoordinates => "TextureCoordinates",
        }
    }

    /// Get the value type the name implies.
    pub fn expected_type(&self) -> MaterialAttributeType {
        use MaterialAttributeType::*;
        match self {
            MaterialAttribute::LayerName => String,
            MaterialAttribute::AlphaBlend | MaterialAttribute::DoubleSided => Bool,
            MaterialAttribute::AlphaMask | MaterialAttribute::Shininess => Float,
            MaterialAttribute::AmbientColor
            | MaterialAttribute::DiffuseColor
            | MaterialAttribute::SpecularColor => Vector4,
            MaterialAttribute::AmbientTexture
            | MaterialAttribute::DiffuseTexture
            | MaterialAttribute::SpecularTexture
            | MaterialAttribute::NormalTexture
            | MaterialAttribute::AmbientTextureCoordinates
            | MaterialAttribute::DiffuseTextureCoordinates
            | MaterialAttribute::SpecularTextureCoordinates
            | MaterialAttribute::NormalTextureCoordinates
            | MaterialAttribute::TextureCoordinates => UnsignedInt,
            MaterialAttribute::NormalTextureSwizzle => TextureSwizzle,
            MaterialAttribute::AmbientTextureMatrix
            | MaterialAttribute::DiffuseTextureMatrix
            | MaterialAttribute::SpecularTextureMatrix
            | MaterialAttribute::NormalTextureMatrix
            | MaterialAttribute::TextureMatrix => Matrix3x3,
        }
    }
}

impl AsRef<str> for MaterialAttribute {
    fn as_ref(&self) -> &str {
        self.name()
    }
}

impl fmt::Display for MaterialAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ===== Value serialization =====

/// Rust types that can be stored as a material attribute value.
pub trait MaterialValue<'a>: Sized {
    /// The matching attribute type tag.
    const TYPE: MaterialAttributeType;

    /// Get the serialized size in bytes.
    fn value_size(&self) -> usize;

    /// Serialize into a slot of exactly [`value_size`](Self::value_size)
    /// bytes.
    fn write(&self, slot: &mut [u8]);

    /// Deserialize from a value slot.
    fn read(slot: &'a [u8]) -> Self;
}

macro_rules! impl_pod_value {
    ($($type:ty => $tag:ident,)*) => {
        $(
            impl<'a> MaterialValue<'a> for $type {
                const TYPE: MaterialAttributeType = MaterialAttributeType::$tag;

                fn value_size(&self) -> usize {
                    mem::size_of::<$type>()
                }

                fn write(&self, slot: &mut [u8]) {
                    slot.copy_from_slice(bytemuck::bytes_of(self));
                }

                fn read(slot: &'a [u8]) -> Self {
                    bytemuck::pod_read_unaligned(slot)
                }
            }
        )*
    };
}

impl_pod_value! {
    f32 => Float,
    u32 => UnsignedInt,
    i32 => Int,
    u64 => UnsignedLong,
    i64 => Long,
    Vec2 => Vector2,
    Vec3 => Vector3,
    Vec4 => Vector4,
    UVec2 => Vector2u,
    UVec3 => Vector3u,
    UVec4 => Vector4u,
    IVec2 => Vector2i,
    IVec3 => Vector3i,
    IVec4 => Vector4i,
    Mat2 => Matrix2x2,
    Mat2x3 => Matrix2x3,
    Mat2x4 => Matrix2x4,
    Mat3x2 => Matrix3x2,
    Mat3 => Matrix3x3,
    Mat3x4 => Matrix3x4,
    Mat4x2 => Matrix4x2,
    Mat4x3 => Matrix4x3,
}

impl<'a> MaterialValue<'a> for bool {
    const TYPE: MaterialAttributeType = MaterialAttributeType::Bool;

    fn value_size(&self) -> usize {
        1
    }

    fn write(&self, slot: &mut [u8]) {
        slot[0] = *self as u8;
    }

    fn read(slot: &'a [u8]) -> Self {
        slot[0] != 0
    }
}

impl<'a> MaterialValue<'a> for &'a str {
    const TYPE: MaterialAttributeType = MaterialAttributeType::String;

    fn value_size(&self) -> usize {
        self.len()
    }

    fn write(&self, slot: &mut [u8]) {
        slot.copy_from_slice(self.as_bytes());
    }

    fn read(slot: &'a [u8]) -> Self {
        std::str::from_utf8(slot).expect("string value is not valid UTF-8")
    }
}

impl<'a> MaterialValue<'a> for TextureSwizzle {
    const TYPE: MaterialAttributeType = MaterialAttributeType::TextureSwizzle;

    fn value_size(&self) -> usize {
        4
    }

    fn write(&self, slot: &mut [u8]) {
        slot.copy_from_slice(&(*self as u32).to_le_bytes());
    }

    fn read(slot: &'a [u8]) -> Self {
        let value: u32 = bytemuck::pod_read_unaligned(slot);
        *TextureSwizzle::ALL
            .iter()
            .find(|swizzle| **swizzle as u32 == value)
            .expect("invalid texture swizzle")
    }
}

/// Pointers are stored as 64-bit addresses; the pointee is not inspected
/// and not checked on retrieval.
impl<'a, T: 'static> MaterialValue<'a> for *const T {
    const TYPE: MaterialAttributeType = MaterialAttributeType::Pointer;

    fn value_size(&self) -> usize {
        8
    }

    fn write(&self, slot: &mut [u8]) {
        slot.copy_from_slice(&(*self as usize as u64).to_le_bytes());
    }

    fn read(slot: &'a [u8]) -> Self {
        let address: u64 = bytemuck::pod_read_unaligned(slot);
        address as usize as *const T
    }
}

impl<'a, T: 'static> MaterialValue<'a> for *mut T {
    const TYPE: MaterialAttributeType = MaterialAttributeType::MutablePointer;

    fn value_size(&self) -> usize {
        8
    }

    fn write(&self, slot: &mut [u8]) {
        slot.copy_from_slice(&(*self as usize as u64).to_le_bytes());
    }

    fn read(slot: &'a [u8]) -> Self {
        let address: u64 = bytemuck::pod_read_unaligned(slot);
        address as usize as *mut T
    }
}

// ===== Records =====

/// One material attribute serialized into a fixed 64-byte record.
///
/// Layout: byte 0 is the [`MaterialAttributeType`] tag, the
/// null-terminated name starts at byte 1 and the value sits right-aligned
/// at the end. String values additionally store a trailing null at byte 62
/// and their length at byte 63, so embedded nulls survive. Name and value
/// share the space between tag and value slot, which caps a name at
/// `62 - size` bytes and name plus string value at 60.
#[repr(C, align(8))]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct MaterialAttributeData {
    data: [u8; 64],
}

impl MaterialAttributeData {
    /// Size of one record in bytes.
    pub const SIZE: usize = 64;

    /// Create a record with a free-form name.
    ///
    /// # Panics
    ///
    /// Panics if the name is empty, contains a null byte or does not fit
    /// into the record together with the value.
    pub fn custom<'v, T: MaterialValue<'v>>(name: &str, value: T) -> Self {
        assert!(!name.is_empty(), "name is empty");
        assert!(
            !name.as_bytes().contains(&0),
            "name {:?} contains a null byte",
            name
        );

        let mut data = [0u8; 64];
        data[0] = T::TYPE as u8;

        if T::TYPE == MaterialAttributeType::String {
            let len = value.value_size();
            assert!(
                name.len() + len + 4 <= Self::SIZE,
                "name and value too long, expected at most 60 bytes in total but got {}",
                name.len() + len
            );
            data[1..1 + name.len()].copy_from_slice(name.as_bytes());
            value.write(&mut data[62 - len..62]);
            data[63] = len as u8;
        } else {
            let size = value.value_size();
            assert!(
                name.len() + size + 2 <= Self::SIZE,
                "name {} too long, expected at most {} bytes for {:?} but got {}",
                name,
                Self::SIZE - size - 2,
                T::TYPE,
                name.len()
            );
            data[1..1 + name.len()].copy_from_slice(name.as_bytes());
            value.write(&mut data[64 - size..]);
        }

        Self { data }
    }

    /// Create a record for a well-known attribute.
    ///
    /// # Panics
    ///
    /// Panics if the value type does not match the attribute, or on the
    /// same conditions as [`custom`](Self::custom).
    pub fn new<'v, T: MaterialValue<'v>>(attribute: MaterialAttribute, value: T) -> Self {
        assert!(
            T::TYPE == attribute.expected_type(),
            "expected {:?} for {} but got {:?}",
            attribute.expected_type(),
            attribute.name(),
            T::TYPE
        );
        Self::custom(attribute.name(), value)
    }

    /// Get the attribute name.
    pub fn name(&self) -> &str {
        let bytes = &self.data[1..];
        let end = bytes
            .iter()
            .position(|byte| *byte == 0)
            .unwrap_or(bytes.len());
        std::str::from_utf8(&bytes[..end]).expect("attribute name is not valid UTF-8")
    }

    /// Get the value type.
    pub fn value_type(&self) -> MaterialAttributeType {
        MaterialAttributeType::from_u8(self.data[0])
    }

    /// Get the value deserialized as `T`.
    ///
    /// # Panics
    ///
    /// Panics if `T` does not match the stored type.
    pub fn value<'a, T: MaterialValue<'a>>(&'a self) -> T {
        let stored = self.value_type();
        if T::TYPE == MaterialAttributeType::String && stored != MaterialAttributeType::String {
            panic!("{} of {:?} can't be retrieved as a string", self.name(), stored);
        }
        assert!(
            T::TYPE == stored,
            "improper type requested for {} of {:?}",
            self.name(),
            stored
        );
        T::read(self.value_bytes())
    }

    /// Get the exact serialized value bytes.
    ///
    /// For strings this is the stored length worth of bytes, embedded
    /// nulls included; the trailing null is not part of it.
    pub fn value_bytes(&self) -> &[u8] {
        match self.value_type() {
            MaterialAttributeType::String => {
                let len = self.data[63] as usize;
                &self.data[62 - len..62]
            }
            stored => &self.data[Self::SIZE - stored.size()..],
        }
    }

    /// Get the value bytes cut off at the first embedded null.
    ///
    /// This is the C view of a string value; a string with embedded nulls
    /// comes out shorter than [`value_bytes`](Self::value_bytes). Other
    /// types are returned whole.
    pub fn value_until_nul(&self) -> &[u8] {
        let bytes = self.value_bytes();
        if self.value_type() == MaterialAttributeType::String {
            let end = bytes
                .iter()
                .position(|byte| *byte == 0)
                .unwrap_or(bytes.len());
            return &bytes[..end];
        }
        bytes
    }
}

impl fmt::Debug for MaterialAttributeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaterialAttributeData")
            .field("name", &self.name())
            .field("type", &self.value_type())
            .finish()
    }
}

// Ensure the record stays 64 bytes, 8-byte aligned.
static_assertions::const_assert_eq!(mem::size_of::<MaterialAttributeData>(), 64);
static_assertions::const_assert_eq!(mem::align_of::<MaterialAttributeData>(), 8);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_sizes_match_rust_types() {
        assert_eq!(MaterialAttributeType::Bool.size(), 1);
        assert_eq!(MaterialAttributeType::Float.size(), mem::size_of::<f32>());
        assert_eq!(MaterialAttributeType::UnsignedLong.size(), mem::size_of::<u64>());
        assert_eq!(MaterialAttributeType::Vector3.size(), mem::size_of::<Vec3>());
        assert_eq!(MaterialAttributeType::Vector4i.size(), mem::size_of::<IVec4>());
        assert_eq!(MaterialAttributeType::Matrix3x3.size(), mem::size_of::<Mat3>());
        assert_eq!(MaterialAttributeType::Matrix3x4.size(), mem::size_of::<Mat3x4>());
        assert_eq!(MaterialAttributeType::Matrix4x2.size(), mem::size_of::<Mat4x2>());
        assert_eq!(MaterialAttributeType::Pointer.size(), 8);
    }

    #[test]
    #[should_panic(expected = "the string type has no fixed size")]
    fn string_type_has_no_size() {
        MaterialAttributeType::String.size();
    }

    #[test]
    fn type_tag_roundtrip() {
        for tag in MaterialAttributeType::ALL {
            assert_eq!(MaterialAttributeType::from_u8(tag as u8), tag);
        }
    }

    #[test]
    fn swizzle_spells_itself() {
        assert_eq!(&(TextureSwizzle::Rgba as u32).to_le_bytes(), b"RGBA");
        assert_eq!(&(TextureSwizzle::Gb as u32).to_le_bytes(), b"GB\0\0");
        assert_eq!(TextureSwizzle::R.component_count(), 1);
        assert_eq!(TextureSwizzle::Rgb.component_count(), 3);
        assert_eq!(TextureSwizzle::Rgba.component_count(), 4);
    }

    #[test]
    fn well_known_names() {
        assert_eq!(MaterialAttribute::LayerName.name(), "$LayerName");
        assert_eq!(MaterialAttribute::DiffuseColor.name(), "DiffuseColor");
        assert_eq!(
            MaterialAttribute::DiffuseColor.expected_type(),
            MaterialAttributeType::Vector4
        );
        assert_eq!(
            MaterialAttribute::NormalTextureSwizzle.expected_type(),
            MaterialAttributeType::TextureSwizzle
        );
        assert_eq!(format!("{}", MaterialAttribute::AlphaMask), "AlphaMask");
    }

    #[test]
    fn record_roundtrip() {
        let record = MaterialAttributeData::new(MaterialAttribute::Shininess, 80.0f32);
        assert_eq!(record.name(), "Shininess");
        assert_eq!(record.value_type(), MaterialAttributeType::Float);
        assert_eq!(record.value::<f32>(), 80.0);

        let color = MaterialAttributeData::new(
            MaterialAttribute::DiffuseColor,
            Vec4::new(0.2, 0.4, 0.6, 1.0),
        );
        assert_eq!(color.value::<Vec4>(), Vec4::new(0.2, 0.4, 0.6, 1.0));

        let matrix = MaterialAttributeData::new(MaterialAttribute::TextureMatrix, Mat3::identity());
        assert_eq!(matrix.value::<Mat3>(), Mat3::identity());
    }

    #[test]
    fn record_layout() {
        let record = MaterialAttributeData::custom("Highlight", 0xaabbccddu32);
        assert_eq!(record.data[0], MaterialAttributeType::UnsignedInt as u8);
        assert_eq!(&record.data[1..10], b"Highlight");
        assert_eq!(record.data[10], 0);
        assert_eq!(&record.data[60..], &0xaabbccddu32.to_le_bytes());
        assert_eq!(record.value_bytes(), &0xaabbccddu32.to_le_bytes());
    }

    #[test]
    fn bool_is_one_byte() {
        let record = MaterialAttributeData::new(MaterialAttribute::DoubleSided, true);
        assert_eq!(record.value_bytes(), &[1]);
        assert_eq!(record.data[63], 1);
        assert!(record.value::<bool>());
    }

    #[test]
    fn string_record_layout() {
        let record = MaterialAttributeData::custom("Pipeline", "forward");
        assert_eq!(record.name(), "Pipeline");
        assert_eq!(record.value_type(), MaterialAttributeType::String);
        assert_eq!(record.value::<&str>(), "forward");
        assert_eq!(record.data[63], 7);
        assert_eq!(record.data[62], 0);
        assert_eq!(&record.data[55..62], b"forward");
    }

    #[test]
    fn string_with_embedded_nul() {
        let record = MaterialAttributeData::custom("Blob", "ab\0cd");
        assert_eq!(record.value::<&str>(), "ab\0cd");
        assert_eq!(record.value_bytes(), b"ab\0cd");
        assert_eq!(record.value_until_nul(), b"ab");
    }

    #[test]
    fn longest_names_fit() {
        let name = "a".repeat(58);
        let record = MaterialAttributeData::custom(name.as_str(), 1.0f32);
        assert_eq!(record.name(), name);
        assert_eq!(record.value::<f32>(), 1.0);

        let name = "b".repeat(61);
        let record = MaterialAttributeData::custom(name.as_str(), true);
        assert_eq!(record.name(), name);
    }

    #[test]
    #[should_panic(expected = "too long, expected at most 58 bytes for Float but got 59")]
    fn name_too_long() {
        MaterialAttributeData::custom("c".repeat(59).as_str(), 1.0f32);
    }

    #[test]
    #[should_panic(expected = "name and value too long, expected at most 60 bytes in total but got 61")]
    fn string_too_long() {
        MaterialAttributeData::custom("Description", "d".repeat(50).as_str());
    }

    #[test]
    #[should_panic(expected = "name is empty")]
    fn empty_name_rejected() {
        MaterialAttributeData::custom("", 1.0f32);
    }

    #[test]
    #[should_panic(expected = "contains a null byte")]
    fn nul_in_name_rejected() {
        MaterialAttributeData::custom("bad\0name", 1.0f32);
    }

    #[test]
    #[should_panic(expected = "expected Vector4 for DiffuseColor but got Float")]
    fn well_known_type_checked() {
        MaterialAttributeData::new(MaterialAttribute::DiffuseColor, 1.0f32);
    }

    #[test]
    #[should_panic(expected = "improper type requested for Shininess of Float")]
    fn wrong_value_type() {
        let record = MaterialAttributeData::new(MaterialAttribute::Shininess, 80.0f32);
        record.value::<u32>();
    }

    #[test]
    #[should_panic(expected = "Shininess of Float can't be retrieved as a string")]
    fn non_string_as_string() {
        let record = MaterialAttributeData::new(MaterialAttribute::Shininess, 80.0f32);
        record.value::<&str>();
    }

    #[test]
    fn pointer_roundtrip() {
        let target = 7u32;
        let pointer: *const u32 = &target;
        let record = MaterialAttributeData::custom("Callback", pointer);
        assert_eq!(record.value_type(), MaterialAttributeType::Pointer);
        assert_eq!(record.value::<*const u32>(), pointer);

        let mut slot = 0i64;
        let mutable: *mut i64 = &mut slot;
        let record = MaterialAttributeData::custom("Scratch", mutable);
        assert_eq!(record.value_type(), MaterialAttributeType::MutablePointer);
        assert_eq!(record.value::<*mut i64>(), mutable);
    }

    #[test]
    fn swizzle_roundtrip() {
        let record = MaterialAttributeData::new(
            MaterialAttribute::NormalTextureSwizzle,
            TextureSwizzle::Rg,
        );
        assert_eq!(record.value::<TextureSwizzle>(), TextureSwizzle::Rg);
        assert_eq!(record.value_bytes(), b"RG\0\0");
    }
}
