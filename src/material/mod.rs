//! Material data containers and attribute records.
//!
//! The central type is [`MaterialData`], a flat, layer-partitioned array
//! of fixed-size [`MaterialAttributeData`] records looked up by name or
//! position. [`PhongMaterial`] reinterprets any material through the
//! well-known Phong attribute names with documented defaults.

mod attribute;
mod data;
mod error;
mod phong;

pub use attribute::{
    MaterialAttribute, MaterialAttributeData, MaterialAttributeType, MaterialValue, TextureSwizzle,
};
pub use data::{AlphaMode, LayerRef, MaterialData, MaterialTypes};
pub use error::MaterialDataError;
pub use phong::PhongMaterial;
