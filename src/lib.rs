//! # Larkspur Assets
//!
//! CPU-side mesh and material data containers for Larkspur Engine.
//!
//! The crate is the in-memory representation layer between asset importers
//! and the renderer: [`mesh::MeshData`] holds raw index/vertex buffers with
//! typed, named attribute descriptors, [`material::MaterialData`] holds
//! arbitrary typed key/value properties organized into ordered layers.
//! Buffers can be owned or borrowed, see [`buffer::BufferData`].

pub mod buffer;
pub mod material;
pub mod math;
pub mod mesh;

/// Assets library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the library version at startup.
pub fn init() {
    log::info!("Larkspur Assets v{} initialized", VERSION);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
