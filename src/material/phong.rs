//! Phong shading view over a material.

use crate::material::attribute::MaterialAttribute;
use crate::material::data::{AlphaMode, MaterialData};
use crate::math::{Mat3, Vec4};

/// Read-only reinterpretation of a material through the well-known Phong
/// attribute names.
///
/// The view is stateless; every accessor answers from the base layer of
/// the wrapped [`MaterialData`] with a documented default when the
/// attribute is absent. Any material can be viewed as Phong regardless of
/// its [`types()`](MaterialData::types) bitset, which is a classification
/// hint rather than a gate.
///
/// Texture transformation and coordinate-set accessors fall back from the
/// per-slot attribute to the shared [`MaterialAttribute::TextureMatrix`] /
/// [`MaterialAttribute::TextureCoordinates`] and finally to identity / 0,
/// but panic when the texture they belong to is itself absent.
#[derive(Debug, Clone, Copy)]
pub struct PhongMaterial<'a> {
    material: &'a MaterialData<'a>,
}

impl<'a> PhongMaterial<'a> {
    /// View a material as Phong.
    pub fn new(material: &'a MaterialData<'a>) -> Self {
        Self { material }
    }

    /// Get the wrapped material.
    pub fn material(&self) -> &'a MaterialData<'a> {
        self.material
    }

    // ===== Colors =====

    /// Get the ambient color.
    ///
    /// Defaults to black without an ambient texture and to white with
    /// one, so an untinted texture comes through unchanged.
    pub fn ambient_color(&self) -> Vec4 {
        let default = if self.has_ambient_texture() {
            Vec4::new(1.0, 1.0, 1.0, 1.0)
        } else {
            Vec4::new(0.0, 0.0, 0.0, 1.0)
        };
        self.material
            .attribute_or(MaterialAttribute::AmbientColor, default)
    }

    /// Get the diffuse color. Defaults to white.
    pub fn diffuse_color(&self) -> Vec4 {
        self.material
            .attribute_or(MaterialAttribute::DiffuseColor, Vec4::new(1.0, 1.0, 1.0, 1.0))
    }

    /// Get the specular color. Defaults to white.
    pub fn specular_color(&self) -> Vec4 {
        self.material
            .attribute_or(MaterialAttribute::SpecularColor, Vec4::new(1.0, 1.0, 1.0, 1.0))
    }

    /// Get the specular exponent. Defaults to 80.
    pub fn shininess(&self) -> f32 {
        self.material.attribute_or(MaterialAttribute::Shininess, 80.0)
    }

    // ===== Textures =====

    /// Check if an ambient texture is present.
    pub fn has_ambient_texture(&self) -> bool {
        self.material.has_attribute(MaterialAttribute::AmbientTexture)
    }

    /// Check if a diffuse texture is present.
    pub fn has_diffuse_texture(&self) -> bool {
        self.material.has_attribute(MaterialAttribute::DiffuseTexture)
    }

    /// Check if a specular texture is present.
    pub fn has_specular_texture(&self) -> bool {
        self.material.has_attribute(MaterialAttribute::SpecularTexture)
    }

    /// Check if a normal texture is present.
    pub fn has_normal_texture(&self) -> bool {
        self.material.has_attribute(MaterialAttribute::NormalTexture)
    }

    /// Get the ambient texture id.
    ///
    /// # Panics
    ///
    /// Panics if the attribute is absent.
    pub fn ambient_texture(&self) -> u32 {
        self.material.attribute(MaterialAttribute::AmbientTexture)
    }

    /// Get the diffuse texture id.
    ///
    /// # Panics
    ///
    /// Panics if the attribute is absent.
    pub fn diffuse_texture(&self) -> u32 {
        self.material.attribute(MaterialAttribute::DiffuseTexture)
    }

    /// Get the specular texture id.
    ///
    /// # Panics
    ///
    /// Panics if the attribute is absent.
    pub fn specular_texture(&self) -> u32 {
        self.material.attribute(MaterialAttribute::SpecularTexture)
    }

    /// Get the normal texture id.
    ///
    /// # Panics
    ///
    /// Panics if the attribute is absent.
    pub fn normal_texture(&self) -> u32 {
        self.material.attribute(MaterialAttribute::NormalTexture)
    }

    // ===== Texture transformation =====

    fn slot_matrix(&self, present: bool, slot: MaterialAttribute, missing: &str) -> Mat3 {
        assert!(present, "the material doesn't have {}", missing);
        match self.material.try_attribute::<Mat3>(slot) {
            Some(matrix) => matrix,
            None => self.texture_matrix(),
        }
    }

    fn slot_coordinates(&self, present: bool, slot: MaterialAttribute, missing: &str) -> u32 {
        assert!(present, "the material doesn't have {}", missing);
        match self.material.try_attribute::<u32>(slot) {
            Some(set) => set,
            None => self.texture_coordinates(),
        }
    }

    /// Get the shared texture coordinate transformation. Defaults to
    /// identity.
    pub fn texture_matrix(&self) -> Mat3 {
        self.material
            .attribute_or(MaterialAttribute::TextureMatrix, Mat3::identity())
    }

    /// Get the shared texture coordinate set. Defaults to 0.
    pub fn texture_coordinates(&self) -> u32 {
        self.material
            .attribute_or(MaterialAttribute::TextureCoordinates, 0)
    }

    /// Get the ambient texture transformation, falling back to the shared
    /// matrix and then identity.
    ///
    /// # Panics
    ///
    /// Panics if there is no ambient texture.
    pub fn ambient_texture_matrix(&self) -> Mat3 {
        self.slot_matrix(
            self.has_ambient_texture(),
            MaterialAttribute::AmbientTextureMatrix,
            "an ambient texture",
        )
    }

    /// Get the diffuse texture transformation, falling back to the shared
    /// matrix and then identity.
    ///
    /// # Panics
    ///
    /// Panics if there is no diffuse texture.
    pub fn diffuse_texture_matrix(&self) -> Mat3 {
        self.slot_matrix(
            self.has_diffuse_texture(),
            MaterialAttribute::DiffuseTextureMatrix,
            "a diffuse texture",
        )
    }

    /// Get the specular texture transformation, falling back to the
    /// shared matrix and then identity.
    ///
    /// # Panics
    ///
    /// Panics if there is no specular texture.
    pub fn specular_texture_matrix(&self) -> Mat3 {
        self.slot_matrix(
            self.has_specular_texture(),
            MaterialAttribute::SpecularTextureMatrix,
            "a specular texture",
        )
    }

    /// Get the normal texture transformation, falling back to the shared
    /// matrix and then identity.
    ///
    /// # Panics
    ///
    /// Panics if there is no normal texture.
    pub fn normal_texture_matrix(&self) -> Mat3 {
        self.slot_matrix(
            self.has_normal_texture(),
            MaterialAttribute::NormalTextureMatrix,
            "a normal texture",
        )
    }

    /// Get the ambient texture coordinate set, falling back to the shared
    /// set and then 0.
    ///
    /// # Panics
    ///
    /// Panics if there is no ambient texture.
    pub fn ambient_texture_coordinates(&self) -> u32 {
        self.slot_coordinates(
            self.has_ambient_texture(),
            MaterialAttribute::AmbientTextureCoordinates,
            "an ambient texture",
        )
    }

    /// Get the diffuse texture coordinate set, falling back to the shared
    /// set and then 0.
    ///
    /// # Panics
    ///
    /// Panics if there is no diffuse texture.
    pub fn diffuse_texture_coordinates(&self) -> u32 {
        self.slot_coordinates(
            self.has_diffuse_texture(),
            MaterialAttribute::DiffuseTextureCoordinates,
            "a diffuse texture",
        )
    }

    /// Get the specular texture coordinate set, falling back to the
    /// shared set and then 0.
    ///
    /// # Panics
    ///
    /// Panics if there is no specular texture.
    pub fn specular_texture_coordinates(&self) -> u32 {
        self.slot_coordinates(
            self.has_specular_texture(),
            MaterialAttribute::SpecularTextureCoordinates,
            "a specular texture",
        )
    }

    /// Get the normal texture coordinate set, falling back to the shared
    /// set and then 0.
    ///
    /// # Panics
    ///
    /// Panics if there is no normal texture.
    pub fn normal_texture_coordinates(&self) -> u32 {
        self.slot_coordinates(
            self.has_normal_texture(),
            MaterialAttribute::NormalTextureCoordinates,
            "a normal texture",
        )
    }

    /// Check if any texture transformation attribute is present, per-slot
    /// or shared.
    pub fn has_texture_transformation(&self) -> bool {
        [
            MaterialAttribute::AmbientTextureMatrix,
            MaterialAttribute::DiffuseTextureMatrix,
            MaterialAttribute::SpecularTextureMatrix,
            MaterialAttribute::NormalTextureMatrix,
            MaterialAttribute::TextureMatrix,
        ]
        .iter()
        .any(|&attribute| self.material.has_attribute(attribute))
    }

    /// Check if any texture coordinate set attribute is present, per-slot
    /// or shared.
    pub fn has_texture_coordinates(&self) -> bool {
        [
            MaterialAttribute::AmbientTextureCoordinates,
            MaterialAttribute::DiffuseTextureCoordinates,
            MaterialAttribute::SpecularTextureCoordinates,
            MaterialAttribute::NormalTextureCoordinates,
            MaterialAttribute::TextureCoordinates,
        ]
        .iter()
        .any(|&attribute| self.material.has_attribute(attribute))
    }

    // ===== Pipeline state =====

    /// Check if the material renders both faces. Defaults to false.
    pub fn is_double_sided(&self) -> bool {
        self.material.is_double_sided()
    }

    /// Get the alpha mode, see [`MaterialData::alpha_mode`].
    pub fn alpha_mode(&self) -> AlphaMode {
        self.material.alpha_mode()
    }

    /// Get the alpha masking cutoff. Defaults to 0.5.
    pub fn alpha_mask(&self) -> f32 {
        self.material.alpha_mask()
    }
}

impl<'a> From<&'a MaterialData<'a>> for PhongMaterial<'a> {
    fn from(material: &'a MaterialData<'a>) -> Self {
        Self::new(material)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::attribute::MaterialAttributeData;
    use crate::material::data::MaterialTypes;

    fn textured() -> MaterialData<'static> {
        MaterialData::new(
            MaterialTypes::PHONG,
            vec![
                MaterialAttributeData::new(MaterialAttribute::DiffuseTexture, 7u32),
                MaterialAttributeData::new(MaterialAttribute::AmbientTexture, 3u32),
                MaterialAttributeData::new(
                    MaterialAttribute::AmbientColor,
                    Vec4::new(0.1, 0.2, 0.3, 1.0),
                ),
            ],
        )
    }

    #[test]
    fn defaults_on_empty_material() {
        let material = MaterialData::new(MaterialTypes::empty(), Vec::new());
        let phong = PhongMaterial::new(&material);
        assert_eq!(phong.ambient_color(), Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(phong.diffuse_color(), Vec4::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(phong.specular_color(), Vec4::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(phong.shininess(), 80.0);
        assert!(!phong.has_ambient_texture());
        assert!(!phong.has_texture_transformation());
        assert!(!phong.has_texture_coordinates());
        assert_eq!(phong.texture_matrix(), Mat3::identity());
        assert_eq!(phong.texture_coordinates(), 0);
        assert_eq!(phong.alpha_mode(), AlphaMode::Opaque);
        assert!(!phong.is_double_sided());
    }

    #[test]
    fn ambient_default_flips_with_texture() {
        let material = MaterialData::new(
            MaterialTypes::PHONG,
            vec![MaterialAttributeData::new(MaterialAttribute::AmbientTexture, 3u32)],
        );
        let phong = PhongMaterial::new(&material);
        // An untinted ambient texture must come through unchanged.
        assert_eq!(phong.ambient_color(), Vec4::new(1.0, 1.0, 1.0, 1.0));

        let material = textured();
        let phong = PhongMaterial::new(&material);
        assert_eq!(phong.ambient_color(), Vec4::new(0.1, 0.2, 0.3, 1.0));
    }

    #[test]
    fn texture_ids() {
        let material = textured();
        let phong = PhongMaterial::new(&material);
        assert!(phong.has_ambient_texture());
        assert!(phong.has_diffuse_texture());
        assert!(!phong.has_specular_texture());
        assert!(!phong.has_normal_texture());
        assert_eq!(phong.ambient_texture(), 3);
        assert_eq!(phong.diffuse_texture(), 7);
    }

    #[test]
    #[should_panic(expected = "attribute SpecularTexture not found in layer 0")]
    fn absent_texture_panics() {
        let material = textured();
        PhongMaterial::new(&material).specular_texture();
    }

    #[test]
    fn per_slot_matrix_wins_over_shared() {
        let slot = Mat3::new(2.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 1.0);
        let shared = Mat3::new(1.0, 0.0, 0.5, 0.0, 1.0, 0.5, 0.0, 0.0, 1.0);
        let material = MaterialData::new(
            MaterialTypes::PHONG,
            vec![
                MaterialAttributeData::new(MaterialAttribute::AmbientTexture, 3u32),
                MaterialAttributeData::new(MaterialAttribute::DiffuseTexture, 7u32),
                MaterialAttributeData::new(MaterialAttribute::AmbientTextureMatrix, slot),
                MaterialAttributeData::new(MaterialAttribute::TextureMatrix, shared),
            ],
        );
        let phong = PhongMaterial::new(&material);
        assert_eq!(phong.ambient_texture_matrix(), slot);
        // No per-slot matrix for the diffuse texture, the shared one wins.
        assert_eq!(phong.diffuse_texture_matrix(), shared);
        assert!(phong.has_texture_transformation());
    }

    #[test]
    fn coordinate_set_fallback_chain() {
        let material = MaterialData::new(
            MaterialTypes::PHONG,
            vec![
                MaterialAttributeData::new(MaterialAttribute::AmbientTexture, 3u32),
                MaterialAttributeData::new(MaterialAttribute::DiffuseTexture, 7u32),
                MaterialAttributeData::new(MaterialAttribute::AmbientTextureCoordinates, 2u32),
                MaterialAttributeData::new(MaterialAttribute::TextureCoordinates, 1u32),
            ],
        );
        let phong = PhongMaterial::new(&material);
        assert_eq!(phong.ambient_texture_coordinates(), 2);
        assert_eq!(phong.diffuse_texture_coordinates(), 1);
        assert!(phong.has_texture_coordinates());

        // Without the shared set the final fallback is set 0.
        let material = MaterialData::new(
            MaterialTypes::PHONG,
            vec![MaterialAttributeData::new(MaterialAttribute::DiffuseTexture, 7u32)],
        );
        let phong = PhongMaterial::new(&material);
        assert_eq!(phong.diffuse_texture_coordinates(), 0);
        assert!(!phong.has_texture_coordinates());
    }

    #[test]
    #[should_panic(expected = "the material doesn't have a normal texture")]
    fn matrix_without_texture_panics() {
        let material = MaterialData::new(
            MaterialTypes::PHONG,
            vec![MaterialAttributeData::new(
                MaterialAttribute::NormalTextureMatrix,
                Mat3::identity(),
            )],
        );
        PhongMaterial::new(&material).normal_texture_matrix();
    }

    #[test]
    #[should_panic(expected = "the material doesn't have an ambient texture")]
    fn coordinates_without_texture_panics() {
        let material = MaterialData::new(MaterialTypes::PHONG, Vec::new());
        PhongMaterial::new(&material).ambient_texture_coordinates();
    }

    #[test]
    fn pipeline_state_delegates() {
        let material = MaterialData::new(
            MaterialTypes::PHONG,
            vec![
                MaterialAttributeData::new(MaterialAttribute::DoubleSided, true),
                MaterialAttributeData::new(MaterialAttribute::AlphaMask, 0.75f32),
            ],
        );
        let phong = PhongMaterial::from(&material);
        assert!(phong.is_double_sided());
        assert_eq!(phong.alpha_mode(), AlphaMode::Mask);
        assert_eq!(phong.alpha_mask(), 0.75);
    }
}
