//! CPU-side material container.
//!
//! [`MaterialData`] is a flat array of [`MaterialAttributeData`] records
//! partitioned into layers by an offset table. Within a layer the records
//! are sorted by name, so lookup is a binary search over a contiguous
//! allocation. Both the record array and the offset table can be owned or
//! borrowed; borrowed input must arrive already sorted since the container
//! cannot mutate memory it does not own.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::mem;
use std::sync::Arc;

use bitflags::bitflags;

use crate::material::attribute::{
    MaterialAttribute, MaterialAttributeData, MaterialAttributeType, MaterialValue,
};
use crate::material::error::MaterialDataError;

bitflags! {
    /// Material models a material is classified as.
    ///
    /// The bitset is a hint for renderer dispatch, not a gate: any
    /// material can be viewed through any overlay.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MaterialTypes: u32 {
        /// Flat shading, no lighting.
        const FLAT = 1 << 0;
        /// Phong shading.
        const PHONG = 1 << 1;
        /// PBR with a metallic/roughness workflow.
        const PBR_METALLIC_ROUGHNESS = 1 << 2;
        /// PBR with a specular/glossiness workflow.
        const PBR_SPECULAR_GLOSSINESS = 1 << 3;
    }
}

/// How the rasterizer treats the alpha channel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlphaMode {
    /// Alpha is ignored.
    #[default]
    Opaque,
    /// Fragments below the cutoff are discarded.
    Mask,
    /// Alpha blending is enabled.
    Blend,
}

fn check_layer_offsets(layer_offsets: &[u32], count: usize) -> Result<(), MaterialDataError> {
    let mut previous = 0u32;
    for (layer, &end) in layer_offsets.iter().enumerate() {
        let last = layer + 1 == layer_offsets.len();
        if end < previous || end as usize > count || (last && end as usize != count) {
            return Err(MaterialDataError::InvalidLayerRange {
                layer,
                begin: previous,
                end,
                count,
            });
        }
        previous = end;
    }
    Ok(())
}

fn warn_on_base_layer_name(attributes: &[MaterialAttributeData], base_end: usize) {
    if let Some(first) = attributes[..base_end].first() {
        if first.name() == MaterialAttribute::LayerName.name() {
            log::warn!(
                "the base material has a {} attribute, it is ignored for layer lookups",
                first.name()
            );
        }
    }
}

/// Typed key/value material properties organized into ordered layers.
///
/// Construction validates the layer offset table and the per-layer name
/// ordering once; all later lookups are binary searches with no further
/// checks. The owned constructors sort each layer in place, the borrowed
/// ones require pre-sorted input. An absent offset table means a single
/// implicit layer spanning all attributes.
///
/// [`release_attribute_data`](Self::release_attribute_data) and
/// [`release_layer_data`](Self::release_layer_data) each hand one of the
/// arrays back to the caller. Afterwards [`layer_count`](Self::layer_count)
/// and [`attribute_count`](Self::attribute_count) keep answering from
/// whichever array survives, so they legitimately disagree with the
/// released side; [`is_partially_released`](Self::is_partially_released)
/// names that state.
pub struct MaterialData<'a> {
    types: MaterialTypes,
    attributes: Cow<'a, [MaterialAttributeData]>,
    layer_offsets: Cow<'a, [u32]>,
    released_attributes: bool,
    released_layers: bool,
    importer_state: Option<Arc<dyn Any + Send + Sync>>,
}

impl<'a> MaterialData<'a> {
    /// Create a single-layer material from owned attributes, sorting them
    /// by name.
    ///
    /// # Panics
    ///
    /// Panics on any validation failure, see [`try_new`](Self::try_new)
    /// for the soft variant.
    pub fn new(types: MaterialTypes, attributes: Vec<MaterialAttributeData>) -> Self {
        match Self::try_new(types, attributes) {
            Ok(material) => material,
            Err(error) => panic!("{}", error),
        }
    }

    /// Create a single-layer material from owned attributes, sorting them
    /// by name.
    pub fn try_new(
        types: MaterialTypes,
        attributes: Vec<MaterialAttributeData>,
    ) -> Result<Self, MaterialDataError> {
        Self::try_with_layers(types, attributes, Vec::new())
    }

    /// Create a layered material from owned attributes, sorting each
    /// layer in place.
    ///
    /// # Panics
    ///
    /// Panics on any validation failure, see
    /// [`try_with_layers`](Self::try_with_layers) for the soft variant.
    pub fn with_layers(
        types: MaterialTypes,
        attributes: Vec<MaterialAttributeData>,
        layer_offsets: Vec<u32>,
    ) -> Self {
        match Self::try_with_layers(types, attributes, layer_offsets) {
            Ok(material) => material,
            Err(error) => panic!("{}", error),
        }
    }

    /// Create a layered material from owned attributes, sorting each
    /// layer in place.
    ///
    /// `layer_offsets` holds one past-the-end attribute offset per layer;
    /// an empty table means a single implicit layer. The table must be
    /// non-decreasing and its last entry must equal the attribute count.
    pub fn try_with_layers(
        types: MaterialTypes,
        mut attributes: Vec<MaterialAttributeData>,
        layer_offsets: Vec<u32>,
    ) -> Result<Self, MaterialDataError> {
        check_layer_offsets(&layer_offsets, attributes.len())?;

        let whole = [attributes.len() as u32];
        let ends: &[u32] = if layer_offsets.is_empty() {
            &whole
        } else {
            &layer_offsets
        };
        let mut begin = 0usize;
        for &end in ends {
            let layer = &mut attributes[begin..end as usize];
            layer.sort_by(|a, b| a.name().cmp(b.name()));
            if let Some(pair) = layer.windows(2).find(|pair| pair[0].name() == pair[1].name()) {
                return Err(MaterialDataError::DuplicateAttribute {
                    name: pair[1].name().to_string(),
                });
            }
            begin = end as usize;
        }
        warn_on_base_layer_name(&attributes, ends[0] as usize);

        Ok(Self {
            types,
            attributes: Cow::Owned(attributes),
            layer_offsets: Cow::Owned(layer_offsets),
            released_attributes: false,
            released_layers: false,
            importer_state: None,
        })
    }

    /// Create a single-layer material over borrowed, pre-sorted
    /// attributes.
    ///
    /// # Panics
    ///
    /// Panics if the attributes are not sorted by name or a name repeats.
    pub fn borrowed(types: MaterialTypes, attributes: &'a [MaterialAttributeData]) -> Self {
        Self::borrowed_with_layers(types, attributes, &[])
    }

    /// Create a layered material over borrowed, pre-sorted attributes.
    ///
    /// The container cannot sort memory it does not own, so each layer
    /// must already be sorted by name and free of duplicates.
    ///
    /// # Panics
    ///
    /// Panics if a layer is not sorted, a name repeats within a layer or
    /// the offset table is invalid.
    pub fn borrowed_with_layers(
        types: MaterialTypes,
        attributes: &'a [MaterialAttributeData],
        layer_offsets: &'a [u32],
    ) -> Self {
        if let Err(error) = check_layer_offsets(layer_offsets, attributes.len()) {
            panic!("{}", error);
        }

        let whole = [attributes.len() as u32];
        let ends: &[u32] = if layer_offsets.is_empty() {
            &whole
        } else {
            layer_offsets
        };
        let mut begin = 0usize;
        for &end in ends {
            for pair in attributes[begin..end as usize].windows(2) {
                if pair[0].name() > pair[1].name() {
                    panic!(
                        "{}",
                        MaterialDataError::OutOfOrder {
                            previous: pair[0].name().to_string(),
                            next: pair[1].name().to_string(),
                        }
                    );
                }
                if pair[0].name() == pair[1].name() {
                    panic!(
                        "{}",
                        MaterialDataError::DuplicateAttribute {
                            name: pair[1].name().to_string(),
                        }
                    );
                }
            }
            begin = end as usize;
        }
        warn_on_base_layer_name(attributes, ends[0] as usize);

        Self {
            types,
            attributes: Cow::Borrowed(attributes),
            layer_offsets: Cow::Borrowed(layer_offsets),
            released_attributes: false,
            released_layers: false,
            importer_state: None,
        }
    }

    // ===== Material-wide properties =====

    /// Get the material type bitset.
    pub fn types(&self) -> MaterialTypes {
        self.types
    }

    /// Get the number of layers.
    pub fn layer_count(&self) -> usize {
        if self.layer_offsets.is_empty() {
            1
        } else {
            self.layer_offsets.len()
        }
    }

    /// Get the total number of attributes across all layers.
    ///
    /// Answered from the offset table when one is present, from the
    /// attribute array otherwise; after a partial release the two sides
    /// can disagree, see the type-level docs.
    pub fn attribute_count(&self) -> usize {
        match self.layer_offsets.last() {
            Some(&last) => last as usize,
            None => self.attributes.len(),
        }
    }

    /// Get the raw attribute records, all layers flattened.
    pub fn attribute_data(&self) -> &[MaterialAttributeData] {
        &self.attributes
    }

    /// Get the raw layer offset table, empty for a single implicit layer.
    pub fn layer_offsets(&self) -> &[u32] {
        &self.layer_offsets
    }

    fn layer_range(&self, layer: usize) -> (usize, usize) {
        assert!(
            layer < self.layer_count(),
            "index {} out of range for {} layers",
            layer,
            self.layer_count()
        );
        if self.layer_offsets.is_empty() {
            (0, self.attributes.len())
        } else {
            let begin = if layer == 0 {
                0
            } else {
                self.layer_offsets[layer - 1] as usize
            };
            (begin, self.layer_offsets[layer] as usize)
        }
    }

    // ===== Layer access =====

    /// Get an accessor for the given layer.
    ///
    /// # Panics
    ///
    /// Panics if `layer` is out of range.
    pub fn layer(&self, layer: usize) -> LayerRef<'_> {
        let (begin, end) = self.layer_range(layer);
        LayerRef {
            material: self,
            layer,
            begin,
            end,
        }
    }

    /// Get an accessor for the layer with the given name.
    pub fn layer_named(&self, name: &str) -> Option<LayerRef<'_>> {
        self.layer_id(name).map(|layer| self.layer(layer))
    }

    /// Get the name of the given layer.
    ///
    /// Always `None` for layer 0: a `$LayerName` attribute in the base
    /// material is deliberately ignored, keeping "the base material"
    /// distinct from "a layer named X".
    ///
    /// # Panics
    ///
    /// Panics if `layer` is out of range.
    pub fn layer_name(&self, layer: usize) -> Option<&str> {
        self.layer(layer).name()
    }

    /// Find the id of the layer with the given name, scanning from
    /// layer 1.
    pub fn layer_id(&self, name: &str) -> Option<usize> {
        (1..self.layer_count()).find(|&layer| self.layer(layer).name() == Some(name))
    }

    /// Check if a layer with the given name exists.
    pub fn has_layer(&self, name: &str) -> bool {
        self.layer_id(name).is_some()
    }

    // ===== Base layer attribute access =====

    /// Check if layer 0 has an attribute with the given name.
    pub fn has_attribute(&self, name: impl AsRef<str>) -> bool {
        self.layer(0).has_attribute(name)
    }

    /// Find the position of an attribute within layer 0.
    pub fn attribute_id(&self, name: impl AsRef<str>) -> Option<usize> {
        self.layer(0).attribute_id(name)
    }

    /// Get the name of the attribute at the given position in layer 0.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn attribute_name(&self, id: usize) -> &str {
        self.layer(0).attribute_name(id)
    }

    /// Get the type of the attribute at the given position in layer 0.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn attribute_type(&self, id: usize) -> MaterialAttributeType {
        self.layer(0).attribute_type(id)
    }

    /// Get the type of the named attribute in layer 0.
    pub fn attribute_type_of(&self, name: impl AsRef<str>) -> Option<MaterialAttributeType> {
        self.layer(0).attribute_type_of(name)
    }

    /// Get the value of the named attribute in layer 0.
    ///
    /// # Panics
    ///
    /// Panics if the attribute is absent or `T` does not match the stored
    /// type.
    pub fn attribute<'s, T: MaterialValue<'s>>(&'s self, name: impl AsRef<str>) -> T {
        self.layer(0).attribute(name)
    }

    /// Get the value of the attribute at the given position in layer 0.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range or `T` does not match the stored
    /// type.
    pub fn attribute_at<'s, T: MaterialValue<'s>>(&'s self, id: usize) -> T {
        self.layer(0).attribute_at(id)
    }

    /// Get the value of the named attribute in layer 0, or `None` when
    /// absent.
    ///
    /// # Panics
    ///
    /// Panics if the attribute is present but `T` does not match the
    /// stored type; absence and type mismatch are different failure
    /// classes.
    pub fn try_attribute<'s, T: MaterialValue<'s>>(&'s self, name: impl AsRef<str>) -> Option<T> {
        self.layer(0).try_attribute(name)
    }

    /// Get the value of the named attribute in layer 0, or `default` when
    /// absent.
    ///
    /// # Panics
    ///
    /// Panics if the attribute is present but `T` does not match the
    /// stored type.
    pub fn attribute_or<'s, T: MaterialValue<'s>>(&'s self, name: impl AsRef<str>, default: T) -> T {
        self.layer(0).attribute_or(name, default)
    }

    /// Get the exact serialized value bytes of the named attribute in
    /// layer 0.
    ///
    /// # Panics
    ///
    /// Panics if the attribute is absent.
    pub fn attribute_bytes(&self, name: impl AsRef<str>) -> &[u8] {
        self.layer(0).attribute_bytes(name)
    }

    // ===== Pipeline state =====

    /// Check if the material renders both faces. Defaults to false.
    pub fn is_double_sided(&self) -> bool {
        self.attribute_or(MaterialAttribute::DoubleSided, false)
    }

    /// Get the alpha mode implied by the alpha attributes.
    ///
    /// An `AlphaBlend` of true wins over everything; otherwise a present
    /// `AlphaMask` means masking even when an explicit `AlphaBlend` of
    /// false is also stored.
    pub fn alpha_mode(&self) -> AlphaMode {
        if self.attribute_or(MaterialAttribute::AlphaBlend, false) {
            AlphaMode::Blend
        } else if self.has_attribute(MaterialAttribute::AlphaMask) {
            AlphaMode::Mask
        } else {
            AlphaMode::Opaque
        }
    }

    /// Get the alpha masking cutoff. Defaults to 0.5.
    pub fn alpha_mask(&self) -> f32 {
        self.attribute_or(MaterialAttribute::AlphaMask, 0.5)
    }

    // ===== Ownership transfer =====

    /// Take the attribute records out of the material.
    ///
    /// The offset table stays, so [`layer_count`](Self::layer_count) and
    /// [`attribute_count`](Self::attribute_count) keep answering from it
    /// and no longer describe any stored records.
    pub fn release_attribute_data(&mut self) -> Cow<'a, [MaterialAttributeData]> {
        self.released_attributes = true;
        mem::replace(&mut self.attributes, Cow::Borrowed(&[]))
    }

    /// Take the layer offset table out of the material.
    ///
    /// The material degenerates to a single implicit layer:
    /// [`layer_count`](Self::layer_count) reports 1 and
    /// [`attribute_count`](Self::attribute_count) the total flat count.
    pub fn release_layer_data(&mut self) -> Cow<'a, [u32]> {
        self.released_layers = true;
        mem::replace(&mut self.layer_offsets, Cow::Borrowed(&[]))
    }

    /// Check if either array was released and the counts are approximate.
    pub fn is_partially_released(&self) -> bool {
        self.released_attributes || self.released_layers
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

impl fmt::Debug for MaterialData<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaterialData")
            .field("types", &self.types)
            .field("layer_offsets", &self.layer_offsets)
            .field("attributes", &self.attributes)
            .finish()
    }
}

// Ensure the container can be handed between worker threads.
static_assertions::assert_impl_all!(MaterialData<'static>: Send, Sync);

/// Accessor for one layer of a [`MaterialData`].
///
/// Positions are layer-relative; name lookup is a binary search over the
/// layer's sorted slice.
#[derive(Clone, Copy)]
pub struct LayerRef<'a> {
    material: &'a MaterialData<'a>,
    layer: usize,
    begin: usize,
    end: usize,
}

impl<'a> LayerRef<'a> {
    /// Get the layer id.
    pub fn id(&self) -> usize {
        self.layer
    }

    /// Get the number of attributes in the layer.
    pub fn attribute_count(&self) -> usize {
        self.end - self.begin
    }

    fn attributes(&self) -> &'a [MaterialAttributeData] {
        &self.material.attributes[self.begin..self.end]
    }

    /// Get the layer name, always `None` for layer 0.
    pub fn name(&self) -> Option<&'a str> {
        if self.layer == 0 {
            return None;
        }
        let first = self.attributes().first()?;
        if first.name() == MaterialAttribute::LayerName.name() {
            Some(first.value::<&str>())
        } else {
            None
        }
    }

    /// Find the layer-relative position of the named attribute.
    pub fn attribute_id(&self, name: impl AsRef<str>) -> Option<usize> {
        let name = name.as_ref();
        let attributes = self.attributes();
        let id = attributes.partition_point(|attribute| attribute.name() < name);
        (id < attributes.len() && attributes[id].name() == name).then_some(id)
    }

    /// Check if the layer has an attribute with the given name.
    pub fn has_attribute(&self, name: impl AsRef<str>) -> bool {
        self.attribute_id(name).is_some()
    }

    fn attribute_checked(&self, id: usize) -> &'a MaterialAttributeData {
        assert!(
            id < self.attribute_count(),
            "index {} out of range for {} attributes in layer {}",
            id,
            self.attribute_count(),
            self.layer
        );
        &self.attributes()[id]
    }

    fn require(&self, name: &str) -> &'a MaterialAttributeData {
        match self.attribute_id(name) {
            Some(id) => &self.attributes()[id],
            None => panic!("attribute {} not found in layer {}", name, self.layer),
        }
    }

    /// Get the name of the attribute at the given position.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn attribute_name(&self, id: usize) -> &'a str {
        self.attribute_checked(id).name()
    }

    /// Get the type of the attribute at the given position.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn attribute_type(&self, id: usize) -> MaterialAttributeType {
        self.attribute_checked(id).value_type()
    }

    /// Get the type of the named attribute.
    pub fn attribute_type_of(&self, name: impl AsRef<str>) -> Option<MaterialAttributeType> {
        self.attribute_id(name)
            .map(|id| self.attributes()[id].value_type())
    }

    /// Get the raw record at the given position.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn attribute_data(&self, id: usize) -> &'a MaterialAttributeData {
        self.attribute_checked(id)
    }

    /// Get the value of the named attribute.
    ///
    /// # Panics
    ///
    /// Panics if the attribute is absent or `T` does not match the stored
    /// type. A pointer value can be read back with any pointee type, the
    /// pointee is not recorded.
    pub fn attribute<T: MaterialValue<'a>>(&self, name: impl AsRef<str>) -> T {
        self.require(name.as_ref()).value::<T>()
    }

    /// Get the value of the attribute at the given position.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range or `T` does not match the stored
    /// type.
    pub fn attribute_at<T: MaterialValue<'a>>(&self, id: usize) -> T {
        self.attribute_checked(id).value::<T>()
    }

    /// Get the value of the named attribute, or `None` when absent.
    ///
    /// # Panics
    ///
    /// Panics if the attribute is present but `T` does not match the
    /// stored type.
    pub fn try_attribute<T: MaterialValue<'a>>(&self, name: impl AsRef<str>) -> Option<T> {
        self.attribute_id(name)
            .map(|id| self.attributes()[id].value::<T>())
    }

    /// Get the value of the named attribute, or `default` when absent.
    ///
    /// # Panics
    ///
    /// Panics if the attribute is present but `T` does not match the
    /// stored type.
    pub fn attribute_or<T: MaterialValue<'a>>(&self, name: impl AsRef<str>, default: T) -> T {
        self.try_attribute(name).unwrap_or(default)
    }

    /// Get the exact serialized value bytes of the named attribute.
    ///
    /// # Panics
    ///
    /// Panics if the attribute is absent.
    pub fn attribute_bytes(&self, name: impl AsRef<str>) -> &'a [u8] {
        self.require(name.as_ref()).value_bytes()
    }
}

impl fmt::Debug for LayerRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerRef")
            .field("layer", &self.layer)
            .field("attributes", &self.attributes())
            .finish()
    }
}
