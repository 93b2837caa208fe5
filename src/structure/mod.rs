mod params;

pub use params::StructureParams;

use slotmap::SlotMap;
use tracing::debug;

use crate::error::StructureError;
use crate::math::Point3;
use crate::placement::{PlacementPipeline, PlacementPlan};

slotmap::new_key_type! {
    /// Unique identifier for a structure in the store.
    pub struct StructureId;
}

/// Data associated with a placed structure.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureData {
    /// Display name.
    pub name: String,
    /// Opaque id of whoever created the structure, if known.
    pub owner: Option<String>,
    /// Inputs the plan is regenerated from.
    pub params: StructureParams,
    /// Id of the preset the structure was created from, if any.
    pub preset: Option<String>,
    /// Hidden structures keep their parameters but are not rendered.
    pub visible: bool,
}

impl StructureData {
    /// Creates a visible structure without a preset.
    #[must_use]
    pub fn new(name: impl Into<String>, params: StructureParams) -> Self {
        Self {
            name: name.into(),
            owner: None,
            params,
            preset: None,
            visible: true,
        }
    }

    /// Sets the owner id.
    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Returns `true` if either anchor lies within `radius` of `center`.
    #[must_use]
    pub fn is_near(&self, center: &Point3, radius: f64) -> bool {
        nalgebra::distance(center, &self.params.start) <= radius
            || nalgebra::distance(center, &self.params.end) <= radius
    }

    /// Sets the preset id.
    #[must_use]
    pub fn with_preset(mut self, preset: impl Into<String>) -> Self {
        self.preset = Some(preset.into());
        self
    }
}

/// Arena that owns all structures.
///
/// Structures are referenced by generational [`StructureId`]s, so a stale id
/// from a removed structure is reported as missing instead of aliasing a new
/// one.
#[derive(Debug, Default)]
pub struct StructureStore {
    structures: SlotMap<StructureId, StructureData>,
    pipeline: PlacementPipeline,
}

impl StructureStore {
    /// Creates a new, empty store using the default placement pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new, empty store that plans with `pipeline`.
    #[must_use]
    pub fn with_pipeline(pipeline: PlacementPipeline) -> Self {
        Self {
            structures: SlotMap::with_key(),
            pipeline,
        }
    }

    /// Inserts a structure and returns its ID.
    pub fn add(&mut self, data: StructureData) -> StructureId {
        let id = self.structures.insert(data);
        debug!(?id, "added structure");
        id
    }

    /// Returns a reference to the structure data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the structure is not in the store.
    pub fn structure(&self, id: StructureId) -> Result<&StructureData, StructureError> {
        self.structures.get(id).ok_or(StructureError::NotFound)
    }

    /// Returns a mutable reference to the structure data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the structure is not in the store.
    pub fn structure_mut(&mut self, id: StructureId) -> Result<&mut StructureData, StructureError> {
        self.structures.get_mut(id).ok_or(StructureError::NotFound)
    }

    /// Removes a structure and returns its data.
    ///
    /// # Errors
    ///
    /// Returns an error if the structure is not in the store.
    pub fn remove(&mut self, id: StructureId) -> Result<StructureData, StructureError> {
        let data = self.structures.remove(id).ok_or(StructureError::NotFound)?;
        debug!(?id, "removed structure");
        Ok(data)
    }

    /// Iterates over all structures.
    pub fn iter(&self) -> impl Iterator<Item = (StructureId, &StructureData)> {
        self.structures.iter()
    }

    /// Iterates over the structures owned by `owner`.
    pub fn by_owner<'a>(
        &'a self,
        owner: &'a str,
    ) -> impl Iterator<Item = (StructureId, &'a StructureData)> + 'a {
        self.structures
            .iter()
            .filter(move |(_, data)| data.owner.as_deref() == Some(owner))
    }

    /// Iterates over the structures of `owner` whose name contains `partial`,
    /// ignoring case.
    pub fn find_by_name<'a>(
        &'a self,
        owner: &'a str,
        partial: &str,
    ) -> impl Iterator<Item = (StructureId, &'a StructureData)> + 'a {
        let needle = partial.to_lowercase();
        self.by_owner(owner)
            .filter(move |(_, data)| data.name.to_lowercase().contains(&needle))
    }

    /// Iterates over the structures with an anchor within `radius` of `center`.
    pub fn in_area(
        &self,
        center: Point3,
        radius: f64,
    ) -> impl Iterator<Item = (StructureId, &StructureData)> + '_ {
        self.structures
            .iter()
            .filter(move |(_, data)| data.is_near(&center, radius))
    }

    /// Returns the number of structures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.structures.len()
    }

    /// Returns `true` if the store holds no structures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    /// Computes a fresh placement plan for a structure.
    ///
    /// # Errors
    ///
    /// Returns an error if the structure is not in the store.
    pub fn plan(&self, id: StructureId) -> Result<PlacementPlan, StructureError> {
        let data = self.structure(id)?;
        Ok(data.params.plan(&self.pipeline))
    }

    /// Computes plans for every visible structure.
    pub fn visible_plans(&self) -> impl Iterator<Item = (StructureId, PlacementPlan)> + '_ {
        self.structures
            .iter()
            .filter(|(_, data)| data.visible)
            .map(|(id, data)| (id, data.params.plan(&self.pipeline)))
    }
}
