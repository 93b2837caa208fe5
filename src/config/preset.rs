use serde::{Deserialize, Serialize};

use crate::math::{Rotation, Vector3};

use super::PlacementParams;

/// Rotation given as degrees about the X, Y and Z axes.
///
/// Applied in that order in the element's local frame: `R_x * R_y * R_z`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EulerDegrees {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl EulerDegrees {
    /// Creates a new set of angles in degrees.
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Converts the angles to a rotation.
    #[must_use]
    pub fn to_rotation(&self) -> Rotation {
        Rotation::from_axis_angle(&Vector3::x_axis(), self.x.to_radians())
            * Rotation::from_axis_angle(&Vector3::y_axis(), self.y.to_radians())
            * Rotation::from_axis_angle(&Vector3::z_axis(), self.z.to_radians())
    }
}

/// How the renderer should display an element.
///
/// The placement pipeline never looks at this; it is carried for the
/// renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderableKind {
    Block,
    #[default]
    Item,
}

/// The element placed at every render point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderItem {
    /// Material or model name understood by the renderer.
    pub material: String,
    pub kind: RenderableKind,
    /// Uniform scale.
    pub scale: f64,
    /// Extra local rotation of the element model.
    pub rotation: EulerDegrees,
}

impl Default for RenderItem {
    fn default() -> Self {
        Self {
            material: "CHAIN".to_owned(),
            kind: RenderableKind::Item,
            scale: 1.0,
            rotation: EulerDegrees::default(),
        }
    }
}

impl RenderItem {
    /// Creates an unrotated, unscaled render item.
    #[must_use]
    pub fn new(material: impl Into<String>, kind: RenderableKind) -> Self {
        Self {
            material: material.into(),
            kind,
            ..Self::default()
        }
    }

    /// Returns the model rotation the renderer applies on top of the
    /// placement orientation.
    #[must_use]
    pub fn local_rotation(&self) -> Rotation {
        self.rotation.to_rotation()
    }
}

/// A named set of default parameters and a render item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preset {
    /// Display name.
    pub name: String,
    pub description: String,
    #[serde(flatten)]
    pub render_item: RenderItem,
    /// Starting slack, segment count and spacing for new structures.
    #[serde(flatten)]
    pub params: PlacementParams,
    /// Icon material; the render item's material when absent.
    pub icon: Option<String>,
    pub require_permission: bool,
}

impl Preset {
    /// Returns the icon material.
    #[must_use]
    pub fn icon(&self) -> &str {
        self.icon.as_deref().unwrap_or(&self.render_item.material)
    }
}

/// Presets installed when a configuration defines none.
#[must_use]
pub fn builtin_presets() -> Vec<(String, Preset)> {
    let preset = |id: &str, name: &str, description: &str, item: RenderItem, params, icon: &str| {
        (
            id.to_owned(),
            Preset {
                name: name.to_owned(),
                description: description.to_owned(),
                render_item: item,
                params,
                icon: Some(icon.to_owned()),
                require_permission: false,
            },
        )
    };

    vec![
        preset(
            "chain",
            "Chain",
            "Standard hanging chain",
            RenderItem::new("CHAIN", RenderableKind::Item),
            PlacementParams::new(0.3, 10, 0.5),
            "CHAIN",
        ),
        preset(
            "lantern",
            "Lantern",
            "String of hanging lanterns",
            RenderItem::new("LANTERN", RenderableKind::Item),
            PlacementParams::new(0.2, 8, 2.0),
            "LANTERN",
        ),
        preset(
            "powerline",
            "Power line",
            "High-voltage cable",
            RenderItem::new("BLACK_WOOL", RenderableKind::Block),
            PlacementParams::new(0.15, 15, 1.0),
            "LIGHTNING_ROD",
        ),
    ]
}
