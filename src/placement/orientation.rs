use std::f64::consts::FRAC_PI_2;

use crate::math::{Rotation, Vector3, VectorExt};

/// Tangents with `|y|` above this are treated as straight up or down.
pub const VERTICAL_THRESHOLD: f64 = 0.99;

/// Turns a direction of travel into the rotation of a placed element.
///
/// The element's local forward axis is `+Z` and world up is `+Y`. A tangent
/// `t` maps to `R_y(yaw) * R_x(pitch) * offset` with `yaw = atan2(t.x, t.z)` and
/// `pitch = -asin(t.y)`, so without the offset the element's forward axis
/// lands exactly on `t`.
///
/// Near-vertical tangents have no meaningful yaw. Above
/// [`VERTICAL_THRESHOLD`] the yaw is fixed to zero and only the sign of `t.y`
/// picks the rotation.
///
/// `offset` is the element's own default facing relative to its geometry and
/// is applied in the element's local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    element_offset: Rotation,
}

impl Default for Orientation {
    /// Quarter turn about the forward axis, matching chain-link models that
    /// are authored lying flat.
    fn default() -> Self {
        Self::new(Rotation::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2))
    }
}

impl Orientation {
    /// Creates an orientation calculator with the given element offset.
    #[must_use]
    pub fn new(element_offset: Rotation) -> Self {
        Self { element_offset }
    }

    /// Creates an orientation calculator without an element offset.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(Rotation::identity())
    }

    /// Returns the element offset.
    #[must_use]
    pub fn element_offset(&self) -> &Rotation {
        &self.element_offset
    }

    /// Returns the rotation for a tangent. The tangent need not be unit length.
    #[must_use]
    pub fn orient(&self, tangent: &Vector3) -> Rotation {
        let dir = tangent.normalize_or_zero();
        if dir.y.abs() > VERTICAL_THRESHOLD {
            return self.vertical(dir.y > 0.0);
        }

        let yaw = dir.x.atan2(dir.z);
        let pitch = -dir.y.clamp(-1.0, 1.0).asin();
        Self::yaw_pitch(yaw, pitch) * self.element_offset
    }

    /// Returns the fixed rotation used for straight-up (`up = true`) or
    /// straight-down tangents.
    #[must_use]
    pub fn vertical(&self, up: bool) -> Rotation {
        let pitch = if up { -FRAC_PI_2 } else { FRAC_PI_2 };
        Self::yaw_pitch(0.0, pitch) * self.element_offset
    }

    fn yaw_pitch(yaw: f64, pitch: f64) -> Rotation {
        Rotation::from_axis_angle(&Vector3::y_axis(), yaw)
            * Rotation::from_axis_angle(&Vector3::x_axis(), pitch)
    }
}
