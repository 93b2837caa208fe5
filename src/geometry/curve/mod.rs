mod catenary;

pub use catenary::Catenary;

use crate::math::{Point3, Vector3};

/// Parameter domain for a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveDomain {
    /// Start of the parameter range.
    pub t_min: f64,
    /// End of the parameter range.
    pub t_max: f64,
}

impl CurveDomain {
    /// Creates a new curve domain.
    #[must_use]
    pub fn new(t_min: f64, t_max: f64) -> Self {
        Self { t_min, t_max }
    }

    /// Maps a normalized fraction in `[0, 1]` onto this domain.
    #[must_use]
    pub fn lerp(&self, fraction: f64) -> f64 {
        self.t_min + (self.t_max - self.t_min) * fraction
    }
}

/// Trait for parametric curves in 3D space.
///
/// Evaluation never fails: degenerate configurations are resolved by the
/// implementing curve when it is constructed.
pub trait Curve {
    /// Evaluates the curve at parameter `t`, returning the 3D point.
    fn evaluate(&self, t: f64) -> Point3;

    /// Computes the unit tangent at parameter `t`.
    ///
    /// Returns the zero vector where the curve has no direction
    /// (e.g. coincident endpoints).
    fn tangent(&self, t: f64) -> Vector3;

    /// Returns the parameter domain of the curve.
    fn domain(&self) -> CurveDomain;
}
