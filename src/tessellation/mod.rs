mod adaptive_sample;

pub use adaptive_sample::{AdaptiveSample, MIN_SPACING};

use crate::math::{Point3, Vector3};

/// A polyline approximation of a curve.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polyline {
    /// The ordered vertices of the polyline.
    pub points: Vec<Point3>,
}

impl Polyline {
    /// Creates a polyline from its vertices.
    #[must_use]
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the polyline has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the middle vertex (`points[len / 2]`), if any.
    #[must_use]
    pub fn middle(&self) -> Option<&Point3> {
        self.points.get(self.points.len() / 2)
    }

    /// Returns the sum of all segment lengths.
    #[must_use]
    pub fn arc_length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| nalgebra::distance(&w[0], &w[1]))
            .sum()
    }
}

/// A point sampled along a curve together with its direction of travel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Position on the curve.
    pub position: Point3,
    /// Unit direction of travel at the position.
    pub tangent: Vector3,
}
