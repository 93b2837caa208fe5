use serde::{Deserialize, Serialize};

use crate::config::PlacementParams;
use crate::math::Point3;
use crate::operations::solve::CurveSpec;
use crate::placement::{PlacementPipeline, PlacementPlan};

/// Everything needed to regenerate a structure's placement plan.
///
/// This is what a host persists; plans themselves are never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StructureParams {
    /// First anchor.
    pub start: Point3,
    /// Second anchor.
    pub end: Point3,
    /// Sag control in `[0, 1]`.
    pub slack: f64,
    /// Number of polyline segments the curve is solved with.
    pub segment_count: usize,
    /// Base distance between placed elements.
    pub spacing: f64,
}

impl StructureParams {
    /// Creates a new parameter set.
    #[must_use]
    pub fn new(start: Point3, end: Point3, slack: f64, segment_count: usize, spacing: f64) -> Self {
        Self {
            start,
            end,
            slack,
            segment_count,
            spacing,
        }
    }

    /// Creates parameters for the given anchors from a set of defaults.
    #[must_use]
    pub fn with_defaults(start: Point3, end: Point3, defaults: &PlacementParams) -> Self {
        Self::new(start, end, defaults.slack, defaults.segments, defaults.spacing)
    }

    /// Returns the curve specification for these parameters.
    #[must_use]
    pub fn curve_spec(&self) -> CurveSpec {
        CurveSpec::new(self.start, self.end, self.slack, self.segment_count)
    }

    /// Computes a fresh placement plan.
    #[must_use]
    pub fn plan(&self, pipeline: &PlacementPipeline) -> PlacementPlan {
        pipeline.plan(self.curve_spec(), self.spacing)
    }
}
