//! From anchors and shape parameters to a list of placed elements.
//!
//! ```text
//! anchors + slack ─► SolveCatenary ─► Polyline ─► EstimateCurvature
//!                    (or FitMidpointHeight)              │
//!                                                        ▼
//!        PlacementPlan ◄─ Orientation ◄─ samples ◄─ AdaptiveSample
//! ```
//!
//! Every step is a pure function of its inputs. A plan is never updated in
//! place: when any parameter changes, a new plan is computed.

mod orientation;

pub use orientation::{Orientation, VERTICAL_THRESHOLD};

use tracing::debug;

use crate::math::{Point3, Rotation};
use crate::operations::query::EstimateCurvature;
use crate::operations::solve::{CurveSpec, FitMidpointHeight, MidpointFit, SolveCatenary};
use crate::tessellation::{AdaptiveSample, Polyline, MIN_SPACING};

/// Lower bound of [`PlacementPlan::estimated_count`].
const MIN_ESTIMATED_COUNT: usize = 10;

/// Where and how to place one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderPoint {
    /// World position of the element.
    pub position: Point3,
    /// Rotation from the element's model frame to world space.
    pub orientation: Rotation,
}

/// The ordered elements to render along one curve.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementPlan {
    /// Elements in order from the start anchor to the end anchor.
    pub points: Vec<RenderPoint>,
    /// Arc length of the solved polyline.
    pub arc_length: f64,
    /// Quality of the midpoint fit, when the plan was fitted to a height.
    pub fit: Option<MidpointFit>,
}

impl PlacementPlan {
    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the plan has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Rough element budget for a curve of `arc_length`, for pre-sizing
    /// entity pools before the plan is computed. Never below 10.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn estimated_count(arc_length: f64, spacing: f64) -> usize {
        let estimate = (arc_length / spacing.max(MIN_SPACING)).max(0.0) as usize;
        estimate.max(MIN_ESTIMATED_COUNT)
    }
}

/// Runs the full placement pipeline with a fixed [`Orientation`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlacementPipeline {
    orientation: Orientation,
}

impl PlacementPipeline {
    /// Creates a pipeline that orients elements with `orientation`.
    #[must_use]
    pub fn new(orientation: Orientation) -> Self {
        Self { orientation }
    }

    /// Returns the orientation calculator used by this pipeline.
    #[must_use]
    pub fn orientation(&self) -> &Orientation {
        &self.orientation
    }

    /// Solves the curve for `spec` and places elements along it.
    #[must_use]
    pub fn plan(&self, spec: CurveSpec, base_spacing: f64) -> PlacementPlan {
        let polyline = SolveCatenary::new(spec).execute();
        self.place(&polyline, base_spacing)
    }

    /// Fits the slack to `target_y` at mid-span and places elements along the
    /// best curve found. The fit quality is reported in [`PlacementPlan::fit`].
    #[must_use]
    pub fn plan_for_midpoint(
        &self,
        start: Point3,
        end: Point3,
        target_y: f64,
        segment_count: usize,
        base_spacing: f64,
    ) -> PlacementPlan {
        let (polyline, fit) = FitMidpointHeight::new(start, end, target_y, segment_count).execute();
        PlacementPlan {
            fit: Some(fit),
            ..self.place(&polyline, base_spacing)
        }
    }

    /// Places elements along an already solved polyline.
    #[must_use]
    pub fn place(&self, polyline: &Polyline, base_spacing: f64) -> PlacementPlan {
        let profile = EstimateCurvature::new(polyline).execute();
        let samples = AdaptiveSample::new(polyline, &profile, base_spacing).execute();

        let points: Vec<RenderPoint> = samples
            .iter()
            .map(|s| RenderPoint {
                position: s.position,
                orientation: self.orientation.orient(&s.tangent),
            })
            .collect();

        let arc_length = profile.total_length();
        debug!(elements = points.len(), arc_length, "computed placement plan");
        PlacementPlan {
            points,
            arc_length,
            fit: None,
        }
    }
}

/// Computes the placement plan for a catenary with the given slack, using
/// the default element orientation.
#[must_use]
pub fn compute_placement_plan(
    start: Point3,
    end: Point3,
    slack: f64,
    segment_count: usize,
    base_spacing: f64,
) -> PlacementPlan {
    PlacementPipeline::default().plan(
        CurveSpec::new(start, end, slack, segment_count),
        base_spacing,
    )
}

/// Computes the placement plan for the catenary whose middle vertex best
/// matches `target_y`, using the default element orientation.
#[must_use]
pub fn compute_placement_plan_for_midpoint(
    start: Point3,
    end: Point3,
    target_y: f64,
    segment_count: usize,
    base_spacing: f64,
) -> PlacementPlan {
    PlacementPipeline::default().plan_for_midpoint(
        start,
        end,
        target_y,
        segment_count,
        base_spacing,
    )
}
