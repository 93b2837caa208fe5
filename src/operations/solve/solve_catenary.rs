use tracing::debug;

use crate::geometry::{Catenary, Curve};
use crate::math::Point3;
use crate::tessellation::Polyline;

/// Minimum number of segments a solved curve is split into.
pub const MIN_SEGMENTS: usize = 2;

/// Input to [`SolveCatenary`]: the anchors and the shape parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSpec {
    /// Start anchor.
    pub start: Point3,
    /// End anchor.
    pub end: Point3,
    /// Slack in `[0, 1]`; `0` is taut, `1` is maximal sag.
    pub slack: f64,
    /// Number of polyline segments; clamped to [`MIN_SEGMENTS`].
    pub segment_count: usize,
}

impl CurveSpec {
    /// Creates a new curve specification.
    #[must_use]
    pub fn new(start: Point3, end: Point3, slack: f64, segment_count: usize) -> Self {
        Self {
            start,
            end,
            slack,
            segment_count,
        }
    }
}

/// Samples a catenary between two anchors into an evenly parameterized polyline.
///
/// The result always has `segment_count + 1` vertices (after clamping), starts
/// at `start` and ends at `end`. Vertical drops and coincident anchors yield a
/// straight polyline rather than an error.
#[derive(Debug)]
pub struct SolveCatenary {
    spec: CurveSpec,
}

impl SolveCatenary {
    /// Creates a new `SolveCatenary` operation.
    #[must_use]
    pub fn new(spec: CurveSpec) -> Self {
        Self { spec }
    }

    /// Executes the solve, returning the sampled polyline.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn execute(&self) -> Polyline {
        let segments = self.spec.segment_count.max(MIN_SEGMENTS);
        let curve = Catenary::new(self.spec.start, self.spec.end, self.spec.slack);
        let domain = curve.domain();

        let points: Vec<Point3> = (0..=segments)
            .map(|i| curve.evaluate(domain.lerp(i as f64 / segments as f64)))
            .collect();

        debug!(
            segments,
            span = curve.span(),
            sag = curve.sag(),
            vertical = curve.is_vertical(),
            "solved catenary"
        );
        Polyline::new(points)
    }
}
