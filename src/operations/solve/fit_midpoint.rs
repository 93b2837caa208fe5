use tracing::{debug, trace};

use crate::math::Point3;
use crate::tessellation::Polyline;

use super::{CurveSpec, SolveCatenary};

/// Lower bound of the slack search interval.
const MIN_SLACK: f64 = 0.001;

/// Upper bound of the slack search interval.
const MAX_SLACK: f64 = 1.0;

/// First slack value evaluated by the search.
const INITIAL_SLACK: f64 = 0.5;

/// Number of curve evaluations the search may spend.
const MAX_ITERATIONS: usize = 20;

/// Absolute height error at which the search stops early.
pub const HEIGHT_TOLERANCE: f64 = 0.01;

/// Outcome of a midpoint height fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MidpointFit {
    /// Slack of the best curve found.
    pub slack: f64,
    /// Height of the best curve's middle vertex.
    pub achieved_y: f64,
    /// Absolute difference between `achieved_y` and the requested height.
    pub error: f64,
    /// Number of curves evaluated.
    pub iterations: usize,
    /// Whether `error` is within [`HEIGHT_TOLERANCE`].
    pub converged: bool,
}

/// Finds the slack whose catenary passes through a requested midpoint height.
///
/// Bisects the slack over `[0.001, 1.0]`, comparing the height of the middle
/// polyline vertex (`points[len / 2]`) against the target. The search relies on
/// the midpoint dropping monotonically as slack grows, which holds for
/// [`Catenary`](crate::geometry::Catenary) over the whole interval.
///
/// The best curve seen is returned even when the target is unreachable, so
/// the result is always usable; [`MidpointFit::error`] reports how close it got.
#[derive(Debug)]
pub struct FitMidpointHeight {
    start: Point3,
    end: Point3,
    target_y: f64,
    segment_count: usize,
}

/// Best candidate seen so far.
struct Candidate {
    polyline: Polyline,
    slack: f64,
    middle_y: f64,
    error: f64,
}

impl FitMidpointHeight {
    /// Creates a new `FitMidpointHeight` operation.
    #[must_use]
    pub fn new(start: Point3, end: Point3, target_y: f64, segment_count: usize) -> Self {
        Self {
            start,
            end,
            target_y,
            segment_count,
        }
    }

    /// Executes the search, returning the best polyline and the fit quality.
    #[must_use]
    pub fn execute(&self) -> (Polyline, MidpointFit) {
        let mut lo = MIN_SLACK;
        let mut hi = MAX_SLACK;
        let mut slack = INITIAL_SLACK;

        let mut best = self.attempt(slack);
        let mut current_y = best.middle_y;
        let mut iterations = 1;

        while iterations < MAX_ITERATIONS && best.error >= HEIGHT_TOLERANCE {
            // Too high means not enough sag yet.
            if current_y > self.target_y {
                lo = slack;
            } else {
                hi = slack;
            }
            slack = 0.5 * (lo + hi);

            let candidate = self.attempt(slack);
            iterations += 1;
            trace!(
                iteration = iterations,
                slack,
                middle_y = candidate.middle_y,
                error = candidate.error,
                "midpoint bisection step"
            );

            current_y = candidate.middle_y;
            if candidate.error < best.error {
                best = candidate;
            }
        }

        let fit = MidpointFit {
            slack: best.slack,
            achieved_y: best.middle_y,
            error: best.error,
            iterations,
            converged: best.error < HEIGHT_TOLERANCE,
        };
        if fit.converged {
            debug!(slack = fit.slack, iterations, "midpoint fit converged");
        } else {
            debug!(
                slack = fit.slack,
                error = fit.error,
                target_y = self.target_y,
                "midpoint fit did not reach tolerance, using best curve"
            );
        }
        (best.polyline, fit)
    }

    fn attempt(&self, slack: f64) -> Candidate {
        let spec = CurveSpec::new(self.start, self.end, slack, self.segment_count);
        let polyline = SolveCatenary::new(spec).execute();
        let middle_y = polyline.middle().map_or(self.start.y, |p| p.y);
        Candidate {
            polyline,
            slack,
            middle_y,
            error: (middle_y - self.target_y).abs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn reaches_reachable_target() {
        let (line, fit) = FitMidpointHeight::new(p(0.0, 10.0, 0.0), p(10.0, 10.0, 0.0), 7.0, 10)
            .execute();

        assert_eq!(line.len(), 11);
        assert!(fit.converged);
        assert!((line.points[5].y - 7.0).abs() < HEIGHT_TOLERANCE);
        assert!((fit.achieved_y - line.points[5].y).abs() < 1e-12);
        assert!((fit.slack - 0.6).abs() < 0.01, "slack = {}", fit.slack);
        assert!(fit.iterations <= MAX_ITERATIONS);
    }

    #[test]
    fn is_deterministic() {
        let op = FitMidpointHeight::new(p(0.0, 10.0, 0.0), p(10.0, 12.0, 3.0), 8.25, 12);
        let (a, fit_a) = op.execute();
        let (b, fit_b) = op.execute();
        assert_eq!(a, b);
        assert_eq!(fit_a, fit_b);
    }

    #[test]
    fn unreachable_high_target_reports_error() {
        let (line, fit) = FitMidpointHeight::new(p(0.0, 10.0, 0.0), p(10.0, 10.0, 0.0), 20.0, 10)
            .execute();

        assert_eq!(line.len(), 11);
        assert!(!fit.converged);
        assert_eq!(fit.iterations, MAX_ITERATIONS);
        // Best achievable is the taut curve, just below the anchors.
        assert!(fit.slack < 0.01);
        assert!((fit.error - (20.0 - fit.achieved_y)).abs() < 1e-12);
        assert!(fit.achieved_y < 10.0 && fit.achieved_y > 9.9);
    }

    #[test]
    fn unreachable_low_target_uses_maximal_sag() {
        let (_, fit) = FitMidpointHeight::new(p(0.0, 10.0, 0.0), p(10.0, 10.0, 0.0), -100.0, 10)
            .execute();

        assert!(!fit.converged);
        assert!(fit.slack > 0.99);
        assert!((fit.achieved_y - 5.0).abs() < 0.01);
    }

    #[test]
    fn odd_segment_count_uses_upper_middle() {
        let (line, fit) = FitMidpointHeight::new(p(0.0, 10.0, 0.0), p(10.0, 10.0, 0.0), 8.0, 9)
            .execute();

        assert_eq!(line.len(), 10);
        assert!(fit.converged);
        assert!((line.points[5].y - 8.0).abs() < HEIGHT_TOLERANCE);
    }
}
