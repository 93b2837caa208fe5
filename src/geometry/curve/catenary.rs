use crate::math::{Point3, Vector3, VectorExt, TOLERANCE};

use super::{Curve, CurveDomain};

/// Lower bound on the mid-span sag depth.
pub const MIN_SAG: f64 = 0.01;

/// Largest half-span ratio `u = span / (2c)` considered when solving for the
/// catenary constant. `cosh` stays finite well past this value.
const MAX_HALF_SPAN_RATIO: f64 = 700.0;

/// Bisection steps used to solve for the catenary constant.
const CONSTANT_ITERATIONS: usize = 100;

/// A catenary hung between two anchor points.
///
/// The curve lives in the vertical plane through both anchors. Slack controls
/// the sag depth at mid-span, `max(span * slack / 2, MIN_SAG)`, and the
/// catenary constant `c` is solved so that
///
/// ```text
/// y(x) = start.y + t * rise + c * (cosh((x - span/2) / c) - cosh(span / (2c)))
/// ```
///
/// passes exactly through both anchors and dips by the sag depth in the
/// middle. With `t = x / span` the parameter domain is `[0, 1]`.
///
/// When the anchors share the same horizontal position (a vertical drop or
/// coincident points) there is no plane to hang the curve in, and the curve
/// degenerates to the straight segment between the anchors.
#[derive(Debug, Clone)]
pub struct Catenary {
    start: Point3,
    end: Point3,
    /// Unit horizontal direction from start to end; zero for a vertical drop.
    direction: Vector3,
    span: f64,
    rise: f64,
    sag: f64,
    /// Catenary constant `c`, `None` for the degenerate vertical case.
    constant: Option<f64>,
}

impl Catenary {
    /// Creates a catenary between `start` and `end` with the given slack.
    ///
    /// `slack` is nominally in `[0, 1]`: `0` is taut (sag floored at
    /// [`MIN_SAG`]) and `1` sags by half the horizontal span.
    #[must_use]
    pub fn new(start: Point3, end: Point3, slack: f64) -> Self {
        let delta = end - start;
        let horizontal = delta.horizontal();
        let span = horizontal.norm();
        // `f64::max` discards a NaN slack in favour of the floor.
        let sag = (span * slack * 0.5).max(MIN_SAG);

        let (direction, constant) = if span < TOLERANCE {
            (Vector3::zeros(), None)
        } else {
            (horizontal / span, Some(solve_constant(span, sag)))
        };

        Self {
            start,
            end,
            direction,
            span,
            rise: delta.y,
            sag,
            constant,
        }
    }

    /// Returns the start anchor.
    #[must_use]
    pub fn start(&self) -> &Point3 {
        &self.start
    }

    /// Returns the end anchor.
    #[must_use]
    pub fn end(&self) -> &Point3 {
        &self.end
    }

    /// Returns the horizontal distance between the anchors.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.span
    }

    /// Returns the sag depth below the chord at mid-span.
    ///
    /// Meaningless for the vertical case, where the curve is straight.
    #[must_use]
    pub fn sag(&self) -> f64 {
        self.sag
    }

    /// Returns the catenary constant, or `None` for a vertical drop.
    #[must_use]
    pub fn constant(&self) -> Option<f64> {
        self.constant
    }

    /// Returns `true` if the anchors share the same horizontal position.
    #[must_use]
    pub fn is_vertical(&self) -> bool {
        self.constant.is_none()
    }
}

impl Curve for Catenary {
    fn evaluate(&self, t: f64) -> Point3 {
        let Some(c) = self.constant else {
            return Point3::from(self.start.coords.lerp(&self.end.coords, t));
        };

        let x = t * self.span;
        let half = self.span * 0.5;
        let offset = c * (((x - half) / c).cosh() - (half / c).cosh());
        Point3::new(
            self.start.x + x * self.direction.x,
            self.start.y + t * self.rise + offset,
            self.start.z + x * self.direction.z,
        )
    }

    fn tangent(&self, t: f64) -> Vector3 {
        let Some(c) = self.constant else {
            return (self.end - self.start).normalize_or_zero();
        };

        let x = t * self.span;
        let dy = self.span * ((x - self.span * 0.5) / c).sinh() + self.rise;
        (self.direction * self.span + Vector3::new(0.0, dy, 0.0)).normalize_or_zero()
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, 1.0)
    }
}

/// Solves `c * (cosh(span / (2c)) - 1) = sag` for the catenary constant `c`.
///
/// Substituting `u = span / (2c)` turns this into `g(u) = 2 * sag / span` with
/// `g(u) = (cosh(u) - 1) / u`, which is strictly increasing on `u > 0`, so a
/// bisection on `u` always converges.
fn solve_constant(span: f64, sag: f64) -> f64 {
    let target = 2.0 * sag / span;

    let mut hi: f64 = 1.0;
    while half_span_ratio_sag(hi) < target && hi < MAX_HALF_SPAN_RATIO {
        hi *= 2.0;
    }
    let mut hi = hi.min(MAX_HALF_SPAN_RATIO);
    let mut lo = 0.0;

    for _ in 0..CONSTANT_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        if half_span_ratio_sag(mid) < target {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    let u = (0.5 * (lo + hi)).max(f64::MIN_POSITIVE);
    span / (2.0 * u)
}

/// `(cosh(u) - 1) / u`, written with `sinh` to stay accurate for small `u`.
fn half_span_ratio_sag(u: f64) -> f64 {
    let s = (0.5 * u).sinh();
    2.0 * s * s / u
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn endpoints_are_pinned() {
        let start = p(1.0, 4.0, -2.0);
        let end = p(9.0, 7.0, 5.0);
        let curve = Catenary::new(start, end, 0.4);
        assert_eq!(*curve.start(), start);
        assert_eq!(*curve.end(), end);

        let a = curve.evaluate(0.0);
        let b = curve.evaluate(1.0);
        assert_abs_diff_eq!(a, start, epsilon = 1e-9);
        assert_abs_diff_eq!(b, end, epsilon = 1e-9);
    }

    #[test]
    fn midpoint_dips_by_sag_depth() {
        let curve = Catenary::new(p(0.0, 10.0, 0.0), p(10.0, 10.0, 0.0), 0.3);
        assert_relative_eq!(curve.sag(), 1.5, epsilon = 1e-12);

        let c = curve.constant().unwrap_or_else(|| panic!("constant missing"));
        assert_relative_eq!(c * ((5.0 / c).cosh() - 1.0), 1.5, epsilon = 1e-9);

        let mid = curve.evaluate(0.5);
        assert_relative_eq!(mid.y, 8.5, epsilon = 1e-9);
        assert_relative_eq!(mid.x, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn sag_deepens_with_slack() {
        let start = p(0.0, 0.0, 0.0);
        let end = p(20.0, 0.0, 0.0);
        let mut previous = f64::INFINITY;
        for i in 1..=10 {
            let slack = f64::from(i) / 10.0;
            let y = Catenary::new(start, end, slack).evaluate(0.5).y;
            assert!(y < previous, "slack {slack}: {y} !< {previous}");
            previous = y;
        }
    }

    #[test]
    fn zero_slack_sags_by_floor_only() {
        let curve = Catenary::new(p(0.0, 0.0, 0.0), p(10.0, 2.0, 0.0), 0.0);
        let mid = curve.evaluate(0.5);
        assert_abs_diff_eq!(mid.y, 1.0 - MIN_SAG, epsilon = 1e-9);
    }

    #[test]
    fn is_symmetric_about_mid_span() {
        let curve = Catenary::new(p(0.0, 5.0, 0.0), p(0.0, 5.0, 12.0), 0.7);
        for i in 0..=10 {
            let t = f64::from(i) / 20.0;
            let left = curve.evaluate(t);
            let right = curve.evaluate(1.0 - t);
            assert_relative_eq!(left.y, right.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn follows_horizontal_direction() {
        let curve = Catenary::new(p(0.0, 0.0, 0.0), p(3.0, 0.0, 4.0), 0.5);
        let q = curve.evaluate(0.5);
        assert_relative_eq!(q.x, 1.5, epsilon = 1e-12);
        assert_relative_eq!(q.z, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn tangent_descends_then_ascends() {
        let curve = Catenary::new(p(0.0, 10.0, 0.0), p(10.0, 10.0, 0.0), 0.5);
        let first = curve.tangent(0.0);
        let mid = curve.tangent(0.5);
        let last = curve.tangent(1.0);

        assert!(first.y < 0.0);
        assert_abs_diff_eq!(mid.y, 0.0, epsilon = 1e-12);
        assert!(last.y > 0.0);
        assert_relative_eq!(first.norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn vertical_drop_is_straight() {
        let curve = Catenary::new(p(0.0, 0.0, 0.0), p(0.0, -20.0, 0.0), 0.5);
        assert!(curve.is_vertical());
        assert!(curve.constant().is_none());

        let q = curve.evaluate(0.25);
        assert_eq!(q, p(0.0, -5.0, 0.0));
        assert_eq!(curve.tangent(0.3), Vector3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn coincident_anchors_collapse() {
        let anchor = p(2.0, 3.0, 4.0);
        let curve = Catenary::new(anchor, anchor, 1.0);
        assert_eq!(curve.evaluate(0.5), anchor);
        assert_eq!(curve.tangent(0.5), Vector3::zeros());
    }

    #[test]
    fn tiny_span_stays_finite() {
        let curve = Catenary::new(p(0.0, 0.0, 0.0), p(1e-6, 0.0, 0.0), 0.0);
        for i in 0..=4 {
            let q = curve.evaluate(f64::from(i) / 4.0);
            assert!(q.y.is_finite());
        }
        assert_relative_eq!(curve.evaluate(0.5).y, -MIN_SAG, epsilon = 1e-6);
    }
}
