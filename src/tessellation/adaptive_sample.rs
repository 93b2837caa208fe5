use tracing::debug;

use crate::math::{Vector3, VectorExt};
use crate::operations::query::CurvatureProfile;

use super::{Polyline, Sample};

/// Smallest spacing the walk will use; also replaces a NaN spacing.
pub const MIN_SPACING: f64 = 1e-3;

/// Curvature spread below which the whole curve is sampled uniformly.
const UNIFORM_RANGE: f64 = 0.01;

/// Densest spacing as a fraction of the base spacing.
const MIN_SPACING_FACTOR: f64 = 0.3;

/// How strongly curvature shrinks the spacing.
const CURVATURE_WEIGHT: f64 = 0.7;

/// Keeps the normalization finite when the curvature range is tiny.
const RANGE_EPSILON: f64 = 1e-4;

/// A final sample is forced at the last vertex if the walk stopped farther
/// away than this.
const END_SNAP_DISTANCE: f64 = 0.01;

/// Resamples a polyline by arc length with curvature-adaptive spacing.
///
/// Segment `i` is walked with spacing
/// `base * max(0.3, 1 - 0.7 * (k - k_min) / (k_range + 1e-4))`, where `k` is
/// the curvature at the segment's end vertex, so bends get denser samples.
/// When the curvature range is below `0.01` (or not finite) every segment
/// uses the base spacing.
///
/// The leftover distance of each segment carries into the next, so spacing is
/// continuous along the whole arc. The first vertex is always sampled and the
/// last vertex is appended when the walk ends short of it.
#[derive(Debug)]
pub struct AdaptiveSample<'a> {
    polyline: &'a Polyline,
    profile: &'a CurvatureProfile,
    base_spacing: f64,
}

impl<'a> AdaptiveSample<'a> {
    /// Creates a new `AdaptiveSample` operation.
    ///
    /// `profile` must come from the same polyline.
    #[must_use]
    pub fn new(polyline: &'a Polyline, profile: &'a CurvatureProfile, base_spacing: f64) -> Self {
        Self {
            polyline,
            profile,
            base_spacing,
        }
    }

    /// Executes the walk, returning samples in order of increasing arc length.
    #[must_use]
    pub fn execute(&self) -> Vec<Sample> {
        let points = &self.polyline.points;
        let tangents = &self.profile.tangents;
        let lengths = &self.profile.segment_lengths;

        let Some(&last_point) = points.last() else {
            return Vec::new();
        };
        let segments = (points.len() - 1).min(tangents.len()).min(lengths.len());
        if segments == 0 {
            return vec![Sample {
                position: last_point,
                tangent: Vector3::zeros(),
            }];
        }

        let base = self.base_spacing.max(MIN_SPACING);
        let min_curvature = self.profile.min_curvature();
        let range = self.profile.curvature_range();
        let uniform = !range.is_finite() || range < UNIFORM_RANGE;

        let mut samples = Vec::new();
        let mut remaining = 0.0;

        for i in 0..segments {
            let start = points[i];
            let len = lengths[i];
            let tangent = tangents[i];
            let next_tangent = tangents.get(i + 1).filter(|_| i + 1 < segments);

            let spacing = if uniform {
                base
            } else {
                let k = self
                    .profile
                    .curvatures
                    .get(i + 1)
                    .copied()
                    .unwrap_or(min_curvature);
                let factor = 1.0 - CURVATURE_WEIGHT * (k - min_curvature) / (range + RANGE_EPSILON);
                base * factor.max(MIN_SPACING_FACTOR)
            };

            let mut along = remaining;
            while along < len {
                let tangent_here = match next_tangent {
                    Some(next) => interpolate(&tangent, next, along / len),
                    None => tangent,
                };
                samples.push(Sample {
                    position: start + tangent * along,
                    tangent: tangent_here,
                });
                along += spacing;
            }
            remaining = along - len;
        }

        let needs_end = samples
            .last()
            .is_none_or(|s| nalgebra::distance(&s.position, &last_point) > END_SNAP_DISTANCE);
        if needs_end {
            samples.push(Sample {
                position: last_point,
                tangent: tangents[segments - 1],
            });
        }

        debug!(
            samples = samples.len(),
            uniform,
            base_spacing = base,
            "sampled curve"
        );
        samples
    }
}

/// Linear blend of two unit directions, re-normalized.
///
/// Falls back to `from` when the blend cancels out.
fn interpolate(from: &Vector3, to: &Vector3, t: f64) -> Vector3 {
    let blended = (from * (1.0 - t) + to * t).normalize_or_zero();
    if blended == Vector3::zeros() {
        *from
    } else {
        blended
    }
}
