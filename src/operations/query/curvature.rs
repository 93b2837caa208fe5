use crate::math::{Point3, Vector3, TOLERANCE};
use crate::tessellation::Polyline;

/// Per-segment directions and per-vertex curvature of a polyline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurvatureProfile {
    /// Unit direction of travel, one per segment.
    pub tangents: Vec<Vector3>,
    /// Length of each segment.
    pub segment_lengths: Vec<f64>,
    /// Non-negative turn angle per unit length, one per vertex.
    pub curvatures: Vec<f64>,
}

impl CurvatureProfile {
    /// Smallest curvature in the series, or `0.0` if it is empty.
    #[must_use]
    pub fn min_curvature(&self) -> f64 {
        if self.curvatures.is_empty() {
            return 0.0;
        }
        self.curvatures.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Largest curvature in the series, or `0.0` if it is empty.
    #[must_use]
    pub fn max_curvature(&self) -> f64 {
        if self.curvatures.is_empty() {
            return 0.0;
        }
        self.curvatures
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Spread between the largest and smallest curvature.
    ///
    /// NaN if any curvature is NaN; `min_curvature` and `max_curvature` skip
    /// NaN entries, the range does not.
    #[must_use]
    pub fn curvature_range(&self) -> f64 {
        if self.curvatures.iter().any(|k| k.is_nan()) {
            return f64::NAN;
        }
        self.max_curvature() - self.min_curvature()
    }

    /// Total length of all segments.
    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.segment_lengths.iter().sum()
    }
}

/// Estimates tangents and discrete curvature along a polyline.
///
/// Curvature at an interior vertex is the angle between the entering and
/// exiting segment directions divided by the exiting segment's length. The
/// two end vertices copy their nearest interior value; a single segment has
/// zero curvature throughout.
///
/// Zero-length segments never produce NaN: their tangent is inherited from
/// the nearest preceding non-degenerate segment (or the following one at the
/// start of the polyline), and a junction whose exiting segment is degenerate
/// inherits its curvature the same way.
#[derive(Debug)]
pub struct EstimateCurvature<'a> {
    polyline: &'a Polyline,
}

impl<'a> EstimateCurvature<'a> {
    /// Creates a new `EstimateCurvature` query.
    #[must_use]
    pub fn new(polyline: &'a Polyline) -> Self {
        Self { polyline }
    }

    /// Executes the query, returning the curvature profile.
    #[must_use]
    pub fn execute(&self) -> CurvatureProfile {
        let points = &self.polyline.points;

        let segment_lengths: Vec<f64> = points
            .windows(2)
            .map(|w| nalgebra::distance(&w[0], &w[1]))
            .collect();

        let raw_tangents: Vec<Option<Vector3>> = points
            .windows(2)
            .zip(&segment_lengths)
            .map(|(w, &len)| direction(&w[0], &w[1], len))
            .collect();
        let tangents = fill_gaps(&raw_tangents, Vector3::zeros());

        let junctions: Vec<Option<f64>> = tangents
            .windows(2)
            .zip(segment_lengths.iter().skip(1))
            .map(|(t, &exit_len)| {
                if exit_len < TOLERANCE {
                    return None;
                }
                let cos = t[0].dot(&t[1]).clamp(-1.0, 1.0);
                Some(cos.acos() / exit_len)
            })
            .collect();
        let interior = fill_gaps(&junctions, 0.0);

        let curvatures = match (interior.first(), interior.last()) {
            (Some(&first), Some(&last)) => {
                let mut series = Vec::with_capacity(interior.len() + 2);
                series.push(first);
                series.extend_from_slice(&interior);
                series.push(last);
                series
            }
            _ => vec![0.0; points.len()],
        };

        CurvatureProfile {
            tangents,
            segment_lengths,
            curvatures,
        }
    }
}

fn direction(from: &Point3, to: &Point3, len: f64) -> Option<Vector3> {
    (len >= TOLERANCE).then(|| (to - from) / len)
}

/// Replaces each `None` with the closest preceding value, or with the first
/// value present when nothing precedes it. Falls back to `fallback` if the
/// input holds no values at all.
fn fill_gaps<T: Copy>(values: &[Option<T>], fallback: T) -> Vec<T> {
    let first = values.iter().flatten().next().copied().unwrap_or(fallback);
    let mut carried = first;
    values
        .iter()
        .map(|value| {
            if let Some(v) = value {
                carried = *v;
            }
            carried
        })
        .collect()
}
