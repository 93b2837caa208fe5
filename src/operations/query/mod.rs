mod curvature;

pub use curvature::{CurvatureProfile, EstimateCurvature};
