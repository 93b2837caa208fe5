mod fit_midpoint;
mod solve_catenary;

pub use fit_midpoint::{FitMidpointHeight, MidpointFit};
pub use solve_catenary::{CurveSpec, SolveCatenary, MIN_SEGMENTS};
