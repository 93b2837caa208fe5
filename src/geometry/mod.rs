pub mod curve;

pub use curve::{Catenary, Curve, CurveDomain};
