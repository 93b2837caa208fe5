pub mod config;
pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod placement;
pub mod session;
pub mod structure;
pub mod tessellation;

pub use error::{CatenaryError, Result};
pub use placement::{
    compute_placement_plan, compute_placement_plan_for_midpoint, PlacementPlan, RenderPoint,
};
