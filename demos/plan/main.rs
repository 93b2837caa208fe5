//! Prints placement plans for a few hanging structures.
//!
//! Usage:
//! ```text
//! cargo run --example plan                       # built-in presets
//! cargo run --example plan -- catenary.toml      # presets from a config file
//! RUST_LOG=catenary=debug cargo run --example plan
//! ```

use std::path::Path;

use catenary::config::CatenaryConfig;
use catenary::math::{Point3, Vector3};
use catenary::session::Session;
use catenary::structure::{StructureData, StructureStore};
use catenary::Result;

fn main() -> Result<()> {
    // Default: WARN for everything, INFO for catenary.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("plan=info".parse().unwrap_or_default())
        .add_directive("catenary=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = match std::env::args().nth(1) {
        Some(path) => CatenaryConfig::from_path(Path::new(&path))?,
        None => CatenaryConfig::default(),
    };

    let start = Point3::new(0.0, 10.0, 0.0);
    let end = Point3::new(12.0, 8.0, 4.0);
    let mut store = StructureStore::with_pipeline(config.pipeline());

    for id in config.presets.keys() {
        let mut session = Session::from_preset(&config, id)?;
        session.select_point(start)?;
        session.select_point(end)?;
        let data = session.finalize_into(format!("{id} demo"))?;
        store.add(data);
    }

    let mut fitted = Session::new(config.defaults, config.pipeline());
    fitted.select_point(start)?;
    fitted.select_point(end)?;
    let fit = fitted.fit_midpoint(6.0)?;
    println!(
        "midpoint fit: slack {:.3}, y {:.3}, error {:.4}, converged {}",
        fit.slack, fit.achieved_y, fit.error, fit.converged
    );
    store.add(StructureData::new("fitted", fitted.finalize()?));

    for (id, data) in store.iter() {
        let plan = store.plan(id)?;
        println!(
            "{}: {} elements over {:.2} blocks (slack {}, spacing {})",
            data.name,
            plan.len(),
            plan.arc_length,
            data.params.slack,
            data.params.spacing
        );
        for point in plan.points.iter().step_by(plan.len().div_ceil(5).max(1)) {
            let forward = point.orientation * Vector3::z();
            println!(
                "  ({:7.3}, {:7.3}, {:7.3})  facing ({:6.3}, {:6.3}, {:6.3})",
                point.position.x, point.position.y, point.position.z, forward.x, forward.y, forward.z
            );
        }
    }

    Ok(())
}
