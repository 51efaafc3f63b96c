mod check;
mod graph;
mod plan;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use modplan_lib::Planner;
use modplan_lib::project;

pub use check::cmd_check;
pub use graph::cmd_graph;
pub use plan::cmd_plan;

/// Load the project file and freeze it into a planner.
fn load_planner(path: &Path) -> Result<Planner> {
  let planner =
    project::load_planner(path).with_context(|| format!("Failed to load project: {}", path.display()))?;
  debug!(
    project = %path.display(),
    modules = planner.store().len(),
    targets = planner.targets().len(),
    "project ready"
  );
  Ok(planner)
}
