//! Implementation of the `modplan graph` command.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use modplan_lib::graph::DependencyEdge;

use crate::output::{OutputFormat, print_info, print_json, print_stat, symbols};

#[derive(Debug, Serialize)]
struct GraphOutput<'a> {
  modules: Vec<&'a str>,
  externals: Vec<&'a str>,
  edges: Vec<DependencyEdge>,
}

pub fn cmd_graph(project: &Path, output: OutputFormat) -> Result<()> {
  let planner = super::load_planner(project)?;
  let store = planner.store();
  let graph = planner.graph();

  if output.is_json() {
    return print_json(&GraphOutput {
      modules: store.modules().map(|m| m.name.as_str()).collect(),
      externals: store.externals().collect(),
      edges: graph.edges(),
    });
  }

  print_info(&format!(
    "{} modules, {} external modules",
    store.len(),
    graph.external_count()
  ));

  for module in store.modules() {
    println!();
    println!("{} ({})", module.name, module.kind);
    for (dep, kind) in graph.dependencies_of(&module.name) {
      println!("  {} {} ({})", symbols::ARROW, dep, kind);
    }
  }

  let targets: Vec<String> = planner
    .targets()
    .iter()
    .map(|t| format!("{} [{}]", t.name, t.kind))
    .collect();
  println!();
  print_stat("Targets", &targets.join(", "));

  Ok(())
}
