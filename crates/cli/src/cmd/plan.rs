//! Implementation of the `modplan plan` command.
//!
//! This command assembles a single target and prints its build plan: compile
//! order, link list, merged include paths and definitions, and a fingerprint
//! of the whole plan.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use modplan_lib::ResolvedConfig;
use modplan_lib::util::hash::{Hashable, ObjectHash};

use crate::output::{OutputFormat, format_definition, print_json, print_list, print_stat, print_success, truncate_hash};

#[derive(Debug, Serialize)]
struct PlanOutput<'a> {
  plan_hash: ObjectHash,
  #[serde(flatten)]
  config: &'a ResolvedConfig,
}

pub fn cmd_plan(project: &Path, target: &str, verbose: bool, output: OutputFormat) -> Result<()> {
  let planner = super::load_planner(project)?;

  let config = planner
    .assemble(target)
    .with_context(|| format!("Failed to assemble target '{}'", target))?;
  let hash = config.compute_hash().context("Failed to compute plan hash")?;

  if output.is_json() {
    return print_json(&PlanOutput {
      plan_hash: hash,
      config: &config,
    });
  }

  print_success(&format!("Assembled target '{}' ({})", config.target, config.kind));
  print_stat("Plan", truncate_hash(&hash.0));
  print_stat("Build settings", &config.build_settings.to_string());
  print_stat("Include order", &config.include_order.to_string());
  print_stat("Roots", &config.roots.join(", "));

  println!();
  print_list("Compile order", &config.compile_order);
  print_list("Link", &config.link_modules);
  print_list("Include paths", &config.include_paths);

  let definitions: Vec<String> = config
    .definitions
    .iter()
    .map(|(name, value)| format_definition(name, value.as_deref()))
    .collect();
  print_list("Definitions", &definitions);

  if verbose {
    for module in &config.modules {
      println!();
      println!("Module {} ({}, pch {}):", module.name, module.kind, module.pch);
      print_stat("Links", &module.link_dependencies.join(", "));
      print_stat("Include paths", &module.include_paths.join(", "));
      let definitions: Vec<String> = module
        .definitions
        .iter()
        .map(|(name, value)| format_definition(name, value.as_deref()))
        .collect();
      print_stat("Definitions", &definitions.join(", "));
    }
  }

  Ok(())
}
