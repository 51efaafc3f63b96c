//! Implementation of the `modplan check` command.
//!
//! Assembles every target of the project and reports each result. Fails if
//! any target is rejected.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;

use modplan_lib::AssemblyStage;
use modplan_lib::util::hash::Hashable;

use crate::output::{OutputFormat, print_error, print_json, print_stat, print_success, truncate_hash};

#[derive(Debug, Serialize)]
struct TargetReport {
  target: String,
  ok: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  plan_hash: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  modules: Option<usize>,
  #[serde(skip_serializing_if = "Option::is_none")]
  stage: Option<AssemblyStage>,
  #[serde(skip_serializing_if = "Option::is_none")]
  error: Option<String>,
}

#[derive(Debug, Serialize)]
struct CheckOutput {
  targets: Vec<TargetReport>,
  failed: usize,
}

pub fn cmd_check(project: &Path, verbose: bool, output: OutputFormat) -> Result<()> {
  let planner = super::load_planner(project)?;

  let mut reports = Vec::new();
  for (target, result) in planner.assemble_all() {
    let report = match result {
      Ok(config) => {
        let hash = config
          .compute_hash()
          .with_context(|| format!("Failed to compute plan hash for target '{}'", target))?;
        TargetReport {
          target,
          ok: true,
          plan_hash: Some(hash.0),
          modules: Some(config.compile_order.len()),
          stage: None,
          error: None,
        }
      }
      Err(err) => TargetReport {
        target,
        ok: false,
        plan_hash: None,
        modules: None,
        stage: Some(err.stage),
        error: Some(err.source.to_string()),
      },
    };
    reports.push(report);
  }

  let failed = reports.iter().filter(|r| !r.ok).count();
  let total = reports.len();

  if output.is_json() {
    print_json(&CheckOutput {
      targets: reports,
      failed,
    })?;
  } else {
    for report in &reports {
      if report.ok {
        let hash = report.plan_hash.as_deref().map(truncate_hash).unwrap_or("-");
        print_success(&format!("{} ({} modules, plan {})", report.target, report.modules.unwrap_or(0), hash));
      } else {
        print_error(&format!(
          "{}: {}",
          report.target,
          report.error.as_deref().unwrap_or("rejected")
        ));
        if verbose && let Some(stage) = report.stage {
          print_stat("Rejected at", &stage.to_string());
        }
      }
    }
    println!();
    print_stat("Targets", &total.to_string());
    print_stat("Failed", &failed.to_string());
  }

  if failed > 0 {
    bail!("{} of {} targets failed", failed, total);
  }
  Ok(())
}
