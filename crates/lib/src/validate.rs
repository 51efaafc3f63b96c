//! Structural and semantic checks run before a plan is accepted.
//!
//! Cycle detection lives with the graph ([`crate::graph::DependencyGraph::compile_order`])
//! and duplicate module names are rejected by the store; this module holds
//! the remaining checks.

use std::collections::HashSet;

use crate::error::{PlanError, VersionSetting};
use crate::module::ModuleDef;
use crate::target::TargetDef;
use crate::version::VersionTag;

/// Reject a target list that declares the same name twice.
pub fn check_unique_targets(targets: &[TargetDef]) -> Result<(), PlanError> {
  let mut seen = HashSet::new();
  for target in targets {
    if !seen.insert(target.name.as_str()) {
      return Err(PlanError::DuplicateTarget(target.name.clone()));
    }
  }
  Ok(())
}

/// Every module built by `target` must be allowed by the target's kind.
pub fn check_target_kinds<'a>(
  target: &TargetDef,
  modules: impl IntoIterator<Item = &'a ModuleDef>,
) -> Result<(), PlanError> {
  for module in modules {
    if !target.kind.allows(module.kind) {
      return Err(PlanError::TargetKindMismatch {
        target: target.name.clone(),
        target_kind: target.kind,
        module: module.name.clone(),
        module_kind: module.kind,
      });
    }
  }
  Ok(())
}

/// Every declared version tag must be at least the target's.
pub fn check_versions<'a>(
  target: &TargetDef,
  modules: impl IntoIterator<Item = &'a ModuleDef>,
) -> Result<(), PlanError> {
  for module in modules {
    if let Some(declared) = module.include_order {
      check_version(target, module, VersionSetting::IncludeOrder, declared, target.include_order)?;
    }
    if let Some(declared) = module.build_settings {
      check_version(target, module, VersionSetting::BuildSettings, declared, target.build_settings)?;
    }
  }
  Ok(())
}

fn check_version<V: VersionTag>(
  target: &TargetDef,
  module: &ModuleDef,
  setting: VersionSetting,
  declared: V,
  required: V,
) -> Result<(), PlanError> {
  if declared.satisfies(required) {
    return Ok(());
  }

  Err(PlanError::VersionMismatch {
    module: module.name.clone(),
    target: target.name.clone(),
    setting,
    declared: declared.to_string(),
    required: required.to_string(),
  })
}
