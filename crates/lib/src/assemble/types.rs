//! Types produced by target assembly.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::error::PlanError;
use crate::module::{Definitions, ModuleKind, PchUsage};
use crate::target::TargetKind;
use crate::util::hash::Hashable;
use crate::version::{BuildSettingsVersion, IncludeOrderVersion};

/// Progress of a single target assembly.
///
/// Stages are passed strictly in order; an assembly that fails is rejected
/// at the last stage it reached and never produces a partial plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AssemblyStage {
  /// Target found, roots resolved.
  Loaded,
  /// Modules collected and ordered without cycles.
  GraphBuilt,
  /// Compile environments merged without conflicts.
  Propagated,
  /// Kind and version checks passed.
  Validated,
  /// Plan emitted.
  Assembled,
}

impl AssemblyStage {
  pub fn next(self) -> Option<Self> {
    match self {
      AssemblyStage::Loaded => Some(AssemblyStage::GraphBuilt),
      AssemblyStage::GraphBuilt => Some(AssemblyStage::Propagated),
      AssemblyStage::Propagated => Some(AssemblyStage::Validated),
      AssemblyStage::Validated => Some(AssemblyStage::Assembled),
      AssemblyStage::Assembled => None,
    }
  }

  pub(crate) fn advance(&mut self) {
    if let Some(next) = self.next() {
      *self = next;
    }
  }
}

impl fmt::Display for AssemblyStage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      AssemblyStage::Loaded => "loaded",
      AssemblyStage::GraphBuilt => "graph-built",
      AssemblyStage::Propagated => "propagated",
      AssemblyStage::Validated => "validated",
      AssemblyStage::Assembled => "assembled",
    };
    write!(f, "{}", s)
  }
}

/// A rejected target assembly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("target '{target}' rejected at stage {stage}: {source}")]
pub struct AssembleError {
  pub target: String,
  /// Last stage the assembly reached.
  pub stage: AssemblyStage,
  #[source]
  pub source: PlanError,
}

impl AssembleError {
  pub fn kind(&self) -> &PlanError {
    &self.source
  }
}

/// Compile environment of one module in the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModulePlan {
  pub name: String,
  pub kind: ModuleKind,
  pub pch: PchUsage,
  /// Direct public and private dependencies, in declaration order.
  pub link_dependencies: Vec<String>,
  pub include_paths: Vec<String>,
  pub definitions: Definitions,
}

/// The validated build plan of one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConfig {
  pub target: String,
  pub kind: TargetKind,
  pub build_settings: BuildSettingsVersion,
  pub include_order: IncludeOrderVersion,

  /// Root modules as listed by the target, duplicates removed.
  pub roots: Vec<String>,

  /// Declared modules to compile, dependencies first.
  pub compile_order: Vec<String>,

  /// Modules linked into the target (declared and external), dependencies first.
  pub link_modules: Vec<String>,

  /// External modules the target refers to.
  pub externals: Vec<String>,

  /// Union of the roots' compile environments.
  pub include_paths: Vec<String>,
  pub definitions: Definitions,

  /// Per-module compile environments, in compile order.
  pub modules: Vec<ModulePlan>,
}

impl Hashable for ResolvedConfig {}

impl ResolvedConfig {
  pub fn module(&self, name: &str) -> Option<&ModulePlan> {
    self.modules.iter().find(|m| m.name == name)
  }

  /// Position of `name` in the compile order.
  pub fn position(&self, name: &str) -> Option<usize> {
    self.compile_order.iter().position(|m| m == name)
  }
}
