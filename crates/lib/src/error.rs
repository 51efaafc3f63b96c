//! Error taxonomy for module resolution and target assembly.
//!
//! Every variant describes a static defect in the descriptors; none of them
//! is retryable.

use std::fmt;

use thiserror::Error;

use crate::module::ModuleKind;
use crate::target::TargetKind;

/// What referenced a module name that failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Referrer {
  /// A module's dependency, include-path or dynamic list.
  Module(String),
  /// A target's root module list.
  Target(String),
}

impl fmt::Display for Referrer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Referrer::Module(name) => write!(f, "module '{}'", name),
      Referrer::Target(name) => write!(f, "target '{}'", name),
    }
  }
}

/// Which version tag a [`PlanError::VersionMismatch`] is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSetting {
  IncludeOrder,
  BuildSettings,
}

impl fmt::Display for VersionSetting {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      VersionSetting::IncludeOrder => write!(f, "include order version"),
      VersionSetting::BuildSettings => write!(f, "build settings version"),
    }
  }
}

/// Errors raised while loading descriptors or assembling a target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
  /// A module name was registered twice.
  #[error("module '{0}' is already registered")]
  DuplicateModule(String),

  /// A target name was declared twice.
  #[error("target '{0}' is already declared")]
  DuplicateTarget(String),

  /// A name is neither a registered module nor an allow-listed external module.
  #[error("unknown module '{name}'{}", referrer_suffix(.referenced_by))]
  UnknownModule {
    name: String,
    referenced_by: Option<Referrer>,
  },

  /// No target with this name was declared.
  #[error("unknown target '{0}'")]
  UnknownTarget(String),

  /// The target lists no root modules, or only external ones.
  #[error("target '{0}' has no root modules")]
  EmptyTarget(String),

  /// The modules reachable from the target's roots contain a cycle.
  #[error("dependency cycle detected: {}", .cycle.join(" -> "))]
  CyclicDependency {
    /// Cycle path, starting and ending with the same module.
    cycle: Vec<String>,
  },

  /// Two contributors define the same compile definition with different values.
  #[error(
    "conflicting values for definition '{definition}': module '{first_module}' sets {}, module '{second_module}' sets {}",
    display_value(.first_value),
    display_value(.second_value)
  )]
  ConfigConflict {
    definition: String,
    first_module: String,
    first_value: Option<String>,
    second_module: String,
    second_value: Option<String>,
  },

  /// A module declares an older version than the target requires.
  #[error("module '{module}' declares {setting} {declared}, but target '{target}' requires at least {required}")]
  VersionMismatch {
    module: String,
    target: String,
    setting: VersionSetting,
    declared: String,
    required: String,
  },

  /// A module's kind cannot be built into this kind of target.
  #[error("{module_kind} module '{module}' cannot be part of {target_kind} target '{target}'")]
  TargetKindMismatch {
    target: String,
    target_kind: TargetKind,
    module: String,
    module_kind: ModuleKind,
  },
}

fn referrer_suffix(referrer: &Option<Referrer>) -> String {
  match referrer {
    Some(r) => format!(" (referenced by {})", r),
    None => String::new(),
  }
}

fn display_value(value: &Option<String>) -> String {
  match value {
    Some(v) => format!("\"{}\"", v),
    None => "(no value)".to_string(),
  }
}
