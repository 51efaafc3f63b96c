use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::version::{BuildSettingsVersion, IncludeOrderVersion};

/// Where a module may be built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleKind {
  /// Shipped in every target.
  #[default]
  Runtime,
  /// Tooling code, only built into Editor and Program targets.
  Developer,
  /// Editor-only code, only built into Editor targets.
  Editor,
}

impl fmt::Display for ModuleKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ModuleKind::Runtime => write!(f, "Runtime"),
      ModuleKind::Developer => write!(f, "Developer"),
      ModuleKind::Editor => write!(f, "Editor"),
    }
  }
}

/// Precompiled header policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PchUsage {
  None,
  Shared,
  Explicit,
  #[default]
  ExplicitOrShared,
}

impl fmt::Display for PchUsage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PchUsage::None => write!(f, "none"),
      PchUsage::Shared => write!(f, "shared"),
      PchUsage::Explicit => write!(f, "explicit"),
      PchUsage::ExplicitOrShared => write!(f, "explicit-or-shared"),
    }
  }
}

/// Whether a dependency's interface is re-exposed to the module's consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
  Public,
  Private,
}

/// How a module refers to another module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
  /// Linked, and its interface is re-exposed to consumers.
  Public,
  /// Linked, interface visible to this module only.
  Private,
  /// Headers only: no link, no build-order constraint.
  IncludePath,
  /// Loaded at runtime: built alongside, never linked.
  Dynamic,
}

impl DependencyKind {
  /// Public or Private, for link dependencies.
  pub fn visibility(self) -> Option<Visibility> {
    match self {
      DependencyKind::Public => Some(Visibility::Public),
      DependencyKind::Private => Some(Visibility::Private),
      DependencyKind::IncludePath | DependencyKind::Dynamic => None,
    }
  }

  /// Link dependencies must be compiled before the module that uses them.
  pub fn is_link(self) -> bool {
    self.visibility().is_some()
  }

  /// Whether the referenced module is built as part of the referrer's target.
  pub fn is_built(self) -> bool {
    !matches!(self, DependencyKind::IncludePath)
  }
}

impl fmt::Display for DependencyKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DependencyKind::Public => write!(f, "public"),
      DependencyKind::Private => write!(f, "private"),
      DependencyKind::IncludePath => write!(f, "include-path"),
      DependencyKind::Dynamic => write!(f, "dynamic"),
    }
  }
}

/// Compile definitions: name to optional value (`None` means a bare `-DNAME`).
pub type Definitions = BTreeMap<String, Option<String>>;

/// A declared module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleDef {
  pub name: String,

  #[serde(default)]
  pub kind: ModuleKind,

  #[serde(default)]
  pub pch: PchUsage,

  /// Include-order version the module was written against. `None` follows the target.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub include_order: Option<IncludeOrderVersion>,

  /// Module-level build settings override. `None` follows the target.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub build_settings: Option<BuildSettingsVersion>,

  #[serde(default)]
  pub public_dependencies: Vec<String>,

  #[serde(default)]
  pub private_dependencies: Vec<String>,

  #[serde(default)]
  pub public_include_paths: Vec<String>,

  #[serde(default)]
  pub private_include_paths: Vec<String>,

  /// Definitions exported to every consumer reachable through public edges.
  #[serde(default)]
  pub public_definitions: Definitions,

  /// Definitions only this module compiles with.
  #[serde(default)]
  pub private_definitions: Definitions,

  /// Modules whose public headers are visible here without linking them.
  #[serde(default)]
  pub include_path_modules: Vec<String>,

  /// Modules loaded at runtime.
  #[serde(default)]
  pub dynamic_modules: Vec<String>,
}

impl ModuleDef {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      kind: ModuleKind::default(),
      pch: PchUsage::default(),
      include_order: None,
      build_settings: None,
      public_dependencies: Vec::new(),
      private_dependencies: Vec::new(),
      public_include_paths: Vec::new(),
      private_include_paths: Vec::new(),
      public_definitions: Definitions::new(),
      private_definitions: Definitions::new(),
      include_path_modules: Vec::new(),
      dynamic_modules: Vec::new(),
    }
  }

  pub fn with_kind(mut self, kind: ModuleKind) -> Self {
    self.kind = kind;
    self
  }

  pub fn with_pch(mut self, pch: PchUsage) -> Self {
    self.pch = pch;
    self
  }

  pub fn with_include_order(mut self, version: IncludeOrderVersion) -> Self {
    self.include_order = Some(version);
    self
  }

  pub fn with_build_settings(mut self, version: BuildSettingsVersion) -> Self {
    self.build_settings = Some(version);
    self
  }

  pub fn public_dep(mut self, name: &str) -> Self {
    self.public_dependencies.push(name.to_string());
    self
  }

  pub fn private_dep(mut self, name: &str) -> Self {
    self.private_dependencies.push(name.to_string());
    self
  }

  pub fn public_include(mut self, path: &str) -> Self {
    self.public_include_paths.push(path.to_string());
    self
  }

  pub fn private_include(mut self, path: &str) -> Self {
    self.private_include_paths.push(path.to_string());
    self
  }

  pub fn public_define(mut self, name: &str, value: Option<&str>) -> Self {
    self.public_definitions.insert(name.to_string(), value.map(str::to_string));
    self
  }

  pub fn private_define(mut self, name: &str, value: Option<&str>) -> Self {
    self.private_definitions.insert(name.to_string(), value.map(str::to_string));
    self
  }

  pub fn include_path_module(mut self, name: &str) -> Self {
    self.include_path_modules.push(name.to_string());
    self
  }

  pub fn dynamic_module(mut self, name: &str) -> Self {
    self.dynamic_modules.push(name.to_string());
    self
  }

  /// Every module name this module refers to, in declaration order.
  ///
  /// Lists are walked public, private, include-path, dynamic; a name that
  /// appears more than once keeps its first (strongest) kind, so a module
  /// listed as both public and private dependency is a public dependency.
  pub fn references(&self) -> Vec<(&str, DependencyKind)> {
    let lists = [
      (&self.public_dependencies, DependencyKind::Public),
      (&self.private_dependencies, DependencyKind::Private),
      (&self.include_path_modules, DependencyKind::IncludePath),
      (&self.dynamic_modules, DependencyKind::Dynamic),
    ];

    let mut seen = HashSet::new();
    let mut refs = Vec::new();
    for (names, kind) in lists {
      for name in names {
        if seen.insert(name.as_str()) {
          refs.push((name.as_str(), kind));
        }
      }
    }
    refs
  }
}
