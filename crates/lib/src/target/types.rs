use std::fmt;

use serde::{Deserialize, Serialize};

use crate::module::ModuleKind;
use crate::version::{BuildSettingsVersion, IncludeOrderVersion};

/// Kind of top-level build output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
  Game,
  Editor,
  Client,
  Server,
  Program,
}

impl TargetKind {
  /// Whether modules of `kind` may be built into this target.
  pub fn allows(self, kind: ModuleKind) -> bool {
    match kind {
      ModuleKind::Runtime => true,
      ModuleKind::Developer => matches!(self, TargetKind::Editor | TargetKind::Program),
      ModuleKind::Editor => matches!(self, TargetKind::Editor),
    }
  }
}

impl fmt::Display for TargetKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TargetKind::Game => write!(f, "Game"),
      TargetKind::Editor => write!(f, "Editor"),
      TargetKind::Client => write!(f, "Client"),
      TargetKind::Server => write!(f, "Server"),
      TargetKind::Program => write!(f, "Program"),
    }
  }
}

/// A declared target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetDef {
  pub name: String,

  pub kind: TargetKind,

  /// Root modules, in declaration order.
  #[serde(default)]
  pub modules: Vec<String>,

  #[serde(default)]
  pub build_settings: BuildSettingsVersion,

  #[serde(default)]
  pub include_order: IncludeOrderVersion,
}

impl TargetDef {
  pub fn new(name: impl Into<String>, kind: TargetKind) -> Self {
    Self {
      name: name.into(),
      kind,
      modules: Vec::new(),
      build_settings: BuildSettingsVersion::default(),
      include_order: IncludeOrderVersion::default(),
    }
  }

  pub fn with_module(mut self, name: &str) -> Self {
    self.modules.push(name.to_string());
    self
  }

  pub fn with_build_settings(mut self, version: BuildSettingsVersion) -> Self {
    self.build_settings = version;
    self
  }

  pub fn with_include_order(mut self, version: IncludeOrderVersion) -> Self {
    self.include_order = version;
    self
  }
}
