//! Project file loading.
//!
//! A project file declares the external module allowlist, every module and
//! every target of one project. It is read once and frozen into a [`Planner`].
//!
//! # Project File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "externals": ["Core", "Engine"],
//!   "modules": [
//!     { "name": "Blaster", "public_dependencies": ["Core", "Engine"] }
//!   ],
//!   "targets": [
//!     { "name": "Blaster", "kind": "Game", "modules": ["Blaster"] }
//!   ]
//! }
//! ```
//!
//! When `externals` is omitted the built-in engine module list is used.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::assemble::Planner;
use crate::consts::{ENGINE_MODULES, PROJECT_VERSION};
use crate::error::PlanError;
use crate::module::{ModuleDef, ModuleStore};
use crate::target::TargetDef;

/// Errors that can occur when loading a project file.
#[derive(Debug, Error)]
pub enum ProjectError {
  /// Failed to read the project file.
  #[error("failed to read project file {}: {source}", .path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// Failed to parse the project file JSON.
  #[error("failed to parse project file: {0}")]
  Parse(#[source] serde_json::Error),

  /// Project file version is not supported.
  #[error("unsupported project file version {0}, expected {PROJECT_VERSION}")]
  UnsupportedVersion(u32),

  /// The descriptors themselves are invalid.
  #[error(transparent)]
  Plan(#[from] PlanError),
}

/// Parsed contents of a project file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectFile {
  /// Project file format version.
  pub version: u32,

  /// External module allowlist. `None` means the built-in engine modules.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub externals: Option<Vec<String>>,

  #[serde(default)]
  pub modules: Vec<ModuleDef>,

  #[serde(default)]
  pub targets: Vec<TargetDef>,
}

impl Default for ProjectFile {
  fn default() -> Self {
    Self::new()
  }
}

impl ProjectFile {
  /// Create an empty project using the built-in externals.
  pub fn new() -> Self {
    Self {
      version: PROJECT_VERSION,
      externals: None,
      modules: Vec::new(),
      targets: Vec::new(),
    }
  }

  /// Load a project file from the given path.
  pub fn load(path: &Path) -> Result<Self, ProjectError> {
    let content = fs::read_to_string(path).map_err(|source| ProjectError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    debug!(path = %path.display(), "loaded project file");
    Self::parse(&content)
  }

  /// Parse a project from JSON text.
  pub fn parse(content: &str) -> Result<Self, ProjectError> {
    let project: ProjectFile = serde_json::from_str(content).map_err(ProjectError::Parse)?;

    if project.version != PROJECT_VERSION {
      return Err(ProjectError::UnsupportedVersion(project.version));
    }

    Ok(project)
  }

  /// Names treated as external modules for this project.
  pub fn external_names(&self) -> Vec<String> {
    match &self.externals {
      Some(names) => names.clone(),
      None => ENGINE_MODULES.iter().map(|name| name.to_string()).collect(),
    }
  }

  /// Register every module and freeze the project.
  ///
  /// # Errors
  ///
  /// Returns `ProjectError::Plan` for duplicate module or target names and
  /// for module references that do not resolve.
  pub fn into_planner(self) -> Result<Planner, ProjectError> {
    let mut store = ModuleStore::with_externals(self.external_names());
    for module in self.modules {
      store.register(module)?;
    }

    Ok(Planner::new(store, self.targets)?)
  }
}

/// Load a project file and freeze it into a planner.
pub fn load_planner(path: &Path) -> Result<Planner, ProjectError> {
  ProjectFile::load(path)?.into_planner()
}
