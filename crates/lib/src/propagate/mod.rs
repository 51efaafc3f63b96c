//! Interface propagation.
//!
//! This module computes, for a module in the dependency graph:
//! - its **public interface**: its own public include paths and definitions
//!   plus the public interface of every public dependency, transitively;
//! - its **compile environment**: everything the module itself compiles
//!   against, i.e. its own public and private settings plus the public
//!   interface of each direct link dependency.
//!
//! A private dependency's interface reaches the module's compile environment
//! but never its public interface, so consumers never see it.
//!
//! Definitions merge idempotently: the same name with the same value from two
//! contributors is kept once, a different value fails with `ConfigConflict`.

use std::collections::{BTreeMap, HashMap};

use petgraph::graph::NodeIndex;
use serde::Serialize;
use tracing::trace;

use crate::error::PlanError;
use crate::graph::DependencyGraph;
use crate::module::{DependencyKind, Definitions, ModuleDef, ModuleStore};

/// Include paths and definitions, with the module that contributed each definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Environment {
  /// Include paths in first-contribution order, without duplicates.
  pub include_paths: Vec<String>,

  pub definitions: Definitions,

  /// Definition name -> first module that set it.
  #[serde(skip)]
  sources: BTreeMap<String, String>,
}

impl Environment {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add_include_path(&mut self, path: &str) {
    if !self.include_paths.iter().any(|p| p == path) {
      self.include_paths.push(path.to_string());
    }
  }

  /// Add a definition contributed by `module`.
  ///
  /// # Errors
  ///
  /// Returns `ConfigConflict` if `name` is already defined with a different value.
  pub fn define(&mut self, name: &str, value: &Option<String>, module: &str) -> Result<(), PlanError> {
    match self.definitions.get(name) {
      Some(existing) if existing == value => Ok(()),
      Some(existing) => Err(PlanError::ConfigConflict {
        definition: name.to_string(),
        first_module: self.sources.get(name).cloned().unwrap_or_default(),
        first_value: existing.clone(),
        second_module: module.to_string(),
        second_value: value.clone(),
      }),
      None => {
        self.definitions.insert(name.to_string(), value.clone());
        self.sources.insert(name.to_string(), module.to_string());
        Ok(())
      }
    }
  }

  /// Merge another environment into this one, keeping its contributors.
  pub fn merge(&mut self, other: &Environment) -> Result<(), PlanError> {
    self.merge_include_paths(other);
    for (name, value) in &other.definitions {
      let source = other.sources.get(name).map(String::as_str).unwrap_or_default();
      self.define(name, value, source)?;
    }
    Ok(())
  }

  /// Merge only the include paths of another environment.
  pub fn merge_include_paths(&mut self, other: &Environment) {
    for path in &other.include_paths {
      self.add_include_path(path);
    }
  }

  /// Module that contributed `definition`, if any.
  pub fn source_of(&self, definition: &str) -> Option<&str> {
    self.sources.get(definition).map(String::as_str)
  }

  fn add_paths(&mut self, paths: &[String]) {
    for path in paths {
      self.add_include_path(path);
    }
  }

  fn add_definitions(&mut self, definitions: &Definitions, module: &str) -> Result<(), PlanError> {
    for (name, value) in definitions {
      self.define(name, value, module)?;
    }
    Ok(())
  }
}

/// Computes public interfaces and compile environments over a frozen graph.
///
/// Public interfaces are memoized, so one `Propagator` should be reused for
/// every module of a single assembly.
pub struct Propagator<'a> {
  store: &'a ModuleStore,
  graph: &'a DependencyGraph,
  interfaces: HashMap<NodeIndex, Environment>,
  /// Modules whose interface is being computed, outermost first.
  path: Vec<NodeIndex>,
}

impl<'a> Propagator<'a> {
  pub fn new(store: &'a ModuleStore, graph: &'a DependencyGraph) -> Self {
    Self {
      store,
      graph,
      interfaces: HashMap::new(),
      path: Vec::new(),
    }
  }

  fn declared(&self, idx: NodeIndex) -> Option<&'a ModuleDef> {
    if self.graph.is_external(idx) {
      return None;
    }
    self.store.get(self.graph.name(idx))
  }

  /// What `idx` exposes to its consumers.
  ///
  /// External modules expose nothing.
  ///
  /// # Errors
  ///
  /// `ConfigConflict` on conflicting definitions along public chains, and
  /// `CyclicDependency` if public edges loop back to a module being resolved.
  pub fn public_interface(&mut self, idx: NodeIndex) -> Result<Environment, PlanError> {
    if let Some(env) = self.interfaces.get(&idx) {
      return Ok(env.clone());
    }

    let mut env = Environment::new();
    if let Some(module) = self.declared(idx) {
      if let Some(start) = self.path.iter().position(|&n| n == idx) {
        let mut cycle: Vec<String> = self.path[start..]
          .iter()
          .map(|&n| self.graph.name(n).to_string())
          .collect();
        cycle.push(module.name.clone());
        return Err(PlanError::CyclicDependency { cycle });
      }

      self.path.push(idx);
      let result = self.collect_public(idx, module, &mut env);
      self.path.pop();
      result?;
    }

    trace!(
      module = self.graph.name(idx),
      include_paths = env.include_paths.len(),
      definitions = env.definitions.len(),
      "computed public interface"
    );
    self.interfaces.insert(idx, env.clone());
    Ok(env)
  }

  fn collect_public(&mut self, idx: NodeIndex, module: &ModuleDef, env: &mut Environment) -> Result<(), PlanError> {
    env.add_paths(&module.public_include_paths);
    env.add_definitions(&module.public_definitions, &module.name)?;

    for (dep, kind) in self.graph.dependencies(idx) {
      if kind == DependencyKind::Public {
        let inherited = self.public_interface(dep)?;
        env.merge(&inherited)?;
      }
    }
    Ok(())
  }

  /// What `idx` itself compiles against.
  ///
  /// Own public and private settings, the public interface of every direct
  /// public or private dependency, and the include paths of every
  /// include-path module's public interface. Dynamic modules contribute nothing.
  pub fn compile_environment(&mut self, idx: NodeIndex) -> Result<Environment, PlanError> {
    let mut env = Environment::new();
    let Some(module) = self.declared(idx) else {
      return Ok(env);
    };

    env.add_paths(&module.public_include_paths);
    env.add_paths(&module.private_include_paths);
    env.add_definitions(&module.public_definitions, &module.name)?;
    env.add_definitions(&module.private_definitions, &module.name)?;

    for (dep, kind) in self.graph.dependencies(idx) {
      match kind {
        DependencyKind::Public | DependencyKind::Private => {
          let inherited = self.public_interface(dep)?;
          env.merge(&inherited)?;
        }
        DependencyKind::IncludePath => {
          let inherited = self.public_interface(dep)?;
          env.merge_include_paths(&inherited);
        }
        DependencyKind::Dynamic => {}
      }
    }

    Ok(env)
  }
}
