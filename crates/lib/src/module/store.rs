use std::collections::{BTreeSet, HashMap};

use tracing::trace;

use crate::error::PlanError;

use super::types::ModuleDef;

/// A resolved module name: either a declared module or an allow-listed external one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleRef<'a> {
  Declared(&'a ModuleDef),
  External(&'a str),
}

impl<'a> ModuleRef<'a> {
  pub fn name(&self) -> &'a str {
    match self {
      ModuleRef::Declared(def) => def.name.as_str(),
      ModuleRef::External(name) => name,
    }
  }

  pub fn is_external(&self) -> bool {
    matches!(self, ModuleRef::External(_))
  }
}

/// Append-only store of module descriptors.
///
/// Modules keep their registration order, which is also the order used to
/// break ties when sorting a target's modules. External modules are opaque
/// leaves: they resolve, but carry no dependencies, paths or definitions.
#[derive(Debug, Clone, Default)]
pub struct ModuleStore {
  modules: Vec<ModuleDef>,
  index: HashMap<String, usize>,
  externals: BTreeSet<String>,
}

impl ModuleStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Create a store whose external allowlist is `externals`.
  pub fn with_externals<I, S>(externals: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let mut store = Self::new();
    for name in externals {
      store.register_external(name);
    }
    store
  }

  /// Register a module descriptor.
  ///
  /// # Errors
  ///
  /// Returns `DuplicateModule` if a module with the same name is already registered.
  pub fn register(&mut self, module: ModuleDef) -> Result<(), PlanError> {
    if self.index.contains_key(&module.name) {
      return Err(PlanError::DuplicateModule(module.name));
    }

    trace!(module = %module.name, "registered module");
    self.index.insert(module.name.clone(), self.modules.len());
    self.modules.push(module);
    Ok(())
  }

  /// Add a name to the external-module allowlist.
  pub fn register_external(&mut self, name: impl Into<String>) {
    self.externals.insert(name.into());
  }

  /// Resolve a module name.
  ///
  /// A declared module shadows an external module of the same name.
  ///
  /// # Errors
  ///
  /// Returns `UnknownModule` if the name is neither declared nor allow-listed.
  pub fn lookup(&self, name: &str) -> Result<ModuleRef<'_>, PlanError> {
    if let Some(def) = self.get(name) {
      return Ok(ModuleRef::Declared(def));
    }

    self
      .externals
      .get(name)
      .map(|external| ModuleRef::External(external.as_str()))
      .ok_or_else(|| PlanError::UnknownModule {
        name: name.to_string(),
        referenced_by: None,
      })
  }

  /// Get a declared module by name.
  pub fn get(&self, name: &str) -> Option<&ModuleDef> {
    self.index.get(name).map(|&i| &self.modules[i])
  }

  /// Whether `name` resolves to an external module.
  pub fn is_external(&self, name: &str) -> bool {
    !self.index.contains_key(name) && self.externals.contains(name)
  }

  /// Declared modules in registration order.
  pub fn modules(&self) -> impl Iterator<Item = &ModuleDef> {
    self.modules.iter()
  }

  /// Allow-listed external modules that are not shadowed by a declaration, in name order.
  pub fn externals(&self) -> impl Iterator<Item = &str> {
    self
      .externals
      .iter()
      .filter(|name| !self.index.contains_key(name.as_str()))
      .map(String::as_str)
  }

  /// Number of declared modules.
  pub fn len(&self) -> usize {
    self.modules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.modules.is_empty()
  }
}
