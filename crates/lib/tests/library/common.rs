//! Shared helpers for library integration tests.

use modplan_lib::{ModuleDef, ModuleStore, Planner, TargetDef, TargetKind};

/// Freeze `modules` with `Core` and `Engine` allow-listed as externals.
pub fn planner(modules: Vec<ModuleDef>, targets: Vec<TargetDef>) -> Planner {
  let mut store = ModuleStore::with_externals(["Core", "Engine"]);
  for module in modules {
    store.register(module).unwrap();
  }
  Planner::new(store, targets).unwrap()
}

/// A Game target with a single root module.
pub fn game(name: &str, root: &str) -> TargetDef {
  TargetDef::new(name, TargetKind::Game).with_module(root)
}
