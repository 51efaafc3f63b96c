//! Randomized ordering checks over acyclic module graphs.

use proptest::prelude::*;

use modplan_lib::{ModuleDef, TargetDef, TargetKind};

use super::common::planner;

/// One dependency: an earlier module index, public or private, or the external `Core`.
#[derive(Debug, Clone)]
enum Dep {
  Module(usize, bool),
  Core,
}

/// Acyclic graphs: module `i` only depends on modules `0..i`.
fn acyclic_graph() -> impl Strategy<Value = Vec<Vec<Dep>>> {
  (1usize..12).prop_flat_map(|count| {
    (0..count)
      .map(|i| {
        let dep = prop_oneof![
          4 => (0..i.max(1), any::<bool>()).prop_map(|(j, public)| Dep::Module(j, public)),
          1 => Just(Dep::Core),
        ];
        let max = if i == 0 { 0 } else { 4 };
        proptest::collection::vec(dep, 0..=max)
      })
      .collect::<Vec<_>>()
  })
}

fn modules(graph: &[Vec<Dep>]) -> Vec<ModuleDef> {
  let mut modules: Vec<ModuleDef> = graph
    .iter()
    .enumerate()
    .map(|(i, deps)| {
      deps.iter().fold(ModuleDef::new(format!("M{i}")), |module, dep| match dep {
        Dep::Module(j, true) => module.public_dep(&format!("M{j}")),
        Dep::Module(j, false) => module.private_dep(&format!("M{j}")),
        Dep::Core => module.private_dep("Core"),
      })
    })
    .collect();
  // Registration order works against the dependency order
  modules.reverse();
  modules
}

fn everything(count: usize) -> TargetDef {
  (0..count).fold(TargetDef::new("All", TargetKind::Game), |target, i| {
    target.with_module(&format!("M{i}"))
  })
}

proptest! {
  #[test]
  fn every_module_follows_its_dependencies(graph in acyclic_graph()) {
    let planner = planner(modules(&graph), vec![everything(graph.len())]);
    let config = planner.assemble("All").unwrap();

    prop_assert_eq!(config.compile_order.len(), graph.len());
    for (i, deps) in graph.iter().enumerate() {
      let position = config.position(&format!("M{i}")).unwrap();
      for dep in deps {
        if let Dep::Module(j, _) = dep {
          let dep_position = config.position(&format!("M{j}")).unwrap();
          prop_assert!(dep_position < position, "M{} must come before M{}", j, i);
        }
      }
    }
  }

  #[test]
  fn link_list_follows_compile_order(graph in acyclic_graph()) {
    let planner = planner(modules(&graph), vec![everything(graph.len())]);
    let first = planner.assemble("All").unwrap();
    let second = planner.assemble("All").unwrap();
    prop_assert_eq!(&first, &second);

    let declared: Vec<_> = first
      .link_modules
      .iter()
      .filter(|name| name.as_str() != "Core")
      .cloned()
      .collect();
    prop_assert_eq!(declared, first.compile_order.clone());
  }
}
