//! Target assembly: ordering, rejection and isolation.

use modplan_lib::error::VersionSetting;
use modplan_lib::util::hash::Hashable;
use modplan_lib::{
  AssemblyStage, IncludeOrderVersion, ModuleDef, ModuleKind, PlanError, Referrer, TargetDef, TargetKind,
};

use super::common::{game, planner};

fn core_engine_game() -> Vec<ModuleDef> {
  vec![
    ModuleDef::new("Core").public_include("Core/Public"),
    ModuleDef::new("Engine").public_dep("Core").public_include("Engine/Public"),
    ModuleDef::new("Game")
      .public_dep("Engine")
      .private_dep("Core")
      .public_include("Game/Public")
      .private_include("Game/Private"),
  ]
}

mod ordering {
  use super::*;

  #[test]
  fn core_engine_game() {
    let planner = planner(super::core_engine_game(), vec![game("Game", "Game")]);

    let config = planner.assemble("Game").unwrap();
    assert_eq!(config.compile_order, vec!["Core", "Engine", "Game"]);
    assert_eq!(
      config.include_paths,
      vec!["Game/Public", "Game/Private", "Engine/Public", "Core/Public"]
    );
    // Declared Core shadows the external of the same name
    assert!(config.externals.is_empty());
  }

  #[test]
  fn every_module_follows_its_dependencies() {
    let modules = vec![
      ModuleDef::new("Ui").public_dep("Widgets").private_dep("Engine"),
      ModuleDef::new("Widgets").public_dep("Input").private_dep("Core"),
      ModuleDef::new("Input").private_dep("Core"),
      ModuleDef::new("Session").public_dep("Core"),
      ModuleDef::new("Game").public_dep("Ui").private_dep("Session").private_dep("Input"),
    ];
    let planner = planner(modules, vec![game("Game", "Game")]);

    let config = planner.assemble("Game").unwrap();
    assert_eq!(config.compile_order.len(), 5);
    for plan in &config.modules {
      let position = config.position(&plan.name).unwrap();
      for dep in &plan.link_dependencies {
        if let Some(dep_position) = config.position(dep) {
          assert!(dep_position < position, "{dep} must come before {}", plan.name);
        }
      }
    }
  }

  #[test]
  fn link_list_includes_externals_dependencies_first() {
    let modules = vec![ModuleDef::new("Game").public_dep("Engine").private_dep("Core")];
    let planner = planner(modules, vec![game("Game", "Game")]);

    let config = planner.assemble("Game").unwrap();
    assert_eq!(config.compile_order, vec!["Game"]);
    assert_eq!(config.externals, vec!["Core", "Engine"]);
    assert_eq!(config.link_modules, vec!["Core", "Engine", "Game"]);
  }

  #[test]
  fn repeated_assembly_is_deterministic() {
    let planner = planner(super::core_engine_game(), vec![game("Game", "Game")]);

    let first = planner.assemble("Game").unwrap();
    let second = planner.assemble("Game").unwrap();
    assert_eq!(first, second);
    assert_eq!(first.compute_hash().unwrap(), second.compute_hash().unwrap());
  }
}

mod rejection {
  use super::*;

  #[test]
  fn two_module_cycle() {
    let modules = vec![
      ModuleDef::new("A").public_dep("B"),
      ModuleDef::new("B").public_dep("A"),
    ];
    let planner = planner(modules, vec![game("Cyclic", "A")]);

    let err = planner.assemble("Cyclic").unwrap_err();
    assert_eq!(err.stage, AssemblyStage::Loaded);
    match err.kind() {
      PlanError::CyclicDependency { cycle } => {
        assert!(cycle.contains(&"A".to_string()));
        assert!(cycle.contains(&"B".to_string()));
        assert_eq!(cycle.first(), cycle.last());
      }
      other => panic!("expected cycle, got {other}"),
    }
    assert!(err.to_string().contains("A -> B -> A"));
  }

  #[test]
  fn unregistered_root() {
    let planner = planner(super::core_engine_game(), vec![game("Broken", "Ghost")]);

    let err = planner.assemble("Broken").unwrap_err();
    assert_eq!(
      err.source,
      PlanError::UnknownModule {
        name: "Ghost".to_string(),
        referenced_by: Some(Referrer::Target("Broken".to_string())),
      }
    );
  }

  #[test]
  fn unknown_and_empty_targets() {
    let planner = planner(
      super::core_engine_game(),
      vec![TargetDef::new("Empty", TargetKind::Game)],
    );

    let err = planner.assemble("Missing").unwrap_err();
    assert_eq!(err.source, PlanError::UnknownTarget("Missing".to_string()));

    let err = planner.assemble("Empty").unwrap_err();
    assert_eq!(err.source, PlanError::EmptyTarget("Empty".to_string()));
  }

  #[test]
  fn external_only_roots() {
    let planner = planner(
      vec![ModuleDef::new("Game").public_dep("Engine")],
      vec![game("Engine", "Engine")],
    );

    let err = planner.assemble("Engine").unwrap_err();
    assert_eq!(err.stage, AssemblyStage::Loaded);
    assert_eq!(err.source, PlanError::EmptyTarget("Engine".to_string()));
  }

  #[test]
  fn editor_module_in_game_target() {
    let modules = vec![
      ModuleDef::new("Game"),
      ModuleDef::new("Tools").with_kind(ModuleKind::Editor).public_dep("Game"),
    ];
    let targets = vec![
      TargetDef::new("Shipping", TargetKind::Game).with_module("Game").with_module("Tools"),
      TargetDef::new("Editor", TargetKind::Editor).with_module("Game").with_module("Tools"),
    ];
    let planner = planner(modules, targets);

    let err = planner.assemble("Shipping").unwrap_err();
    assert_eq!(err.stage, AssemblyStage::Propagated);
    assert!(matches!(err.kind(), PlanError::TargetKindMismatch { module, .. } if module == "Tools"));

    assert!(planner.assemble("Editor").is_ok());
  }

  #[test]
  fn developer_module_in_server_target() {
    let modules = vec![
      ModuleDef::new("Server").private_dep("Profiler"),
      ModuleDef::new("Profiler").with_kind(ModuleKind::Developer),
    ];
    let targets = vec![
      TargetDef::new("Dedicated", TargetKind::Server).with_module("Server"),
      TargetDef::new("Tool", TargetKind::Program).with_module("Server"),
    ];
    let planner = planner(modules, targets);

    let err = planner.assemble("Dedicated").unwrap_err();
    assert!(matches!(err.kind(), PlanError::TargetKindMismatch { module, .. } if module == "Profiler"));
    assert!(planner.assemble("Tool").is_ok());
  }

  #[test]
  fn dependency_with_older_include_order() {
    let modules = vec![
      ModuleDef::new("Game").public_dep("Legacy"),
      ModuleDef::new("Legacy").with_include_order(IncludeOrderVersion::Unreal5_1),
    ];
    let target = game("Game", "Game").with_include_order(IncludeOrderVersion::Unreal5_2);
    let planner = planner(modules, vec![target]);

    let err = planner.assemble("Game").unwrap_err();
    assert_eq!(err.stage, AssemblyStage::Propagated);
    assert_eq!(
      err.source,
      PlanError::VersionMismatch {
        module: "Legacy".to_string(),
        target: "Game".to_string(),
        setting: VersionSetting::IncludeOrder,
        declared: "Unreal5_1".to_string(),
        required: "Unreal5_2".to_string(),
      }
    );
  }

  #[test]
  fn failure_is_isolated_to_its_target() {
    let mut modules = super::core_engine_game();
    modules.push(ModuleDef::new("Loop").public_dep("Loop"));
    let targets = vec![game("Game", "Game"), game("Looping", "Loop")];
    let planner = planner(modules, targets);

    let results = planner.assemble_all();
    let names: Vec<_> = results.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["Game", "Looping"]);
    assert!(results[0].1.is_ok());
    assert!(results[1].1.is_err());

    // The planner is still usable after a rejection
    assert!(planner.assemble("Game").is_ok());
  }
}

mod loading {
  use modplan_lib::{ModuleStore, Planner};

  use super::*;

  #[test]
  fn unknown_dependency_names_the_module() {
    let mut store = ModuleStore::with_externals(["Core"]);
    store.register(ModuleDef::new("Game").private_dep("Slate")).unwrap();

    let err = Planner::new(store, vec![]).unwrap_err();
    assert_eq!(err.to_string(), "unknown module 'Slate' (referenced by module 'Game')");
  }

  #[test]
  fn duplicate_target_names() {
    let store = ModuleStore::new();
    let targets = vec![
      TargetDef::new("Game", TargetKind::Game),
      TargetDef::new("Game", TargetKind::Client),
    ];

    let err = Planner::new(store, targets).unwrap_err();
    assert_eq!(err, PlanError::DuplicateTarget("Game".to_string()));
  }
}
