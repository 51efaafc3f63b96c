//! A game project with a runtime module, an editor module and a session plugin.

use modplan_lib::project::ProjectFile;
use modplan_lib::{
  AssemblyStage, BuildSettingsVersion, IncludeOrderVersion, ModuleDef, ModuleKind, PlanError, Planner, TargetDef,
  TargetKind,
};

fn blaster() -> ProjectFile {
  let mut project = ProjectFile::new();
  project.modules = vec![
    ModuleDef::new("Blaster")
      .public_dep("Core")
      .public_dep("CoreUObject")
      .public_dep("Engine")
      .public_dep("InputCore")
      .private_dep("EnhancedInput")
      .private_dep("RuleRanger")
      .public_include("Blaster/Public"),
    ModuleDef::new("BlasterEditor")
      .with_kind(ModuleKind::Editor)
      .public_dep("Core")
      .public_dep("CoreUObject")
      .public_dep("Engine")
      .public_dep("InputCore")
      .private_dep("RuleRanger")
      .private_dep("Blaster")
      .include_path_module("Blaster"),
    ModuleDef::new("MultiplayerSessions")
      .with_build_settings(BuildSettingsVersion::Latest)
      .with_include_order(IncludeOrderVersion::Latest)
      .public_dep("Core")
      .public_dep("OnlineSubsystem")
      .public_dep("OnlineSubsystemSteam")
      .public_dep("UMG")
      .public_dep("Slate")
      .public_dep("SlateCore")
      .private_dep("CoreUObject")
      .private_dep("Engine")
      .private_dep("Slate")
      .private_dep("SlateCore"),
  ];
  project.targets = vec![
    TargetDef::new("Blaster", TargetKind::Game)
      .with_module("Blaster")
      .with_build_settings(BuildSettingsVersion::V2)
      .with_include_order(IncludeOrderVersion::Unreal5_2),
    TargetDef::new("BlasterEditor", TargetKind::Editor)
      .with_module("Blaster")
      .with_module("BlasterEditor")
      .with_build_settings(BuildSettingsVersion::Latest)
      .with_include_order(IncludeOrderVersion::Latest),
  ];
  project
}

fn planner(project: ProjectFile) -> Planner {
  project.into_planner().unwrap()
}

#[test]
fn game_target() {
  let planner = planner(blaster());

  let config = planner.assemble("Blaster").unwrap();
  assert_eq!(config.kind, TargetKind::Game);
  assert_eq!(config.compile_order, vec!["Blaster"]);
  assert_eq!(
    config.externals,
    vec!["Core", "CoreUObject", "Engine", "EnhancedInput", "InputCore", "RuleRanger"]
  );
  assert_eq!(config.link_modules.last().map(String::as_str), Some("Blaster"));
  assert_eq!(config.link_modules.len(), 7);
}

#[test]
fn editor_target_builds_both_modules() {
  let planner = planner(blaster());

  let config = planner.assemble("BlasterEditor").unwrap();
  assert_eq!(config.compile_order, vec!["Blaster", "BlasterEditor"]);

  let editor = config.module("BlasterEditor").unwrap();
  assert!(editor.include_paths.contains(&"Blaster/Public".to_string()));
  assert!(editor.link_dependencies.contains(&"Blaster".to_string()));
}

#[test]
fn editor_module_cannot_ship_in_game() {
  let mut project = blaster();
  project.targets[0].modules.push("BlasterEditor".to_string());
  let planner = planner(project);

  let err = planner.assemble("Blaster").unwrap_err();
  assert_eq!(err.stage, AssemblyStage::Propagated);
  assert_eq!(
    err.source,
    PlanError::TargetKindMismatch {
      target: "Blaster".to_string(),
      target_kind: TargetKind::Game,
      module: "BlasterEditor".to_string(),
      module_kind: ModuleKind::Editor,
    }
  );
}

#[test]
fn plugin_listed_twice_stays_public() {
  let mut project = blaster();
  project
    .targets
    .push(TargetDef::new("Sessions", TargetKind::Game).with_module("MultiplayerSessions"));
  let planner = planner(project);

  let slate: Vec<_> = planner
    .graph()
    .dependencies_of("MultiplayerSessions")
    .into_iter()
    .filter(|(name, _)| *name == "Slate")
    .collect();
  assert_eq!(slate.len(), 1);
  assert_eq!(slate[0].1, modplan_lib::module::DependencyKind::Public);

  assert!(planner.assemble("Sessions").is_ok());
}

#[test]
fn menu_module_too_old_for_latest_editor() {
  let mut project = blaster();
  project.modules.push(
    ModuleDef::new("MenuSystem")
      .with_include_order(IncludeOrderVersion::Unreal5_2)
      .public_dep("Core")
      .public_dep("OnlineSubsystem"),
  );
  project.targets[1].modules.push("MenuSystem".to_string());
  let planner = planner(project);

  let err = planner.assemble("BlasterEditor").unwrap_err();
  assert!(matches!(
    err.kind(),
    PlanError::VersionMismatch { module, .. } if module == "MenuSystem"
  ));

  // The game target is unaffected
  assert!(planner.assemble("Blaster").is_ok());
}

#[test]
fn all_targets_assemble_in_parallel() {
  let planner = planner(blaster());

  let results = planner.assemble_all();
  assert_eq!(results.len(), 2);
  assert!(results.iter().all(|(_, result)| result.is_ok()));
}
