/// Number of hex characters kept from a SHA-256 digest for plan fingerprints.
pub const OBJ_HASH_PREFIX_LEN: usize = 20;

/// Current project file format version.
pub const PROJECT_VERSION: u32 = 1;

/// Project file looked up when no path is given.
pub const DEFAULT_PROJECT_FILE: &str = "modplan.json";

/// Engine modules treated as opaque leaves when a project does not list its own externals.
pub const ENGINE_MODULES: &[&str] = &[
  "AIModule",
  "ApplicationCore",
  "Core",
  "CoreUObject",
  "Engine",
  "EnhancedInput",
  "GameplayTags",
  "HeadMountedDisplay",
  "InputCore",
  "Niagara",
  "OnlineSubsystem",
  "OnlineSubsystemSteam",
  "OnlineSubsystemUtils",
  "PhysicsCore",
  "RenderCore",
  "RHI",
  "RuleRanger",
  "Slate",
  "SlateCore",
  "UMG",
  "UnrealEd",
];
