//! modplan-lib: Core types and logic for modplan
//!
//! This crate resolves declared modules into per-target build plans:
//! - `module`: module descriptors and the frozen descriptor store
//! - `target`: target descriptors (Game, Editor, ...) and their root modules
//! - `graph`: the dependency graph with Public/Private/IncludePath/Dynamic edges
//! - `propagate`: public interface and compile environment computation
//! - `assemble`: the `Planner`, which turns a target into a `ResolvedConfig`
//! - `project`: loading descriptors from a JSON project file

pub mod assemble;
pub mod consts;
pub mod error;
pub mod graph;
pub mod module;
pub mod project;
pub mod propagate;
pub mod target;
pub mod util;
pub mod validate;
pub mod version;

pub use assemble::{AssembleError, AssemblyStage, ModulePlan, Planner, ResolvedConfig};
pub use error::{PlanError, Referrer};
pub use module::{ModuleDef, ModuleKind, ModuleRef, ModuleStore, PchUsage, Visibility};
pub use target::{TargetDef, TargetKind};
pub use version::{BuildSettingsVersion, IncludeOrderVersion};
