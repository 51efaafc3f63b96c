//! Target assembly.
//!
//! This module provides the [`Planner`], the frozen snapshot of a project
//! (module store, dependency graph and targets) and the main entry point for
//! turning a target into a [`ResolvedConfig`]. It handles:
//! - resolving the target's root modules
//! - collecting and ordering every module the target builds
//! - merging compile environments through [`crate::propagate`]
//! - kind and version validation
//!
//! The planner is immutable after construction, so independent targets can
//! be assembled concurrently (see [`Planner::assemble_all`]).

mod types;

use std::collections::{HashMap, HashSet};

use petgraph::graph::NodeIndex;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{PlanError, Referrer};
use crate::graph::DependencyGraph;
use crate::module::{DependencyKind, ModuleDef, ModuleStore};
use crate::propagate::{Environment, Propagator};
use crate::target::TargetDef;
use crate::validate;

pub use types::{AssembleError, AssemblyStage, ModulePlan, ResolvedConfig};

/// Frozen project snapshot that assembles targets.
#[derive(Debug)]
pub struct Planner {
  store: ModuleStore,
  graph: DependencyGraph,
  targets: Vec<TargetDef>,
  target_index: HashMap<String, usize>,
}

impl Planner {
  /// Freeze a populated store and its targets.
  ///
  /// # Errors
  ///
  /// Returns `DuplicateTarget` if two targets share a name, and
  /// `UnknownModule` if any module refers to a name that does not resolve.
  pub fn new(store: ModuleStore, targets: Vec<TargetDef>) -> Result<Self, PlanError> {
    validate::check_unique_targets(&targets)?;
    let graph = DependencyGraph::build(&store)?;

    let target_index = targets
      .iter()
      .enumerate()
      .map(|(i, target)| (target.name.clone(), i))
      .collect();

    info!(modules = store.len(), targets = targets.len(), "project frozen");

    Ok(Self {
      store,
      graph,
      targets,
      target_index,
    })
  }

  pub fn store(&self) -> &ModuleStore {
    &self.store
  }

  pub fn graph(&self) -> &DependencyGraph {
    &self.graph
  }

  /// Targets in declaration order.
  pub fn targets(&self) -> &[TargetDef] {
    &self.targets
  }

  pub fn target(&self, name: &str) -> Option<&TargetDef> {
    self.target_index.get(name).map(|&i| &self.targets[i])
  }

  /// Assemble one target into a validated build plan.
  ///
  /// A failure only affects this target; the planner stays usable.
  pub fn assemble(&self, name: &str) -> Result<ResolvedConfig, AssembleError> {
    let mut stage = AssemblyStage::Loaded;

    match self.run(name, &mut stage) {
      Ok(config) => {
        info!(
          target_name = name,
          modules = config.compile_order.len(),
          links = config.link_modules.len(),
          "assembled target"
        );
        Ok(config)
      }
      Err(source) => {
        warn!(target_name = name, stage = %stage, error = %source, "target rejected");
        Err(AssembleError {
          target: name.to_string(),
          stage,
          source,
        })
      }
    }
  }

  /// Assemble every target, in parallel.
  ///
  /// Results come back in target declaration order.
  pub fn assemble_all(&self) -> Vec<(String, Result<ResolvedConfig, AssembleError>)> {
    self
      .targets
      .par_iter()
      .map(|target| (target.name.clone(), self.assemble(&target.name)))
      .collect()
  }

  fn run(&self, name: &str, stage: &mut AssemblyStage) -> Result<ResolvedConfig, PlanError> {
    let target = self
      .target(name)
      .ok_or_else(|| PlanError::UnknownTarget(name.to_string()))?;

    if target.modules.is_empty() {
      return Err(PlanError::EmptyTarget(target.name.clone()));
    }
    let roots = self.resolve_roots(target)?;
    // Externals are prebuilt, so there would be nothing to compile
    if roots.iter().all(|&idx| self.graph.is_external(idx)) {
      return Err(PlanError::EmptyTarget(target.name.clone()));
    }

    // Every module the target builds, ordered dependencies first
    let members = self.graph.reachable(&roots, DependencyKind::is_built);
    let order = self.graph.compile_order(&members)?;
    enter(stage, name);

    let mut propagator = Propagator::new(&self.store, &self.graph);
    let mut environments: HashMap<NodeIndex, Environment> = HashMap::new();
    let mut modules = Vec::new();

    for &idx in &order {
      let Some(def) = self.declared(idx) else {
        continue;
      };

      let env = propagator.compile_environment(idx)?;
      modules.push(ModulePlan {
        name: def.name.clone(),
        kind: def.kind,
        pch: def.pch,
        link_dependencies: self
          .graph
          .dependencies(idx)
          .into_iter()
          .filter(|(_, kind)| kind.is_link())
          .map(|(dep, _)| self.graph.name(dep).to_string())
          .collect(),
        include_paths: env.include_paths.clone(),
        definitions: env.definitions.clone(),
      });
      environments.insert(idx, env);
    }

    let mut merged = Environment::new();
    for root in &roots {
      if let Some(env) = environments.get(root) {
        merged.merge(env)?;
      }
    }
    enter(stage, name);

    // Roots first, so a misplaced root is reported rather than one of its dependencies
    let root_defs = roots.iter().filter_map(|&idx| self.declared(idx));
    let built_defs = order.iter().filter_map(|&idx| self.declared(idx));
    validate::check_target_kinds(target, root_defs.chain(built_defs))?;
    validate::check_versions(target, order.iter().filter_map(|&idx| self.declared(idx)))?;
    enter(stage, name);

    let linked: HashSet<NodeIndex> = self
      .graph
      .reachable(&roots, DependencyKind::is_link)
      .into_iter()
      .collect();

    let config = ResolvedConfig {
      target: target.name.clone(),
      kind: target.kind,
      build_settings: target.build_settings,
      include_order: target.include_order,
      roots: self.names(roots.iter()),
      compile_order: self.names(order.iter().filter(|&&idx| !self.graph.is_external(idx))),
      link_modules: self.names(order.iter().filter(|&&idx| linked.contains(&idx))),
      externals: self.names(order.iter().filter(|&&idx| self.graph.is_external(idx))),
      include_paths: merged.include_paths,
      definitions: merged.definitions,
      modules,
    };
    enter(stage, name);

    Ok(config)
  }

  /// Resolve a target's root names, dropping repeats.
  fn resolve_roots(&self, target: &TargetDef) -> Result<Vec<NodeIndex>, PlanError> {
    let unknown = |name: &str| PlanError::UnknownModule {
      name: name.to_string(),
      referenced_by: Some(Referrer::Target(target.name.clone())),
    };

    let mut roots = Vec::new();
    for name in &target.modules {
      let found = self.store.lookup(name).map_err(|_| unknown(name.as_str()))?;
      let idx = self.graph.node(found.name()).ok_or_else(|| unknown(name.as_str()))?;
      if !roots.contains(&idx) {
        roots.push(idx);
      }
    }
    Ok(roots)
  }

  fn declared(&self, idx: NodeIndex) -> Option<&ModuleDef> {
    if self.graph.is_external(idx) {
      return None;
    }
    self.store.get(self.graph.name(idx))
  }

  fn names<'a>(&self, nodes: impl Iterator<Item = &'a NodeIndex>) -> Vec<String> {
    nodes.map(|&idx| self.graph.name(idx).to_string()).collect()
  }
}

fn enter(stage: &mut AssemblyStage, target: &str) {
  stage.advance();
  debug!(target_name = target, stage = %stage, "assembly stage reached");
}
