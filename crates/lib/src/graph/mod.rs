//! Dependency graph over declared and external modules.
//!
//! This module provides a directed graph with one node per module and one
//! edge per declared reference, pointing from the referring module to the
//! module it needs. Edges carry their [`DependencyKind`], which the
//! traversals in [`crate::propagate`] and [`sort`] consume.
//!
//! External modules are terminal nodes: they never have outgoing edges.

mod sort;

use std::collections::{HashMap, HashSet};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use tracing::debug;

use crate::error::{PlanError, Referrer};
use crate::module::{DependencyKind, ModuleStore};

/// A node in the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GraphNode {
  /// A declared module.
  Module(String),
  /// An allow-listed external module.
  External(String),
}

impl GraphNode {
  pub fn name(&self) -> &str {
    match self {
      GraphNode::Module(name) | GraphNode::External(name) => name,
    }
  }

  pub fn is_external(&self) -> bool {
    matches!(self, GraphNode::External(_))
  }
}

/// A derived edge: `from` refers to `to` with `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyEdge {
  pub from: String,
  pub to: String,
  pub kind: DependencyKind,
}

/// The module dependency graph, built once from a frozen [`ModuleStore`].
///
/// Node indices follow insertion order: declared modules in registration
/// order, then external modules by name. That order is the declaration order
/// used to break ties when sorting.
#[derive(Debug)]
pub struct DependencyGraph {
  /// The underlying graph.
  graph: DiGraph<GraphNode, DependencyKind>,

  /// Map from module name to node index.
  nodes: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
  /// Build the graph from every descriptor in the store.
  ///
  /// # Errors
  ///
  /// Returns `UnknownModule`, naming the referring module, if any reference
  /// resolves to neither a declared nor an allow-listed external module.
  pub fn build(store: &ModuleStore) -> Result<Self, PlanError> {
    let mut graph = DiGraph::new();
    let mut nodes = HashMap::new();

    // First pass: create nodes for all declared modules
    for module in store.modules() {
      let idx = graph.add_node(GraphNode::Module(module.name.clone()));
      nodes.insert(module.name.clone(), idx);
    }

    for name in store.externals() {
      let idx = graph.add_node(GraphNode::External(name.to_string()));
      nodes.insert(name.to_string(), idx);
    }

    // Second pass: add an edge for every reference
    for module in store.modules() {
      let from = nodes[&module.name];

      for (dep, kind) in module.references() {
        let resolved = store.lookup(dep).map_err(|_| PlanError::UnknownModule {
          name: dep.to_string(),
          referenced_by: Some(Referrer::Module(module.name.clone())),
        })?;
        let to = nodes[resolved.name()];
        graph.add_edge(from, to, kind);
      }
    }

    debug!(
      modules = store.len(),
      nodes = graph.node_count(),
      edges = graph.edge_count(),
      "built dependency graph"
    );

    Ok(Self { graph, nodes })
  }

  /// Node index of a module or external module.
  pub fn node(&self, name: &str) -> Option<NodeIndex> {
    self.nodes.get(name).copied()
  }

  /// Name of the module at `idx`.
  pub fn name(&self, idx: NodeIndex) -> &str {
    self.graph[idx].name()
  }

  pub fn is_external(&self, idx: NodeIndex) -> bool {
    self.graph[idx].is_external()
  }

  /// Total number of nodes, external modules included.
  pub fn node_count(&self) -> usize {
    self.graph.node_count()
  }

  /// Number of external nodes.
  pub fn external_count(&self) -> usize {
    self.graph.node_weights().filter(|n| n.is_external()).count()
  }

  /// All nodes in declaration order.
  pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
    self.graph.node_weights()
  }

  /// Direct references of a module, in declaration order.
  pub fn dependencies(&self, idx: NodeIndex) -> Vec<(NodeIndex, DependencyKind)> {
    let mut edges: Vec<_> = self.graph.edges_directed(idx, Direction::Outgoing).collect();
    edges.sort_by_key(|e| e.id());
    edges.into_iter().map(|e| (e.target(), *e.weight())).collect()
  }

  /// Direct references of a module by name.
  pub fn dependencies_of(&self, name: &str) -> Vec<(&str, DependencyKind)> {
    let Some(idx) = self.node(name) else {
      return Vec::new();
    };

    self
      .dependencies(idx)
      .into_iter()
      .map(|(dep, kind)| (self.name(dep), kind))
      .collect()
  }

  /// Modules that reference `idx` through an edge accepted by `follow`.
  pub fn dependents(&self, idx: NodeIndex, follow: impl Fn(DependencyKind) -> bool) -> Vec<NodeIndex> {
    let mut edges: Vec<_> = self
      .graph
      .edges_directed(idx, Direction::Incoming)
      .filter(|e| follow(*e.weight()))
      .collect();
    edges.sort_by_key(|e| e.id());
    edges.into_iter().map(|e| e.source()).collect()
  }

  /// Every edge in the graph, in declaration order.
  pub fn edges(&self) -> Vec<DependencyEdge> {
    self
      .graph
      .edge_references()
      .map(|e| DependencyEdge {
        from: self.name(e.source()).to_string(),
        to: self.name(e.target()).to_string(),
        kind: *e.weight(),
      })
      .collect()
  }

  /// Nodes reachable from `roots` (roots included) through edges accepted by `follow`.
  ///
  /// Returned in discovery order: depth-first, dependencies in declaration order.
  pub fn reachable(&self, roots: &[NodeIndex], follow: impl Fn(DependencyKind) -> bool) -> Vec<NodeIndex> {
    let mut visited = HashSet::new();
    let mut result = Vec::new();
    let mut stack: Vec<NodeIndex> = roots.iter().rev().copied().collect();

    while let Some(idx) = stack.pop() {
      if !visited.insert(idx) {
        continue;
      }
      result.push(idx);

      for (dep, kind) in self.dependencies(idx).into_iter().rev() {
        if follow(kind) && !visited.contains(&dep) {
          stack.push(dep);
        }
      }
    }

    result
  }
}
