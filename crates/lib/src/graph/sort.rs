//! Topological ordering and cycle extraction.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use petgraph::graph::NodeIndex;
use tracing::{trace, warn};

use crate::error::PlanError;
use crate::module::DependencyKind;

use super::DependencyGraph;

impl DependencyGraph {
  /// Order `members` so every module comes after all of its link dependencies.
  ///
  /// Only link (public and private) edges between members constrain the order.
  /// Uses Kahn's algorithm; among modules that are ready at the same time the
  /// one declared first wins, so the result is deterministic.
  ///
  /// # Errors
  ///
  /// Returns `CyclicDependency` with the cycle path if the members' link edges
  /// are not acyclic.
  pub fn compile_order(&self, members: &[NodeIndex]) -> Result<Vec<NodeIndex>, PlanError> {
    let member_set: HashSet<NodeIndex> = members.iter().copied().collect();

    // Number of not-yet-ordered link dependencies per member
    let mut pending: HashMap<NodeIndex, usize> = HashMap::new();
    for &idx in &member_set {
      let count = self
        .dependencies(idx)
        .into_iter()
        .filter(|(dep, kind)| kind.is_link() && member_set.contains(dep))
        .count();
      pending.insert(idx, count);
    }

    let mut ready: BinaryHeap<Reverse<NodeIndex>> = pending
      .iter()
      .filter(|&(_, &count)| count == 0)
      .map(|(&idx, _)| Reverse(idx))
      .collect();

    let mut order = Vec::with_capacity(member_set.len());
    while let Some(Reverse(idx)) = ready.pop() {
      trace!(module = self.name(idx), position = order.len(), "ordered module");
      order.push(idx);

      for dependent in self.dependents(idx, DependencyKind::is_link) {
        if let Some(count) = pending.get_mut(&dependent) {
          *count -= 1;
          if *count == 0 {
            ready.push(Reverse(dependent));
          }
        }
      }
    }

    if order.len() < member_set.len() {
      let ordered: HashSet<NodeIndex> = order.iter().copied().collect();
      let remaining: HashSet<NodeIndex> = member_set.difference(&ordered).copied().collect();

      let cycle = self.find_cycle(&remaining).unwrap_or_else(|| {
        let mut names: Vec<String> = remaining.iter().map(|&idx| self.name(idx).to_string()).collect();
        names.sort();
        names
      });

      warn!(cycle = %cycle.join(" -> "), "cycle detected in dependency graph");
      return Err(PlanError::CyclicDependency { cycle });
    }

    Ok(order)
  }

  /// Find one cycle among the link edges inside `within`.
  ///
  /// The returned path starts and ends with the same module name.
  pub fn find_cycle(&self, within: &HashSet<NodeIndex>) -> Option<Vec<String>> {
    let mut starts: Vec<NodeIndex> = within.iter().copied().collect();
    starts.sort();

    let mut visited = HashSet::new();
    for start in starts {
      if visited.contains(&start) {
        continue;
      }

      let mut stack = Vec::new();
      let mut on_stack = HashSet::new();
      if let Some(cycle) = self.find_cycle_dfs(start, within, &mut visited, &mut stack, &mut on_stack) {
        return Some(cycle.into_iter().map(|idx| self.name(idx).to_string()).collect());
      }
    }

    None
  }

  /// DFS helper for cycle detection.
  fn find_cycle_dfs(
    &self,
    idx: NodeIndex,
    within: &HashSet<NodeIndex>,
    visited: &mut HashSet<NodeIndex>,
    stack: &mut Vec<NodeIndex>,
    on_stack: &mut HashSet<NodeIndex>,
  ) -> Option<Vec<NodeIndex>> {
    visited.insert(idx);
    stack.push(idx);
    on_stack.insert(idx);

    for (dep, kind) in self.dependencies(idx) {
      if !kind.is_link() || !within.contains(&dep) {
        continue;
      }

      if on_stack.contains(&dep) {
        // Found a cycle - extract it from the stack
        let start = stack.iter().position(|&n| n == dep)?;
        let mut cycle = stack[start..].to_vec();
        cycle.push(dep);
        return Some(cycle);
      }

      if !visited.contains(&dep)
        && let Some(cycle) = self.find_cycle_dfs(dep, within, visited, stack, on_stack)
      {
        return Some(cycle);
      }
    }

    stack.pop();
    on_stack.remove(&idx);
    None
  }
}
