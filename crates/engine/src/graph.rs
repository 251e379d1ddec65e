//! The target graph and its deterministic ordering.
//!
//! All nodes of one build context live in a single insertion-ordered table.
//! The dependency walk is left-to-right and depth-first: dependencies of a
//! node come strictly before the node, every node is resolved at most once
//! (memoized once done), and nodes with no dependency relationship keep the
//! order they are first reached from the requested list.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::GraphError;
use crate::target::Target;

/// Traversal state of a node during the dependency walk; absence from the
/// state table means unvisited.
#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
  InProgress,
  Done,
}

/// Every target, extension point and group of one build context, keyed by
/// name.
#[derive(Debug, Default)]
pub struct Graph {
  nodes: IndexMap<String, Target>,
}

impl Graph {
  /// Empty graph.
  pub fn new() -> Self {
    Self::default()
  }

  /// Insert a node. Names are unique within one graph.
  pub fn add(&mut self, target: Target) -> Result<(), GraphError> {
    if self.nodes.contains_key(target.name()) {
      return Err(GraphError::DuplicateTarget(target.name().to_string()));
    }
    self.nodes.insert(target.name().to_string(), target);
    Ok(())
  }

  /// Look up a node by name.
  pub fn get(&self, name: &str) -> Option<&Target> {
    self.nodes.get(name)
  }

  pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Target> {
    self.nodes.get_mut(name)
  }

  /// Whether a node with this name exists.
  pub fn contains(&self, name: &str) -> bool {
    self.nodes.contains_key(name)
  }

  /// Node names in insertion order.
  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.nodes.keys().map(String::as_str)
  }

  /// Number of nodes.
  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  /// True when the graph has no nodes.
  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// Check that every referenced dependency resolves to a node.
  ///
  /// Dangling references are a configuration error at assembly time, never a
  /// runtime one.
  pub fn validate(&self) -> Result<(), GraphError> {
    for target in self.nodes.values() {
      for dep in target.dependencies() {
        if !self.nodes.contains_key(dep) {
          return Err(GraphError::DanglingDependency {
            name: dep.clone(),
            referenced_from: target.name().to_string(),
          });
        }
      }
    }
    Ok(())
  }

  /// Resolve the execution order for the requested targets.
  ///
  /// After the requested roots are resolved, the rest of the graph is walked
  /// too, so cycles and dangling names are rejected anywhere in the graph,
  /// not only on the chains the request happens to reach. The returned
  /// sequence covers the requested chains only.
  pub fn topo_sort(&self, requested: &[String]) -> Result<Vec<String>, GraphError> {
    let mut state: HashMap<String, VisitState> = HashMap::new();
    let mut trail: Vec<String> = Vec::new();
    let mut order = Vec::new();

    for name in requested {
      self.visit(name, None, &mut state, &mut trail, &mut order)?;
    }
    debug!(requested = ?requested, order = ?order, "resolved build sequence");

    let mut rest = Vec::new();
    for name in self.nodes.keys() {
      if !state.contains_key(name) {
        self.visit(name, None, &mut state, &mut trail, &mut rest)?;
      }
    }

    Ok(order)
  }

  fn visit(
    &self,
    name: &str,
    referenced_from: Option<&str>,
    state: &mut HashMap<String, VisitState>,
    trail: &mut Vec<String>,
    order: &mut Vec<String>,
  ) -> Result<(), GraphError> {
    match state.get(name) {
      Some(VisitState::Done) => return Ok(()),
      Some(VisitState::InProgress) => return Err(GraphError::cycle(name, trail)),
      None => {}
    }
    let Some(target) = self.nodes.get(name) else {
      return Err(match referenced_from {
        Some(parent) => GraphError::DanglingDependency {
          name: name.to_string(),
          referenced_from: parent.to_string(),
        },
        None => GraphError::UnknownTarget(name.to_string()),
      });
    };
    state.insert(name.to_string(), VisitState::InProgress);
    trail.push(name.to_string());
    for dep in target.dependencies() {
      self.visit(dep, Some(name), state, trail, order)?;
    }
    trail.pop();
    state.insert(name.to_string(), VisitState::Done);
    order.push(name.to_string());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn node(name: &str, deps: &[&str]) -> Target {
    let mut target = Target::new(name);
    for dep in deps {
      target.add_dependency(*dep).unwrap();
    }
    target
  }

  fn graph(nodes: Vec<Target>) -> Graph {
    let mut graph = Graph::new();
    for target in nodes {
      graph.add(target).unwrap();
    }
    graph
  }

  fn sort(graph: &Graph, requested: &[&str]) -> Result<Vec<String>, GraphError> {
    let requested: Vec<String> = requested.iter().map(|s| s.to_string()).collect();
    graph.topo_sort(&requested)
  }

  #[test]
  fn duplicate_target_rejected() {
    let mut graph = graph(vec![node("build", &[])]);
    let err = graph.add(Target::new("build")).unwrap_err();
    assert!(matches!(err, GraphError::DuplicateTarget(_)));
  }

  #[test]
  fn linear_chain_orders_dependencies_first() {
    let graph = graph(vec![
      node("build", &["compile"]),
      node("compile", &["init"]),
      node("init", &[]),
    ]);
    assert_eq!(sort(&graph, &["build"]).unwrap(), ["init", "compile", "build"]);
  }

  #[test]
  fn shared_dependency_appears_once() {
    let graph = graph(vec![
      node("a", &["c"]),
      node("b", &["c"]),
      node("c", &[]),
    ]);
    assert_eq!(sort(&graph, &["a", "b"]).unwrap(), ["c", "a", "b"]);
  }

  #[test]
  fn dependencies_resolve_left_to_right() {
    let graph = graph(vec![
      node("all", &["left", "right"]),
      node("left", &[]),
      node("right", &[]),
    ]);
    assert_eq!(sort(&graph, &["all"]).unwrap(), ["left", "right", "all"]);
  }

  #[test]
  fn diamond_resolves_each_node_once() {
    let graph = graph(vec![
      node("top", &["left", "right"]),
      node("left", &["base"]),
      node("right", &["base"]),
      node("base", &[]),
    ]);
    assert_eq!(
      sort(&graph, &["top"]).unwrap(),
      ["base", "left", "right", "top"]
    );
  }

  #[test]
  fn cycle_is_reported_with_its_closing_chain() {
    let graph = graph(vec![node("a", &["b"]), node("b", &["a"])]);
    let err = sort(&graph, &["a"]).unwrap_err();
    match err {
      GraphError::CyclicDependency { chain } => {
        assert_eq!(chain.first().map(String::as_str), Some("a"));
        assert_eq!(chain.last().map(String::as_str), Some("a"));
        assert!(chain.contains(&"b".to_string()));
      }
      other => panic!("expected cycle, got {other}"),
    }
  }

  #[test]
  fn cycle_outside_the_requested_chain_is_still_rejected() {
    let graph = graph(vec![
      node("ok", &[]),
      node("x", &["y"]),
      node("y", &["x"]),
    ]);
    let err = sort(&graph, &["ok"]).unwrap_err();
    assert!(matches!(err, GraphError::CyclicDependency { .. }));
  }

  #[test]
  fn dangling_dependency_names_the_referencing_target() {
    let graph = graph(vec![node("build", &["missing"])]);
    let err = sort(&graph, &["build"]).unwrap_err();
    match err {
      GraphError::DanglingDependency { name, referenced_from } => {
        assert_eq!(name, "missing");
        assert_eq!(referenced_from, "build");
      }
      other => panic!("expected dangling dependency, got {other}"),
    }
    assert!(graph.validate().is_err());
  }

  #[test]
  fn unknown_requested_target_is_rejected() {
    let graph = graph(vec![node("build", &[])]);
    let err = sort(&graph, &["missing"]).unwrap_err();
    assert!(matches!(err, GraphError::UnknownTarget(_)));
  }

  #[test]
  fn extension_points_and_groups_participate_in_ordering() {
    let mut ready = Target::extension_point("ready");
    ready.add_dependency("compile").unwrap();
    let mut all = Target::group("all");
    all.add_dependency("ready").unwrap();
    let graph = graph(vec![all, ready, node("compile", &[])]);
    assert_eq!(sort(&graph, &["all"]).unwrap(), ["compile", "ready", "all"]);
  }
}
