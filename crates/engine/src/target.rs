//! Target graph nodes.
//!
//! A [`Target`] is a named unit of work: an ordered dependency list plus an
//! ordered action list. Extension points and target groups are content-free
//! specializations that exist purely to be depended upon; attaching an action
//! to one fails at assembly time, not during execution.

use std::fmt;

use serde::{Deserialize, Serialize};

use ordo_core::{Action, CONDITION_URI, ComponentKey};

use crate::error::GraphError;

/// Source provenance of a graph node, for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
  /// Originating build description file, if known.
  pub file: Option<String>,
  /// 1-based line within that file.
  pub line: Option<u32>,
}

impl Location {
  /// Location at a known file and line.
  pub fn new(file: impl Into<String>, line: u32) -> Self {
    Self {
      file: Some(file.into()),
      line: Some(line),
    }
  }
}

impl fmt::Display for Location {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match (&self.file, self.line) {
      (Some(file), Some(line)) => write!(f, "{file}:{line}"),
      (Some(file), None) => f.write_str(file),
      _ => f.write_str("<unknown>"),
    }
  }
}

/// What flavor of node this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
  /// Ordinary target with actions.
  Target,
  /// Content-free join node independently-authored chains can depend on
  /// without knowing each other's names.
  ExtensionPoint,
  /// Content-free ordering anchor grouping several targets under one name.
  Group,
}

impl fmt::Display for NodeKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      NodeKind::Target => f.write_str("target"),
      NodeKind::ExtensionPoint => f.write_str("extension point"),
      NodeKind::Group => f.write_str("target group"),
    }
  }
}

/// Configuration-time boolean gate on a node.
///
/// The condition component is resolved through the build context's registry
/// when the gate is evaluated; execution performs registry reads only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
  /// Registry key of the condition component to evaluate.
  pub condition: ComponentKey,
  /// Attribute value handed to the condition.
  pub value: String,
}

impl Gate {
  /// Gate on a bootstrap condition by local name (`true`, `set`, `blank`,
  /// `unless-true`, ...).
  pub fn bootstrap(local: &str, value: impl Into<String>) -> Self {
    Self {
      condition: ComponentKey::qualified(CONDITION_URI, local),
      value: value.into(),
    }
  }

  /// Gate that passes when the named property is set.
  pub fn property_set(name: impl Into<String>) -> Self {
    Self::bootstrap("set", name)
  }
}

/// A named, orderable unit of work with declared dependencies.
pub struct Target {
  name: String,
  kind: NodeKind,
  depends: Vec<String>,
  actions: Vec<Box<dyn Action>>,
  location: Location,
  description: Option<String>,
  if_gate: Option<Gate>,
  unless_gate: Option<Gate>,
}

impl Target {
  /// New ordinary target.
  pub fn new(name: impl Into<String>) -> Self {
    Self::with_kind(name, NodeKind::Target)
  }

  /// New extension point: a stable join node that only carries dependencies.
  pub fn extension_point(name: impl Into<String>) -> Self {
    Self::with_kind(name, NodeKind::ExtensionPoint)
  }

  /// New target group: a pure dependency-ordering anchor.
  pub fn group(name: impl Into<String>) -> Self {
    Self::with_kind(name, NodeKind::Group)
  }

  fn with_kind(name: impl Into<String>, kind: NodeKind) -> Self {
    Self {
      name: name.into(),
      kind,
      depends: Vec::new(),
      actions: Vec::new(),
      location: Location::default(),
      description: None,
      if_gate: None,
      unless_gate: None,
    }
  }

  /// The node's name, unique within one graph.
  pub fn name(&self) -> &str {
    &self.name
  }

  /// The node flavor.
  pub fn kind(&self) -> NodeKind {
    self.kind
  }

  /// Declared source location.
  pub fn location(&self) -> &Location {
    &self.location
  }

  /// Attach a source location.
  pub fn with_location(mut self, location: Location) -> Self {
    self.location = location;
    self
  }

  /// Attach a human-readable description.
  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  /// The description, if one was declared.
  pub fn description(&self) -> Option<&str> {
    self.description.as_deref()
  }

  /// Append a dependency name. Duplicates are an assembly error.
  pub fn add_dependency(&mut self, name: impl Into<String>) -> Result<(), GraphError> {
    let name = name.into();
    if self.depends.iter().any(|dep| *dep == name) {
      return Err(GraphError::DuplicateDependency {
        target: self.name.clone(),
        dependency: name,
      });
    }
    self.depends.push(name);
    Ok(())
  }

  /// The ordered dependency list.
  pub fn dependencies(&self) -> &[String] {
    &self.depends
  }

  /// Append an action.
  ///
  /// Extension points and groups reject this immediately: the violation is a
  /// contract error at assembly time, independent of whether the node is ever
  /// reached during execution. The same restriction covers nested
  /// configurable children, which reach a target as actions.
  pub fn add_action(&mut self, action: Box<dyn Action>) -> Result<(), GraphError> {
    if self.kind != NodeKind::Target {
      return Err(GraphError::ActionsForbidden {
        target: self.name.clone(),
        kind: self.kind,
      });
    }
    self.actions.push(action);
    Ok(())
  }

  /// Number of attached actions.
  pub fn action_count(&self) -> usize {
    self.actions.len()
  }

  pub(crate) fn actions_mut(&mut self) -> &mut [Box<dyn Action>] {
    &mut self.actions
  }

  /// Gate that must evaluate true for the node's actions to run.
  pub fn set_if(&mut self, gate: Gate) {
    self.if_gate = Some(gate);
  }

  /// Gate that must evaluate false for the node's actions to run.
  pub fn set_unless(&mut self, gate: Gate) {
    self.unless_gate = Some(gate);
  }

  /// The `if` gate, if any.
  pub fn if_gate(&self) -> Option<&Gate> {
    self.if_gate.as_ref()
  }

  /// The `unless` gate, if any.
  pub fn unless_gate(&self) -> Option<&Gate> {
    self.unless_gate.as_ref()
  }
}

impl fmt::Debug for Target {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Target")
      .field("name", &self.name)
      .field("kind", &self.kind)
      .field("depends", &self.depends)
      .field("actions", &self.actions.len())
      .field("location", &self.location)
      .finish()
  }
}
