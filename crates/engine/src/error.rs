//! Error types for the ordo engine.
//!
//! Assembly errors ([`GraphError`]) are always fatal to the assembly step
//! that produced them; no partially resolved graph is ever executed.
//! Execution failures ([`EngineError`]) follow the active strategy: fatal by
//! default, collected under keep-going.

use thiserror::Error;

use ordo_core::{ActionError, CoreError};

use crate::target::{Location, NodeKind};

/// Errors raised while assembling or resolving the target graph.
#[derive(Debug, Error)]
pub enum GraphError {
  /// A node with this name already exists in the graph.
  #[error("duplicate target \"{0}\"")]
  DuplicateTarget(String),

  /// The dependency list already contains this name.
  #[error("target \"{target}\" already depends on \"{dependency}\"")]
  DuplicateDependency { target: String, dependency: String },

  /// Extension points and groups cannot carry actions or nested children.
  #[error("{kind} \"{target}\" cannot contain actions or nested elements")]
  ActionsForbidden { target: String, kind: NodeKind },

  /// A requested target name has no node in the graph.
  #[error("target \"{0}\" does not exist in the graph")]
  UnknownTarget(String),

  /// A dependency name has no node in the graph.
  #[error("target \"{name}\" does not exist in the graph; it is used from target \"{referenced_from}\"")]
  DanglingDependency { name: String, referenced_from: String },

  /// The dependency walk re-entered a node that was still in progress.
  #[error("circular dependency: {}", chain.join(" <- "))]
  CyclicDependency { chain: Vec<String> },
}

impl GraphError {
  /// Build the closing chain for a cycle ending (and starting) at `end`.
  pub(crate) fn cycle(end: &str, trail: &[String]) -> Self {
    let mut chain = vec![end.to_string()];
    for name in trail.iter().rev() {
      chain.push(name.clone());
      if name == end {
        break;
      }
    }
    GraphError::CyclicDependency { chain }
  }
}

/// Errors raised while running a build.
#[derive(Debug, Error)]
pub enum EngineError {
  /// Graph assembly or resolution failed.
  #[error(transparent)]
  Graph(#[from] GraphError),

  /// Component registration or resolution failed.
  #[error(transparent)]
  Component(#[from] CoreError),

  /// An action (or a condition evaluated on the node's behalf) failed.
  #[error("target \"{target}\" failed at {location}: {source}")]
  ActionFailure {
    target: String,
    location: Location,
    #[source]
    source: ActionError,
  },

  /// Every failure collected by a keep-going run.
  #[error("{} target(s) failed", failures.len())]
  Aggregate { failures: Vec<EngineError> },

  /// Cancellation was requested; checked between node executions.
  #[error("build cancelled")]
  Cancelled,
}
