//! Execution contracts and constructed component instances.
//!
//! A component instance is tagged by the contract it satisfies natively:
//! action, condition, or nothing at all (an opaque foreign object that only
//! becomes useful once a definition's adapter wraps it). The registry checks
//! the tag once, at construction time; there is no runtime type probing
//! beyond that single point.

use std::any::Any;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::condition::Condition;
use crate::dynamic::{DynamicAttribute, DynamicElement, DynamicValueAttribute};

/// Execution contracts the registry can be asked to satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capability {
  /// Runs as part of a target's action list.
  Action,
  /// Evaluates to a boolean gate at configuration time.
  Condition,
}

impl fmt::Display for Capability {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Capability::Action => f.write_str("action"),
      Capability::Condition => f.write_str("condition"),
    }
  }
}

/// Read access to the owning build context's property table.
pub trait PropertySource {
  /// Look up a property value by name.
  fn property(&self, name: &str) -> Option<&str>;
}

/// What an action sees of the build context while it runs.
///
/// Actions never see the concrete context type through this trait; an action
/// that genuinely needs the engine's context (e.g. to spawn a nested build)
/// goes through [`as_any`](RunContext::as_any).
pub trait RunContext: PropertySource {
  /// Set a build property, replacing any previous value.
  fn set_property(&mut self, name: &str, value: &str);

  /// True once cancellation has been requested for this build.
  fn cancelled(&self) -> bool;

  /// Downcast seam for actions that require the concrete context.
  fn as_any(&mut self) -> &mut dyn Any;
}

/// Failure reported by a single action.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ActionError {
  message: String,
  #[source]
  source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ActionError {
  /// Failure with a plain message.
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
      source: None,
    }
  }

  /// Failure wrapping an underlying error.
  pub fn with_source(
    message: impl Into<String>,
    source: impl std::error::Error + Send + Sync + 'static,
  ) -> Self {
    Self {
      message: message.into(),
      source: Some(Box::new(source)),
    }
  }

  /// The action's own message, before any engine-level wrapping.
  pub fn message(&self) -> &str {
    &self.message
  }
}

/// One executable unit attached to a target.
///
/// The three `dynamic_*` accessors are the opt-in dynamic configuration
/// contracts: each defaults to `None`, and an implementation overrides the
/// ones it declares support for. The configuration phase probes these when an
/// incoming attribute or child element matches no static schema member.
pub trait Action: Send {
  /// Run the action against the build context.
  fn perform(&mut self, ctx: &mut dyn RunContext) -> Result<(), ActionError>;

  /// Namespace-qualified string attributes with no static field.
  fn dynamic_attribute(&mut self) -> Option<&mut dyn DynamicAttribute> {
    None
  }

  /// Attributes whose value is not naturally a string.
  fn dynamic_value(&mut self) -> Option<&mut dyn DynamicValueAttribute> {
    None
  }

  /// Nested child elements with no static schema member.
  fn dynamic_element(&mut self) -> Option<&mut dyn DynamicElement> {
    None
  }
}

/// A constructed component instance, tagged by its native contract.
pub enum Component {
  /// Satisfies the action contract natively.
  Action(Box<dyn Action>),
  /// Satisfies the condition contract natively.
  Condition(Box<dyn Condition>),
  /// A foreign object with no native contract; exists to be adapted.
  Opaque(Box<dyn Any + Send>),
}

impl Component {
  /// The capability check performed once, at construction time.
  pub fn provides(&self, expected: Capability) -> bool {
    matches!(
      (self, expected),
      (Component::Action(_), Capability::Action)
        | (Component::Condition(_), Capability::Condition)
    )
  }

  /// Unwrap into the action contract.
  pub fn into_action(self) -> Option<Box<dyn Action>> {
    match self {
      Component::Action(action) => Some(action),
      _ => None,
    }
  }

  /// Unwrap into the condition contract.
  pub fn into_condition(self) -> Option<Box<dyn Condition>> {
    match self {
      Component::Condition(condition) => Some(condition),
      _ => None,
    }
  }

  /// Unwrap the raw foreign object.
  pub fn into_opaque(self) -> Option<Box<dyn Any + Send>> {
    match self {
      Component::Opaque(raw) => Some(raw),
      _ => None,
    }
  }
}

impl fmt::Debug for Component {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Component::Action(_) => f.write_str("Component::Action"),
      Component::Condition(_) => f.write_str("Component::Condition"),
      Component::Opaque(_) => f.write_str("Component::Opaque"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::condition::TrueCondition;

  struct Noop;

  impl Action for Noop {
    fn perform(&mut self, _ctx: &mut dyn RunContext) -> Result<(), ActionError> {
      Ok(())
    }
  }

  #[test]
  fn provides_matches_native_contract() {
    let action = Component::Action(Box::new(Noop));
    assert!(action.provides(Capability::Action));
    assert!(!action.provides(Capability::Condition));

    let condition = Component::Condition(Box::new(TrueCondition));
    assert!(condition.provides(Capability::Condition));
    assert!(!condition.provides(Capability::Action));

    let opaque = Component::Opaque(Box::new(42_u32));
    assert!(!opaque.provides(Capability::Action));
    assert!(!opaque.provides(Capability::Condition));
  }

  #[test]
  fn dynamic_accessors_default_to_absent() {
    let mut noop = Noop;
    assert!(noop.dynamic_attribute().is_none());
    assert!(noop.dynamic_value().is_none());
    assert!(noop.dynamic_element().is_none());
  }

  #[test]
  fn action_error_carries_source() {
    let inner = ActionError::new("inner failure");
    let outer = ActionError::with_source("outer", inner);
    assert_eq!(outer.message(), "outer");
    assert!(std::error::Error::source(&outer).is_some());
  }
}
