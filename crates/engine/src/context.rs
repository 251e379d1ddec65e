//! The build context.
//!
//! A [`BuildContext`] is one build invocation: the component registry, the
//! property table, the registered listeners and the cancellation flag. A
//! nested build gets its own context whose registry reads through to the
//! parent's; registry writes and property changes never propagate upward.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ordo_core::{ComponentRegistry, PropertySource, RunContext};

use crate::event::{BuildEvent, BuildListener};
use crate::target::Location;

/// Cooperative cancellation flag shared across a context tree.
///
/// Cancellation is checked between node executions at minimum; an in-flight
/// action completes or fails on its own and is never forcibly interrupted.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
  /// Fresh, uncancelled token.
  pub fn new() -> Self {
    Self::default()
  }

  /// Request cancellation.
  pub fn cancel(&self) {
    self.0.store(true, Ordering::SeqCst);
  }

  /// Whether cancellation has been requested.
  pub fn is_cancelled(&self) -> bool {
    self.0.load(Ordering::SeqCst)
  }
}

/// One build invocation: registry, properties, listeners, cancellation.
pub struct BuildContext {
  name: String,
  registry: Arc<ComponentRegistry>,
  properties: HashMap<String, String>,
  listeners: Vec<Box<dyn BuildListener>>,
  cancel: CancelToken,
}

impl BuildContext {
  /// Fresh top-level context; the registry comes up with the bootstrap
  /// definitions installed.
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      registry: Arc::new(ComponentRegistry::new()),
      properties: HashMap::new(),
      listeners: Vec::new(),
      cancel: CancelToken::new(),
    }
  }

  /// Nested context for a sub-build.
  ///
  /// The child registry sees its own entries first and reads through to this
  /// context's registry; writes stay in the child. Properties are copied at
  /// the point of invocation and the cancel token is shared. Listeners stay
  /// with the parent; the invoking action forwards sub-build events.
  pub fn sub_context(&self, name: impl Into<String>) -> BuildContext {
    BuildContext {
      name: name.into(),
      registry: Arc::new(ComponentRegistry::with_parent(self.registry.clone())),
      properties: self.properties.clone(),
      listeners: Vec::new(),
      cancel: self.cancel.clone(),
    }
  }

  /// The context name, used in notifications.
  pub fn name(&self) -> &str {
    &self.name
  }

  /// The component registry of this context.
  pub fn registry(&self) -> &ComponentRegistry {
    &self.registry
  }

  /// The shared cancellation token.
  pub fn cancel_token(&self) -> &CancelToken {
    &self.cancel
  }

  /// Register a progress observer.
  pub fn add_listener(&mut self, listener: Box<dyn BuildListener>) {
    self.listeners.push(listener);
  }

  /// Fire a build-started event for `context` (the caller's own name or a
  /// sub-build's) on this context's listeners.
  pub fn notify_build_started(&mut self, context: &str) {
    let event = BuildEvent {
      context: context.to_string(),
      ..BuildEvent::default()
    };
    for listener in &mut self.listeners {
      listener.build_started(&event);
    }
  }

  /// Fire a build-finished event, with the failure when the build failed.
  pub fn notify_build_finished(&mut self, context: &str, error: Option<String>) {
    let event = BuildEvent {
      context: context.to_string(),
      error,
      ..BuildEvent::default()
    };
    for listener in &mut self.listeners {
      listener.build_finished(&event);
    }
  }

  /// Fire a target-started event.
  pub fn notify_target_started(&mut self, target: &str, location: &Location) {
    let event = BuildEvent {
      context: self.name.clone(),
      target: Some(target.to_string()),
      location: Some(location.clone()),
      error: None,
    };
    for listener in &mut self.listeners {
      listener.target_started(&event);
    }
  }

  /// Fire a target-finished event, with the failure when the target failed.
  pub fn notify_target_finished(&mut self, target: &str, location: &Location, error: Option<String>) {
    let event = BuildEvent {
      context: self.name.clone(),
      target: Some(target.to_string()),
      location: Some(location.clone()),
      error,
    };
    for listener in &mut self.listeners {
      listener.target_finished(&event);
    }
  }
}

impl PropertySource for BuildContext {
  fn property(&self, name: &str) -> Option<&str> {
    self.properties.get(name).map(String::as_str)
  }
}

impl RunContext for BuildContext {
  fn set_property(&mut self, name: &str, value: &str) {
    self.properties.insert(name.to_string(), value.to_string());
  }

  fn cancelled(&self) -> bool {
    self.cancel.is_cancelled()
  }

  fn as_any(&mut self) -> &mut dyn Any {
    self
  }
}

#[cfg(test)]
mod tests {
  use ordo_core::{Capability, ComponentKey, LoaderHandle, TypeDefinition};

  use super::*;

  #[test]
  fn properties_are_readable_through_the_source_trait() {
    let mut ctx = BuildContext::new("main");
    ctx.set_property("release", "1");
    assert_eq!(ctx.property("release"), Some("1"));
    assert_eq!(ctx.property("debug"), None);
  }

  #[test]
  fn sub_context_copies_properties_and_shares_cancellation() {
    let mut parent = BuildContext::new("main");
    parent.set_property("release", "1");

    let mut sub = parent.sub_context("main/sub");
    assert_eq!(sub.property("release"), Some("1"));

    sub.set_property("local", "yes");
    assert_eq!(parent.property("local"), None);

    parent.cancel_token().cancel();
    assert!(sub.cancelled());
  }

  #[test]
  fn sub_context_registry_reads_through_to_parent() {
    let parent = BuildContext::new("main");
    let key = ComponentKey::core("noop");
    let def = TypeDefinition::new(
      key.clone(),
      "tests::Noop",
      LoaderHandle::core(),
      Arc::new(|_| {
        ordo_core::Component::Condition(Box::new(ordo_core::condition::TrueCondition))
      }),
    );
    parent.registry().register(def).unwrap();

    let sub = parent.sub_context("main/sub");
    assert!(sub.registry().create(&key, Capability::Condition).is_ok());
  }
}
