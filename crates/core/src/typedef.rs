//! Component type definitions.
//!
//! A [`TypeDefinition`] is everything the registry needs to construct one
//! pluggable component: the constructor, the loader handle it was registered
//! under, an optional adapter for consumers that expect a capability the raw
//! instance lacks, and the restriction flag that protects bootstrap entries
//! from being shadowed.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::component::Component;
use crate::error::CoreError;
use crate::name::ComponentKey;

/// Opaque handle of the loader a definition was registered under.
///
/// Handles are passed through unexamined at instantiation time. Two
/// definitions with different handles are distinct implementations even when
/// their implementation names match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoaderHandle(String);

impl LoaderHandle {
  /// Handle of the engine's own loader.
  pub fn core() -> Self {
    Self("core".to_string())
  }

  /// Handle for a component library scoped to `uri`.
  pub fn library(uri: &str) -> Self {
    Self(format!("lib:{uri}"))
  }

  /// The raw handle value.
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

/// Constructor for component instances, invoked under the definition's
/// loader handle.
pub type ComponentFactory = Arc<dyn Fn(&LoaderHandle) -> Component + Send + Sync>;

/// Wraps a raw instance so it satisfies the consumer's expected capability,
/// attaching the raw instance as the adapter's proxy target.
pub type AdapterFactory = Arc<dyn Fn(Component) -> Result<Component, CoreError> + Send + Sync>;

/// Immutable descriptor of one registry entry.
///
/// A definition is never mutated in place after registration; replacing one
/// is a new registration event on the registry.
#[derive(Clone)]
pub struct TypeDefinition {
  key: ComponentKey,
  impl_name: String,
  loader: LoaderHandle,
  factory: ComponentFactory,
  adapter: Option<AdapterFactory>,
  restricted: bool,
}

impl TypeDefinition {
  /// New unrestricted definition with no adapter.
  pub fn new(
    key: ComponentKey,
    impl_name: impl Into<String>,
    loader: LoaderHandle,
    factory: ComponentFactory,
  ) -> Self {
    Self {
      key,
      impl_name: impl_name.into(),
      loader,
      factory,
      adapter: None,
      restricted: false,
    }
  }

  /// Attach an adapter used when the raw instance lacks the expected
  /// capability.
  pub fn with_adapter(mut self, adapter: AdapterFactory) -> Self {
    self.adapter = Some(adapter);
    self
  }

  /// Mark the definition as protected against later replacement.
  pub fn restricted(mut self) -> Self {
    self.restricted = true;
    self
  }

  /// The registry key.
  pub fn key(&self) -> &ComponentKey {
    &self.key
  }

  /// The fully qualified implementation name.
  pub fn impl_name(&self) -> &str {
    &self.impl_name
  }

  /// The loader handle this definition was registered under.
  pub fn loader(&self) -> &LoaderHandle {
    &self.loader
  }

  /// Whether the definition may be replaced by a non-privileged caller.
  pub fn is_restricted(&self) -> bool {
    self.restricted
  }

  /// Whether an adapter is attached.
  pub fn has_adapter(&self) -> bool {
    self.adapter.is_some()
  }

  /// Construct a raw instance under the stored loader handle.
  pub fn instantiate(&self) -> Component {
    (self.factory)(&self.loader)
  }

  /// Wrap a raw instance with this definition's adapter, if any.
  pub(crate) fn adapt(&self, raw: Component) -> Option<Result<Component, CoreError>> {
    self.adapter.as_ref().map(|adapter| adapter(raw))
  }

  /// Same implementation: name, loader, adapter presence and restriction all
  /// match. Used to recognize a harmless re-registration.
  pub fn same_definition(&self, other: &TypeDefinition) -> bool {
    self.impl_name == other.impl_name
      && self.loader == other.loader
      && self.restricted == other.restricted
      && self.has_adapter() == other.has_adapter()
  }

  /// Same implementation name, possibly under a different loader. Used to
  /// pick the log level when a registration overrides an existing entry.
  pub fn similar_definition(&self, other: &TypeDefinition) -> bool {
    self.impl_name == other.impl_name && self.restricted == other.restricted
  }
}

impl fmt::Debug for TypeDefinition {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TypeDefinition")
      .field("key", &self.key)
      .field("impl_name", &self.impl_name)
      .field("loader", &self.loader)
      .field("adapter", &self.adapter.is_some())
      .field("restricted", &self.restricted)
      .finish()
  }
}
