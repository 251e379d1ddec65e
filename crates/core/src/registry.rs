//! The component registry.
//!
//! One registry is owned per build context. A nested build context's registry
//! sees its own entries first and falls back to the parent chain for lookups;
//! writes never propagate upward. Registration and graph assembly complete
//! before execution begins; execution only performs reads (component
//! instantiation for actions and conditions), so the registry is shared by
//! `Arc` with a plain read/write lock inside.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};

use crate::component::{Capability, Component};
use crate::error::CoreError;
use crate::name::ComponentKey;
use crate::typedef::TypeDefinition;

#[derive(Default)]
struct RegistryInner {
  definitions: HashMap<ComponentKey, Arc<TypeDefinition>>,
  condition_namespaces: HashSet<String>,
}

/// Mapping from component keys to type definitions, with parent delegation.
pub struct ComponentRegistry {
  inner: RwLock<RegistryInner>,
  parent: Option<Arc<ComponentRegistry>>,
}

impl ComponentRegistry {
  /// Fresh stand-alone registry with the bootstrap definitions installed.
  pub fn new() -> Self {
    let registry = Self {
      inner: RwLock::new(RegistryInner::default()),
      parent: None,
    };
    crate::bootstrap::install(&registry);
    registry
  }

  /// Fresh registry for a nested build context, reading through to `parent`.
  pub fn with_parent(parent: Arc<ComponentRegistry>) -> Self {
    let registry = Self {
      inner: RwLock::new(RegistryInner::default()),
      parent: Some(parent),
    };
    crate::bootstrap::install(&registry);
    registry
  }

  /// Register a definition.
  ///
  /// Replacing an existing restricted entry is rejected. Re-registering an
  /// identical definition is accepted silently; replacing a different one
  /// follows last-registration-wins and is logged.
  pub fn register(&self, definition: TypeDefinition) -> Result<(), CoreError> {
    self.insert(definition, false)
  }

  /// Privileged path used by the bootstrap installer only.
  pub(crate) fn register_bootstrap(&self, definition: TypeDefinition) {
    // bootstrap runs against a fresh registry; insertion cannot be rejected
    let _ = self.insert(definition, true);
  }

  fn insert(&self, definition: TypeDefinition, privileged: bool) -> Result<(), CoreError> {
    let key = definition.key().clone();
    let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
    match inner.definitions.get(&key) {
      Some(old) if old.is_restricted() && !privileged => {
        return Err(CoreError::RegistrationRejected(key));
      }
      Some(old) if old.same_definition(&definition) => {
        debug!(key = %key, "re-registering identical definition");
      }
      Some(old) if old.similar_definition(&definition) => {
        debug!(key = %key, "overriding definition with a similar one");
      }
      Some(old) => {
        warn!(
          key = %key,
          old = old.impl_name(),
          new = definition.impl_name(),
          "overriding definition"
        );
      }
      None => {
        debug!(key = %key, impl_name = definition.impl_name(), "registering definition");
      }
    }
    inner.definitions.insert(key, Arc::new(definition));
    Ok(())
  }

  /// Look up a definition, checking local entries then the parent chain.
  ///
  /// Absence is not an error; callers decide what a miss means.
  pub fn lookup(&self, key: &ComponentKey) -> Option<Arc<TypeDefinition>> {
    let local = {
      let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
      inner.definitions.get(key).cloned()
    };
    local.or_else(|| self.parent.as_ref().and_then(|parent| parent.lookup(key)))
  }

  /// Construct an instance that satisfies `expected`.
  ///
  /// If the raw instance lacks the capability and the definition carries an
  /// adapter, the adapter is constructed with the raw instance attached as
  /// its proxy and returned instead; the adapted result is checked again.
  pub fn create(&self, key: &ComponentKey, expected: Capability) -> Result<Component, CoreError> {
    let definition = self
      .lookup(key)
      .ok_or_else(|| CoreError::UnknownComponent(key.clone()))?;
    let raw = definition.instantiate();
    if raw.provides(expected) {
      return Ok(raw);
    }
    match definition.adapt(raw) {
      Some(adapted) => {
        let adapted = adapted?;
        if adapted.provides(expected) {
          Ok(adapted)
        } else {
          Err(CoreError::IncompatibleComponent {
            key: key.clone(),
            expected,
          })
        }
      }
      None => Err(CoreError::IncompatibleComponent {
        key: key.clone(),
        expected,
      }),
    }
  }

  /// Mark `uri` as a home of attribute-level conditions.
  pub fn register_condition_namespace(&self, uri: &str) {
    let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
    inner.condition_namespaces.insert(uri.to_string());
  }

  /// Whether `uri` hosts attribute-level conditions, checked through the
  /// parent chain.
  pub fn is_condition_namespace(&self, uri: &str) -> bool {
    let local = {
      let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
      inner.condition_namespaces.contains(uri)
    };
    local
      || self
        .parent
        .as_ref()
        .is_some_and(|parent| parent.is_condition_namespace(uri))
  }

  /// Number of locally registered definitions (bootstrap entries included).
  pub fn len(&self) -> usize {
    let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
    inner.definitions.len()
  }

  /// True when no definitions are registered locally.
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl Default for ComponentRegistry {
  fn default() -> Self {
    Self::new()
  }
}
