//! Built-in definitions installed into every fresh registry.
//!
//! Installation happens exactly once, at registry creation, and guarantees
//! that every build context has working attribute conditions no matter what
//! the front-end registers later. All entries are restricted so user code
//! cannot silently shadow their semantics.

use std::sync::Arc;

use tracing::debug;

use crate::component::Component;
use crate::condition::{BlankCondition, Not, SetCondition, TrueCondition};
use crate::name::{CONDITION_URI, ComponentKey};
use crate::registry::ComponentRegistry;
use crate::typedef::{ComponentFactory, LoaderHandle, TypeDefinition};

/// Install the condition namespace marker and the six bootstrap conditions.
pub(crate) fn install(registry: &ComponentRegistry) {
  registry.register_condition_namespace(CONDITION_URI);
  for (local, impl_name, factory) in condition_definitions() {
    let definition = TypeDefinition::new(
      ComponentKey::qualified(CONDITION_URI, local),
      impl_name,
      LoaderHandle::core(),
      factory,
    )
    .restricted();
    registry.register_bootstrap(definition);
  }
  debug!(uri = CONDITION_URI, "installed bootstrap condition definitions");
}

fn condition_definitions() -> Vec<(&'static str, &'static str, ComponentFactory)> {
  vec![
    (
      "true",
      "ordo_core::condition::TrueCondition",
      Arc::new(|_| Component::Condition(Box::new(TrueCondition))),
    ),
    (
      "set",
      "ordo_core::condition::SetCondition",
      Arc::new(|_| Component::Condition(Box::new(SetCondition))),
    ),
    (
      "blank",
      "ordo_core::condition::BlankCondition",
      Arc::new(|_| Component::Condition(Box::new(BlankCondition))),
    ),
    (
      "unless-true",
      "ordo_core::condition::Not<TrueCondition>",
      Arc::new(|_| Component::Condition(Box::new(Not(Box::new(TrueCondition))))),
    ),
    (
      "unless-set",
      "ordo_core::condition::Not<SetCondition>",
      Arc::new(|_| Component::Condition(Box::new(Not(Box::new(SetCondition))))),
    ),
    (
      "unless-blank",
      "ordo_core::condition::Not<BlankCondition>",
      Arc::new(|_| Component::Condition(Box::new(Not(Box::new(BlankCondition))))),
    ),
  ]
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use super::*;
  use crate::component::{Capability, PropertySource};

  struct Props(HashMap<String, String>);

  impl PropertySource for Props {
    fn property(&self, name: &str) -> Option<&str> {
      self.0.get(name).map(String::as_str)
    }
  }

  #[test]
  fn every_fresh_registry_has_the_six_conditions() {
    let registry = ComponentRegistry::new();
    for local in ["true", "set", "blank", "unless-true", "unless-set", "unless-blank"] {
      let key = ComponentKey::qualified(CONDITION_URI, local);
      let definition = registry.lookup(&key).unwrap_or_else(|| panic!("missing {local}"));
      assert!(definition.is_restricted(), "{local} must be restricted");
      assert!(
        registry.create(&key, Capability::Condition).is_ok(),
        "{local} must instantiate"
      );
    }
  }

  #[test]
  fn condition_namespace_is_marked() {
    let registry = ComponentRegistry::new();
    assert!(registry.is_condition_namespace(CONDITION_URI));
  }

  #[test]
  fn negated_variants_invert_their_pair() {
    let registry = ComponentRegistry::new();
    let mut props = HashMap::new();
    props.insert("release".to_string(), "1".to_string());
    let props = Props(props);

    let set = registry
      .create(&ComponentKey::qualified(CONDITION_URI, "set"), Capability::Condition)
      .unwrap()
      .into_condition()
      .unwrap();
    let unless_set = registry
      .create(
        &ComponentKey::qualified(CONDITION_URI, "unless-set"),
        Capability::Condition,
      )
      .unwrap()
      .into_condition()
      .unwrap();

    assert!(set.eval("release", &props).unwrap());
    assert!(!unless_set.eval("release", &props).unwrap());
    assert!(!set.eval("debug", &props).unwrap());
    assert!(unless_set.eval("debug", &props).unwrap());
  }
}
