//! Dynamic configuration contracts.
//!
//! A component may accept configuration data that matches no statically known
//! schema member. Each of the three contracts below is opted into
//! independently through the accessors on [`Action`](crate::Action); a
//! missing capability means that configuration path is unavailable and the
//! configuration phase falls back to reporting an unsupported element or
//! attribute.

use crate::component::Component;
use crate::error::CoreError;

/// Accepts namespace-qualified string attributes with no static field.
pub trait DynamicAttribute {
  /// Apply the attribute.
  ///
  /// Fails with a build-level error if the value is invalid for that
  /// attribute; otherwise applies it with no other observable effect.
  fn set_dynamic_attribute(
    &mut self,
    uri: &str,
    local: &str,
    qname: &str,
    value: &str,
  ) -> Result<(), CoreError>;
}

/// Accepts attributes whose value is not naturally a string, such as a
/// previously resolved object reference.
pub trait DynamicValueAttribute {
  /// Apply the typed attribute value.
  fn set_dynamic_value(&mut self, name: &str, value: serde_json::Value) -> Result<(), CoreError>;
}

/// Creates nested child elements with no static schema member.
pub trait DynamicElement {
  /// Create a new child object for the element name, to be configured and
  /// attached by the caller, or fail if the name is not recognized.
  fn create_dynamic_element(
    &mut self,
    uri: &str,
    local: &str,
    qname: &str,
  ) -> Result<Component, CoreError>;
}
