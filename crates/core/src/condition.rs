//! Configuration-time boolean gates.
//!
//! A condition is evaluated once against the enclosing component's attribute
//! value and the build's property table. Evaluation never mutates build
//! state; it only yields the boolean that decides whether the gated element
//! is retained.

use crate::component::{ActionError, PropertySource};

/// A boolean gate over an attribute value and the property table.
pub trait Condition: Send {
  /// Evaluate the gate. `value` is the raw attribute value.
  fn eval(&self, value: &str, props: &dyn PropertySource) -> Result<bool, ActionError>;
}

/// Passes when the attribute value spells boolean true.
pub struct TrueCondition;

impl Condition for TrueCondition {
  fn eval(&self, value: &str, _props: &dyn PropertySource) -> Result<bool, ActionError> {
    Ok(matches!(
      value.trim().to_ascii_lowercase().as_str(),
      "true" | "yes" | "on"
    ))
  }
}

/// Passes when the named property exists, whatever its value.
pub struct SetCondition;

impl Condition for SetCondition {
  fn eval(&self, value: &str, props: &dyn PropertySource) -> Result<bool, ActionError> {
    Ok(props.property(value.trim()).is_some())
  }
}

/// Passes when the value is empty or whitespace only.
pub struct BlankCondition;

impl Condition for BlankCondition {
  fn eval(&self, value: &str, _props: &dyn PropertySource) -> Result<bool, ActionError> {
    Ok(value.trim().is_empty())
  }
}

/// Negation of another condition.
pub struct Not(pub Box<dyn Condition>);

impl Condition for Not {
  fn eval(&self, value: &str, props: &dyn PropertySource) -> Result<bool, ActionError> {
    Ok(!self.0.eval(value, props)?)
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use super::*;

  struct Props(HashMap<String, String>);

  impl Props {
    fn with(name: &str, value: &str) -> Self {
      let mut map = HashMap::new();
      map.insert(name.to_string(), value.to_string());
      Self(map)
    }

    fn empty() -> Self {
      Self(HashMap::new())
    }
  }

  impl PropertySource for Props {
    fn property(&self, name: &str) -> Option<&str> {
      self.0.get(name).map(String::as_str)
    }
  }

  #[test]
  fn true_condition_accepts_boolean_spellings() {
    let props = Props::empty();
    for value in ["true", "yes", "on", " TRUE "] {
      assert!(TrueCondition.eval(value, &props).unwrap(), "{value}");
    }
    for value in ["false", "no", "off", "1", ""] {
      assert!(!TrueCondition.eval(value, &props).unwrap(), "{value}");
    }
  }

  #[test]
  fn set_condition_checks_property_existence() {
    let props = Props::with("release", "");
    assert!(SetCondition.eval("release", &props).unwrap());
    assert!(!SetCondition.eval("debug", &props).unwrap());
  }

  #[test]
  fn blank_condition_accepts_empty_and_whitespace() {
    let props = Props::empty();
    assert!(BlankCondition.eval("", &props).unwrap());
    assert!(BlankCondition.eval("   ", &props).unwrap());
    assert!(!BlankCondition.eval("x", &props).unwrap());
  }

  #[test]
  fn not_inverts_the_inner_condition() {
    let props = Props::with("release", "1");
    let unless_set = Not(Box::new(SetCondition));
    assert!(!unless_set.eval("release", &props).unwrap());
    assert!(unless_set.eval("debug", &props).unwrap());
  }

  #[test]
  fn evaluation_does_not_consume_the_condition() {
    // The same boxed condition instance can gate several elements.
    let props = Props::empty();
    let cond = BlankCondition;
    assert!(cond.eval("", &props).unwrap());
    assert!(cond.eval("", &props).unwrap());
  }
}
