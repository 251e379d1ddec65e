//! Qualified component naming.
//!
//! Every pluggable component lives in a flat registry keyed by a
//! [`ComponentKey`]. Keys for namespace-scoped component libraries are derived
//! from a (namespace URI, local name) pair; components from the engine's own
//! namespace keep their bare local name so built-in lookups stay readable.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Namespace URI of the engine's built-in components.
pub const CORE_URI: &str = "ordo:core";

/// Prefix shared by all namespace-scoped component library URIs.
pub const LIB_URI_PREFIX: &str = "ordolib:";

/// Namespace URI that hosts the bootstrap attribute conditions.
pub const CONDITION_URI: &str = "ordo:cond";

/// Registry key identifying one component family within a build context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentKey(String);

impl ComponentKey {
  /// Derive the key for a (namespace URI, local name) pair.
  ///
  /// The empty URI and [`CORE_URI`] both map to the bare local name; any
  /// other URI maps to `"{uri}:{local}"`. The derivation is stable,
  /// side-effect-free and collision-free across distinct URIs.
  pub fn qualified(uri: &str, local: &str) -> Self {
    if uri.is_empty() || uri == CORE_URI {
      Self(local.to_string())
    } else {
      Self(format!("{uri}:{local}"))
    }
  }

  /// Key for one of the engine's own components.
  pub fn core(local: &str) -> Self {
    Self::qualified(CORE_URI, local)
  }

  /// Key for a component provided by the library scoped to `uri`.
  ///
  /// `uri` is used as given; callers building library URIs by hand usually
  /// start from [`LIB_URI_PREFIX`].
  pub fn library(uri: &str, local: &str) -> Self {
    Self::qualified(uri, local)
  }

  /// The namespace URI portion, or the empty string for core components.
  ///
  /// URIs themselves contain colons, so the split is on the last one.
  pub fn uri(&self) -> &str {
    match self.0.rfind(':') {
      Some(idx) => &self.0[..idx],
      None => "",
    }
  }

  /// The local element name portion.
  pub fn local_name(&self) -> &str {
    match self.0.rfind(':') {
      Some(idx) => &self.0[idx + 1..],
      None => &self.0,
    }
  }

  /// The full derived key.
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for ComponentKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn core_uri_maps_to_bare_name() {
    assert_eq!(ComponentKey::qualified(CORE_URI, "echo").as_str(), "echo");
    assert_eq!(ComponentKey::qualified("", "echo").as_str(), "echo");
  }

  #[test]
  fn library_uri_is_prefixed() {
    let key = ComponentKey::qualified("ordolib:deploy", "upload");
    assert_eq!(key.as_str(), "ordolib:deploy:upload");
  }

  #[test]
  fn uri_and_local_name_split_on_last_colon() {
    let key = ComponentKey::qualified("ordolib:deploy", "upload");
    assert_eq!(key.uri(), "ordolib:deploy");
    assert_eq!(key.local_name(), "upload");

    let bare = ComponentKey::core("echo");
    assert_eq!(bare.uri(), "");
    assert_eq!(bare.local_name(), "echo");
  }

  #[test]
  fn derivation_is_stable() {
    let a = ComponentKey::qualified("ordolib:deploy", "upload");
    let b = ComponentKey::qualified("ordolib:deploy", "upload");
    assert_eq!(a, b);
  }

  #[test]
  fn distinct_uris_do_not_collide() {
    let a = ComponentKey::qualified("ordolib:a", "task");
    let b = ComponentKey::qualified("ordolib:b", "task");
    assert_ne!(a, b);
  }
}
