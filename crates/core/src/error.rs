//! Error types for ordo-core.

use thiserror::Error;

use crate::component::Capability;
use crate::name::ComponentKey;
use crate::unsupported::UnsupportedElement;

/// Errors raised by the component model.
#[derive(Debug, Error)]
pub enum CoreError {
  /// A later registration tried to replace a restricted definition.
  #[error("definition \"{0}\" is restricted and cannot be replaced")]
  RegistrationRejected(ComponentKey),

  /// No definition for the key anywhere in the registry chain.
  #[error("unknown component \"{0}\"")]
  UnknownComponent(ComponentKey),

  /// The raw instance lacks the expected capability and no adapter is
  /// defined for it.
  #[error("component \"{key}\" does not provide the {expected} capability")]
  IncompatibleComponent {
    key: ComponentKey,
    expected: Capability,
  },

  /// A dynamic attribute value was rejected by the component.
  #[error("invalid value \"{value}\" for attribute \"{name}\": {message}")]
  InvalidAttribute {
    name: String,
    value: String,
    message: String,
  },

  /// A nested element could not be mapped to any known child type.
  #[error(transparent)]
  Unsupported(#[from] UnsupportedElement),
}
