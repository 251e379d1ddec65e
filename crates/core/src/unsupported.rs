//! Deferred refinement of unknown-element diagnostics.

use thiserror::Error;

/// An unknown nested element, with a message that may be refined exactly once.
///
/// As this error unwinds through nested containers, an enclosing container
/// with more specific knowledge of what the element should have been may call
/// [`refine`](Self::refine). The first refinement wins and later attempts are
/// no-ops, so the most specific context to speak sets the final user-facing
/// text without the message being repeatedly overwritten on the way up.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct UnsupportedElement {
  element: String,
  message: String,
  refined: bool,
}

impl UnsupportedElement {
  /// New error for the offending element, with a default message.
  pub fn new(element: impl Into<String>) -> Self {
    let element = element.into();
    let message = format!("the element \"{element}\" is not supported here");
    Self {
      element,
      message,
      refined: false,
    }
  }

  /// New error with an explicit initial message.
  ///
  /// The initial message is still the default: it does not count as a
  /// refinement and the first [`refine`](Self::refine) call will replace it.
  pub fn with_message(element: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      element: element.into(),
      message: message.into(),
      refined: false,
    }
  }

  /// The offending element name.
  pub fn element(&self) -> &str {
    &self.element
  }

  /// The current user-facing message.
  pub fn message(&self) -> &str {
    &self.message
  }

  /// Whether a refinement has already been applied.
  pub fn is_refined(&self) -> bool {
    self.refined
  }

  /// Replace the message unless a refinement already happened.
  ///
  /// Returns true when this call set the message.
  pub fn refine(&mut self, message: impl Into<String>) -> bool {
    if self.refined {
      return false;
    }
    self.message = message.into();
    self.refined = true;
    true
  }
}
