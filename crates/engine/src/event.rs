//! Build progress notification.
//!
//! Events fire synchronously on the build thread, in listener registration
//! order, before execution proceeds. An observer that blocks stalls the whole
//! build; when execution is extended to run subtrees in parallel,
//! notifications must be serialized so observers never see interleaved
//! partial state.

use tracing::{debug, info, warn};

use crate::target::Location;

/// Payload carried by every notification.
#[derive(Debug, Clone, Default)]
pub struct BuildEvent {
  /// Name of the build context the event originated from.
  pub context: String,
  /// Owning target, when the event concerns one.
  pub target: Option<String>,
  /// Declared source location of the target, when known.
  pub location: Option<Location>,
  /// Failure description, set on `*_finished` events that failed.
  pub error: Option<String>,
}

/// Observer of build progress.
pub trait BuildListener: Send {
  /// A build or sub-build context started running.
  fn build_started(&mut self, event: &BuildEvent) {
    let _ = event;
  }

  /// A build or sub-build context finished, successfully or not.
  fn build_finished(&mut self, event: &BuildEvent) {
    let _ = event;
  }

  /// A target is about to run.
  fn target_started(&mut self, event: &BuildEvent) {
    let _ = event;
  }

  /// A target finished, successfully or not.
  fn target_finished(&mut self, event: &BuildEvent) {
    let _ = event;
  }
}

/// Listener that forwards events to the tracing subscriber.
#[derive(Debug, Default)]
pub struct TraceListener;

impl BuildListener for TraceListener {
  fn build_started(&mut self, event: &BuildEvent) {
    info!(context = %event.context, "build started");
  }

  fn build_finished(&mut self, event: &BuildEvent) {
    match &event.error {
      Some(error) => warn!(context = %event.context, error = %error, "build failed"),
      None => info!(context = %event.context, "build finished"),
    }
  }

  fn target_started(&mut self, event: &BuildEvent) {
    debug!(
      context = %event.context,
      target = event.target.as_deref().unwrap_or(""),
      "target started"
    );
  }

  fn target_finished(&mut self, event: &BuildEvent) {
    match &event.error {
      Some(error) => warn!(
        context = %event.context,
        target = event.target.as_deref().unwrap_or(""),
        error = %error,
        "target failed"
      ),
      None => debug!(
        context = %event.context,
        target = event.target.as_deref().unwrap_or(""),
        "target finished"
      ),
    }
  }
}
