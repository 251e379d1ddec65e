//! Invoking a nested build from an action.

use std::sync::Arc;

use tracing::info;

use ordo_core::{Action, ActionError, RunContext};

use crate::context::BuildContext;
use crate::executor::Executor;
use crate::graph::Graph;

/// Action that runs another graph as a nested build.
///
/// The nested context is created from the invoking context at `perform` time:
/// its registry reads through to the invoking registry, properties are copied
/// and the cancel token is shared. The nested build runs to completion (or
/// failure) before control returns; it is never started concurrently with the
/// parent. The strategy for the nested run is whatever the spawning strategy
/// names via [`Executor::sub_executor`].
pub struct SubBuild {
  name: String,
  graph: Graph,
  requested: Vec<String>,
  executor: Arc<dyn Executor>,
}

impl SubBuild {
  /// New nested-build invocation.
  ///
  /// `executor` is the strategy of the spawning build; the nested build
  /// itself runs under `executor.sub_executor()`.
  pub fn new(
    name: impl Into<String>,
    graph: Graph,
    requested: Vec<String>,
    executor: Arc<dyn Executor>,
  ) -> Self {
    Self {
      name: name.into(),
      graph,
      requested,
      executor,
    }
  }
}

impl Action for SubBuild {
  fn perform(&mut self, ctx: &mut dyn RunContext) -> Result<(), ActionError> {
    let Some(parent) = ctx.as_any().downcast_mut::<BuildContext>() else {
      return Err(ActionError::new(
        "nested builds require the engine build context",
      ));
    };
    let mut sub = parent.sub_context(self.name.clone());
    info!(context = %sub.name(), requested = ?self.requested, "starting sub-build");

    parent.notify_build_started(&self.name);
    let result = self
      .executor
      .sub_executor()
      .run(&mut sub, &mut self.graph, &self.requested);
    parent.notify_build_finished(&self.name, result.as_ref().err().map(ToString::to_string));

    result.map_err(|err| {
      ActionError::with_source(format!("nested build \"{}\" failed", self.name), err)
    })
  }
}
