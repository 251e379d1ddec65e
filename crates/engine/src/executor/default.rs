//! The default strategy: one merged sweep, first failure is fatal.

use std::sync::Arc;

use tracing::info;

use super::{Executor, run_node, sorted_sequence};
use crate::context::BuildContext;
use crate::error::EngineError;
use crate::graph::Graph;

/// Merges all requested targets into a single sorted sequence.
///
/// A dependency shared by several requested targets executes at most once per
/// invocation. The first failing node aborts the remaining traversal; nested
/// builds run under this same strategy.
#[derive(Debug, Default, Clone)]
pub struct DefaultExecutor;

impl Executor for DefaultExecutor {
  fn run(
    &self,
    ctx: &mut BuildContext,
    graph: &mut Graph,
    requested: &[String],
  ) -> Result<(), EngineError> {
    let sequence = sorted_sequence(graph, requested)?;
    info!(context = %ctx.name(), targets = sequence.len(), "starting build");
    for name in &sequence {
      if ctx.cancel_token().is_cancelled() {
        return Err(EngineError::Cancelled);
      }
      run_node(ctx, graph, name)?;
    }
    Ok(())
  }

  fn sub_executor(&self) -> Arc<dyn Executor> {
    Arc::new(Self)
  }
}
