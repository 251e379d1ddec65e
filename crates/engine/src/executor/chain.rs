//! Per-request strategy: each requested target runs with its own full chain.

use std::sync::Arc;

use tracing::info;

use super::{DefaultExecutor, Executor, run_node, sorted_sequence};
use crate::context::BuildContext;
use crate::error::EngineError;
use crate::graph::Graph;

/// Runs each requested target's dependency chain independently, the way a
/// caller issuing several separate invocations would.
///
/// A dependency shared between two requested targets executes once per chain
/// rather than once per run; callers that need at-most-once semantics across
/// the whole request use [`DefaultExecutor`]. Nested builds fall back to the
/// merging [`DefaultExecutor`], so a sub-build's shared dependencies still
/// run at most once per nested context.
#[derive(Debug, Default, Clone)]
pub struct ChainExecutor;

impl Executor for ChainExecutor {
  fn run(
    &self,
    ctx: &mut BuildContext,
    graph: &mut Graph,
    requested: &[String],
  ) -> Result<(), EngineError> {
    for name in requested {
      let sequence = sorted_sequence(graph, std::slice::from_ref(name))?;
      info!(context = %ctx.name(), target = %name, chain = sequence.len(), "starting chain");
      for node in &sequence {
        if ctx.cancel_token().is_cancelled() {
          return Err(EngineError::Cancelled);
        }
        run_node(ctx, graph, node)?;
      }
    }
    Ok(())
  }

  fn sub_executor(&self) -> Arc<dyn Executor> {
    Arc::new(DefaultExecutor)
  }
}
