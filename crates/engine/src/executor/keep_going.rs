//! Keep-going strategy: collect failures, skip dependents of failed nodes.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};

use super::{DefaultExecutor, Executor, run_node, sorted_sequence};
use crate::context::BuildContext;
use crate::error::EngineError;
use crate::graph::Graph;

/// Runs the merged sequence like [`DefaultExecutor`], but a failing node only
/// takes down the nodes that depend on it.
///
/// A node runs only when every direct dependency succeeded; anything
/// downstream of a failure is skipped, independent branches keep running, and
/// every collected failure is reported together at the end. Nested builds run
/// under [`DefaultExecutor`]: a failing sub-build is a single action failure
/// to the invoking node, and this strategy decides what that failure takes
/// down at its own level.
#[derive(Debug, Default, Clone)]
pub struct KeepGoingExecutor;

impl Executor for KeepGoingExecutor {
  fn run(
    &self,
    ctx: &mut BuildContext,
    graph: &mut Graph,
    requested: &[String],
  ) -> Result<(), EngineError> {
    let sequence = sorted_sequence(graph, requested)?;
    info!(context = %ctx.name(), targets = sequence.len(), "starting build (keep-going)");

    let mut succeeded: HashSet<String> = HashSet::new();
    let mut failures: Vec<EngineError> = Vec::new();

    for name in &sequence {
      if ctx.cancel_token().is_cancelled() {
        return Err(EngineError::Cancelled);
      }
      let failed_dependency = graph.get(name).and_then(|target| {
        target
          .dependencies()
          .iter()
          .find(|dep| !succeeded.contains(dep.as_str()))
          .cloned()
      });
      if let Some(dependency) = failed_dependency {
        warn!(
          target = name,
          dependency = %dependency,
          "skipped: dependency failed or was not executed"
        );
        continue;
      }
      match run_node(ctx, graph, name) {
        Ok(()) => {
          succeeded.insert(name.clone());
        }
        Err(err) => {
          warn!(target = name, error = %err, "target failed, continuing");
          failures.push(err);
        }
      }
    }

    if failures.is_empty() {
      Ok(())
    } else {
      Err(EngineError::Aggregate { failures })
    }
  }

  fn sub_executor(&self) -> Arc<dyn Executor> {
    Arc::new(DefaultExecutor)
  }
}
