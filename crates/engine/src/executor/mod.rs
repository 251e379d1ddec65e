//! Pluggable execution strategies.
//!
//! A strategy decides how the requested target list maps onto the dependency
//! order and what happens after a failure. Every strategy also names the
//! strategy to use when an action on its watch spawns a nested build, which
//! may differ from the top-level one.
//!
//! Per-node semantics are shared by all bundled strategies: dependencies are
//! a structural contract and always run before the node; a false `if`/`unless`
//! gate suppresses only the node's own actions and the node still counts as
//! done; an action failure is wrapped with the owning node's name and
//! declared location.

mod chain;
mod default;
mod keep_going;

pub use chain::ChainExecutor;
pub use default::DefaultExecutor;
pub use keep_going::KeepGoingExecutor;

use std::sync::Arc;

use tracing::debug;

use ordo_core::{ActionError, Capability, Condition, PropertySource};

use crate::context::BuildContext;
use crate::error::{EngineError, GraphError};
use crate::graph::Graph;
use crate::target::{Gate, Location};

/// Orders and runs a target graph.
pub trait Executor: Send + Sync {
  /// Run the requested targets against the graph.
  ///
  /// All graph and registry mutation must be complete before the first call;
  /// execution performs registry reads only.
  fn run(
    &self,
    ctx: &mut BuildContext,
    graph: &mut Graph,
    requested: &[String],
  ) -> Result<(), EngineError>;

  /// The strategy to apply when this build spawns a nested build context.
  fn sub_executor(&self) -> Arc<dyn Executor>;
}

/// Resolve the merged execution sequence, validating the whole graph.
pub(crate) fn sorted_sequence(
  graph: &Graph,
  requested: &[String],
) -> Result<Vec<String>, EngineError> {
  Ok(graph.topo_sort(requested)?)
}

/// Run one node: notifications, gates, actions.
pub(crate) fn run_node(
  ctx: &mut BuildContext,
  graph: &mut Graph,
  name: &str,
) -> Result<(), EngineError> {
  let location = match graph.get(name) {
    Some(target) => target.location().clone(),
    // the sequence came from this graph, so this only trips on a graph
    // mutated mid-run, which is undefined; fail it cleanly anyway
    None => return Err(GraphError::UnknownTarget(name.to_string()).into()),
  };
  ctx.notify_target_started(name, &location);
  let result = run_actions(ctx, graph, name, &location);
  let error = result.as_ref().err().map(ToString::to_string);
  ctx.notify_target_finished(name, &location, error);
  result
}

fn run_actions(
  ctx: &mut BuildContext,
  graph: &mut Graph,
  name: &str,
  location: &Location,
) -> Result<(), EngineError> {
  let (if_gate, unless_gate) = match graph.get(name) {
    Some(target) => (target.if_gate().cloned(), target.unless_gate().cloned()),
    None => return Ok(()),
  };

  if let Some(gate) = if_gate
    && !eval_gate(ctx, name, location, &gate)?
  {
    debug!(target = name, condition = %gate.condition, "skipped: \"if\" gate not met");
    return Ok(());
  }
  if let Some(gate) = unless_gate
    && eval_gate(ctx, name, location, &gate)?
  {
    debug!(target = name, condition = %gate.condition, "skipped: \"unless\" gate met");
    return Ok(());
  }

  let Some(target) = graph.get_mut(name) else {
    return Ok(());
  };
  for action in target.actions_mut() {
    action
      .perform(ctx)
      .map_err(|source| EngineError::ActionFailure {
        target: name.to_string(),
        location: location.clone(),
        source,
      })?;
  }
  Ok(())
}

/// Evaluate a gate through the registry.
///
/// A condition evaluator failing, or failing to resolve, counts as a failure
/// of the gated node.
fn eval_gate(
  ctx: &BuildContext,
  name: &str,
  location: &Location,
  gate: &Gate,
) -> Result<bool, EngineError> {
  let condition: Box<dyn Condition> = ctx
    .registry()
    .create(&gate.condition, Capability::Condition)
    .map_err(|err| EngineError::ActionFailure {
      target: name.to_string(),
      location: location.clone(),
      source: ActionError::with_source(
        format!("failed to resolve condition \"{}\"", gate.condition),
        err,
      ),
    })?
    .into_condition()
    .ok_or_else(|| EngineError::ActionFailure {
      target: name.to_string(),
      location: location.clone(),
      source: ActionError::new(format!(
        "component \"{}\" is not a condition",
        gate.condition
      )),
    })?;
  condition
    .eval(&gate.value, ctx as &dyn PropertySource)
    .map_err(|source| EngineError::ActionFailure {
      target: name.to_string(),
      location: location.clone(),
      source,
    })
}
