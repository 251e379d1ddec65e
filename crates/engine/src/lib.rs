//! ordo-engine: target graph and execution for the ordo build engine.
//!
//! This crate provides:
//! - [`BuildContext`]: one build invocation (component registry, properties,
//!   listeners, cooperative cancellation), with nested sub-contexts whose
//!   registries read through to the parent
//! - [`Target`] / [`Graph`]: named work units with ordered dependencies, plus
//!   the content-free extension-point and group nodes
//! - [`Executor`] strategies: the merging [`DefaultExecutor`], the
//!   failure-collecting [`KeepGoingExecutor`] and the per-request
//!   [`ChainExecutor`]
//! - [`SubBuild`]: the bundled nested-build action
//!
//! The engine is single-threaded and synchronous: one logical thread walks
//! the graph, runs each node's actions in sequence and fires progress
//! notifications synchronously before proceeding.

pub mod context;
pub mod error;
pub mod event;
pub mod executor;
pub mod graph;
pub mod subbuild;
pub mod target;

pub use context::{BuildContext, CancelToken};
pub use error::{EngineError, GraphError};
pub use event::{BuildEvent, BuildListener, TraceListener};
pub use executor::{ChainExecutor, DefaultExecutor, Executor, KeepGoingExecutor};
pub use graph::Graph;
pub use subbuild::SubBuild;
pub use target::{Gate, Location, NodeKind, Target};
