//! ordo-core: the component model for the ordo build engine.
//!
//! This crate provides:
//! - [`ComponentKey`]: qualified naming for namespaced component families
//! - [`TypeDefinition`] + [`ComponentRegistry`]: pluggable component
//!   resolution with parent delegation, override protection and adapter
//!   wrapping
//! - the bootstrap attribute conditions (`true`/`set`/`blank` and their
//!   negations), installed into every fresh registry
//! - the dynamic configuration contracts and the refinable
//!   unsupported-element error used while configuring nested elements

mod bootstrap;
pub mod component;
pub mod condition;
pub mod dynamic;
pub mod error;
pub mod name;
pub mod registry;
pub mod typedef;
pub mod unsupported;

pub use component::{Action, ActionError, Capability, Component, PropertySource, RunContext};
pub use condition::Condition;
pub use error::CoreError;
pub use name::{CONDITION_URI, CORE_URI, ComponentKey, LIB_URI_PREFIX};
pub use registry::ComponentRegistry;
pub use typedef::{AdapterFactory, ComponentFactory, LoaderHandle, TypeDefinition};
pub use unsupported::UnsupportedElement;
