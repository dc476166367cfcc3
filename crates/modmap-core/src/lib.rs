#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::return_self_not_must_use)]

//! Configuration and module-name resolution core for a module loader.
//!
//! Consumers request logical module names; alias tables map them onto the
//! names actually registered (`liferay` -> `liferay@1.0.0`).

pub mod config;
pub mod error;
pub mod registry;
pub mod resolver;
pub mod store;
pub mod version;

pub use config::{LoaderConfig, LoaderOptions};
pub use error::Error;
pub use registry::{Module, ModuleFactory, ModuleRegistry};
pub use resolver::{
    resolve_alias, resolve_alias_with_trace, AliasMatch, MappingEntry, MappingTable, MatchKind,
    Resolution, ResolveTrace, ResolveTraceStep, TraceWarning,
};
pub use store::{ConfigSnapshot, ConfigStore};
pub use version::VERSION;
