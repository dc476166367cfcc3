//! Loader configuration store.
//!
//! Owns the module registry, the global alias table and the path table.
//! All mutation goes through `&mut self`; there is no internal locking, so
//! callers sharing a store across threads must guard it themselves.

use crate::config::{LoaderConfig, LoaderOptions};
use crate::registry::{Module, ModuleFactory, ModuleRegistry};
use crate::resolver::{
    resolve_alias, resolve_alias_with_trace, trace_steps, MappingTable, Resolution, ResolveTrace,
    ResolveTraceStep,
};
use crate::version::OUTPUT_SCHEMA_VERSION;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Log target for explained resolutions.
pub const EXPLAIN_TARGET: &str = "modmap::explain";

/// Registry, alias tables and options of one loader.
pub struct ConfigStore<M = Module> {
    options: LoaderOptions,
    registry: ModuleRegistry<M>,
    maps: MappingTable,
    paths: IndexMap<String, String>,
}

impl<M> fmt::Debug for ConfigStore<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigStore")
            .field("options", &self.options)
            .field("registry", &self.registry)
            .field("maps", &self.maps)
            .field("paths", &self.paths)
            .finish()
    }
}

impl Default for ConfigStore<Module> {
    fn default() -> Self {
        Self::new(LoaderOptions::default())
    }
}

impl ConfigStore<Module> {
    /// Create an empty store of plain [`Module`] handles.
    #[must_use]
    pub fn new(options: LoaderOptions) -> Self {
        Self::with_factory(options, |name: &str| Module::new(name))
    }

    /// Create a store from a bootstrap configuration.
    #[must_use]
    pub fn from_config(config: LoaderConfig) -> Self {
        Self::from_config_with_factory(config, |name: &str| Module::new(name))
    }
}

impl<M> ConfigStore<M> {
    /// Create an empty store whose modules are built by `factory`.
    pub fn with_factory(options: LoaderOptions, factory: impl ModuleFactory<M> + 'static) -> Self {
        Self {
            options,
            registry: ModuleRegistry::with_factory(factory),
            maps: MappingTable::new(),
            paths: IndexMap::new(),
        }
    }

    /// Create a store from a bootstrap configuration and a module factory.
    ///
    /// Maps and paths are merged and listed modules registered, in that order.
    pub fn from_config_with_factory(
        config: LoaderConfig,
        factory: impl ModuleFactory<M> + 'static,
    ) -> Self {
        let LoaderConfig {
            options,
            maps,
            paths,
            modules,
        } = config;

        let mut store = Self::with_factory(options, factory);
        store.add_mappings(maps);
        store.add_paths(paths);
        for name in &modules {
            store.add_module(name);
        }
        store
    }

    /// Register a module, returning the existing handle if already present.
    pub fn add_module(&mut self, name: &str) -> Arc<M> {
        self.registry.add(name)
    }

    /// Shallow-merge aliases into the global table.
    pub fn add_mappings(&mut self, mappings: MappingTable) {
        debug!(
            count = mappings.len(),
            wildcard = mappings.has_wildcard(),
            "Adding mappings"
        );
        self.maps.merge(mappings);
    }

    /// Shallow-merge entries into the path table.
    pub fn add_paths<K, V>(&mut self, paths: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (name, path) in paths {
            self.paths.insert(name.into(), path.into());
        }
    }

    /// Look up a module, resolving aliases through `context` and the global
    /// table on a direct miss. Never registers anything.
    #[must_use]
    pub fn get_module(&self, name: &str, context: Option<&MappingTable>) -> Option<Arc<M>> {
        if !self.options.explain_resolutions {
            return self.registry.get(name, context, &self.maps);
        }

        if let Some(module) = self.registry.get_exact(name) {
            log_resolution(&registry_hit(name), Some(true));
            return Some(module);
        }
        let resolution = self.explain(name, context);
        let module = self.registry.get_exact(&resolution.resolved);
        log_resolution(&resolution, Some(module.is_some()));
        module
    }

    /// Look up several modules, each without a contextual table.
    ///
    /// An empty `names` returns every registered module in registration order.
    #[must_use]
    pub fn get_modules<S: AsRef<str>>(&self, names: &[S]) -> Vec<Option<Arc<M>>> {
        if names.is_empty() || !self.options.explain_resolutions {
            return self.registry.get_many(names, &self.maps);
        }
        names
            .iter()
            .map(|name| self.get_module(name.as_ref(), None))
            .collect()
    }

    /// Map a specifier through the contextual and global tables.
    #[must_use]
    pub fn resolve(&self, name: &str, context: Option<&MappingTable>) -> String {
        if self.options.explain_resolutions {
            let resolution = self.explain(name, context);
            log_resolution(&resolution, None);
            return resolution.resolved;
        }
        resolve_alias(name, context, &self.maps)
    }

    /// Map several specifiers, sharing one contextual table.
    #[must_use]
    pub fn resolve_many<S: AsRef<str>>(
        &self,
        names: &[S],
        context: Option<&MappingTable>,
    ) -> Vec<String> {
        names
            .iter()
            .map(|name| self.resolve(name.as_ref(), context))
            .collect()
    }

    /// Resolve with a step-by-step trace, regardless of `explainResolutions`.
    #[must_use]
    pub fn explain(&self, name: &str, context: Option<&MappingTable>) -> Resolution {
        resolve_alias_with_trace(name, context, &self.maps)
    }

    #[must_use]
    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    #[must_use]
    pub fn explain_resolutions(&self) -> bool {
        self.options.explain_resolutions
    }

    #[must_use]
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.options.wait_timeout)
    }

    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.options.base_path
    }

    #[must_use]
    pub fn combine(&self) -> bool {
        self.options.combine
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.options.url
    }

    #[must_use]
    pub fn url_max_length(&self) -> usize {
        self.options.url_max_length
    }

    #[must_use]
    pub fn default_url_params(&self) -> Option<&Map<String, Value>> {
        self.options.default_url_params.as_ref()
    }

    #[must_use]
    pub fn paths(&self) -> &IndexMap<String, String> {
        &self.paths
    }

    /// The global alias table.
    #[must_use]
    pub fn maps(&self) -> &MappingTable {
        &self.maps
    }

    #[must_use]
    pub fn registry(&self) -> &ModuleRegistry<M> {
        &self.registry
    }

    /// Serializable view of the current configuration.
    #[must_use]
    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            schema_version: OUTPUT_SCHEMA_VERSION,
            options: self.options.clone(),
            maps: self.maps.clone(),
            wildcard: self.maps.has_wildcard(),
            paths: self.paths.clone(),
            modules: self.registry.names().map(str::to_string).collect(),
        }
    }
}

/// Resolution for a name found in the registry before any table is consulted.
fn registry_hit(name: &str) -> Resolution {
    let mut trace = ResolveTrace::new();
    trace.add_step(
        ResolveTraceStep::new(
            trace_steps::REGISTRY_HIT,
            false,
            format!("'{name}' is registered; maps not consulted"),
        )
        .with_target(name),
    );
    Resolution {
        specifier: name.to_string(),
        resolved: name.to_string(),
        trace,
    }
}

fn log_resolution(resolution: &Resolution, found: Option<bool>) {
    let steps: Vec<&str> = resolution.trace.steps.iter().map(|s| s.step).collect();
    info!(
        target: EXPLAIN_TARGET,
        specifier = %resolution.specifier,
        resolved = %resolution.resolved,
        mapped = resolution.is_mapped(),
        found = ?found,
        steps = ?steps,
        "Resolved module name"
    );
    for warning in &resolution.trace.warnings {
        info!(target: EXPLAIN_TARGET, code = warning.code, "{}", warning.message);
    }
}

/// Serializable view of a [`ConfigStore`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSnapshot {
    pub schema_version: u32,
    #[serde(flatten)]
    pub options: LoaderOptions,
    pub maps: MappingTable,
    /// Whether the global table has a wildcard handler.
    pub wildcard: bool,
    pub paths: IndexMap<String, String>,
    pub modules: Vec<String>,
}
