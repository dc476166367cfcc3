//! Name-keyed registry of module handles.
//!
//! Modules are built by an external [`ModuleFactory`] and handed out as
//! shared `Arc` handles. Lookups may fall back to alias resolution but
//! never create entries.

use crate::resolver::{resolve_alias, MappingTable};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Builds the module value for a newly registered name.
pub trait ModuleFactory<M>: Send + Sync {
    fn create(&self, name: &str) -> M;
}

impl<M, F> ModuleFactory<M> for F
where
    F: Fn(&str) -> M + Send + Sync,
{
    fn create(&self, name: &str) -> M {
        self(name)
    }
}

/// Default opaque module: only its registered name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Module {
    name: String,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Registry of module handles in registration order.
pub struct ModuleRegistry<M = Module> {
    modules: IndexMap<String, Arc<M>>,
    factory: Box<dyn ModuleFactory<M>>,
}

impl<M> fmt::Debug for ModuleRegistry<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("modules", &self.modules.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Default for ModuleRegistry<Module> {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleRegistry<Module> {
    /// Create a registry of plain [`Module`] values.
    #[must_use]
    pub fn new() -> Self {
        Self::with_factory(|name: &str| Module::new(name))
    }
}

impl<M> ModuleRegistry<M> {
    /// Create a registry using a custom module factory.
    pub fn with_factory(factory: impl ModuleFactory<M> + 'static) -> Self {
        Self {
            modules: IndexMap::new(),
            factory: Box::new(factory),
        }
    }

    /// Register `name`, or return the handle already registered under it.
    pub fn add(&mut self, name: &str) -> Arc<M> {
        if let Some(existing) = self.modules.get(name) {
            return Arc::clone(existing);
        }

        debug!(module = %name, "Registering module");
        let module = Arc::new(self.factory.create(name));
        self.modules.insert(name.to_string(), Arc::clone(&module));
        module
    }

    /// Look up `name` without any alias resolution.
    #[must_use]
    pub fn get_exact(&self, name: &str) -> Option<Arc<M>> {
        self.modules.get(name).cloned()
    }

    /// Look up `name`, falling back to one alias-resolution pass on a miss.
    #[must_use]
    pub fn get(
        &self,
        name: &str,
        context: Option<&MappingTable>,
        global: &MappingTable,
    ) -> Option<Arc<M>> {
        if let Some(module) = self.get_exact(name) {
            return Some(module);
        }

        let resolved = resolve_alias(name, context, global);
        self.get_exact(&resolved)
    }

    /// Look up several names.
    ///
    /// Each name is resolved without a contextual table. An empty `names`
    /// returns every registered handle in registration order.
    #[must_use]
    pub fn get_many<S: AsRef<str>>(
        &self,
        names: &[S],
        global: &MappingTable,
    ) -> Vec<Option<Arc<M>>> {
        if names.is_empty() {
            return self.iter().map(|(_, module)| Some(Arc::clone(module))).collect();
        }

        names
            .iter()
            .map(|name| self.get(name.as_ref(), None, global))
            .collect()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<M>)> {
        self.modules.iter().map(|(k, v)| (k.as_str(), v))
    }
}
