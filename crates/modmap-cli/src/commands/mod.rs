pub mod config;
pub mod explain;
pub mod modules;
pub mod resolve;
pub mod version;

use miette::{IntoDiagnostic, Result, WrapErr};
use modmap_core::config::load_mapping_table;
use modmap_core::{ConfigStore, LoaderConfig, MappingTable};
use std::path::Path;
use tracing::debug;

/// Build the store from a config file, or from defaults when none is given.
pub fn load_store(path: Option<&Path>, explain_resolutions: bool) -> Result<ConfigStore> {
    let mut config = match path {
        Some(path) => {
            debug!(path = %path.display(), "Loading loader config");
            LoaderConfig::load(path).into_diagnostic()?
        }
        None => LoaderConfig::default(),
    };

    if explain_resolutions {
        config.options.explain_resolutions = true;
    }

    Ok(ConfigStore::from_config(config))
}

/// Load an optional contextual map.
pub fn load_context(path: Option<&Path>) -> Result<Option<MappingTable>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let table = load_mapping_table(path)
        .into_diagnostic()
        .wrap_err("Failed to load contextual map")?;
    debug!(path = %path.display(), count = table.len(), "Loaded contextual map");
    Ok(Some(table))
}
