use miette::{IntoDiagnostic, Result};
use modmap_core::version::OUTPUT_SCHEMA_VERSION;
use modmap_core::ConfigStore;
use serde::Serialize;

/// JSON output for `modmap modules`.
#[derive(Serialize)]
struct ModulesOutput {
    schema_version: u32,
    modules: Vec<ModuleLookup>,
}

#[derive(Serialize)]
struct ModuleLookup {
    /// Name as requested; absent when listing every module.
    #[serde(skip_serializing_if = "Option::is_none")]
    requested: Option<String>,
    /// Registered name found, or null.
    module: Option<String>,
}

pub fn run(store: &ConfigStore, names: &[String], json: bool) -> Result<()> {
    let found = store.get_modules(names);

    let lookups: Vec<ModuleLookup> = if names.is_empty() {
        found
            .into_iter()
            .map(|module| ModuleLookup {
                requested: None,
                module: module.map(|m| m.name().to_string()),
            })
            .collect()
    } else {
        names
            .iter()
            .zip(found)
            .map(|(name, module)| ModuleLookup {
                requested: Some(name.clone()),
                module: module.map(|m| m.name().to_string()),
            })
            .collect()
    };

    if json {
        let output = ModulesOutput {
            schema_version: OUTPUT_SCHEMA_VERSION,
            modules: lookups,
        };
        println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
        return Ok(());
    }

    for lookup in &lookups {
        let module = lookup.module.as_deref().unwrap_or("(not found)");
        match &lookup.requested {
            Some(requested) => println!("{requested} -> {module}"),
            None => println!("{module}"),
        }
    }

    Ok(())
}
