use miette::{IntoDiagnostic, Result};
use modmap_core::version::OUTPUT_SCHEMA_VERSION;
use modmap_core::{ConfigStore, MappingTable};
use serde::Serialize;

/// JSON output for `modmap resolve`.
#[derive(Serialize)]
struct ResolveOutput<'a> {
    schema_version: u32,
    results: Vec<ResolvedName<'a>>,
}

#[derive(Serialize)]
struct ResolvedName<'a> {
    specifier: &'a str,
    resolved: String,
    mapped: bool,
}

pub fn run(
    store: &ConfigStore,
    names: &[String],
    context: Option<&MappingTable>,
    json: bool,
) -> Result<()> {
    let resolved = store.resolve_many(names, context);

    if json {
        let output = ResolveOutput {
            schema_version: OUTPUT_SCHEMA_VERSION,
            results: names
                .iter()
                .zip(resolved)
                .map(|(specifier, resolved)| ResolvedName {
                    // A rule may map a name onto itself; ask the trace.
                    mapped: store.explain(specifier, context).is_mapped(),
                    specifier,
                    resolved,
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
    } else {
        for (specifier, resolved) in names.iter().zip(&resolved) {
            println!("{specifier} -> {resolved}");
        }
    }

    Ok(())
}
