use miette::{IntoDiagnostic, Result};
use modmap_core::version::OUTPUT_SCHEMA_VERSION;
use modmap_core::{ConfigStore, MappingTable, Resolution};
use serde::Serialize;

/// JSON output for `modmap explain`.
#[derive(Serialize)]
struct ExplainOutput<'a> {
    schema_version: u32,
    mapped: bool,
    /// Whether the resolved name is a registered module.
    registered: bool,
    #[serde(flatten)]
    resolution: &'a Resolution,
}

pub fn run(
    store: &ConfigStore,
    name: &str,
    context: Option<&MappingTable>,
    json: bool,
) -> Result<()> {
    let resolution = store.explain(name, context);
    let registered = store.registry().contains(&resolution.resolved);

    if json {
        let output = ExplainOutput {
            schema_version: OUTPUT_SCHEMA_VERSION,
            mapped: resolution.is_mapped(),
            registered,
            resolution: &resolution,
        };
        println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
    } else {
        print_human(&resolution, registered);
    }

    Ok(())
}

fn print_human(resolution: &Resolution, registered: bool) {
    println!("Specifier: {}", resolution.specifier);
    println!("Resolved: {}", resolution.resolved);
    println!("Registered: {}", if registered { "yes" } else { "no" });
    println!();

    println!("Resolution trace:");
    for (i, step) in resolution.trace.steps.iter().enumerate() {
        let status = if step.ok { "HIT" } else { "MISS" };
        println!("  {}. [{}] {}: {}", i + 1, status, step.step, step.detail);

        if let Some(table) = step.table {
            println!("      table: {table}");
        }
        if let Some(ref key) = step.key {
            println!("      key: {key}");
        }
        if let Some(ref target) = step.target {
            println!("      target: {target}");
        }
        for note in &step.notes {
            println!("      note: {note}");
        }
    }

    if !resolution.trace.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &resolution.trace.warnings {
            println!("  [{}] {}", warning.code, warning.message);
        }
    }
}
