use miette::{IntoDiagnostic, Result};
use modmap_core::{ConfigSnapshot, ConfigStore};

pub fn run(store: &ConfigStore, json: bool) -> Result<()> {
    let snapshot = store.snapshot();

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot).into_diagnostic()?);
    } else {
        print_human(&snapshot);
    }

    Ok(())
}

fn print_human(snapshot: &ConfigSnapshot) {
    let opts = &snapshot.options;
    println!("## Options");
    println!("  explainResolutions: {}", opts.explain_resolutions);
    println!("  waitTimeout:        {} ms", opts.wait_timeout);
    println!("  basePath:           {:?}", opts.base_path);
    println!("  combine:            {}", opts.combine);
    println!("  url:                {:?}", opts.url);
    println!("  urlMaxLength:       {}", opts.url_max_length);
    match &opts.default_url_params {
        Some(params) => println!(
            "  defaultURLParams:   {}",
            serde_json::Value::Object(params.clone())
        ),
        None => println!("  defaultURLParams:   (none)"),
    }
    println!();

    println!("## Maps");
    for (alias, entry) in snapshot.maps.iter() {
        let exact = if entry.is_exact() { " (exact)" } else { "" };
        println!("  {alias} -> {}{exact}", entry.value());
    }
    if snapshot.wildcard {
        println!("  * -> (handler)");
    }
    println!();

    println!("## Paths");
    for (name, path) in &snapshot.paths {
        println!("  {name} -> {path}");
    }
    println!();

    println!("## Modules");
    for name in &snapshot.modules {
        println!("  {name}");
    }
}
