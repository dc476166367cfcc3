#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::needless_pass_by_value)]

mod commands;
mod logging;

use clap::Parser;
use miette::Result;
use modmap_core::ConfigStore;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "modmap")]
#[command(author, version, about = "Inspect how a module loader config maps module names", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Loader configuration file (JSON)
    #[arg(long, short = 'c', global = true, value_name = "PATH", env = "MODMAP_CONFIG")]
    config: Option<PathBuf>,

    /// Report how each name was resolved (overrides the config's explainResolutions)
    #[arg(long, global = true)]
    explain_resolutions: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Resolve module names through the configured maps
    Resolve {
        /// Module names to resolve
        #[arg(required = true)]
        names: Vec<String>,

        /// Contextual map (JSON object, same shape as `maps`)
        #[arg(long, value_name = "PATH")]
        context: Option<PathBuf>,
    },

    /// Show step by step how a module name resolves
    Explain {
        /// Module name to explain
        name: String,

        /// Contextual map (JSON object, same shape as `maps`)
        #[arg(long, value_name = "PATH")]
        context: Option<PathBuf>,
    },

    /// Look up registered modules (all of them when no names are given)
    Modules {
        /// Module names to look up
        names: Vec<String>,
    },

    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Version handles its own output and needs neither logging nor config.
    if matches!(cli.command, Commands::Version) {
        return commands::version::run();
    }

    logging::init(cli.verbose, cli.json);

    let store = commands::load_store(cli.config.as_deref(), cli.explain_resolutions)?;
    dispatch(cli.command, &store, cli.json)
}

fn dispatch(command: Commands, store: &ConfigStore, json: bool) -> Result<()> {
    match command {
        Commands::Version => commands::version::run(),
        Commands::Resolve { names, context } => {
            let context = commands::load_context(context.as_deref())?;
            commands::resolve::run(store, &names, context.as_ref(), json)
        }
        Commands::Explain { name, context } => {
            let context = commands::load_context(context.as_deref())?;
            commands::explain::run(store, &name, context.as_ref(), json)
        }
        Commands::Modules { names } => commands::modules::run(store, &names, json),
        Commands::Config => commands::config::run(store, json),
    }
}
