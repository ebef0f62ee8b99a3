//! sw CLI - server-side component composition.
//!
//! Provides commands for:
//! - `compose`: Render registered components in a markup document
//! - `components`: List the components a configuration registers

mod commands;
mod error;
mod output;
mod renderers;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ComponentsArgs, ComposeArgs};
use error::CliError;
use output::Output;

/// Log filter used by `--verbose`.
const VERBOSE_FILTER: &str = "sw=debug,sw_compose=debug,sw_config=debug,sw_markup=info";

/// sw - compose server-rendered components into static markup.
#[derive(Parser)]
#[command(name = "sw", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose a markup document.
    Compose(ComposeArgs),
    /// List configured components.
    Components(ComponentsArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables DEBUG for the sw crates, otherwise use RUST_LOG or default to WARN
    let verbose = matches!(&cli.command, Commands::Compose(args) if args.verbose);
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Compose(args) => tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(CliError::from)
            .and_then(|rt| rt.block_on(args.execute())),
        Commands::Components(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
