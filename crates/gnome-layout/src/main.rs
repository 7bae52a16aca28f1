//! gnome-layout - Save and restore GNOME Shell extension layouts
//!
//! This is the main entry point for the gnome-layout command-line interface.

mod cli;
mod commands;
mod output;
pub mod utils;
mod version;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    // Version needs no configuration
    let config = || utils::load_config(cli.layouts_dir.as_deref());

    match cli.command {
        Commands::Version(args) => commands::version::run(args),
        Commands::List(args) => commands::layout::list(args, &config()?),
        Commands::Show(args) => commands::layout::show(args, &config()?),
        Commands::Add(args) => commands::layout::add(args, &config()?),
        Commands::Overwrite(args) => commands::layout::overwrite(args, &config()?),
        Commands::Remove(args) => commands::layout::remove(args, &config()?),
        Commands::Apply(args) => commands::apply::run(args, &config()?),
        Commands::Status(args) => commands::status::run(args, &config()?),
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            // User-facing output goes through `output`; logs stay quiet unless asked for
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
