//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// gnome-layout - Save, list and restore GNOME Shell extension layouts
#[derive(Parser, Debug)]
#[command(name = "gnome-layout")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Directory holding layout files (overrides configuration)
    #[arg(long, global = true, value_name = "DIR")]
    pub layouts_dir: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List saved layouts
    List(ListArgs),

    /// Show the extensions of a layout
    Show(ShowArgs),

    /// Show the extensions currently installed
    Status(StatusArgs),

    /// Save the current extension state as a new layout
    Add(AddArgs),

    /// Replace a layout with the current extension state
    Overwrite(OverwriteArgs),

    /// Delete a layout
    Remove(RemoveArgs),

    /// Install, enable and disable extensions to match a layout
    Apply(ApplyArgs),

    /// Show version information
    Version(VersionArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Layout name
    pub name: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Layout name
    pub name: String,
}

#[derive(Args, Debug)]
pub struct OverwriteArgs {
    /// Layout name
    pub name: String,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Layout name
    pub name: String,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Layout name
    pub name: String,

    /// Skip confirmation prompts
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Show what would change without touching the system
    #[arg(long)]
    pub dry_run: bool,

    /// Do not restore shell settings saved with the layout
    #[arg(long)]
    pub no_settings: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
