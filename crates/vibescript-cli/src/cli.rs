use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "vibescript", version)]
#[command(about = "Ownership and change-directive governance for AI-assisted code changes")]
pub struct Cli {
    /// Repository root; defaults to the nearest ancestor holding `.git` or `.vibe`.
    #[arg(long, global = true, value_name = "PATH")]
    pub repo_root: Option<PathBuf>,
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,
    #[arg(long, global = true, env = "VIBE_LOG_JSON", default_value_t = false)]
    pub log_json: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the guard and the directive checker against the change set.
    Check(CheckArgs),
    /// Run only the ownership guard.
    Guard(GuardArgs),
    Manifest {
        #[command(subcommand)]
        command: ManifestCommand,
    },
    /// Diagnose the governance folder.
    Doctor,
    /// Print the ownership configuration in canonical form.
    Config,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    #[arg(long, env = "VIBE_BASE_REF", value_name = "REF")]
    pub base: Option<String>,
    #[arg(long, conflicts_with = "checker_only")]
    pub guard_only: bool,
    #[arg(long)]
    pub checker_only: bool,
    #[arg(long, value_enum, default_value_t = FormatArg::Text)]
    pub format: FormatArg,
}

#[derive(Debug, Args)]
pub struct GuardArgs {
    #[arg(long, env = "VIBE_BASE_REF", value_name = "REF")]
    pub base: Option<String>,
    #[arg(long, value_enum, default_value_t = FormatArg::Text)]
    pub format: FormatArg,
}

#[derive(Debug, Subcommand)]
pub enum ManifestCommand {
    /// Show every manifest with its validation status.
    List,
    /// Create a manifest from the template.
    New {
        /// Short description of the change; slugified for the file name.
        title: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Text,
    Json,
}
