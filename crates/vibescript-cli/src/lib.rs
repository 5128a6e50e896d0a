#![forbid(unsafe_code)]

mod cli;
mod commands;

use std::path::PathBuf;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vibescript_adapters::discover_repo_root;
use vibescript_core::{AdapterError, ConfigFault, ManifestError};

pub use cli::{CheckArgs, Cli, Command, FormatArg, GuardArgs, ManifestCommand};

/// Process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    Violations = 1,
    ConfigFault = 2,
    Internal = 10,
}

impl ExitCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Violations => "violations",
            Self::ConfigFault => "config_fault",
            Self::Internal => "internal",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigFault),
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error(transparent)]
    Adapter(#[from] AdapterError),
    #[error("render report failed: {0}")]
    Render(#[from] serde_json::Error),
    #[error("{0}")]
    Policy(String),
}

impl CliError {
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Config(_) | Self::Policy(_) => ExitCode::ConfigFault,
            Self::Manifest(ManifestError::Adapter(_)) => ExitCode::Internal,
            Self::Manifest(_) => ExitCode::ConfigFault,
            Self::Adapter(_) | Self::Render(_) => ExitCode::Internal,
        }
    }
}

pub fn init_tracing(verbose: u8, json: bool) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
    if let Err(err) = result {
        eprintln!("tracing already initialized: {err}");
    }
}

fn resolve_repo_root(explicit: Option<PathBuf>) -> Result<PathBuf, CliError> {
    if let Some(root) = explicit {
        return Ok(root);
    }
    let cwd = std::env::current_dir().map_err(|err| AdapterError::Io {
        op: "current_dir",
        path: PathBuf::from("."),
        detail: err.to_string(),
    })?;
    Ok(discover_repo_root(&cwd).unwrap_or_else(|err| {
        tracing::debug!("falling back to working directory: {err}");
        cwd
    }))
}

pub fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let repo_root = resolve_repo_root(cli.repo_root)?;
    tracing::debug!(repo_root = %repo_root.display(), "resolved repository root");
    match cli.command {
        Command::Check(args) => commands::check(&repo_root, &args),
        Command::Guard(args) => commands::check(
            &repo_root,
            &CheckArgs {
                base: args.base,
                guard_only: true,
                checker_only: false,
                format: args.format,
            },
        ),
        Command::Manifest { command } => match command {
            ManifestCommand::List => commands::manifest_list(&repo_root),
            ManifestCommand::New { title } => commands::manifest_new(&repo_root, &title),
        },
        Command::Doctor => commands::doctor(&repo_root),
        Command::Config => commands::config(&repo_root),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn faults_map_to_distinct_exit_codes() {
        let fault = CliError::from(ConfigFault::Missing {
            path: Path::new(".vibe/ownership.json").to_path_buf(),
        });
        assert_eq!(fault.exit_code(), ExitCode::ConfigFault);

        let git = CliError::from(AdapterError::Git {
            detail: "not a repository".to_string(),
        });
        assert_eq!(git.exit_code(), ExitCode::Internal);

        assert_eq!(
            CliError::from(ManifestError::TemplateMissing).exit_code(),
            ExitCode::ConfigFault
        );
        assert_eq!(ExitCode::Internal as u8, 10);
        assert_eq!(ExitCode::Violations.as_str(), "violations");
    }
}
