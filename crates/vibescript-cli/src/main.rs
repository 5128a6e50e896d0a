#![forbid(unsafe_code)]

use std::process::ExitCode as ProcessExitCode;

use clap::Parser;
use vibescript_cli::{init_tracing, run, Cli};

fn main() -> ProcessExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);
    match run(cli) {
        Ok(code) => ProcessExitCode::from(code as u8),
        Err(err) => {
            eprintln!("vibescript: {err}");
            ProcessExitCode::from(err.exit_code() as u8)
        }
    }
}
