//! `ipynb_api` CLI entrypoint for exporting a notebook to Markdown.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use ipynb_api::NotebookError;
use ipynb_api::telemetry::{self, LoggingConfig};

mod cli;

use cli::Invocation;

fn main() -> ExitCode {
    let invocation = Invocation::parse();

    match run(&invocation) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if cli::output::write_error(&mut io::stderr().lock(), &error).is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

fn run(invocation: &Invocation) -> Result<(), NotebookError> {
    telemetry::init_logging(&LoggingConfig::from_env())?;
    tracing::info!(?invocation, "parsed arguments");

    let outcome = cli::driver::run(invocation)?;
    cli::output::write_success(&mut io::stdout().lock(), &outcome)
}
