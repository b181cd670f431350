//! Storefront CLI

use std::{io, process::ExitCode};

use clap::Parser;
use tracing::error;

mod cli;

use cli::{Cli, logging::init_subscriber};

fn main() -> ExitCode {
    _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(err) = init_subscriber(&cli.logging) {
        report_without_subscriber(&err);

        return ExitCode::FAILURE;
    }

    match cli::run(cli, &mut io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "command failed");

            ExitCode::FAILURE
        }
    }
}

#[expect(clippy::print_stderr, reason = "no subscriber to report through")]
fn report_without_subscriber(err: &impl std::fmt::Display) {
    eprintln!("failed to initialise logging: {err}");
}
