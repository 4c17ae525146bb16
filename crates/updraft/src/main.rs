//! Updraft CLI - Keep a checkout current, then launch its scheduler.

use std::process::ExitCode;

use clap::Parser;

mod cli;
mod commands;
mod logging;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    match cli.run() {
        Ok(code) => code,
        Err(e) => {
            if tracing::dispatcher::has_been_set() {
                tracing::error!("{e:#}");
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}
