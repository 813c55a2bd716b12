mod cli;
mod commands;
mod config;

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    match commands::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!(target: catalog_logging::ERROR_TARGET, "{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
