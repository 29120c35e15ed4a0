mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;

use crate::cli::Cli;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let code = match commands::run(cli) {
        Ok(status) => commands::exit_status(status),
        Err(err) => {
            eprintln!("error: {err:#}");
            commands::FATAL_EXIT_STATUS
        }
    };
    ExitCode::from(code)
}
