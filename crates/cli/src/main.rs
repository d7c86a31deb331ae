//! CLI entry point for the peer bootstrap.

use clap::Parser;
use peer_cli::{exit_code, CliConfig};
use peercore::listener::FATAL_EXIT_CODE;
use std::process::ExitCode;
use tracing::error;

fn main() -> ExitCode {
    let config = CliConfig::parse();
    config.init_logging();

    match config.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = exit_code(&err);
            if code == FATAL_EXIT_CODE {
                error!("aborting peer bootstrap: {:#}", err);
            }
            eprintln!("Error: {:#}", err);
            ExitCode::from(code)
        }
    }
}
