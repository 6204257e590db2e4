pub mod cli;
pub mod commands;
pub mod utils;

use clap::Parser;
use cli::Obsnippets;
use commands::handle_command;
use std::process;
use utils::init_logging;

/// Run the obsnippets CLI application
pub fn run_main() {
    let args = Obsnippets::parse();

    // A missing log file is no reason to refuse to run
    if let Err(e) = init_logging() {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let result = handle_command(args.db.as_deref(), args.commands);

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
