//! Focus CLI - Local-first productivity tracking

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = focus_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
