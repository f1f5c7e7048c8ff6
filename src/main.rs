//! Pedigree CLI - Local-first horse pedigree manager

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = pedigree_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
