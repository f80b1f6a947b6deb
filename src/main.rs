//! Main entry point for the codesplit CLI app

use codesplit::cli_runner::{self, RunOutcome};

fn main() -> std::process::ExitCode {
    match cli_runner::run_cli_app() {
        Ok(RunOutcome::Clean) => std::process::ExitCode::SUCCESS,
        Ok(RunOutcome::Rejected) => std::process::ExitCode::from(2),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::ExitCode::FAILURE
        }
    }
}
