use std::process::ExitCode;

fn main() -> ExitCode {
    match connector_gen::cli::run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
