use std::process::ExitCode;

fn main() -> ExitCode {
    match rollfinder::app::run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
