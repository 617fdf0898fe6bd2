use std::process::ExitCode;

fn main() -> ExitCode {
    wellora_cli::run()
}
