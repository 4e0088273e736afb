use std::process::ExitCode;

fn main() -> ExitCode {
    leadbot_cli::run()
}
