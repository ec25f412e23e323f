use std::process::ExitCode;

fn main() -> ExitCode {
    mclauncher_lib::run()
}
