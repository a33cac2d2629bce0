use clap::Parser;
use std::process::ExitCode;

use tsguard_cli::args::CliArgs;
use tsguard_cli::driver;
use tsguard_cli::tracing_config::init_tracing;

/// 0: conforms (or emitted), 1: value rejected, 2: usage, load or compile error.
#[allow(clippy::print_stderr)]
fn main() -> ExitCode {
    init_tracing();
    let args = CliArgs::parse();
    match driver::run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}
