use clap::Parser;
use std::io::Write;
use std::process::ExitCode;
use tsr_cli::args::CliArgs;
use tsr_cli::driver;
use tsr_cli::tracing_config::init_tracing;

fn main() -> ExitCode {
    init_tracing();
    let args = CliArgs::parse();

    let mut stdout = std::io::stdout().lock();
    let mut stderr = std::io::stderr().lock();
    match driver::run(&args, &mut stdout, &mut stderr) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // The exit code carries the failure if stderr is gone.
            let _ = writeln!(stderr, "error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
