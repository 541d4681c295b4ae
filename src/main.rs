//! The `minsh` binary: install logging, load the startup profile, then
//! hand standard input to the interactive loop.

use minsh::Interpreter;
use minsh::profile::PROFILE_FILE;
use std::io;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Diagnostics go to standard error and stay silent unless RUST_LOG
    // enables them; the prompt and command output own standard output.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();

    let mut shell = Interpreter::default();

    if let Err(err) = shell.load_profile(Path::new(PROFILE_FILE)) {
        eprintln!("minsh: {err}");
        return ExitCode::FAILURE;
    }

    if let Err(err) = shell.repl(io::stdin().lock()) {
        eprintln!("minsh: {err}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
