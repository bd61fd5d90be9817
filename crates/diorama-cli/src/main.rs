//! Diorama CLI entry point.

use std::{io::Write, process::ExitCode, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, info};

use diorama_cli::{Args, ErrorAdapter, error_adapter::render_report};

fn main() -> ExitCode {
    miette::set_panic_hook();

    let args = Args::parse();
    init_logging(&args.log_level);
    debug!(args:?; "Parsed arguments");

    match diorama_cli::run(&args) {
        Ok(()) => {
            info!("Completed successfully");
            ExitCode::SUCCESS
        }
        Err(err) => {
            // Written directly so the report survives `--log-level off`
            let report = render_report(&ErrorAdapter(err));
            let _ = writeln!(std::io::stderr().lock(), "{report}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; stdout carries only the JSON result.
fn init_logging(requested: &str) {
    let level = LevelFilter::from_str(requested).unwrap_or_else(|_| {
        eprintln!("Unknown log level '{requested}', falling back to 'warn'");
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(level)
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .init();

    info!(level:?; "Diorama starting");
}
