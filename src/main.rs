//! rhead - print the first lines of files or standard input
//!
//! rhead provides:
//! - `-n COUNT` line limit (default 10)
//! - `==> name <==` banners when several inputs are given
//! - Failure on one input never stops the others; the exit status reports
//!   whether anything failed

use std::process::ExitCode;

mod cli;
mod core;
mod logging;

fn main() -> ExitCode {
    if let Err(e) = logging::init() {
        eprintln!("{}: {:#}", core::runner::PROGRAM, e);
    }

    cli::run(std::env::args_os())
}
