//! CLI module - Command-line interface definition and entry point

use clap::{ArgAction, CommandFactory, FromArgMatches, Parser};
use std::ffi::OsString;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::core::error::{HeadError, LineCountError};
use crate::core::model::{Input, RunConfig, DEFAULT_LINE_LIMIT};
use crate::core::runner::{self, PROGRAM};
use crate::core::source::OsOpener;

/// rhead - print the first lines of each input.
#[derive(Parser, Debug)]
#[command(name = "rhead")]
// `-n` is the only option; help and version flags would be extra ones.
#[command(about, disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Number of lines to print from each input (default 10).
    ///
    /// Kept as raw text so that every occurrence can be checked and
    /// reported; `-n -1` is a bad count, not an unknown option.
    #[arg(
        short = 'n',
        value_name = "COUNT",
        action = ArgAction::Append,
        allow_hyphen_values = true
    )]
    pub lines: Vec<String>,

    /// Files to read; '-' is standard input.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

impl Cli {
    /// Validate every `-n` value; the last one wins
    pub fn into_config(self) -> Result<RunConfig, Vec<HeadError>> {
        let errors = self.line_count_errors();
        if !errors.is_empty() {
            return Err(errors);
        }

        let line_limit = self
            .lines
            .last()
            .map(|value| parse_line_count(value))
            .transpose()
            .map_err(|e| vec![e.into()])?
            .unwrap_or(DEFAULT_LINE_LIMIT);

        Ok(RunConfig {
            line_limit,
            inputs: self.files.into_iter().map(Input::from_operand).collect(),
        })
    }

    fn line_count_errors(&self) -> Vec<HeadError> {
        self.lines
            .iter()
            .filter_map(|value| parse_line_count(value).err())
            .map(HeadError::from)
            .collect()
    }
}

/// Parse the `-n` value: ASCII digits only, fitting in `u64`
pub fn parse_line_count(s: &str) -> Result<u64, LineCountError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LineCountError::NotANumber(s.to_string()));
    }
    s.parse::<u64>()
        .map_err(|_| LineCountError::OutOfRange(s.to_string()))
}

/// Parse a full argument vector (program name first) into a run configuration.
///
/// Every problem found is returned, in argument order where possible: bad
/// `-n` values first, then the usage error that stopped clap.
pub fn parse_config<I, T>(args: I) -> Result<RunConfig, Vec<HeadError>>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

    match Cli::try_parse_from(args.iter().cloned()) {
        Ok(cli) => cli.into_config(),
        Err(err) => {
            // clap stops at the first structural error; re-parse leniently to
            // recover the `-n` values it had already accepted.
            let mut errors = Cli::command()
                .ignore_errors(true)
                .try_get_matches_from(args.iter().cloned())
                .ok()
                .and_then(|matches| Cli::from_arg_matches(&matches).ok())
                .map(|cli| cli.line_count_errors())
                .unwrap_or_default();
            errors.push(usage_error(err));
            Err(errors)
        }
    }
}

fn usage_error(err: clap::Error) -> HeadError {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    HeadError::Usage(first.trim_start_matches("error: ").to_string())
}

/// Run the CLI against the process's real stdin, stdout and stderr
pub fn run<I, T>(args: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let config = match parse_config(args) {
        Ok(config) => config,
        Err(errors) => {
            for e in errors {
                tracing::debug!(error = %e, "argument parsing failed");
                eprintln!("{}: {}", PROGRAM, e);
            }
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    let out = BufWriter::new(stdout.lock());
    let stderr = io::stderr();
    let mut opener = OsOpener;

    runner::run(&config, &mut opener, out, stderr.lock()).exit_code()
}
