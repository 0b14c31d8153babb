//! Run model
//!
//! Plain data shared by the parser and the runner.

use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::ExitCode;

/// Default number of lines printed per input when `-n` is absent
pub const DEFAULT_LINE_LIMIT: u64 = 10;

/// Operand that stands for standard input
pub const STDIN_MARK: &str = "-";

/// One entry of the input list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Standard input, named by the operand that selected it
    Stdin { name: String },
    /// A file path, kept exactly as supplied
    Path(PathBuf),
}

impl Input {
    /// Classify a positional operand
    pub fn from_operand(path: PathBuf) -> Self {
        if path.as_os_str() == STDIN_MARK {
            Input::Stdin {
                name: STDIN_MARK.to_string(),
            }
        } else {
            Input::Path(path)
        }
    }

    /// Standard input selected implicitly (no operands at all)
    pub fn implicit_stdin() -> Self {
        Input::Stdin {
            name: "standard input".to_string(),
        }
    }

    /// Operand exactly as supplied, for banners
    pub fn os_name(&self) -> &OsStr {
        match self {
            Input::Stdin { name } => OsStr::new(name),
            Input::Path(path) => path.as_os_str(),
        }
    }

    /// Printable name for diagnostics
    pub fn name(&self) -> String {
        match self {
            Input::Stdin { name } => name.clone(),
            Input::Path(path) => path.display().to_string(),
        }
    }
}

/// Validated configuration for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Maximum number of lines copied from each input
    pub line_limit: u64,

    /// Inputs in command-line order; empty means standard input
    pub inputs: Vec<Input>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            line_limit: DEFAULT_LINE_LIMIT,
            inputs: Vec::new(),
        }
    }
}

impl RunConfig {
    /// Banners are printed only when more than one input was named
    pub fn wants_banners(&self) -> bool {
        self.inputs.len() > 1
    }
}

/// Aggregate outcome of a run. Once failed, always failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunState {
    failed: bool,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_failed(&mut self) {
        self.failed = true;
    }

    pub fn failed(&self) -> bool {
        self.failed
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.failed {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}
