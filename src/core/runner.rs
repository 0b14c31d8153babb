//! Multi-input runner
//!
//! Walks the input list in order, printing banners when more than one input
//! was named. A failure only marks the run as failed; every input is still
//! attempted.

use std::io::Write;
use tracing::{debug, warn};

use crate::core::error::HeadError;
use crate::core::model::{Input, RunConfig, RunState};
use crate::core::processor::FileProcessor;
use crate::core::source::Opener;

/// Program name used to prefix diagnostics
pub const PROGRAM: &str = env!("CARGO_PKG_NAME");

pub struct Runner<'a, W: Write, E: Write> {
    opener: &'a mut dyn Opener,
    processor: FileProcessor<W>,
    diag: E,
    state: RunState,
}

impl<'a, W: Write, E: Write> Runner<'a, W, E> {
    pub fn new(opener: &'a mut dyn Opener, out: W, diag: E, line_limit: u64) -> Self {
        Self {
            opener,
            processor: FileProcessor::new(out, line_limit),
            diag,
            state: RunState::new(),
        }
    }

    pub fn run(mut self, config: &RunConfig) -> RunState {
        debug!(
            inputs = config.inputs.len(),
            line_limit = config.line_limit,
            "starting run"
        );

        if config.inputs.is_empty() {
            self.process(&Input::implicit_stdin());
        } else {
            let banners = config.wants_banners();
            for (index, input) in config.inputs.iter().enumerate() {
                if banners {
                    if let Err(e) = self.write_header(index, input) {
                        self.report(e);
                        continue;
                    }
                }
                self.process(input);
            }
        }

        // Banners of inputs that failed to open are still buffered
        if let Err(source) = self.processor.writer().flush() {
            self.report(HeadError::Write {
                name: "standard output".to_string(),
                source,
            });
        }

        self.state
    }

    fn write_header(&mut self, index: usize, input: &Input) -> Result<(), HeadError> {
        let out = self.processor.writer();
        if index > 0 {
            out.write_separator()
                .map_err(|source| HeadError::Separator { source })?;
        }
        out.write_banner(input.os_name())
            .map_err(|source| HeadError::Banner {
                name: input.name(),
                source,
            })
    }

    fn process(&mut self, input: &Input) {
        for e in self.processor.process(self.opener, input) {
            self.report(e);
        }
    }

    /// Print one diagnostic line and mark the run as failed
    fn report(&mut self, err: HeadError) {
        warn!(kind = ?err.kind(), "{}", err);
        self.state.mark_failed();
        // Nowhere left to report a failing diagnostic stream; the exit status
        // already records the failure.
        let _ = writeln!(self.diag, "{}: {}", PROGRAM, err);
    }
}

/// Convenience wrapper: run `config` against `opener`, writing to `out`
pub fn run<W: Write, E: Write>(
    config: &RunConfig,
    opener: &mut dyn Opener,
    out: W,
    diag: E,
) -> RunState {
    Runner::new(opener, out, diag, config.line_limit).run(config)
}
