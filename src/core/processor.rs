//! Single-input processing
//!
//! Copies up to the line limit from one input to the output, then closes
//! the input if it was opened here.

use std::io::Write;
use tracing::{debug, trace};

use crate::core::error::HeadError;
use crate::core::model::Input;
use crate::core::reader::LineReader;
use crate::core::source::{InputStream, Opener};
use crate::core::writer::HeadWriter;

pub struct FileProcessor<W: Write> {
    out: HeadWriter<W>,
    /// Line buffer shared by every input of the run
    line: Vec<u8>,
    limit: u64,
}

impl<W: Write> FileProcessor<W> {
    pub fn new(out: W, limit: u64) -> Self {
        Self {
            out: HeadWriter::new(out),
            line: Vec::new(),
            limit,
        }
    }

    pub fn writer(&mut self) -> &mut HeadWriter<W> {
        &mut self.out
    }

    /// Process one input, returning every failure in the order it happened.
    ///
    /// A file that was opened is closed whatever happened while copying, so
    /// a copy failure may be followed by a close failure.
    pub fn process(&mut self, opener: &mut dyn Opener, input: &Input) -> Vec<HeadError> {
        let name = input.name();
        let mut errors = Vec::new();

        match input {
            Input::Stdin { .. } => {
                let mut stream = opener.stdin();
                if let Err(e) = self.copy_lines(stream.as_mut(), &name) {
                    errors.push(e);
                }
            }
            Input::Path(path) => {
                let mut stream = match opener.open(path) {
                    Ok(stream) => stream,
                    Err(source) => {
                        errors.push(HeadError::Open {
                            path: path.clone(),
                            source,
                        });
                        return errors;
                    }
                };
                if let Err(e) = self.copy_lines(stream.as_mut(), &name) {
                    errors.push(e);
                }
                if let Err(source) = stream.close() {
                    errors.push(HeadError::Close {
                        path: path.clone(),
                        source,
                    });
                }
            }
        }

        errors
    }

    /// Copy at most `limit` lines from `stream` to the output
    fn copy_lines(&mut self, stream: &mut dyn InputStream, name: &str) -> Result<(), HeadError> {
        let mut reader = LineReader::new(&mut *stream);
        let mut copied: u64 = 0;

        while copied < self.limit {
            let line = match reader.read_line(&mut self.line) {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(source) => {
                    return Err(HeadError::Read {
                        name: name.to_string(),
                        source,
                    })
                }
            };
            trace!(input = name, bytes = line.len(), "line");
            self.out.write_line(line).map_err(|source| HeadError::Write {
                name: name.to_string(),
                source,
            })?;
            copied += 1;
        }

        stream.take_error().map_err(|source| HeadError::Read {
            name: name.to_string(),
            source,
        })?;
        self.out.flush().map_err(|source| HeadError::Write {
            name: name.to_string(),
            source,
        })?;

        debug!(input = name, lines = copied, "input done");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use proptest::prelude::*;
    use std::collections::HashMap;
    use std::io::{self, BufRead, Cursor, Read};
    use std::path::{Path, PathBuf};

    /// Where a scripted stream should fail
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct Faults {
        pub open: bool,
        /// Fail the read after this many successful reads
        pub read_after: Option<usize>,
        pub deferred: bool,
        pub close: bool,
    }

    /// In-memory stream with injectable failures
    pub struct ScriptedStream {
        data: Cursor<Vec<u8>>,
        faults: Faults,
        reads: usize,
    }

    impl ScriptedStream {
        pub fn new(data: &[u8], faults: Faults) -> Self {
            Self {
                data: Cursor::new(data.to_vec()),
                faults,
                reads: 0,
            }
        }
    }

    impl Read for ScriptedStream {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.fill_buf()?.len().min(buf.len());
            buf[..n].copy_from_slice(&self.data.fill_buf()?[..n]);
            self.consume(n);
            Ok(n)
        }
    }

    impl BufRead for ScriptedStream {
        fn fill_buf(&mut self) -> io::Result<&[u8]> {
            if self.faults.read_after == Some(self.reads) {
                return Err(io::Error::other("injected read failure"));
            }
            self.data.fill_buf()
        }

        fn consume(&mut self, amt: usize) {
            // One line per read_until call: count a read at each terminator
            let consumed = &self.data.get_ref()[self.data.position() as usize..][..amt];
            if consumed.ends_with(b"\n") {
                self.reads += 1;
            }
            self.data.consume(amt)
        }
    }

    impl InputStream for ScriptedStream {
        fn take_error(&mut self) -> io::Result<()> {
            if self.faults.deferred {
                Err(io::Error::other("injected error indicator"))
            } else {
                Ok(())
            }
        }

        fn close(self: Box<Self>) -> io::Result<()> {
            if self.faults.close {
                Err(io::Error::other("injected close failure"))
            } else {
                Ok(())
            }
        }
    }

    /// Opener backed by a map of path -> (content, faults)
    #[derive(Default)]
    pub struct ScriptedOpener {
        pub files: HashMap<PathBuf, (Vec<u8>, Faults)>,
        pub stdin: Vec<u8>,
        pub stdin_faults: Faults,
        pub opened: Vec<PathBuf>,
    }

    impl ScriptedOpener {
        pub fn with_file(mut self, path: &str, data: &[u8], faults: Faults) -> Self {
            self.files
                .insert(PathBuf::from(path), (data.to_vec(), faults));
            self
        }

        pub fn with_stdin(mut self, data: &[u8]) -> Self {
            self.stdin = data.to_vec();
            self
        }
    }

    impl Opener for ScriptedOpener {
        fn open(&mut self, path: &Path) -> io::Result<Box<dyn InputStream>> {
            match self.files.get(path) {
                Some((_, faults)) if faults.open => {
                    Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"))
                }
                Some((data, faults)) => {
                    self.opened.push(path.to_path_buf());
                    Ok(Box::new(ScriptedStream::new(data, *faults)))
                }
                None => Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    "No such file or directory",
                )),
            }
        }

        fn stdin(&mut self) -> Box<dyn InputStream> {
            let data = std::mem::take(&mut self.stdin);
            Box::new(ScriptedStream::new(&data, self.stdin_faults))
        }
    }

    fn run_one(opener: &mut ScriptedOpener, input: Input, limit: u64) -> (Vec<u8>, Vec<ErrorKind>) {
        let mut out = Vec::new();
        let errors = {
            let mut processor = FileProcessor::new(&mut out, limit);
            processor.process(opener, &input)
        };
        (out, errors.iter().map(HeadError::kind).collect())
    }

    fn path(p: &str) -> Input {
        Input::Path(PathBuf::from(p))
    }

    #[test]
    fn test_fewer_lines_than_limit() {
        let mut opener = ScriptedOpener::default().with_file("a", b"a\nb\nc\n", Faults::default());
        let (out, errors) = run_one(&mut opener, path("a"), 10);
        assert_eq!(out, b"a\nb\nc\n");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_stops_at_limit() {
        let mut opener =
            ScriptedOpener::default().with_file("a", b"1\n2\n3\n4\n5\n", Faults::default());
        let (out, errors) = run_one(&mut opener, path("a"), 2);
        assert_eq!(out, b"1\n2\n");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_zero_limit_reads_nothing() {
        let faults = Faults {
            read_after: Some(0),
            ..Faults::default()
        };
        let mut opener = ScriptedOpener::default().with_file("a", b"1\n2\n", faults);
        let (out, errors) = run_one(&mut opener, path("a"), 0);
        assert!(out.is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_unterminated_last_line() {
        let mut opener = ScriptedOpener::default().with_file("a", b"x\nlast", Faults::default());
        let (out, errors) = run_one(&mut opener, path("a"), 10);
        assert_eq!(out, b"x\nlast");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_stdin_is_read_without_open() {
        let mut opener = ScriptedOpener::default().with_stdin(b"1\n2\n3\n4\n5\n");
        let (out, errors) = run_one(&mut opener, Input::implicit_stdin(), 10);
        assert_eq!(out, b"1\n2\n3\n4\n5\n");
        assert!(errors.is_empty());
        assert!(opener.opened.is_empty());
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let mut opener = ScriptedOpener::default();
        let (out, errors) = run_one(&mut opener, path("/noexist.txt"), 10);
        assert!(out.is_empty());
        assert_eq!(errors, vec![ErrorKind::OpenError]);
    }

    #[test]
    fn test_unreadable_file_is_open_error() {
        let faults = Faults {
            open: true,
            ..Faults::default()
        };
        let mut opener = ScriptedOpener::default().with_file("a", b"1\n", faults);
        let (_, errors) = run_one(&mut opener, path("a"), 10);
        assert_eq!(errors, vec![ErrorKind::OpenError]);
    }

    #[test]
    fn test_read_failure_keeps_earlier_lines() {
        let faults = Faults {
            read_after: Some(2),
            ..Faults::default()
        };
        let mut opener = ScriptedOpener::default().with_file("a", b"1\n2\n3\n4\n", faults);
        let (out, errors) = run_one(&mut opener, path("a"), 10);
        assert_eq!(out, b"1\n2\n");
        assert_eq!(errors, vec![ErrorKind::ReadError]);
    }

    #[test]
    fn test_read_failure_on_stdin() {
        let mut opener = ScriptedOpener::default().with_stdin(b"1\n");
        opener.stdin_faults = Faults {
            read_after: Some(0),
            ..Faults::default()
        };
        let (out, errors) = run_one(&mut opener, Input::implicit_stdin(), 10);
        assert!(out.is_empty());
        assert_eq!(errors, vec![ErrorKind::ReadError]);
    }

    #[test]
    fn test_deferred_error_reported_after_clean_loop() {
        let faults = Faults {
            deferred: true,
            ..Faults::default()
        };
        let mut opener = ScriptedOpener::default().with_file("a", b"1\n2\n", faults);
        let (out, errors) = run_one(&mut opener, path("a"), 1);
        assert_eq!(out, b"1\n");
        assert_eq!(errors, vec![ErrorKind::ReadError]);
    }

    #[test]
    fn test_close_runs_after_read_failure() {
        let faults = Faults {
            read_after: Some(0),
            close: true,
            ..Faults::default()
        };
        let mut opener = ScriptedOpener::default().with_file("a", b"1\n", faults);
        let (_, errors) = run_one(&mut opener, path("a"), 10);
        assert_eq!(errors, vec![ErrorKind::ReadError, ErrorKind::CloseError]);
    }

    #[test]
    fn test_close_failure_after_full_copy() {
        let faults = Faults {
            close: true,
            ..Faults::default()
        };
        let mut opener = ScriptedOpener::default().with_file("a", b"1\n", faults);
        let (out, errors) = run_one(&mut opener, path("a"), 10);
        assert_eq!(out, b"1\n");
        assert_eq!(errors, vec![ErrorKind::CloseError]);
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_stops_input() {
        let mut opener = ScriptedOpener::default().with_file("a", b"1\n2\n", Faults::default());
        let mut processor = FileProcessor::new(FailingWriter, 10);
        let errors = processor.process(&mut opener, &path("a"));
        let kinds: Vec<_> = errors.iter().map(HeadError::kind).collect();
        assert_eq!(kinds, vec![ErrorKind::WriteError]);
        assert_eq!(errors[0].to_string(), "write: a: broken pipe");
    }

    proptest! {
        #[test]
        fn prop_output_is_prefix_of_limit_lines(
            lines in proptest::collection::vec("[a-z ]{0,8}", 0..20),
            trailing_newline in any::<bool>(),
            limit in 0u64..25,
        ) {
            let mut data = lines.join("\n");
            if trailing_newline && !lines.is_empty() {
                data.push('\n');
            }
            let mut opener = ScriptedOpener::default().with_file("f", data.as_bytes(), Faults::default());
            let (out, errors) = run_one(&mut opener, path("f"), limit);
            prop_assert!(errors.is_empty());

            let expected: Vec<u8> = data
                .as_bytes()
                .split_inclusive(|b| *b == b'\n')
                .take(limit as usize)
                .flatten()
                .copied()
                .collect();
            prop_assert_eq!(out, expected);
        }
    }
}
