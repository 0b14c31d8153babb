//! Input capabilities
//!
//! The processor never touches the filesystem or stdin directly. It asks an
//! [`Opener`] for [`InputStream`]s, which lets tests substitute scripted
//! streams that fail on open, read or close.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, StdinLock};
use std::path::Path;

/// A readable input owned by the processor for the duration of one input
pub trait InputStream: BufRead {
    /// Report an error the stream recorded but did not return from a read.
    ///
    /// Queried once after the read loop finishes without error.
    fn take_error(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Release the stream. Called exactly once for every opened file.
    fn close(self: Box<Self>) -> io::Result<()> {
        Ok(())
    }
}

/// Source of input streams
pub trait Opener {
    /// Open a named file for reading
    fn open(&mut self, path: &Path) -> io::Result<Box<dyn InputStream>>;

    /// Standard input; always available
    fn stdin(&mut self) -> Box<dyn InputStream>;
}

/// Opens real files and the process's standard input
#[derive(Debug, Default)]
pub struct OsOpener;

impl Opener for OsOpener {
    fn open(&mut self, path: &Path) -> io::Result<Box<dyn InputStream>> {
        let file = File::open(path)?;
        Ok(Box::new(FileStream {
            reader: BufReader::new(file),
        }))
    }

    fn stdin(&mut self) -> Box<dyn InputStream> {
        Box::new(StdinStream {
            reader: io::stdin().lock(),
        })
    }
}

struct FileStream {
    reader: BufReader<File>,
}

impl Read for FileStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl BufRead for FileStream {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.reader.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.reader.consume(amt)
    }
}

// std closes the descriptor on drop and discards the result of close(2);
// a read-only descriptor has nothing left to flush, so dropping is the close.
impl InputStream for FileStream {}

struct StdinStream {
    reader: StdinLock<'static>,
}

impl Read for StdinStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl BufRead for StdinStream {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.reader.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.reader.consume(amt)
    }
}

impl InputStream for StdinStream {}
