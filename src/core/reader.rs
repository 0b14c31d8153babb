//! Line reader
//!
//! Splits a byte stream into lines without decoding it. A line keeps its
//! `\n` terminator; a final line without one is returned as-is.

use std::io::{self, BufRead};

/// Line terminator byte
pub const LINE_TERMINATOR: u8 = b'\n';

pub struct LineReader<R> {
    inner: R,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Read the next line into `buf`, replacing its previous contents.
    ///
    /// Returns `Ok(None)` at a clean end of stream. An I/O error is
    /// returned even when part of a line was already buffered; those bytes
    /// are discarded.
    pub fn read_line<'b>(&mut self, buf: &'b mut Vec<u8>) -> io::Result<Option<&'b [u8]>> {
        buf.clear();
        match self.inner.read_until(LINE_TERMINATOR, buf) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(buf.as_slice())),
            Err(e) => {
                buf.clear();
                Err(e)
            }
        }
    }
}
