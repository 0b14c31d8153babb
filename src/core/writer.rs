//! Output writer
//!
//! Everything written to standard output goes through [`HeadWriter`]:
//! copied lines, banners and the blank separator between inputs.

use std::borrow::Cow;
use std::ffi::OsStr;
use std::io::{self, Write};

pub struct HeadWriter<W: Write> {
    inner: W,
}

impl<W: Write> HeadWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Write a line's raw bytes.
    ///
    /// Fails unless every byte was accepted. A sink that stops accepting
    /// bytes partway through is reported as [`io::ErrorKind::WriteZero`];
    /// there is no partial success.
    pub fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        self.inner.write_all(line)
    }

    /// Blank line printed before every banner except the first
    pub fn write_separator(&mut self) -> io::Result<()> {
        self.inner.write_all(b"\n")
    }

    /// `==> name <==` header line, with `name` written byte for byte
    pub fn write_banner(&mut self, name: &OsStr) -> io::Result<()> {
        let name = name_bytes(name);
        let mut banner = Vec::with_capacity(name.len() + 9);
        banner.extend_from_slice(b"==> ");
        banner.extend_from_slice(&name);
        banner.extend_from_slice(b" <==\n");
        self.inner.write_all(&banner)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    #[cfg(test)]
    pub fn get_ref(&self) -> &W {
        &self.inner
    }
}

#[cfg(unix)]
fn name_bytes(name: &OsStr) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(name.as_bytes())
}

// Only unix exposes the raw bytes of an OsStr
#[cfg(not(unix))]
fn name_bytes(name: &OsStr) -> Cow<'_, [u8]> {
    match name.to_string_lossy() {
        Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
        Cow::Owned(s) => Cow::Owned(s.into_bytes()),
    }
}
