use crate::util::Result;
use std::path::Path;

mod posix_env;

pub use posix_env::{MmapSource, PosixEnv, PosixLogger};

/// An Env is the interface used to reach operating system functionality
/// such as opening and mapping files. Callers may provide their own Env to
/// decode from something other than the local filesystem.
pub trait Env {
    /// The returned source is read-only for its whole life.
    fn new_byte_source(&self, fname: &Path) -> Result<Box<dyn ByteSource>>;
    fn new_logger(&self, fname: &Path) -> Result<Box<dyn Logger>>;
}

/// A read-only, random-access view over a flat run of bytes.
///
/// Reads never fail: a read that reaches past the end returns the bytes
/// that exist, and a read at or past the end returns an empty slice. A short
/// read is how callers detect end of data.
pub trait ByteSource {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns between 0 and `max_len` bytes starting at `offset`.
    fn read(&self, offset: usize, max_len: usize) -> &[u8];
}

impl ByteSource for [u8] {
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    fn read(&self, offset: usize, max_len: usize) -> &[u8] {
        let start = offset.min(<[u8]>::len(self));
        let end = start.saturating_add(max_len).min(<[u8]>::len(self));
        &self[start..end]
    }
}

impl ByteSource for Vec<u8> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn read(&self, offset: usize, max_len: usize) -> &[u8] {
        ByteSource::read(self.as_slice(), offset, max_len)
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &S {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn read(&self, offset: usize, max_len: usize) -> &[u8] {
        (**self).read(offset, max_len)
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn read(&self, offset: usize, max_len: usize) -> &[u8] {
        (**self).read(offset, max_len)
    }
}

pub trait Logger {
    fn log(&self, info: &str);
}
