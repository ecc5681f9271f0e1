use std::{
    cell::RefCell,
    fs::{File, OpenOptions},
    io::Write,
    path::Path,
    thread,
};

use chrono::Local;
use memmap2::Mmap;

use super::{ByteSource, Env, Logger};
use crate::util::{Error, Result};

pub struct PosixEnv {}

impl Env for PosixEnv {
    fn new_byte_source(&self, fname: &Path) -> Result<Box<dyn ByteSource>> {
        Ok(Box::new(MmapSource::open(fname)?))
    }

    fn new_logger(&self, fname: &Path) -> Result<Box<dyn Logger>> {
        match OpenOptions::new().create(true).append(true).open(fname) {
            Ok(file) => Ok(Box::new(PosixLogger::new(file))),
            Err(error) => Err(Error::from_io(fname, error)),
        }
    }
}

/// Read-only memory map over a whole file.
///
/// The file handle and the mapping are owned together and released together
/// when the source is dropped. A zero-length file is never mapped.
pub struct MmapSource {
    mmap: Option<Mmap>,
    // Held so the handle lives exactly as long as the mapping.
    _file: File,
}

impl MmapSource {
    pub fn open(fname: &Path) -> Result<Self> {
        let file = File::open(fname).map_err(|error| Error::from_io(fname, error))?;
        let size = file
            .metadata()
            .map_err(|error| Error::from_io(fname, error))?
            .len();
        let mmap = if size == 0 {
            None
        } else {
            // SAFETY: the mapping is read-only and no concurrent writers are
            // supported for the lifetime of a source.
            let mmap = unsafe { Mmap::map(&file) }.map_err(|error| Error::from_io(fname, error))?;
            #[cfg(unix)]
            {
                // Only a hint; scanning is still correct if the kernel ignores it.
                let _ = mmap.advise(memmap2::Advice::Sequential);
            }
            Some(mmap)
        };
        Ok(Self {
            mmap,
            _file: file,
        })
    }

    fn bytes(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or(&[])
    }
}

impl ByteSource for MmapSource {
    fn len(&self) -> usize {
        self.bytes().len()
    }

    fn read(&self, offset: usize, max_len: usize) -> &[u8] {
        ByteSource::read(self.bytes(), offset, max_len)
    }
}

pub struct PosixLogger {
    file: RefCell<File>,
}

impl PosixLogger {
    pub fn new(file: File) -> Self {
        Self {
            file: RefCell::new(file),
        }
    }
}

impl Logger for PosixLogger {
    fn log(&self, info: &str) {
        // Record the time as close to the log() call as possible.
        let time = Local::now().format("%Y/%m/%d-%H:%M:%S%.6f").to_string();
        let thread_id = thread::current().id();
        let mut info = format!("{} {:?} {}", time, thread_id, info);
        if !info.ends_with('\n') {
            info.push('\n');
        }
        // A failed diagnostic write must never disturb decoding.
        let mut file_inner = self.file.borrow_mut();
        let _ = file_inner.write_all(info.as_bytes());
        let _ = file_inner.flush();
    }
}
