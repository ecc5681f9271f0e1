use std::{iter::FusedIterator, path::Path};

use super::{
    header::{padding, HeaderCodec},
    RecordType, StreamConfig,
};
use crate::{
    env::{ByteSource, Env, PosixEnv},
    util::{Error, Result},
};

/// One decoded frame payload, copied out of the source.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Record {
    pub length: usize,
    pub payload: Vec<u8>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StreamState {
    Streaming,
    /// The source ended on a frame boundary.
    Ended,
    /// A frame was truncated; the error has been returned.
    Failed,
    /// Closed by the consumer.
    Closed,
}

#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct StreamStats {
    /// Frames fully read, yielded or not.
    pub frames: usize,
    pub yielded: usize,
    pub skipped: usize,
    /// Frames whose status is not a registered record type.
    pub unknown_status: usize,
    pub bytes_consumed: usize,
}

/// Receives per-frame trace events. Reporters observe the stream; nothing
/// they do changes what the stream yields.
pub trait Reporter {
    fn frame(&mut self, offset: usize, status: u8, length: usize);

    fn unknown_status(&mut self, _offset: usize, _status: u8) {}

    /// A complete frame that did not pass the configured filters.
    fn skipped(&mut self, _offset: usize, _status: u8, _length: usize) {}

    /// `trailing` is the size of the incomplete header left at `offset`.
    fn end_of_stream(&mut self, _offset: usize, _trailing: usize) {}

    fn truncated(&mut self, _error: &Error) {}
}

/// Forward-only stream of records over a framed byte source.
///
/// The source is held until the stream reaches a clean end, fails on a
/// truncated frame, is closed, or is dropped, and is released exactly once.
pub struct RecordStream<S: ByteSource = Box<dyn ByteSource>> {
    source: Option<S>,
    codec: HeaderCodec,
    config: StreamConfig,
    state: StreamState,
    cursor: usize,
    /// Offset of the frame of the last record returned by next_record.
    last_record_offset: usize,
    stats: StreamStats,
}

impl RecordStream {
    /// Memory-maps `fname` through `env`. The configuration is already
    /// valid, so the only errors here come from opening the file.
    pub fn open(env: &dyn Env, fname: &Path, config: StreamConfig) -> Result<Self> {
        let source = env.new_byte_source(fname)?;
        Ok(Self::new(source, config))
    }

    pub fn open_path(fname: impl AsRef<Path>, config: StreamConfig) -> Result<Self> {
        Self::open(&PosixEnv {}, fname.as_ref(), config)
    }
}

impl<S: ByteSource> RecordStream<S> {
    pub fn new(source: S, config: StreamConfig) -> Self {
        Self {
            source: Some(source),
            codec: config.codec(),
            config,
            state: StreamState::Streaming,
            cursor: 0,
            last_record_offset: 0,
            stats: StreamStats::default(),
        }
    }

    /// Returns the next record that passes the filters, `Ok(None)` once the
    /// stream has finished, or the error that finished it.
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        loop {
            let source = match (self.state, self.source.as_ref()) {
                (StreamState::Streaming, Some(source)) => source,
                _ => return Ok(None),
            };
            let offset = self.cursor;
            let header_len = self.codec.header_len();

            let header = source.read(offset, header_len);
            let (status, length) = match self.codec.decode(header) {
                Some(decoded) => decoded,
                None => {
                    let trailing = header.len();
                    self.finish(StreamState::Ended);
                    self.report(|reporter| reporter.end_of_stream(offset, trailing));
                    return Ok(None);
                }
            };
            self.report(|reporter| reporter.frame(offset, status, length));
            let registered = RecordType::from_status(status).is_some();
            if !registered {
                self.report(|reporter| reporter.unknown_status(offset, status));
            }

            let payload = source.read(offset + header_len, length);
            if payload.len() < length {
                let error = Error::TruncatedRecord {
                    offset,
                    expected: length,
                    actual: payload.len(),
                };
                self.finish(StreamState::Failed);
                self.report(|reporter| reporter.truncated(&error));
                return Err(error);
            }
            // The pad bytes belong to the frame; a source that stops inside
            // them does not end on a frame boundary.
            let pad = padding(header_len, length, self.config.alignment());
            let source_len = source.len();
            if offset + header_len + length + pad > source_len {
                let error = Error::TruncatedRecord {
                    offset,
                    expected: length + pad,
                    actual: source_len - offset - header_len,
                };
                self.finish(StreamState::Failed);
                self.report(|reporter| reporter.truncated(&error));
                return Err(error);
            }
            let record = if self.config.accepts(status, length) {
                Some(Record {
                    length,
                    payload: payload.to_vec(),
                })
            } else {
                None
            };

            self.cursor = offset + header_len + length + pad;
            self.stats.frames += 1;
            self.stats.bytes_consumed = self.cursor;
            if !registered {
                self.stats.unknown_status += 1;
            }
            match record {
                Some(record) => {
                    self.stats.yielded += 1;
                    self.last_record_offset = offset;
                    return Ok(Some(record));
                }
                None => {
                    self.stats.skipped += 1;
                    self.report(|reporter| reporter.skipped(offset, status, length));
                }
            }
        }
    }

    /// Stops the stream and releases the source. Closing twice, or closing a
    /// stream that already finished, only moves it to `Closed`.
    pub fn close(&mut self) {
        if self.state != StreamState::Closed {
            self.finish(StreamState::Closed);
        }
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Offset of the next frame header.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn last_record_offset(&self) -> usize {
        self.last_record_offset
    }

    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    fn finish(&mut self, state: StreamState) {
        self.state = state;
        drop(self.source.take());
    }

    fn report(&self, event: impl FnOnce(&mut dyn Reporter)) {
        if let Some(reporter) = self.config.reporter() {
            event(&mut *reporter.borrow_mut());
        }
    }
}

impl<S: ByteSource> Iterator for RecordStream<S> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

impl<S: ByteSource> FusedIterator for RecordStream<S> {}

#[cfg(test)]
mod tests {
    use std::{fs, io::Write};

    use tempfile::{NamedTempFile, TempDir};

    use super::*;
    use crate::frame::{StatusSet, RESERVED_STATUS};

    fn write_file(contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_stream_from_file() {
        let file = write_file(&[0x40, 0x03, b'A', b'B', b'C', 0x00]);
        let config = StreamConfig::new(2, 2).unwrap();
        let mut stream = RecordStream::open_path(file.path(), config).unwrap();
        let record = stream.next_record().unwrap().unwrap();
        assert_eq!(3, record.length);
        assert_eq!(b"ABC".to_vec(), record.payload);
        assert!(stream.next_record().unwrap().is_none());
        assert_eq!(StreamState::Ended, stream.state());
    }

    #[test]
    fn test_stream_from_empty_file() {
        let file = write_file(&[]);
        let stream = RecordStream::open_path(file.path(), StreamConfig::default()).unwrap();
        let records: Result<Vec<Record>> = stream.collect();
        assert!(records.unwrap().is_empty());
    }

    #[test]
    fn test_stream_missing_file() {
        let dir = TempDir::new().unwrap();
        let error = RecordStream::open(
            &PosixEnv {},
            &dir.path().join("missing.dat"),
            StreamConfig::default(),
        )
        .err()
        .unwrap();
        assert!(error.is_not_found());
    }

    #[test]
    fn test_stream_file_with_reserved_frames() {
        let dir = TempDir::new().unwrap();
        let fname = dir.path().join("frames.dat");
        // 4-byte headers, 4-byte alignment:
        //   status 8, "skip" ; status 4, "keep!" + 3 pad ; status 2, ""
        let mut contents = vec![0x80, 0x00, 0x00, 0x04];
        contents.extend_from_slice(b"skip");
        contents.extend_from_slice(&[0x40, 0x00, 0x00, 0x05]);
        contents.extend_from_slice(b"keep!\x00\x00\x00");
        contents.extend_from_slice(&[0x20, 0x00, 0x00, 0x00]);
        fs::write(&fname, &contents).unwrap();

        let config = StreamConfig::new(4, 4).unwrap();
        let stream = RecordStream::open_path(&fname, config).unwrap();
        let records: Vec<Record> = stream.map(|record| record.unwrap()).collect();
        assert_eq!(
            vec![
                Record {
                    length: 5,
                    payload: b"keep!".to_vec()
                },
                Record {
                    length: 0,
                    payload: vec![]
                },
            ],
            records
        );

        let config = StreamConfig::new(4, 4)
            .unwrap()
            .with_allowed_statuses(StatusSet::from_iter([RESERVED_STATUS]));
        let mut stream = RecordStream::open_path(&fname, config).unwrap();
        assert_eq!(b"skip".to_vec(), stream.next_record().unwrap().unwrap().payload);
        assert!(stream.next_record().unwrap().is_none());
        assert_eq!(3, stream.stats().frames);
        assert_eq!(contents.len(), stream.stats().bytes_consumed);
    }

    #[test]
    fn test_stream_over_slice() {
        let data: &[u8] = &[0x10, 0x01, b'x', 0x00, 0x10];
        let mut stream = RecordStream::new(data, StreamConfig::default());
        assert_eq!(b"x".to_vec(), stream.next_record().unwrap().unwrap().payload);
        assert!(stream.next_record().unwrap().is_none());
        assert_eq!(4, stream.cursor());
        assert_eq!(4, stream.stats().bytes_consumed);
        assert_eq!(2, stream.config().alignment());
    }
}
