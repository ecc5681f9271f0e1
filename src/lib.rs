//! Streaming decoder for self-describing framed record files.
//!
//! ```no_run
//! use recframe::{RecordStream, StreamConfig};
//!
//! let config = StreamConfig::new(2, 2)?;
//! for record in RecordStream::open_path("records.dat", config)? {
//!     let record = record?;
//!     println!("{} bytes", record.length);
//! }
//! # Ok::<(), recframe::Error>(())
//! ```

pub mod env;
pub mod frame;
mod util;

pub use env::{ByteSource, Env, Logger, MmapSource, PosixEnv};
pub use frame::{
    padding, HeaderCodec, HeaderSize, LogReporter, Record, RecordStream, RecordType, Reporter,
    StatusSet, StreamConfig, StreamState, StreamStats, RESERVED_STATUS,
};
pub use util::{Error, Result};
