use super::{reader::Reporter, RecordType};
use crate::{env::Logger, util::Error};

/// Writes a trace line to a logger for every frame event. Attach one through
/// `StreamConfig::with_reporter` to debug a source frame by frame; on large
/// sources this logs a line per frame.
pub struct LogReporter {
    logger: Box<dyn Logger>,
}

impl LogReporter {
    pub fn new(logger: Box<dyn Logger>) -> Self {
        Self { logger }
    }
}

impl Reporter for LogReporter {
    fn frame(&mut self, offset: usize, status: u8, length: usize) {
        let name = RecordType::from_status(status).map_or("UNKNOWN", RecordType::name);
        self.logger.log(&format!(
            "frame at {offset}: status={status} ({name}) length={length}"
        ));
    }

    fn unknown_status(&mut self, offset: usize, status: u8) {
        self.logger
            .log(&format!("frame at {offset}: invalid status {status}"));
    }

    fn skipped(&mut self, offset: usize, status: u8, length: usize) {
        self.logger.log(&format!(
            "frame at {offset}: skipped status={status} length={length}"
        ));
    }

    fn end_of_stream(&mut self, offset: usize, trailing: usize) {
        self.logger.log(&format!(
            "end of data at {offset} (incomplete header of {trailing} bytes)"
        ));
    }

    fn truncated(&mut self, error: &Error) {
        self.logger.log(&format!("error: {error}"));
    }
}
