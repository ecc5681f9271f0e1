use std::{cell::RefCell, collections::HashSet, rc::Rc};

use super::{
    header::{HeaderCodec, HeaderSize},
    reader::Reporter,
    StatusSet,
};
use crate::util::{Error, Result};

/// Decoding options for one stream. Only valid configurations can be built,
/// so a stream never starts I/O with a bad header size or alignment.
#[derive(Clone)]
pub struct StreamConfig {
    header_size: HeaderSize,
    alignment: usize,
    allowed_statuses: StatusSet,
    allowed_lengths: Option<HashSet<usize>>,
    reporter: Option<Rc<RefCell<dyn Reporter>>>,
}

impl StreamConfig {
    pub fn new(header_size: usize, alignment: usize) -> Result<Self> {
        let header_size = HeaderSize::try_from(header_size)?;
        if alignment < 2 {
            return Err(Error::InvalidAlignment(alignment));
        }
        Ok(Self {
            header_size,
            alignment,
            allowed_statuses: StatusSet::default_allowed(),
            allowed_lengths: None,
            reporter: None,
        })
    }

    pub fn with_allowed_statuses(mut self, statuses: StatusSet) -> Self {
        self.allowed_statuses = statuses;
        self
    }

    /// Only yield frames whose payload length is one of `lengths`. Frames
    /// with other lengths are consumed and skipped.
    pub fn with_allowed_lengths(mut self, lengths: impl IntoIterator<Item = usize>) -> Self {
        self.allowed_lengths = Some(lengths.into_iter().collect());
        self
    }

    pub fn with_reporter(mut self, reporter: Rc<RefCell<dyn Reporter>>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn header_size(&self) -> HeaderSize {
        self.header_size
    }

    pub fn alignment(&self) -> usize {
        self.alignment
    }

    pub fn allowed_statuses(&self) -> StatusSet {
        self.allowed_statuses
    }

    pub fn codec(&self) -> HeaderCodec {
        HeaderCodec::with_size(self.header_size)
    }

    pub(crate) fn reporter(&self) -> Option<&Rc<RefCell<dyn Reporter>>> {
        self.reporter.as_ref()
    }

    /// True if a frame with this status and length is handed to the consumer.
    pub fn accepts(&self, status: u8, length: usize) -> bool {
        self.allowed_statuses.contains(status)
            && self
                .allowed_lengths
                .as_ref()
                .map_or(true, |lengths| lengths.contains(&length))
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            header_size: HeaderSize::Two,
            alignment: 2,
            allowed_statuses: StatusSet::default_allowed(),
            allowed_lengths: None,
            reporter: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{RecordType, RESERVED_STATUS};

    #[test]
    fn test_config_validation() {
        assert!(StreamConfig::new(2, 2).is_ok());
        assert!(StreamConfig::new(4, 8).is_ok());
        assert!(matches!(
            StreamConfig::new(3, 2),
            Err(Error::InvalidHeaderSize(3))
        ));
        assert!(matches!(
            StreamConfig::new(2, 1),
            Err(Error::InvalidAlignment(1))
        ));
        assert!(matches!(
            StreamConfig::new(2, 0),
            Err(Error::InvalidAlignment(0))
        ));
    }

    #[test]
    fn test_config_default() {
        let config = StreamConfig::default();
        assert_eq!(HeaderSize::Two, config.header_size());
        assert_eq!(2, config.alignment());
        assert_eq!(StatusSet::default_allowed(), config.allowed_statuses());
        assert_eq!(2, config.codec().header_len());
        assert!(config.reporter().is_none());
    }

    #[test]
    fn test_config_accepts() {
        let config = StreamConfig::new(2, 2).unwrap();
        assert!(config.accepts(RecordType::NormalUserData as u8, 10));
        assert!(!config.accepts(RESERVED_STATUS, 10));
        assert!(!config.accepts(0, 10));
        assert!(!config.accepts(15, 10));

        let config = config.with_allowed_lengths([10, 20]);
        assert!(config.accepts(RecordType::NormalUserData as u8, 10));
        assert!(config.accepts(RecordType::SystemReserved as u8, 20));
        assert!(!config.accepts(RecordType::NormalUserData as u8, 11));
        assert!(!config.accepts(RESERVED_STATUS, 20));

        let config = StreamConfig::new(2, 2)
            .unwrap()
            .with_allowed_statuses(StatusSet::from_iter([RESERVED_STATUS]));
        assert!(config.accepts(RESERVED_STATUS, 3));
        assert!(!config.accepts(RecordType::NormalUserData as u8, 3));
    }
}
