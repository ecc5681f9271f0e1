use crate::util::{Error, Result};

/// Width of a frame header. The first nibble is always the status; the rest
/// of the header is the big-endian payload length.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HeaderSize {
    /// 4-bit status, 12-bit length.
    Two = 2,
    /// 4-bit status, 28-bit length.
    Four = 4,
}

impl HeaderSize {
    pub fn bytes(self) -> usize {
        self as usize
    }

    pub fn max_length(self) -> usize {
        match self {
            HeaderSize::Two => 0x0fff,
            HeaderSize::Four => 0x0fff_ffff,
        }
    }
}

impl TryFrom<usize> for HeaderSize {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self> {
        match value {
            2 => Ok(HeaderSize::Two),
            4 => Ok(HeaderSize::Four),
            _ => Err(Error::InvalidHeaderSize(value)),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct HeaderCodec {
    size: HeaderSize,
}

impl HeaderCodec {
    pub fn new(header_size: usize) -> Result<Self> {
        Ok(Self::with_size(HeaderSize::try_from(header_size)?))
    }

    pub fn with_size(size: HeaderSize) -> Self {
        Self { size }
    }

    pub fn size(&self) -> HeaderSize {
        self.size
    }

    pub fn header_len(&self) -> usize {
        self.size.bytes()
    }

    pub fn max_length(&self) -> usize {
        self.size.max_length()
    }

    /// Splits a header into `(status, length)`. Returns `None` if `header`
    /// is shorter than `header_len()`; extra bytes are ignored.
    pub fn decode(&self, header: &[u8]) -> Option<(u8, usize)> {
        if header.len() < self.header_len() {
            return None;
        }
        let status = (header[0] >> 4) & 0x0f;
        let high = (header[0] & 0x0f) as usize;
        let length = match self.size {
            HeaderSize::Two => (high << 8) | header[1] as usize,
            HeaderSize::Four => {
                (high << 24)
                    | (header[1] as usize) << 16
                    | (header[2] as usize) << 8
                    | header[3] as usize
            }
        };
        Some((status, length))
    }

    pub fn encode(&self, status: u8, length: usize) -> Result<Vec<u8>> {
        if status > 0x0f {
            return Err(Error::StatusOutOfRange(status));
        }
        if length > self.max_length() {
            return Err(Error::LengthOutOfRange {
                length,
                max: self.max_length(),
            });
        }
        let bytes = match self.size {
            HeaderSize::Two => (length as u16).to_be_bytes().to_vec(),
            HeaderSize::Four => (length as u32).to_be_bytes().to_vec(),
        };
        let mut header = bytes;
        header[0] |= status << 4;
        Ok(header)
    }
}

/// Number of pad bytes that bring a frame of `header_size + length` bytes up
/// to the next multiple of `alignment`. Always in `[0, alignment)`.
///
/// `alignment` must be at least 2; `StreamConfig` guarantees it.
pub fn padding(header_size: usize, length: usize, alignment: usize) -> usize {
    let total = header_size + length;
    (alignment - total % alignment) % alignment
}
