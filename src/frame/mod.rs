//! Decoding of variable-length framed records.
//!
//! A frame is a 2- or 4-byte header, `length` payload bytes, and enough pad
//! bytes to end on a multiple of the alignment. The first nibble of the
//! header is the record status; the remaining bits are the big-endian
//! payload length. There is no file magic and no footer: data ends where a
//! complete header can no longer be read.

use std::fmt::{self, Display};

mod config;
mod header;
mod log_reporter;
mod reader;

pub use config::StreamConfig;
pub use header::{padding, HeaderCodec, HeaderSize};
pub use log_reporter::LogReporter;
pub use reader::{Record, RecordStream, Reporter, StreamState, StreamStats};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum RecordType {
    /// A system record (duplicate occurrence).
    SystemRecordDuplicate = 1,
    /// Available for reuse.
    DeletedRecord = 2,
    SystemReserved = 3,
    NormalUserData = 4,
    /// Indexed files only.
    ReducedUserData = 5,
    /// Indexed files only.
    PointerRecord = 6,
    UserDataRecord = 7,
    ReducedUserDataReferencedByPointer = 8,
    ReservedForFutureUse = 9,
    MidTransactionUserRecord = 10,
    MidTransactionReducedUserRecord = 11,
    MidTransactionUserRecordReferenced = 12,
    MidTransactionReducedUserRecordReferenced = 13,
}

/// Status excluded from the default allowed set: reduced user data that is
/// only reachable through a pointer record.
pub const RESERVED_STATUS: u8 = RecordType::ReducedUserDataReferencedByPointer as u8;

impl RecordType {
    pub const ALL: [RecordType; 13] = [
        RecordType::SystemRecordDuplicate,
        RecordType::DeletedRecord,
        RecordType::SystemReserved,
        RecordType::NormalUserData,
        RecordType::ReducedUserData,
        RecordType::PointerRecord,
        RecordType::UserDataRecord,
        RecordType::ReducedUserDataReferencedByPointer,
        RecordType::ReservedForFutureUse,
        RecordType::MidTransactionUserRecord,
        RecordType::MidTransactionReducedUserRecord,
        RecordType::MidTransactionUserRecordReferenced,
        RecordType::MidTransactionReducedUserRecordReferenced,
    ];

    pub fn from_status(status: u8) -> Option<RecordType> {
        match status {
            1..=13 => Some(Self::ALL[status as usize - 1]),
            _ => None,
        }
    }

    pub fn status(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            RecordType::SystemRecordDuplicate => "SYSTEM_RECORD_DUPLICATE",
            RecordType::DeletedRecord => "DELETED_RECORD",
            RecordType::SystemReserved => "SYSTEM_RESERVED",
            RecordType::NormalUserData => "NORMAL_USER_DATA",
            RecordType::ReducedUserData => "REDUCED_USER_DATA",
            RecordType::PointerRecord => "POINTER_RECORD",
            RecordType::UserDataRecord => "USER_DATA_RECORD",
            RecordType::ReducedUserDataReferencedByPointer => {
                "REDUCED_USER_DATA_REFERENCED_BY_POINTER"
            }
            RecordType::ReservedForFutureUse => "RESERVED_FOR_FUTURE_USE",
            RecordType::MidTransactionUserRecord => "MID_TRANSACTION_USER_RECORD",
            RecordType::MidTransactionReducedUserRecord => "MID_TRANSACTION_REDUCED_USER_RECORD",
            RecordType::MidTransactionUserRecordReferenced => {
                "MID_TRANSACTION_USER_RECORD_REFERENCED"
            }
            RecordType::MidTransactionReducedUserRecordReferenced => {
                "MID_TRANSACTION_REDUCED_USER_RECORD_REFERENCED"
            }
        }
    }
}

impl Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Membership set over the sixteen possible status nibbles.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct StatusSet {
    bits: u16,
}

impl StatusSet {
    pub fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Every registered record type.
    pub fn all_registered() -> Self {
        RecordType::ALL.iter().map(|t| t.status()).collect()
    }

    /// Every registered record type except [`RESERVED_STATUS`].
    pub fn default_allowed() -> Self {
        let mut set = Self::all_registered();
        set.remove(RESERVED_STATUS);
        set
    }

    /// Statuses above 15 can never appear in a header and are ignored.
    pub fn insert(&mut self, status: u8) {
        if status < 16 {
            self.bits |= 1 << status;
        }
    }

    pub fn remove(&mut self, status: u8) {
        if status < 16 {
            self.bits &= !(1 << status);
        }
    }

    pub fn contains(&self, status: u8) -> bool {
        status < 16 && self.bits & (1 << status) != 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl FromIterator<u8> for StatusSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut set = Self::empty();
        for status in iter {
            set.insert(status);
        }
        set
    }
}

impl FromIterator<RecordType> for StatusSet {
    fn from_iter<I: IntoIterator<Item = RecordType>>(iter: I) -> Self {
        iter.into_iter().map(RecordType::status).collect()
    }
}
