//! Generic Record Header (GRH) decoding.
//!
//! Every record in an EPS product file starts with the same fixed 20-byte
//! header describing its class, instrument group, subclass, byte size, and
//! sensing time span. All multi-byte fields are big-endian.

use std::io::Read;

use byteorder::{BigEndian, ByteOrder};

use super::error::{MetopError, Result};
use super::stream;

/// Size in bytes of a Generic Record Header.
pub const GRH_SIZE: u32 = 20;

/// Record class of an EPS record (GRH byte 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordClass {
    /// Main Product Header Record.
    Mphr,
    /// Secondary Product Header Record.
    Sphr,
    /// Internal Pointer Record.
    Ipr,
    /// Global External Auxiliary Data Record.
    Geadr,
    /// Global Internal Auxiliary Data Record.
    Giadr,
    /// Variable External Auxiliary Data Record.
    Veadr,
    /// Variable Internal Auxiliary Data Record.
    Viadr,
    /// Measurement Data Record, one scanline each.
    Mdr,
}

impl TryFrom<u8> for RecordClass {
    type Error = MetopError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Self::Mphr),
            2 => Ok(Self::Sphr),
            3 => Ok(Self::Ipr),
            4 => Ok(Self::Geadr),
            5 => Ok(Self::Giadr),
            6 => Ok(Self::Veadr),
            7 => Ok(Self::Viadr),
            8 => Ok(Self::Mdr),
            other => Err(MetopError::BadProduct {
                context: "record class",
                expected: "1..=8".to_string(),
                actual: other.to_string(),
            }),
        }
    }
}

/// Instrument group of an EPS record (GRH byte 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrumentGroup {
    Generic,
    Atovs,
    Avhrr3,
}

impl TryFrom<u8> for InstrumentGroup {
    type Error = MetopError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Generic),
            3 => Ok(Self::Atovs),
            4 => Ok(Self::Avhrr3),
            other => Err(MetopError::BadProduct {
                context: "instrument group",
                expected: "GENERIC(0), ATOVS(3) or AVHRR3(4)".to_string(),
                actual: other.to_string(),
            }),
        }
    }
}

/// A record timestamp: day number since the EPS epoch plus time of day,
/// decomposed into whole seconds and residual milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    /// Days since the epoch (2000-01-01).
    pub day: u16,
    /// Whole seconds of the day.
    pub seconds: u32,
    /// Residual milliseconds.
    pub millis: u16,
}

impl Timestamp {
    /// Build a timestamp from the on-disk day-number / millisecond-of-day
    /// pair.
    pub fn from_day_and_millis(day: u16, millis_of_day: u32) -> Self {
        Self {
            day,
            seconds: millis_of_day / 1000,
            millis: (millis_of_day % 1000) as u16,
        }
    }
}

/// The fixed 20-byte header prefixing every EPS record.
///
/// Immutable once read. Field values beyond the closed class/group sets
/// are not validated here; different callers expect different
/// class/group/subclass combinations at the same structural position and
/// check for themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub record_class: RecordClass,
    pub instrument_group: InstrumentGroup,
    pub record_subclass: u8,
    pub record_subclass_version: u8,
    /// Total size of the record in bytes, this header included.
    pub record_size: u32,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
}

impl RecordHeader {
    /// Decode a header from the current stream position, consuming exactly
    /// 20 bytes, or fail with `TruncatedInput` if fewer are available.
    pub fn read(reader: &mut impl Read) -> Result<Self> {
        let mut buf = [0u8; GRH_SIZE as usize];
        stream::read_exact(reader, &mut buf, "generic record header")?;

        let record_class = RecordClass::try_from(buf[0])?;
        let instrument_group = InstrumentGroup::try_from(buf[1])?;
        let record_size = BigEndian::read_u32(&buf[4..8]);
        let start_day = BigEndian::read_u16(&buf[8..10]);
        let start_millis = BigEndian::read_u32(&buf[10..14]);
        let end_day = BigEndian::read_u16(&buf[14..16]);
        let end_millis = BigEndian::read_u32(&buf[16..20]);

        Ok(Self {
            record_class,
            instrument_group,
            record_subclass: buf[2],
            record_subclass_version: buf[3],
            record_size,
            start_time: Timestamp::from_day_and_millis(start_day, start_millis),
            end_time: Timestamp::from_day_and_millis(end_day, end_millis),
        })
    }
}
