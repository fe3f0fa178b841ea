//! Internal Pointer Records (IPR) and their classification.
//!
//! IPRs follow the secondary header and name, for each auxiliary or data
//! record announced by the MPHR, the target record's identity and its
//! absolute byte offset in the file. They are the only explicit index the
//! format carries; everything else is derived arithmetic.

use std::io::Read;

use byteorder::{BigEndian, ByteOrder};
use log::debug;

use super::error::{MetopError, Result};
use super::grh::{InstrumentGroup, RecordClass, RecordHeader};
use super::stream;

/// A single Internal Pointer Record: its own header plus the identity and
/// byte offset of the record it points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerRecord {
    pub header: RecordHeader,
    pub target_record_class: RecordClass,
    pub target_instrument_group: u8,
    pub target_record_subclass: u8,
    pub target_record_offset: u32,
}

impl PointerRecord {
    /// Decode one IPR from the current stream position.
    ///
    /// The pointer's own header must be class IPR in the GENERIC
    /// instrument group; anything else rejects the product.
    pub fn read(reader: &mut impl Read) -> Result<Self> {
        let header = RecordHeader::read(reader)?;
        if header.record_class != RecordClass::Ipr
            || header.instrument_group != InstrumentGroup::Generic
        {
            return Err(MetopError::BadProduct {
                context: "internal pointer record header",
                expected: "IPR/GENERIC".to_string(),
                actual: format!("{:?}/{:?}", header.record_class, header.instrument_group),
            });
        }

        let mut buf = [0u8; 7];
        stream::read_exact(reader, &mut buf, "internal pointer record body")?;

        Ok(Self {
            header,
            target_record_class: RecordClass::try_from(buf[0])?,
            target_instrument_group: buf[1],
            target_record_subclass: buf[2],
            target_record_offset: BigEndian::read_u32(&buf[3..7]),
        })
    }
}

/// The product's pointer table, in file order.
///
/// Order is preserved as read; when several entries target the same record
/// kind, the first occurrence wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerTable {
    records: Vec<PointerRecord>,
}

impl PointerTable {
    /// Decode `count` pointer records sequentially. The count comes from
    /// the MPHR `TOTAL_IPR` field.
    pub fn read(reader: &mut impl Read, count: usize) -> Result<Self> {
        let mut records = Vec::with_capacity(count);
        for _ in 0..count {
            let ipr = PointerRecord::read(reader)?;
            debug!(
                "IPR -> {:?} subclass {} at offset {}",
                ipr.target_record_class, ipr.target_record_subclass, ipr.target_record_offset
            );
            records.push(ipr);
        }
        Ok(Self { records })
    }

    /// All entries, in file order.
    pub fn records(&self) -> &[PointerRecord] {
        &self.records
    }

    fn find(&self, class: RecordClass, subclass: Option<u8>) -> Option<&PointerRecord> {
        self.records.iter().find(|r| {
            r.target_record_class == class
                && subclass.map_or(true, |s| r.target_record_subclass == s)
        })
    }

    /// Byte offset of the radiance calibration record (GIADR subclass 1).
    ///
    /// Its absence is fatal: calibration is required downstream.
    pub fn radiance_giadr_offset(&self) -> Result<u32> {
        self.find(RecordClass::Giadr, Some(1))
            .map(|r| r.target_record_offset)
            .ok_or_else(|| {
                MetopError::UnsupportedProduct(
                    "no internal pointer to the GIADR radiance record".to_string(),
                )
            })
    }

    /// Byte offset of the analog-calibration record (GIADR subclass 2),
    /// if announced. Acknowledged but never read: analog calibration is
    /// not decoded.
    pub fn analog_giadr_offset(&self) -> Option<u32> {
        self.find(RecordClass::Giadr, Some(2))
            .map(|r| r.target_record_offset)
    }

    /// Byte offset of the first measurement data record.
    pub fn first_mdr_offset(&self) -> Result<u32> {
        self.find(RecordClass::Mdr, None)
            .map(|r| r.target_record_offset)
            .ok_or_else(|| {
                MetopError::UnsupportedProduct(
                    "no internal pointer to a measurement data record".to_string(),
                )
            })
    }
}
