//! Product layout: the header chain, cross-record validation, and
//! scanline addressing.
//!
//! The format has no explicit index for per-scanline data. Everything a
//! band reader needs — the byte offset of a pixel row, a flag byte, or a
//! navigation block — is derived from the first-MDR offset, the MDR size
//! read from the first data record's header, and a handful of format
//! constants, parameterized by the navigation sampling precision.

use std::io::{Read, Seek, SeekFrom};

use log::{debug, info};

use super::ascii::{AsciiHeader, MPHR_FIELD_COUNT, SPHR_FIELD_COUNT};
use super::error::{MetopError, Result};
use super::giadr::RadianceCalibration;
use super::grh::{InstrumentGroup, RecordClass, RecordHeader, Timestamp};
use super::ipr::PointerTable;
use super::stream;

/// Scanline pixel count of every supported product.
pub const EXPECTED_PRODUCT_WIDTH: u32 = 2048;

const HIGH_PRECISION_SAMPLE_RATE: i32 = 20;
const LOW_PRECISION_SAMPLE_RATE: i32 = 40;

const HIGH_PRECISION_TIE_POINT_WIDTH: u32 = 103;
const LOW_PRECISION_TIE_POINT_WIDTH: u32 = 51;

/// Byte difference between the low and high precision MDR layouts.
///
/// The low-precision navigation block is shorter, shifting everything
/// behind it forward by this amount. Opaque format constant, reproduced
/// verbatim from the product format specification.
const TIE_POINT_DIFFERENCE: u64 = 832;

/// Offsets of the navigation block, the quality flags, and the frame
/// indicator within one high-precision MDR. Opaque format constants.
const TIE_POINT_OFFSET: u64 = 20556;
const FLAG_OFFSET: u64 = 22204;
const FRAME_INDICATOR_OFFSET: u64 = 26580;

/// Product-wide channel 3 operating mode, read off the frame indicator of
/// the first and last data record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMode {
    /// Bit 0 set at both ends: channel 3a throughout.
    Ch3a,
    /// Bit 0 clear at both ends: channel 3b throughout.
    Ch3b,
    /// Mixed: the mode switches somewhere inside the product and cannot be
    /// determined product-wide.
    Ambiguous,
}

/// The decoded, validated description of one open product.
///
/// Exclusively owns all decoded sub-structures; nothing is mutated after
/// construction. The underlying byte stream is borrowed only during
/// [`ProductLayout::read`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProductLayout {
    pub mphr_header: RecordHeader,
    pub mphr: AsciiHeader,
    pub sphr_header: RecordHeader,
    pub sphr: AsciiHeader,
    pub pointer_table: PointerTable,
    pub calibration: RadianceCalibration,
    /// Absolute byte offset of the first measurement data record.
    pub first_mdr_offset: u32,
    /// Byte size of one measurement data record.
    pub mdr_size: u32,
    /// Scanline count after trailing-partial-sample trimming.
    pub product_height: u32,
    /// Pixels per scanline, constant for all supported products.
    pub product_width: u32,
    /// Navigation points per sampled scanline (51 or 103).
    pub nav_points: u32,
    /// Scanlines between navigation samples (40 or 20).
    pub nav_sample_rate: u32,
    pub channel_mode: ChannelMode,
}

impl ProductLayout {
    /// Parse and validate the complete product layout.
    ///
    /// Strictly sequential, no backtracking: each step depends on values
    /// decoded by earlier steps. `file_len` is the actual byte length of
    /// the underlying file, cross-checked against the declared record
    /// counts and sizes.
    pub fn read<R: Read + Seek>(reader: &mut R, file_len: u64) -> Result<Self> {
        let mphr_header = RecordHeader::read(reader)?;
        expect_record(
            &mphr_header,
            RecordClass::Mphr,
            InstrumentGroup::Generic,
            0,
            "main product header record",
        )?;
        let mphr = AsciiHeader::read(reader, MPHR_FIELD_COUNT)?;
        info!(
            "MPHR read, product {}",
            mphr.str_value("PRODUCT_NAME").unwrap_or("<unnamed>")
        );

        let total_sphr = mphr.int_value("TOTAL_SPHR")?;
        if total_sphr != 1 {
            return Err(MetopError::UnsupportedProduct(format!(
                "expected exactly one SPHR, TOTAL_SPHR is {}",
                total_sphr
            )));
        }

        let sphr_header = RecordHeader::read(reader)?;
        expect_record(
            &sphr_header,
            RecordClass::Sphr,
            InstrumentGroup::Avhrr3,
            0,
            "secondary product header record",
        )?;
        let sphr = AsciiHeader::read(reader, SPHR_FIELD_COUNT)?;

        let earth_views = sphr.int_value("EARTH_VIEWS_PER_SCANLINE")?;
        if earth_views != EXPECTED_PRODUCT_WIDTH as i32 {
            return Err(MetopError::UnsupportedProduct(format!(
                "EARTH_VIEWS_PER_SCANLINE is {}, expected {}",
                earth_views, EXPECTED_PRODUCT_WIDTH
            )));
        }

        let nav_sample_rate = sphr.int_value("NAV_SAMPLE_RATE")?;
        let nav_points = match nav_sample_rate {
            LOW_PRECISION_SAMPLE_RATE => LOW_PRECISION_TIE_POINT_WIDTH,
            HIGH_PRECISION_SAMPLE_RATE => HIGH_PRECISION_TIE_POINT_WIDTH,
            other => {
                return Err(MetopError::UnsupportedProduct(format!(
                    "NAV_SAMPLE_RATE is {}",
                    other
                )))
            }
        };
        let nav_sample_rate = nav_sample_rate as u32;
        debug!(
            "navigation sampling: {} points every {} scanlines",
            nav_points, nav_sample_rate
        );

        let total_ipr = non_negative(mphr.int_value("TOTAL_IPR")?, "TOTAL_IPR")?;
        let pointer_table = PointerTable::read(reader, total_ipr as usize)?;

        let giadr_offset = pointer_table.radiance_giadr_offset()?;
        reader.seek(SeekFrom::Start(u64::from(giadr_offset)))?;
        let calibration = RadianceCalibration::read(reader)?;

        let first_mdr_offset = pointer_table.first_mdr_offset()?;
        let total_mdr = non_negative(mphr.int_value("TOTAL_MDR")?, "TOTAL_MDR")?;

        // The size of one data record comes from the header of the first;
        // together with TOTAL_MDR it must reproduce the file length exactly.
        reader.seek(SeekFrom::Start(u64::from(first_mdr_offset)))?;
        let first_mdr = RecordHeader::read(reader)?;
        let mdr_size = first_mdr.record_size;

        let expected_len = u64::from(first_mdr_offset) + u64::from(total_mdr) * u64::from(mdr_size);
        if file_len != expected_len {
            return Err(MetopError::InconsistentSize {
                expected: expected_len,
                actual: file_len,
            });
        }

        let mut layout = Self {
            mphr_header,
            mphr,
            sphr_header,
            sphr,
            pointer_table,
            calibration,
            first_mdr_offset,
            mdr_size,
            product_height: total_mdr,
            product_width: EXPECTED_PRODUCT_WIDTH,
            nav_points,
            nav_sample_rate,
            channel_mode: ChannelMode::Ambiguous,
        };
        layout.channel_mode = layout.detect_channel_mode(reader)?;
        layout.product_height = trimmed_height(total_mdr, nav_sample_rate);
        info!(
            "layout validated: {} x {} pixels, MDR size {}, channel mode {:?}",
            layout.product_width, layout.product_height, layout.mdr_size, layout.channel_mode
        );
        Ok(layout)
    }

    /// Absolute byte offset of scanline `y`'s data record.
    pub fn scanline_offset(&self, y: u32) -> u64 {
        u64::from(self.first_mdr_offset) + u64::from(y) * u64::from(self.mdr_size)
    }

    /// Absolute byte offset of scanline `y`'s quality flag bytes.
    pub fn flag_offset(&self, y: u32) -> u64 {
        self.scanline_offset(y) + FLAG_OFFSET - self.precision_shift()
    }

    /// Absolute byte offset of scanline `y`'s frame indicator byte.
    pub fn frame_indicator_offset(&self, y: u32) -> u64 {
        self.scanline_offset(y) + FRAME_INDICATOR_OFFSET + 1 - self.precision_shift()
    }

    /// Absolute byte offset of scanline `y`'s navigation block.
    ///
    /// Only scanlines at multiples of the sample rate carry one.
    pub fn tie_point_offset(&self, y: u32) -> u64 {
        self.scanline_offset(y) + TIE_POINT_OFFSET
    }

    fn precision_shift(&self) -> u64 {
        if self.nav_points == LOW_PRECISION_TIE_POINT_WIDTH {
            TIE_POINT_DIFFERENCE
        } else {
            0
        }
    }

    /// Read the frame indicator byte of scanline `y` from the given
    /// stream. The caller must hold exclusive access to the stream for the
    /// duration of the call.
    pub fn read_frame_indicator<R: Read + Seek>(&self, reader: &mut R, y: u32) -> Result<u8> {
        reader.seek(SeekFrom::Start(self.frame_indicator_offset(y)))?;
        let mut byte = [0u8; 1];
        stream::read_exact(reader, &mut byte, "frame indicator")?;
        Ok(byte[0])
    }

    /// Product name from the MPHR.
    pub fn product_name(&self) -> Result<&str> {
        self.mphr.str_value("PRODUCT_NAME")
    }

    /// Sensing start time from the MPHR record header.
    pub fn start_time(&self) -> Timestamp {
        self.mphr_header.start_time
    }

    /// Sensing end time from the MPHR record header.
    pub fn end_time(&self) -> Timestamp {
        self.mphr_header.end_time
    }

    fn detect_channel_mode<R: Read + Seek>(&self, reader: &mut R) -> Result<ChannelMode> {
        let first = self.read_frame_indicator(reader, 0)?;
        let last = self.read_frame_indicator(reader, self.product_height - 1)?;
        Ok(match (first & 1, last & 1) {
            (1, 1) => ChannelMode::Ch3a,
            (0, 0) => ChannelMode::Ch3b,
            _ => ChannelMode::Ambiguous,
        })
    }
}

/// Drop trailing scanlines so the last retained line falls exactly on a
/// navigation sample boundary.
///
/// The remainder arithmetic wraps negative skip counts back into range by
/// adding one sample rate; the result saturates at zero for heights
/// smaller than a full sample.
pub fn trimmed_height(height: u32, sample_rate: u32) -> u32 {
    let mut to_skip = (height % sample_rate) as i64 - 1;
    if to_skip < 0 {
        to_skip += i64::from(sample_rate);
    }
    height.saturating_sub(to_skip as u32)
}

fn expect_record(
    header: &RecordHeader,
    class: RecordClass,
    group: InstrumentGroup,
    subclass: u8,
    context: &'static str,
) -> Result<()> {
    if header.record_class != class
        || header.instrument_group != group
        || header.record_subclass != subclass
    {
        return Err(MetopError::BadProduct {
            context,
            expected: format!("{:?}/{:?} subclass {}", class, group, subclass),
            actual: format!(
                "{:?}/{:?} subclass {}",
                header.record_class, header.instrument_group, header.record_subclass
            ),
        });
    }
    Ok(())
}

fn non_negative(value: i32, key: &str) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| MetopError::UnsupportedProduct(format!("{} is negative: {}", key, value)))
}
