//! The GIADR radiance calibration record (subclass 1).
//!
//! The core locates this record through the pointer table and decodes the
//! per-channel coefficients; applying them (reflectance factor and
//! temperature conversion) is the calibrator's job, not ours.

use std::io::Read;

use byteorder::{BigEndian, ByteOrder};

use super::error::{MetopError, Result};
use super::grh::{InstrumentGroup, RecordClass, RecordHeader};
use super::stream;

/// AVHRR/3 channel, in instrument order.
///
/// Channels 3a and 3b share one sensor slot and are mutually exclusive at
/// any given scanline; which one a product carries is reported by
/// [`ChannelMode`](crate::metop::layout::ChannelMode).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Ch1,
    Ch2,
    Ch3a,
    Ch3b,
    Ch4,
    Ch5,
}

impl Channel {
    /// Index into the visible/near-infrared coefficient tables, if this is
    /// one of channels 1, 2 or 3a.
    fn visible_index(self) -> Option<usize> {
        match self {
            Channel::Ch1 => Some(0),
            Channel::Ch2 => Some(1),
            Channel::Ch3a => Some(2),
            _ => None,
        }
    }

    /// Index into the thermal coefficient tables, if this is one of
    /// channels 3b, 4 or 5.
    fn ir_index(self) -> Option<usize> {
        match self {
            Channel::Ch3b => Some(0),
            Channel::Ch4 => Some(1),
            Channel::Ch5 => Some(2),
            _ => None,
        }
    }
}

/// Calibration dates and algorithm identifiers preceding the channel
/// coefficients. Carried through but not interpreted here.
const PREAMBLE_SIZE: usize = 14;

/// Bytes of channel coefficients: three visible channels at 4 bytes each,
/// three thermal channels at 12 bytes each.
const COEFFICIENTS_SIZE: usize = 12 + 36;

/// Radiance calibration coefficients decoded from the GIADR subclass-1
/// record.
///
/// Solar channels expose a filtered solar irradiance and an equivalent
/// filter width; thermal channels expose a central wavenumber and the two
/// temperature-conversion constants. Accessors return `None` for a channel
/// of the other kind.
#[derive(Debug, Clone, PartialEq)]
pub struct RadianceCalibration {
    pub header: RecordHeader,
    solar_irradiance: [f64; 3],
    equivalent_width: [f64; 3],
    central_wavenumber: [f64; 3],
    constant1: [f64; 3],
    constant2: [f64; 3],
}

impl RadianceCalibration {
    /// Decode the record from the current stream position.
    ///
    /// The header must announce GIADR/AVHRR3 subclass 1; the caller is
    /// expected to have seeked to the offset given by the pointer table.
    pub fn read(reader: &mut impl Read) -> Result<Self> {
        let header = RecordHeader::read(reader)?;
        if header.record_class != RecordClass::Giadr
            || header.instrument_group != InstrumentGroup::Avhrr3
            || header.record_subclass != 1
        {
            return Err(MetopError::BadProduct {
                context: "GIADR radiance header",
                expected: "GIADR/AVHRR3 subclass 1".to_string(),
                actual: format!(
                    "{:?}/{:?} subclass {}",
                    header.record_class, header.instrument_group, header.record_subclass
                ),
            });
        }

        let mut preamble = [0u8; PREAMBLE_SIZE];
        stream::read_exact(reader, &mut preamble, "GIADR radiance preamble")?;

        let mut buf = [0u8; COEFFICIENTS_SIZE];
        stream::read_exact(reader, &mut buf, "GIADR radiance coefficients")?;

        let mut solar_irradiance = [0f64; 3];
        let mut equivalent_width = [0f64; 3];
        for ch in 0..3 {
            let base = ch * 4;
            solar_irradiance[ch] = f64::from(BigEndian::read_i16(&buf[base..])) * 1E-1;
            equivalent_width[ch] = f64::from(BigEndian::read_i16(&buf[base + 2..])) * 1E-3;
        }

        let ir = &buf[12..];
        let mut central_wavenumber = [0f64; 3];
        let mut constant1 = [0f64; 3];
        let mut constant2 = [0f64; 3];
        for ch in 0..3 {
            let base = ch * 12;
            central_wavenumber[ch] = f64::from(BigEndian::read_i32(&ir[base..])) * 1E-3;
            constant1[ch] = f64::from(BigEndian::read_i32(&ir[base + 4..])) * 1E-5;
            constant2[ch] = f64::from(BigEndian::read_i32(&ir[base + 8..])) * 1E-6;
        }

        Ok(Self {
            header,
            solar_irradiance,
            equivalent_width,
            central_wavenumber,
            constant1,
            constant2,
        })
    }

    /// Solar filtered irradiance in W/m², channels 1, 2 and 3a.
    pub fn solar_irradiance(&self, channel: Channel) -> Option<f64> {
        channel.visible_index().map(|i| self.solar_irradiance[i])
    }

    /// Equivalent filter width in µm, channels 1, 2 and 3a.
    pub fn equivalent_width(&self, channel: Channel) -> Option<f64> {
        channel.visible_index().map(|i| self.equivalent_width[i])
    }

    /// Central wavenumber in cm⁻¹, channels 3b, 4 and 5.
    pub fn central_wavenumber(&self, channel: Channel) -> Option<f64> {
        channel.ir_index().map(|i| self.central_wavenumber[i])
    }

    /// First temperature-conversion constant, channels 3b, 4 and 5.
    pub fn constant1(&self, channel: Channel) -> Option<f64> {
        channel.ir_index().map(|i| self.constant1[i])
    }

    /// Second temperature-conversion constant, channels 3b, 4 and 5.
    pub fn constant2(&self, channel: Channel) -> Option<f64> {
        channel.ir_index().map(|i| self.constant2[i])
    }
}
