//! The top-level product reader.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::{Arc, Mutex};

use log::info;

use super::ascii::AsciiHeader;
use super::error::{MetopError, Result};
use super::giadr::RadianceCalibration;
use super::grh::{InstrumentGroup, RecordClass, RecordHeader, Timestamp};
use super::layout::{ChannelMode, ProductLayout};
use super::navigation::{self, TiePointGrid};
use super::stream;

/// An open METOP-AVHRR/3 Level-1b product.
///
/// Construction parses and cross-validates the complete record chain; a
/// product that fails any check is never exposed, not even partially.
/// Afterward the underlying stream is shared behind a mutex and every
/// seek+read pair executes as one atomic unit, so multiple band readers
/// may pull pixel data concurrently without interleaving each other's
/// seeks.
#[derive(Debug)]
pub struct MetopReader<R> {
    shared: Arc<Mutex<R>>,
    layout: ProductLayout,
}

impl MetopReader<File> {
    /// Open a product file from a path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening METOP product: {}", path.display());
        Self::from_stream(File::open(path)?)
    }

    /// Check whether a file looks like a METOP-AVHRR/3 product without
    /// fully parsing it: an MPHR up front and an AVHRR/3 SPHR directly
    /// behind it. Never errors on malformed input, just answers `false`.
    pub fn can_open(path: impl AsRef<Path>) -> bool {
        fn probe(file: &mut File) -> Result<bool> {
            let mphr = RecordHeader::read(file)?;
            if mphr.record_class != RecordClass::Mphr
                || mphr.instrument_group != InstrumentGroup::Generic
                || mphr.record_subclass != 0
            {
                return Ok(false);
            }
            file.seek(SeekFrom::Start(u64::from(mphr.record_size)))?;
            let sphr = RecordHeader::read(file)?;
            Ok(sphr.record_class == RecordClass::Sphr
                && sphr.instrument_group == InstrumentGroup::Avhrr3
                && sphr.record_subclass == 0)
        }
        match File::open(path) {
            Ok(mut file) => probe(&mut file).unwrap_or(false),
            Err(_) => false,
        }
    }
}

impl<R: Read + Seek> MetopReader<R> {
    /// Parse a product from any seekable byte stream.
    pub fn from_stream(mut reader: R) -> Result<Self> {
        let file_len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;
        let layout = ProductLayout::read(&mut reader, file_len)?;
        info!(
            "Product opened: {} x {} pixels, {} navigation points every {} scanlines",
            layout.product_width, layout.product_height, layout.nav_points, layout.nav_sample_rate
        );
        Ok(Self {
            shared: Arc::new(Mutex::new(reader)),
            layout,
        })
    }

    /// The validated product layout, including the addressing functions
    /// band readers use to turn scanline indices into byte positions.
    pub fn layout(&self) -> &ProductLayout {
        &self.layout
    }

    /// The decoded main product header block.
    pub fn mphr(&self) -> &AsciiHeader {
        &self.layout.mphr
    }

    /// The decoded secondary product header block.
    pub fn sphr(&self) -> &AsciiHeader {
        &self.layout.sphr
    }

    /// The radiance calibration coefficients.
    pub fn calibration(&self) -> &RadianceCalibration {
        &self.layout.calibration
    }

    /// Product name from the MPHR.
    pub fn product_name(&self) -> Result<&str> {
        self.layout.product_name()
    }

    /// Sensing start time.
    pub fn start_time(&self) -> Timestamp {
        self.layout.start_time()
    }

    /// Sensing end time.
    pub fn end_time(&self) -> Timestamp {
        self.layout.end_time()
    }

    /// Product-wide channel 3a/3b mode.
    pub fn channel_mode(&self) -> ChannelMode {
        self.layout.channel_mode
    }

    /// Fill `buf` from the given absolute byte offset, as one atomic
    /// seek+read against the shared stream.
    ///
    /// This is the read primitive band readers combine with the layout's
    /// addressing functions.
    pub fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        let mut guard = self.shared.lock().map_err(|_| MetopError::LockPoisoned)?;
        guard.seek(SeekFrom::Start(offset))?;
        stream::read_exact(&mut *guard, buf, "band data")
    }

    /// Read the frame indicator byte of scanline `y`.
    pub fn read_frame_indicator(&self, y: u32) -> Result<u8> {
        let mut guard = self.shared.lock().map_err(|_| MetopError::LockPoisoned)?;
        self.layout.read_frame_indicator(&mut *guard, y)
    }

    /// Extract the sparse navigation grid.
    pub fn tie_points(&self) -> Result<TiePointGrid> {
        navigation::read_tie_points(&self.shared, &self.layout, || false)
    }

    /// Like [`tie_points`](Self::tie_points), consulting `cancel` between
    /// scanlines; on cancellation the remaining rows stay zeroed.
    pub fn tie_points_with_cancel(&self, cancel: impl FnMut() -> bool) -> Result<TiePointGrid> {
        navigation::read_tie_points(&self.shared, &self.layout, cancel)
    }
}
