//! # metop-reader
//!
//! A reader for METOP-AVHRR/3 Level-1b data products in the EUMETSAT EPS
//! format. Decodes the record chain (MPHR, SPHR, internal pointer records,
//! the radiance-calibration GIADR) into a validated in-memory layout,
//! derives the byte addressing for per-scanline pixel, flag, and
//! navigation data, and extracts the sparse tie-point grid.
//!
//! Radiometric calibration math, geocoding interpolation, and product
//! assembly are deliberately left to external collaborators; this crate
//! locates the bytes and validates the layout.
pub mod metop;

// Re-export the main types for convenience
pub use metop::{
    ascii::AsciiHeader,
    giadr::{Channel, RadianceCalibration},
    grh::{InstrumentGroup, RecordClass, RecordHeader, Timestamp},
    ipr::{PointerRecord, PointerTable},
    layout::{ChannelMode, ProductLayout},
    navigation::TiePointGrid,
    MetopError, MetopReader, Result,
};
