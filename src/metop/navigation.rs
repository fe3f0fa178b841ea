//! Sparse navigation (tie-point) grid extraction.
//!
//! Every `nav_sample_rate`-th scanline carries a navigation block: four
//! signed 16-bit viewing-geometry angles per navigation point followed by
//! a signed 32-bit latitude/longitude pair per point. The extracted grid
//! is handed to an external geocoding collaborator for interpolation to
//! full pixel resolution; no interpolation happens here.

use std::io::{Read, Seek, SeekFrom};
use std::sync::Mutex;

use byteorder::{BigEndian, ByteOrder};
use log::debug;

use super::error::{MetopError, Result};
use super::layout::ProductLayout;
use super::stream;

/// The six parallel tie-point sequences, row-major by scanline then by
/// navigation point. Angles are in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct TiePointGrid {
    /// Navigation points per sampled scanline.
    pub width: u32,
    /// Number of sampled scanlines.
    pub height: u32,
    pub solar_zenith: Vec<f32>,
    pub view_zenith: Vec<f32>,
    pub solar_azimuth: Vec<f32>,
    pub view_azimuth: Vec<f32>,
    pub latitude: Vec<f32>,
    pub longitude: Vec<f32>,
}

/// Extract the full tie-point grid.
///
/// `cancel` is consulted between scanlines; when it returns true the
/// extraction stops early and the rows past the cancellation point stay
/// zeroed. Each scanline's seek+read executes under one lock acquisition,
/// so a concurrent band reader never observes a half-seeked stream and
/// cancellation cannot leave one behind.
pub fn read_tie_points<R: Read + Seek>(
    shared: &Mutex<R>,
    layout: &ProductLayout,
    mut cancel: impl FnMut() -> bool,
) -> Result<TiePointGrid> {
    let rate = layout.nav_sample_rate;
    let width = layout.nav_points as usize;
    let grid_height = layout.product_height / rate + 1;
    let num_tie_points = width * grid_height as usize;

    let mut grid = TiePointGrid {
        width: layout.nav_points,
        height: grid_height,
        solar_zenith: vec![0.0; num_tie_points],
        view_zenith: vec![0.0; num_tie_points],
        solar_azimuth: vec![0.0; num_tie_points],
        view_azimuth: vec![0.0; num_tie_points],
        latitude: vec![0.0; num_tie_points],
        longitude: vec![0.0; num_tie_points],
    };

    // Four 2-byte angles per point, then one 4-byte lat/lon pair per point.
    let angle_bytes = width * 8;
    let latlon_bytes = width * 8;
    let mut block = vec![0u8; angle_bytes + latlon_bytes];

    let mut target = 0usize;
    let mut y = 0u32;
    while y < layout.product_height {
        if cancel() {
            debug!("tie-point extraction canceled at scanline {}", y);
            break;
        }
        {
            let mut guard = shared.lock().map_err(|_| MetopError::LockPoisoned)?;
            guard.seek(SeekFrom::Start(layout.tie_point_offset(y)))?;
            stream::read_exact(&mut *guard, &mut block, "navigation block")?;
        }

        let (angles, latlon) = block.split_at(angle_bytes);
        for point in 0..width {
            let a = point * 8;
            grid.solar_zenith[target] = f32::from(BigEndian::read_i16(&angles[a..])) * 1E-2;
            grid.view_zenith[target] = f32::from(BigEndian::read_i16(&angles[a + 2..])) * 1E-2;
            grid.solar_azimuth[target] = f32::from(BigEndian::read_i16(&angles[a + 4..])) * 1E-2;
            grid.view_azimuth[target] = f32::from(BigEndian::read_i16(&angles[a + 6..])) * 1E-2;

            let l = point * 8;
            grid.latitude[target] = BigEndian::read_i32(&latlon[l..]) as f32 * 1E-4;
            grid.longitude[target] = BigEndian::read_i32(&latlon[l + 4..]) as f32 * 1E-4;
            target += 1;
        }
        y += rate;
    }

    Ok(grid)
}
