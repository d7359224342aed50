//! Queries the routing core makes against an [`ElevationProvider`].

use std::f64::consts::TAU;

use geo::{Area, BooleanOps, LineString, MultiPolygon, Polygon, coord};
use log::debug;

use evac_core::Coord;

use crate::{CroppedGrid, ElevationError, ElevationProvider, ElevationResult};

/// Vertices used to approximate a circular search buffer.
pub const BUFFER_SEGMENTS: usize = 64;

/// Highest valid cell of a searched region.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RegionMax {
    /// Centre of the highest cell.
    pub location: Coord,
    pub altitude: f64,
}

/// Borrowing adapter that turns a provider into the three queries the
/// highest-point search and link annotation need.
pub struct ElevationLookup<'a, P: ElevationProvider + ?Sized> {
    provider: &'a P,
    segments: usize,
}

impl<'a, P: ElevationProvider + ?Sized> ElevationLookup<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self { provider, segments: BUFFER_SEGMENTS }
    }

    /// Override the polygon resolution of search buffers (minimum 8).
    pub fn with_segments(mut self, segments: usize) -> Self {
        self.segments = segments.max(8);
        self
    }

    pub fn provider(&self) -> &'a P {
        self.provider
    }

    /// Direct point lookup.
    pub fn altitude_at(&self, at: Coord) -> ElevationResult<f64> {
        self.provider.altitude_at(at)
    }

    /// `altitude(end) - altitude(start)`.
    pub fn altitude_difference(&self, start: Coord, end: Coord) -> ElevationResult<f64> {
        Ok(self.provider.altitude_at(end)? - self.provider.altitude_at(start)?)
    }

    /// The circular buffer of `radius` around `center`, clipped to the
    /// provider's coverage.
    pub fn search_region(&self, center: Coord, radius: f64) -> ElevationResult<MultiPolygon<f64>> {
        let buffer = circle(center, radius, self.segments);
        let clipped = buffer.intersection(&self.provider.coverage_extent());
        if clipped.0.is_empty() || clipped.unsigned_area() <= 0.0 {
            return Err(ElevationError::RegionEmpty);
        }
        Ok(clipped)
    }

    /// Masked window of the grid over the clipped search buffer.
    pub fn crop_circle(&self, center: Coord, radius: f64) -> ElevationResult<CroppedGrid> {
        let region = self.search_region(center, radius)?;
        self.provider.crop_to_region(&region)
    }

    /// Highest cell within `radius` of `center`.
    ///
    /// Ties resolve to the first cell in row-major order of the cropped
    /// window (northernmost, then westernmost).
    pub fn max_altitude(&self, center: Coord, radius: f64) -> ElevationResult<RegionMax> {
        let cropped = self.crop_circle(center, radius)?;
        let (row, col, altitude) = cropped.grid.max_cell().ok_or(ElevationError::RegionEmpty)?;
        let location = cropped.transform.cell_center(row, col);
        debug!(
            "radius {radius} m around {center}: {} valid cells, max {altitude} m at {location}",
            cropped.grid.valid_count()
        );
        Ok(RegionMax { location, altitude })
    }
}

/// Regular `segments`-gon inscribed in the circle.
fn circle(center: Coord, radius: f64, segments: usize) -> Polygon<f64> {
    let ring: LineString<f64> = (0..segments)
        .map(|i| {
            let theta = TAU * i as f64 / segments as f64;
            coord! { x: center.x + radius * theta.cos(), y: center.y + radius * theta.sin() }
        })
        .collect();
    Polygon::new(ring, vec![])
}
