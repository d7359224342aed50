//! The elevation collaborator contract.
//!
//! The routing core needs three things from an elevation source: the
//! altitude under a point, the polygon it covers, and a cropped, masked
//! window of its grid over an arbitrary region.  [`Raster`] answers all three
//! from memory; other backings (tiled DEM stores, remote services) implement
//! the same trait.

use geo::{BoundingRect, Intersects, MultiPolygon, Point, Polygon};
use log::trace;

use evac_core::Coord;

use crate::{CroppedGrid, ElevationError, ElevationResult, Grid, Raster};

/// Tolerance, in cells, when snapping a region's bounding box to the grid.
const EDGE_EPS: f64 = 1e-6;

/// Source of altitude data in the workspace's planar reference system.
///
/// Implementations must be `Send + Sync`: a provider is shared read-only by
/// the highest-point search and link annotation.
pub trait ElevationProvider: Send + Sync {
    /// Altitude at `at`, metres.
    fn altitude_at(&self, at: Coord) -> ElevationResult<f64>;

    /// Polygon covered by the provider's data.
    fn coverage_extent(&self) -> Polygon<f64>;

    /// Crop the grid to the bounding window of `region` and mask every cell
    /// whose centre falls outside `region`.
    ///
    /// Returns [`ElevationError::RegionEmpty`] when the window holds no cells.
    fn crop_to_region(&self, region: &MultiPolygon<f64>) -> ElevationResult<CroppedGrid>;
}

impl ElevationProvider for Raster {
    fn altitude_at(&self, at: Coord) -> ElevationResult<f64> {
        let (row, col) = self.cell_at(at).ok_or(ElevationError::OutOfCoverage(at))?;
        self.grid.get(row, col).ok_or(ElevationError::NoData(at))
    }

    fn coverage_extent(&self) -> Polygon<f64> {
        self.extent_polygon()
    }

    fn crop_to_region(&self, region: &MultiPolygon<f64>) -> ElevationResult<CroppedGrid> {
        let bbox = region.bounding_rect().ok_or(ElevationError::RegionEmpty)?;
        let t = &self.transform;

        // Window rounded outwards to whole cells, clamped to the raster.  A
        // region edge within EDGE_EPS of a cell boundary does not pull in
        // the neighbouring row or column.
        let (row_lo, col_lo) = t.fractional_index(Coord::new(bbox.min().x, bbox.max().y));
        let (row_hi, col_hi) = t.fractional_index(Coord::new(bbox.max().x, bbox.min().y));
        let row_start = clamp_index((row_lo + EDGE_EPS).floor(), self.grid.rows());
        let row_end   = clamp_index((row_hi - EDGE_EPS).ceil(), self.grid.rows());
        let col_start = clamp_index((col_lo + EDGE_EPS).floor(), self.grid.cols());
        let col_end   = clamp_index((col_hi - EDGE_EPS).ceil(), self.grid.cols());

        if row_start >= row_end || col_start >= col_end {
            return Err(ElevationError::RegionEmpty);
        }

        let rows = row_end - row_start;
        let cols = col_end - col_start;
        let mut cells = Vec::with_capacity(rows * cols);
        for row in row_start..row_end {
            for col in col_start..col_end {
                let centre = t.cell_center(row, col);
                let inside = region.intersects(&Point::new(centre.x, centre.y));
                cells.push(if inside { self.grid.get(row, col) } else { None });
            }
        }
        trace!("cropped window rows {row_start}..{row_end}, cols {col_start}..{col_end}");

        Ok(CroppedGrid {
            grid:      Grid::new(rows, cols, cells)?,
            transform: t.offset(row_start, col_start),
        })
    }
}

/// Clamp a fractional index into `0..=len`.
fn clamp_index(v: f64, len: usize) -> usize {
    if v.is_nan() || v <= 0.0 {
        0
    } else if v >= len as f64 {
        len
    } else {
        v as usize
    }
}
