//! Row-major elevation grids and their placement in planar space.
//!
//! # Layout
//!
//! Row 0 is the **northern** edge of the grid; columns grow eastwards.  A
//! [`GeoTransform`] anchors the top-left corner of cell `(0, 0)`:
//!
//! ```text
//! (left, top) ┌────┬────┬────┐
//!             │0,0 │0,1 │0,2 │   cell (r, c) centre =
//!             ├────┼────┼────┤     (left + (c + ½)·w,  top − (r + ½)·h)
//!             │1,0 │1,1 │1,2 │
//!             └────┴────┴────┘
//! ```
//!
//! Cells are `Option<f64>`: `None` marks no-data in the source raster or a
//! cell masked out by a crop.

use geo::{Polygon, Rect, coord};

use evac_core::Coord;

use crate::{ElevationError, ElevationResult};

// ── GeoTransform ──────────────────────────────────────────────────────────────

/// Affine placement of a north-up grid (no rotation terms).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoTransform {
    /// X of the grid's western edge.
    pub left: f64,
    /// Y of the grid's northern edge.
    pub top: f64,
    pub cell_width: f64,
    pub cell_height: f64,
}

impl GeoTransform {
    pub fn new(left: f64, top: f64, cell_width: f64, cell_height: f64) -> Self {
        Self { left, top, cell_width, cell_height }
    }

    /// Square cells of side `cell_size`.
    pub fn square(left: f64, top: f64, cell_size: f64) -> Self {
        Self::new(left, top, cell_size, cell_size)
    }

    /// Planar coordinate of the centre of cell `(row, col)`.
    #[inline]
    pub fn cell_center(&self, row: usize, col: usize) -> Coord {
        Coord::new(
            self.left + (col as f64 + 0.5) * self.cell_width,
            self.top - (row as f64 + 0.5) * self.cell_height,
        )
    }

    /// Fractional `(row, col)` position of `at`.  Floors to the containing
    /// cell; may be negative or past the grid when `at` is outside it.
    #[inline]
    pub fn fractional_index(&self, at: Coord) -> (f64, f64) {
        (
            (self.top - at.y) / self.cell_height,
            (at.x - self.left) / self.cell_width,
        )
    }

    /// Transform of the window whose top-left cell is `(row_off, col_off)`.
    pub fn offset(&self, row_off: usize, col_off: usize) -> GeoTransform {
        GeoTransform {
            left: self.left + col_off as f64 * self.cell_width,
            top:  self.top - row_off as f64 * self.cell_height,
            ..*self
        }
    }
}

// ── Grid ──────────────────────────────────────────────────────────────────────

/// A `rows × cols` row-major array of optional altitudes.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    rows:  usize,
    cols:  usize,
    cells: Vec<Option<f64>>,
}

impl Grid {
    /// Wrap `cells` (row-major, `rows * cols` long).  Non-finite values are
    /// stored as no-data.
    pub fn new(rows: usize, cols: usize, cells: Vec<Option<f64>>) -> ElevationResult<Self> {
        if rows.checked_mul(cols) != Some(cells.len()) {
            return Err(ElevationError::InvalidGrid(format!(
                "{rows}x{cols} grid does not fit {} cells",
                cells.len()
            )));
        }
        let cells = cells
            .into_iter()
            .map(|v| v.filter(|a| a.is_finite()))
            .collect();
        Ok(Self { rows, cols, cells })
    }

    /// Grid with every cell valid, from nested rows (north first).
    pub fn from_rows(rows: &[Vec<f64>]) -> ElevationResult<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != cols) {
            return Err(ElevationError::InvalidGrid("ragged rows".into()));
        }
        let cells = rows.iter().flatten().map(|&v| Some(v)).collect();
        Self::new(rows.len(), cols, cells)
    }

    pub fn rows(&self) -> usize { self.rows }
    pub fn cols(&self) -> usize { self.cols }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells[row * self.cols + col]
    }

    /// Number of cells holding a value.
    pub fn valid_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// `(row, col, altitude)` of the highest valid cell.
    ///
    /// Ties resolve to the first cell in row-major order.  `None` if every
    /// cell is no-data.
    pub fn max_cell(&self) -> Option<(usize, usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (i, cell) in self.cells.iter().enumerate() {
            if let Some(v) = *cell {
                if best.is_none_or(|(_, b)| v > b) {
                    best = Some((i, v));
                }
            }
        }
        best.map(|(i, v)| (i / self.cols, i % self.cols, v))
    }
}

// ── CroppedGrid ───────────────────────────────────────────────────────────────

/// The window of a raster covering a region, cells outside the region masked.
#[derive(Clone, Debug, PartialEq)]
pub struct CroppedGrid {
    pub grid:      Grid,
    pub transform: GeoTransform,
}

// ── Raster ────────────────────────────────────────────────────────────────────

/// An in-memory elevation raster.
///
/// Implements [`ElevationProvider`](crate::ElevationProvider); see
/// `provider.rs` for the crop and point-lookup semantics.
#[derive(Clone, Debug)]
pub struct Raster {
    pub(crate) grid:      Grid,
    pub(crate) transform: GeoTransform,
}

impl Raster {
    pub fn new(grid: Grid, transform: GeoTransform) -> ElevationResult<Self> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if !ok(transform.cell_width) || !ok(transform.cell_height) {
            return Err(ElevationError::InvalidGrid(format!(
                "cell size must be positive, got {}x{}",
                transform.cell_width, transform.cell_height
            )));
        }
        if grid.rows() == 0 || grid.cols() == 0 {
            return Err(ElevationError::InvalidGrid("raster has no cells".into()));
        }
        Ok(Self { grid, transform })
    }

    pub fn grid(&self) -> &Grid { &self.grid }
    pub fn transform(&self) -> &GeoTransform { &self.transform }

    /// Bounding rectangle of the raster's cells.
    pub fn bounds(&self) -> Rect<f64> {
        let t = &self.transform;
        Rect::new(
            coord! { x: t.left, y: t.top - self.grid.rows() as f64 * t.cell_height },
            coord! { x: t.left + self.grid.cols() as f64 * t.cell_width, y: t.top },
        )
    }

    pub fn extent_polygon(&self) -> Polygon<f64> {
        self.bounds().to_polygon()
    }

    /// The cell containing `at`, or `None` outside the raster.
    pub fn cell_at(&self, at: Coord) -> Option<(usize, usize)> {
        let (r, c) = self.transform.fractional_index(at);
        if !(r.is_finite() && c.is_finite()) || r < 0.0 || c < 0.0 {
            return None;
        }
        let (row, col) = (r.floor() as usize, c.floor() as usize);
        (row < self.grid.rows() && col < self.grid.cols()).then_some((row, col))
    }
}
