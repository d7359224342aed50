//! Elevation-subsystem error type.

use thiserror::Error;

use evac_core::Coord;

/// Errors produced by `evac-elevation`.
#[derive(Debug, Error)]
pub enum ElevationError {
    /// The search region holds no valid cell, e.g. a buffer entirely
    /// outside raster coverage or covering only no-data cells.
    #[error("search region contains no valid elevation cells")]
    RegionEmpty,

    #[error("point {0} lies outside the elevation coverage")]
    OutOfCoverage(Coord),

    #[error("no elevation data at {0}")]
    NoData(Coord),

    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    #[error("ASCII grid parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ElevationResult<T> = Result<T, ElevationError>;
