//! `evac-elevation`: elevation raster access for highest-point search and
//! link altitude differences.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`raster`]   | `GeoTransform`, `Grid`, `CroppedGrid`, in-memory `Raster` |
//! | [`provider`] | `ElevationProvider` trait (implemented by `Raster`)       |
//! | [`lookup`]   | `ElevationLookup`: point altitude, circular crop, maximum |
//! | [`asc`]      | ESRI ASCII grid reader producing a `Raster`               |
//! | [`error`]    | `ElevationError`, `ElevationResult<T>`                    |
//!
//! The routing core only talks to [`ElevationProvider`]; `Raster` and the
//! ASCII reader are one concrete backing for it.

pub mod asc;
pub mod error;
pub mod lookup;
pub mod provider;
pub mod raster;

#[cfg(test)]
mod tests;

pub use asc::{parse_asc, read_asc};
pub use error::{ElevationError, ElevationResult};
pub use lookup::{ElevationLookup, RegionMax};
pub use provider::ElevationProvider;
pub use raster::{CroppedGrid, GeoTransform, Grid, Raster};
