//! ESRI ASCII grid reader.
//!
//! # Format
//!
//! ```text
//! ncols         4
//! nrows         2
//! xllcorner     430000
//! yllcorner     80000
//! cellsize      50
//! NODATA_value  -9999
//! 12.0 13.5 -9999 20.1
//! 11.2 12.9  14.0 19.8
//! ```
//!
//! Header keys are case-insensitive.  `xllcenter`/`yllcenter` may replace the
//! corner keys; `NODATA_value` is optional.  Values follow in row-major
//! order, northern row first, separated by any whitespace.

use std::io::Read;
use std::path::Path;

use log::info;

use crate::{ElevationError, ElevationResult, GeoTransform, Grid, Raster};

#[derive(Default)]
struct Header {
    ncols:    Option<usize>,
    nrows:    Option<usize>,
    xll:      Option<(f64, bool)>, // (value, is_center)
    yll:      Option<(f64, bool)>,
    cellsize: Option<f64>,
    nodata:   Option<f64>,
}

/// Read an ASCII grid from a file.
pub fn read_asc(path: &Path) -> ElevationResult<Raster> {
    let file = std::fs::File::open(path)?;
    let raster = parse_asc(file)?;
    info!(
        "loaded {}x{} elevation grid from {}",
        raster.grid().rows(),
        raster.grid().cols(),
        path.display()
    );
    Ok(raster)
}

/// Like [`read_asc`] but accepts any `Read` source.
pub fn parse_asc<R: Read>(mut reader: R) -> ElevationResult<Raster> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let mut tokens = text.split_whitespace().peekable();

    // ── Header ────────────────────────────────────────────────────────────
    let mut header = Header::default();
    while let Some(&key) = tokens.peek() {
        if !key.starts_with(|c: char| c.is_ascii_alphabetic()) {
            break;
        }
        tokens.next();
        let value = tokens
            .next()
            .ok_or_else(|| ElevationError::Parse(format!("header key {key} has no value")))?;
        match key.to_ascii_lowercase().as_str() {
            "ncols"        => header.ncols = Some(parse_num(key, value)?),
            "nrows"        => header.nrows = Some(parse_num(key, value)?),
            "xllcorner"    => header.xll = Some((parse_num(key, value)?, false)),
            "xllcenter"    => header.xll = Some((parse_num(key, value)?, true)),
            "yllcorner"    => header.yll = Some((parse_num(key, value)?, false)),
            "yllcenter"    => header.yll = Some((parse_num(key, value)?, true)),
            "cellsize"     => header.cellsize = Some(parse_num(key, value)?),
            "nodata_value" => header.nodata = Some(parse_num(key, value)?),
            other => return Err(ElevationError::Parse(format!("unknown header key {other}"))),
        }
    }

    let missing = |k: &str| ElevationError::Parse(format!("missing header key {k}"));
    let ncols = header.ncols.ok_or_else(|| missing("ncols"))?;
    let nrows = header.nrows.ok_or_else(|| missing("nrows"))?;
    let (xll, x_center) = header.xll.ok_or_else(|| missing("xllcorner"))?;
    let (yll, y_center) = header.yll.ok_or_else(|| missing("yllcorner"))?;
    let cellsize = header.cellsize.ok_or_else(|| missing("cellsize"))?;

    let expected = nrows
        .checked_mul(ncols)
        .ok_or_else(|| ElevationError::Parse(format!("{nrows}x{ncols} grid is too large")))?;

    let left   = if x_center { xll - cellsize / 2.0 } else { xll };
    let bottom = if y_center { yll - cellsize / 2.0 } else { yll };
    let top    = bottom + nrows as f64 * cellsize;

    // ── Body ──────────────────────────────────────────────────────────────
    // Sized from the body, so a lying header cannot force a huge allocation.
    let mut cells = Vec::new();
    for token in tokens {
        if cells.len() == expected {
            return Err(ElevationError::Parse(format!(
                "expected {expected} cell values, found more"
            )));
        }
        let v: f64 = parse_num("cell", token)?;
        cells.push(match header.nodata {
            Some(nd) if v == nd => None,
            _ => Some(v),
        });
    }
    if cells.len() != expected {
        return Err(ElevationError::Parse(format!(
            "expected {expected} cell values, found {}",
            cells.len()
        )));
    }

    Raster::new(Grid::new(nrows, ncols, cells)?, GeoTransform::square(left, top, cellsize))
}

fn parse_num<T: std::str::FromStr>(what: &str, token: &str) -> ElevationResult<T> {
    token
        .parse()
        .map_err(|_| ElevationError::Parse(format!("{what}: cannot parse {token:?}")))
}
