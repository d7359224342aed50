//! Unit tests for evac-elevation.
//!
//! All tests use small hand-built rasters so they run without any DEM file.

#[cfg(test)]
mod helpers {
    use crate::{GeoTransform, Grid, Raster};

    /// 10×10 raster of 10 m cells covering (0,0)–(100,100).
    ///
    /// `alt(row, col) = col·10 + (9 − row)`: rises eastwards, and northwards
    /// within a column, so the global maximum (99) is the north-east cell.
    pub fn ramp() -> Raster {
        let rows: Vec<Vec<f64>> = (0..10)
            .map(|r| (0..10).map(|c| (c * 10 + (9 - r)) as f64).collect())
            .collect();
        Raster::new(Grid::from_rows(&rows).unwrap(), GeoTransform::square(0.0, 100.0, 10.0))
            .unwrap()
    }

    pub fn all_nodata() -> Raster {
        let grid = Grid::new(4, 4, vec![None; 16]).unwrap();
        Raster::new(grid, GeoTransform::square(0.0, 40.0, 10.0)).unwrap()
    }
}

// ── Grid & transform ──────────────────────────────────────────────────────────

#[cfg(test)]
mod grid {
    use evac_core::Coord;

    use crate::{ElevationError, GeoTransform, Grid};

    #[test]
    fn cell_centre() {
        let t = GeoTransform::square(430_000.0, 95_000.0, 50.0);
        assert_eq!(t.cell_center(0, 0), Coord::new(430_025.0, 94_975.0));
        assert_eq!(t.cell_center(2, 3), Coord::new(430_175.0, 94_875.0));
    }

    #[test]
    fn offset_moves_origin() {
        let t = GeoTransform::square(0.0, 100.0, 10.0).offset(3, 2);
        assert_eq!(t.left, 20.0);
        assert_eq!(t.top, 70.0);
        assert_eq!(t.cell_width, 10.0);
    }

    #[test]
    fn size_mismatch_rejected() {
        let err = Grid::new(2, 2, vec![Some(1.0); 3]).unwrap_err();
        assert!(matches!(err, ElevationError::InvalidGrid(_)));
    }

    #[test]
    fn overflowing_dimensions_rejected() {
        let err = Grid::new(usize::MAX, 2, vec![Some(1.0); 2]).unwrap_err();
        assert!(matches!(err, ElevationError::InvalidGrid(_)));
    }

    #[test]
    fn max_ties_take_first_in_row_major_order() {
        let g = Grid::new(2, 3, vec![
            Some(1.0), Some(7.0), None,
            Some(7.0), Some(2.0), Some(7.0),
        ])
        .unwrap();
        assert_eq!(g.max_cell(), Some((0, 1, 7.0)));
    }

    #[test]
    fn max_skips_nodata_and_nan() {
        let g = Grid::new(1, 3, vec![None, Some(f64::NAN), Some(-3.0)]).unwrap();
        assert_eq!(g.valid_count(), 1);
        assert_eq!(g.max_cell(), Some((0, 2, -3.0)));
        assert_eq!(Grid::new(1, 1, vec![None]).unwrap().max_cell(), None);
    }
}

// ── Provider (Raster) ─────────────────────────────────────────────────────────

#[cfg(test)]
mod provider {
    use evac_core::Coord;
    use geo::{MultiPolygon, Rect, coord};

    use crate::{ElevationError, ElevationProvider};

    #[test]
    fn point_lookup() {
        let r = super::helpers::ramp();
        assert_eq!(r.altitude_at(Coord::new(5.0, 95.0)).unwrap(), 9.0);
        assert_eq!(r.altitude_at(Coord::new(95.0, 95.0)).unwrap(), 99.0);
        assert_eq!(r.altitude_at(Coord::new(12.0, 3.0)).unwrap(), 10.0);
    }

    #[test]
    fn point_outside_coverage() {
        let r = super::helpers::ramp();
        for p in [Coord::new(-1.0, 50.0), Coord::new(100.0, 50.0), Coord::new(50.0, 100.5)] {
            assert!(matches!(r.altitude_at(p), Err(ElevationError::OutOfCoverage(_))));
        }
    }

    #[test]
    fn point_on_nodata() {
        let r = super::helpers::all_nodata();
        assert!(matches!(r.altitude_at(Coord::new(5.0, 5.0)), Err(ElevationError::NoData(_))));
    }

    #[test]
    fn extent_matches_cells() {
        let r = super::helpers::ramp();
        let b = r.bounds();
        assert_eq!(b.min(), coord! { x: 0.0, y: 0.0 });
        assert_eq!(b.max(), coord! { x: 100.0, y: 100.0 });
    }

    #[test]
    fn crop_rect_keeps_whole_window() {
        let r = super::helpers::ramp();
        let region = MultiPolygon::new(vec![
            Rect::new(coord! { x: 20.0, y: 60.0 }, coord! { x: 40.0, y: 80.0 }).to_polygon(),
        ]);
        let cropped = r.crop_to_region(&region).unwrap();
        assert_eq!((cropped.grid.rows(), cropped.grid.cols()), (2, 2));
        assert_eq!(cropped.grid.valid_count(), 4);
        assert_eq!(cropped.transform.left, 20.0);
        assert_eq!(cropped.transform.top, 80.0);
        // Window cell (0,0) is raster cell (2,2).
        assert_eq!(cropped.grid.get(0, 0), Some(27.0));
    }

    #[test]
    fn crop_outside_raster_is_empty() {
        let r = super::helpers::ramp();
        let region = MultiPolygon::new(vec![
            Rect::new(coord! { x: 500.0, y: 500.0 }, coord! { x: 600.0, y: 600.0 }).to_polygon(),
        ]);
        assert!(matches!(r.crop_to_region(&region), Err(ElevationError::RegionEmpty)));
    }
}

// ── Lookup ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod lookup {
    use evac_core::Coord;

    use crate::{ElevationError, ElevationLookup};

    #[test]
    fn circle_crop_masks_corners() {
        let r = super::helpers::ramp();
        let cropped = ElevationLookup::new(&r).crop_circle(Coord::new(50.0, 50.0), 20.0).unwrap();
        // Bounding window [30,70]² → 4×4 cells; the 4 corner centres are
        // 21.2 m from the centre and fall outside the buffer.
        assert_eq!((cropped.grid.rows(), cropped.grid.cols()), (4, 4));
        assert_eq!(cropped.grid.valid_count(), 12);
        assert_eq!(cropped.grid.get(0, 0), None);
        assert!(cropped.grid.get(0, 1).is_some());
    }

    #[test]
    fn max_altitude_within_radius() {
        let r = super::helpers::ramp();
        let max = ElevationLookup::new(&r).max_altitude(Coord::new(50.0, 50.0), 20.0).unwrap();
        // Easternmost reachable column is 6 (x = 65); its northernmost
        // in-buffer cell is row 4 (y = 55): 60 + 5.
        assert_eq!(max.altitude, 65.0);
        assert_eq!(max.location, Coord::new(65.0, 55.0));
    }

    #[test]
    fn larger_radius_reaches_higher_ground() {
        let r = super::helpers::ramp();
        let lookup = ElevationLookup::new(&r);
        let near = lookup.max_altitude(Coord::new(50.0, 50.0), 20.0).unwrap();
        let far  = lookup.max_altitude(Coord::new(50.0, 50.0), 80.0).unwrap();
        assert!(far.altitude > near.altitude);
    }

    #[test]
    fn buffer_clipped_to_coverage() {
        let r = super::helpers::ramp();
        let lookup = ElevationLookup::new(&r);
        let cropped = lookup.crop_circle(Coord::new(0.0, 50.0), 20.0).unwrap();
        assert_eq!(cropped.transform.left, 0.0);
        assert_eq!(cropped.grid.cols(), 2);
    }

    #[test]
    fn buffer_outside_coverage_is_region_empty() {
        let r = super::helpers::ramp();
        let res = ElevationLookup::new(&r).max_altitude(Coord::new(1_000.0, 1_000.0), 50.0);
        assert!(matches!(res, Err(ElevationError::RegionEmpty)));
    }

    #[test]
    fn nodata_region_is_region_empty() {
        let r = super::helpers::all_nodata();
        let res = ElevationLookup::new(&r).max_altitude(Coord::new(20.0, 20.0), 15.0);
        assert!(matches!(res, Err(ElevationError::RegionEmpty)));
    }

    #[test]
    fn altitude_difference_is_end_minus_start() {
        let r = super::helpers::ramp();
        let lookup = ElevationLookup::new(&r);
        let d = lookup.altitude_difference(Coord::new(5.0, 95.0), Coord::new(95.0, 95.0)).unwrap();
        assert_eq!(d, 90.0);
    }
}

// ── ESRI ASCII grid ───────────────────────────────────────────────────────────

#[cfg(test)]
mod asc {
    use std::io::Write;

    use evac_core::Coord;

    use crate::{ElevationError, ElevationProvider, parse_asc, read_asc};

    const SAMPLE: &str = "\
ncols 3
nrows 2
xllcorner 100
yllcorner 200
cellsize 10
NODATA_value -9999
1 2 3
4 -9999 6
";

    #[test]
    fn parses_header_and_body() {
        let r = parse_asc(SAMPLE.as_bytes()).unwrap();
        assert_eq!((r.grid().rows(), r.grid().cols()), (2, 3));
        assert_eq!(r.transform().left, 100.0);
        assert_eq!(r.transform().top, 220.0);
        assert_eq!(r.altitude_at(Coord::new(105.0, 215.0)).unwrap(), 1.0);
        assert_eq!(r.altitude_at(Coord::new(125.0, 205.0)).unwrap(), 6.0);
        assert!(matches!(
            r.altitude_at(Coord::new(115.0, 205.0)),
            Err(ElevationError::NoData(_))
        ));
    }

    #[test]
    fn centre_registered_header() {
        let text = "NCOLS 1\nNROWS 1\nXLLCENTER 105\nYLLCENTER 205\nCELLSIZE 10\n42\n";
        let r = parse_asc(text.as_bytes()).unwrap();
        assert_eq!(r.transform().left, 100.0);
        assert_eq!(r.transform().top, 210.0);
    }

    #[test]
    fn wrong_cell_count() {
        let text = "ncols 2\nnrows 2\nxllcorner 0\nyllcorner 0\ncellsize 1\n1 2 3\n";
        assert!(matches!(parse_asc(text.as_bytes()), Err(ElevationError::Parse(_))));
    }

    #[test]
    fn too_many_cells() {
        let text = "ncols 1\nnrows 2\nxllcorner 0\nyllcorner 0\ncellsize 1\n1 2 3\n";
        assert!(matches!(parse_asc(text.as_bytes()), Err(ElevationError::Parse(_))));
    }

    #[test]
    fn overflowing_header_is_parse_error() {
        let text = "ncols 4294967296\nnrows 4294967296\nxllcorner 0\nyllcorner 0\ncellsize 1\n1 2 3\n";
        assert!(matches!(parse_asc(text.as_bytes()), Err(ElevationError::Parse(_))));
    }

    #[test]
    fn huge_header_with_short_body_is_parse_error() {
        // Ten billion cells claimed, three supplied.
        let text = "ncols 100000\nnrows 100000\nxllcorner 0\nyllcorner 0\ncellsize 1\n1 2 3\n";
        assert!(matches!(parse_asc(text.as_bytes()), Err(ElevationError::Parse(_))));
    }

    #[test]
    fn missing_and_unknown_keys() {
        let no_cellsize = "ncols 1\nnrows 1\nxllcorner 0\nyllcorner 0\n1\n";
        assert!(matches!(parse_asc(no_cellsize.as_bytes()), Err(ElevationError::Parse(_))));
        let unknown = "ncols 1\nnrows 1\nfoo 3\n";
        assert!(matches!(parse_asc(unknown.as_bytes()), Err(ElevationError::Parse(_))));
    }

    #[test]
    fn reads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let r = read_asc(file.path()).unwrap();
        assert_eq!(r.grid().valid_count(), 5);
    }
}
