//! Operating area of the shipped Solent / Isle of Wight data.
//!
//! A location is accepted if it lies in the data's bounding box or, failing
//! that, on the island outline loaded with `--boundary`.  Points on either
//! edge count as inside.

use std::path::Path;

use anyhow::{Context, Result, bail};
use geo::{Geometry, Intersects, MultiPolygon, Point, Rect, coord};
use geojson::GeoJson;

use evac_core::Coord;

// British National Grid, metres.
const MIN_EASTING:  f64 = 430_000.0;
const MIN_NORTHING: f64 = 80_000.0;
const MAX_EASTING:  f64 = 465_000.0;
const MAX_NORTHING: f64 = 95_000.0;

/// Which test accepted a location.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Placement {
    InBox,
    OnIsland,
}

pub struct OperatingArea {
    bounds: Rect<f64>,
    island: Option<MultiPolygon<f64>>,
}

impl OperatingArea {
    /// The bounding box alone.
    pub fn new() -> Self {
        Self {
            bounds: Rect::new(
                coord! { x: MIN_EASTING, y: MIN_NORTHING },
                coord! { x: MAX_EASTING, y: MAX_NORTHING },
            ),
            island: None,
        }
    }

    pub fn with_island(mut self, island: MultiPolygon<f64>) -> Self {
        self.island = Some(island);
        self
    }

    pub fn placement(&self, at: Coord) -> Option<Placement> {
        let point = Point::new(at.x, at.y);
        if self.bounds.intersects(&point) {
            return Some(Placement::InBox);
        }
        self.island
            .as_ref()
            .filter(|island| island.intersects(&point))
            .map(|_| Placement::OnIsland)
    }

    pub fn check(&self, at: Coord) -> Result<Placement> {
        match self.placement(at) {
            Some(p) => Ok(p),
            None if self.island.is_some() => bail!("location {at} is outside the bounding box and off the island"),
            None => bail!(
                "location {at} is outside the operating area ({MIN_EASTING}, {MIN_NORTHING})–({MAX_EASTING}, {MAX_NORTHING})"
            ),
        }
    }
}

/// Load the island outline from a GeoJSON file.
pub fn load_boundary(path: &Path) -> Result<MultiPolygon<f64>> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading boundary {}", path.display()))?;
    parse_boundary(&text).with_context(|| format!("parsing boundary {}", path.display()))
}

/// Every polygon in a GeoJSON document, in British National Grid metres.
pub fn parse_boundary(text: &str) -> Result<MultiPolygon<f64>> {
    let geojson: GeoJson = text.parse()?;
    let collection: geo::GeometryCollection<f64> = geojson::quick_collection(&geojson)?;

    let mut polygons = Vec::new();
    for geometry in collection {
        match geometry {
            Geometry::Polygon(p) => polygons.push(p),
            Geometry::MultiPolygon(mp) => polygons.extend(mp),
            _ => {}
        }
    }
    if polygons.is_empty() {
        bail!("boundary holds no polygon");
    }
    Ok(MultiPolygon::new(polygons))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A diamond straddling the southern edge of the box.
    const ISLAND: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": { "name": "island" },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [450000, 76000], [455000, 81000], [450000, 86000],
                    [445000, 81000], [450000, 76000]
                ]]
            }
        }]
    }"#;

    fn with_island() -> OperatingArea {
        OperatingArea::new().with_island(parse_boundary(ISLAND).unwrap())
    }

    #[test]
    fn boundary_is_inside() {
        let area = OperatingArea::new();
        assert_eq!(area.placement(Coord::new(430_000.0, 80_000.0)), Some(Placement::InBox));
        assert_eq!(area.placement(Coord::new(465_000.0, 90_000.0)), Some(Placement::InBox));
        assert_eq!(area.placement(Coord::new(450_000.0, 85_000.0)), Some(Placement::InBox));
    }

    #[test]
    fn outside_is_rejected() {
        let area = OperatingArea::new();
        assert_eq!(area.placement(Coord::new(429_999.9, 85_000.0)), None);
        assert!(area.check(Coord::new(450_000.0, 95_000.1)).is_err());
    }

    #[test]
    fn box_wins_over_island() {
        assert_eq!(with_island().placement(Coord::new(450_000.0, 82_000.0)), Some(Placement::InBox));
    }

    #[test]
    fn south_of_box_but_on_island() {
        let area = with_island();
        assert_eq!(area.check(Coord::new(450_000.0, 78_000.0)).unwrap(), Placement::OnIsland);
        // On the outline itself.
        assert_eq!(area.placement(Coord::new(450_000.0, 76_000.0)), Some(Placement::OnIsland));
        assert_eq!(OperatingArea::new().placement(Coord::new(450_000.0, 78_000.0)), None);
    }

    #[test]
    fn off_box_and_island() {
        let area = with_island();
        assert_eq!(area.placement(Coord::new(440_000.0, 76_000.0)), None);
        assert!(area.check(Coord::new(440_000.0, 76_000.0)).is_err());
    }

    #[test]
    fn boundary_without_polygons_is_rejected() {
        let point = r#"{ "type": "Point", "coordinates": [450000, 80000] }"#;
        assert!(parse_boundary(point).is_err());
        assert!(parse_boundary("not json").is_err());
    }
}
