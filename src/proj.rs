//! Coordinate reprojection between the geographic source CRS and the
//! per-country working CRS.

use geo::{Coord, MapCoords, MultiPolygon, Point};
use proj4rs::{proj::Proj as Proj4, transform::transform};

use crate::error::PlotError;

/// Geographic CRS of every raw input dataset.
pub const WGS84: &str = "EPSG:4326";

/// Resolve a CRS identifier to a PROJ.4 string. Accepts the geographic and
/// mercator EPSG codes the settings table uses, or a raw `+proj=` string.
fn proj_string(crs: &str) -> Result<String, PlotError> {
    if crs.starts_with("+proj=") {
        return Ok(crs.to_string());
    }
    match crs.to_ascii_uppercase().as_str() {
        "EPSG:4326" => Ok("+proj=longlat +datum=WGS84 +no_defs +type=crs".to_string()),
        "EPSG:3857" | "EPSG:900913" => Ok(
            "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 \
             +units=m +nadgrids=@null +no_defs +type=crs"
                .to_string(),
        ),
        _ => Err(PlotError::UnknownCrs(crs.to_string())),
    }
}

/// Whole-collection coordinate transformer.
///
/// Built once per render from the settings CRS; every dataset goes through the
/// same instance so all collections share one working CRS. Transforms return
/// new geometries and leave sources untouched.
#[derive(Debug)]
pub struct Reprojector {
    from: Proj4,
    to: Proj4,
    from_geographic: bool,
    to_geographic: bool,
}

impl Reprojector {
    /// Build a transformer between two CRS identifiers.
    pub fn new(source: &str, target: &str) -> Result<Self, PlotError> {
        let from_str = proj_string(source)?;
        let to_str = proj_string(target)?;

        let from = Proj4::from_proj_string(&from_str)
            .map_err(|e| PlotError::Projection(format!("bad source CRS {source:?}: {e}")))?;
        let to = Proj4::from_proj_string(&to_str)
            .map_err(|e| PlotError::Projection(format!("bad target CRS {target:?}: {e}")))?;

        Ok(Self {
            from,
            to,
            from_geographic: from_str.starts_with("+proj=longlat"),
            to_geographic: to_str.starts_with("+proj=longlat"),
        })
    }

    /// Transformer from the geographic source CRS to the working CRS.
    pub fn to_working(target: &str) -> Result<Self, PlotError> {
        Self::new(WGS84, target)
    }

    /// Transform a single coordinate. Radians in/out handled here so callers
    /// always see degrees for geographic CRSs and meters for projected ones.
    pub fn coord(&self, coord: Coord<f64>) -> Result<Coord<f64>, PlotError> {
        let mut point = if self.from_geographic {
            (coord.x.to_radians(), coord.y.to_radians(), 0.0)
        } else {
            (coord.x, coord.y, 0.0)
        };

        transform(&self.from, &self.to, &mut point)
            .map_err(|e| PlotError::Projection(format!("({}, {}): {e}", coord.x, coord.y)))?;

        if self.to_geographic {
            Ok(Coord { x: point.0.to_degrees(), y: point.1.to_degrees() })
        } else {
            Ok(Coord { x: point.0, y: point.1 })
        }
    }

    /// Transform a point geometry.
    pub fn point(&self, point: &Point<f64>) -> Result<Point<f64>, PlotError> {
        Ok(Point(self.coord(point.0)?))
    }

    /// Transform every coordinate of a multipolygon.
    pub fn multi_polygon(&self, shape: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>, PlotError> {
        shape.try_map_coords(|coord| self.coord(coord))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use geo::{Coord, polygon};

    use super::*;

    #[test]
    fn origin_maps_to_origin() {
        let proj = Reprojector::to_working("EPSG:3857").unwrap();
        let out = proj.coord(Coord { x: 0.0, y: 0.0 }).unwrap();

        assert_relative_eq!(out.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(out.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn antimeridian_maps_to_mercator_edge() {
        let proj = Reprojector::to_working("EPSG:3857").unwrap();
        let out = proj.coord(Coord { x: 180.0, y: 0.0 }).unwrap();

        assert_relative_eq!(out.x, 20_037_508.342789244, epsilon = 1.0);
    }

    #[test]
    fn polygon_transform_preserves_ring_structure() {
        let proj = Reprojector::to_working("EPSG:3857").unwrap();
        let shape = MultiPolygon(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 1.0),
        ]]);

        let out = proj.multi_polygon(&shape).unwrap();
        assert_eq!(out.0.len(), 1);
        assert_eq!(out.0[0].exterior().0.len(), shape.0[0].exterior().0.len());
    }

    #[test]
    fn unknown_crs_is_rejected() {
        let err = Reprojector::to_working("EPSG:99999").unwrap_err();
        assert!(matches!(err, PlotError::UnknownCrs(_)));
    }

    #[test]
    fn raw_proj_string_passes_through() {
        let proj =
            Reprojector::new(WGS84, "+proj=utm +zone=33 +datum=WGS84 +units=m +no_defs").unwrap();
        let out = proj.coord(Coord { x: 15.0, y: 52.0 }).unwrap();

        // UTM 33N central meridian: easting at the 500 km false origin.
        assert_relative_eq!(out.x, 500_000.0, epsilon = 1.0);
    }
}
