use geo::{Coord, LineString, MultiPolygon, Polygon};
use shapefile as shp;

/// Shoelace sum over a closed ring. Shapefile exteriors wind clockwise, so
/// their signed area comes out negative.
fn signed_area(ring: &[Coord<f64>]) -> f64 {
    ring.windows(2).map(|w| w[0].x * w[1].y - w[1].x * w[0].y).sum::<f64>() / 2.0
}

/// Convert a shapefile polygon into a geo multipolygon, regrouping the flat
/// ring list into exteriors followed by their holes.
pub fn shp_to_geo(polygon: &shp::Polygon) -> MultiPolygon<f64> {
    let mut polygons: Vec<Polygon<f64>> = Vec::new();

    for ring in polygon.rings() {
        let mut coords: Vec<Coord<f64>> =
            ring.points().iter().map(|pt| Coord { x: pt.x, y: pt.y }).collect();
        // geo rings must be closed.
        if coords.first() != coords.last() {
            if let Some(&first) = coords.first() {
                coords.push(first);
            }
        }

        let is_exterior = signed_area(&coords) < 0.0;
        match polygons.last_mut() {
            Some(last) if !is_exterior => last.interiors_push(LineString(coords)),
            _ => polygons.push(Polygon::new(LineString(coords), Vec::new())),
        }
    }

    MultiPolygon(polygons)
}

#[cfg(test)]
mod tests {
    use shapefile::{Point, PolygonRing};

    use super::*;

    #[test]
    fn outer_and_inner_rings_group_into_one_polygon() {
        let shape = shp::Polygon::with_rings(vec![
            PolygonRing::Outer(vec![
                Point::new(0.0, 0.0),
                Point::new(0.0, 10.0),
                Point::new(10.0, 10.0),
                Point::new(10.0, 0.0),
            ]),
            PolygonRing::Inner(vec![
                Point::new(4.0, 4.0),
                Point::new(6.0, 4.0),
                Point::new(6.0, 6.0),
                Point::new(4.0, 6.0),
            ]),
        ]);

        let multi = shp_to_geo(&shape);
        assert_eq!(multi.0.len(), 1);
        assert_eq!(multi.0[0].interiors().len(), 1);
        // Rings come back closed.
        let exterior = multi.0[0].exterior();
        assert_eq!(exterior.0.first(), exterior.0.last());
    }

    #[test]
    fn two_outer_rings_become_two_polygons() {
        let square = |x: f64| {
            PolygonRing::Outer(vec![
                Point::new(x, 0.0),
                Point::new(x, 1.0),
                Point::new(x + 1.0, 1.0),
                Point::new(x + 1.0, 0.0),
            ])
        };
        let shape = shp::Polygon::with_rings(vec![square(0.0), square(5.0)]);

        let multi = shp_to_geo(&shape);
        assert_eq!(multi.0.len(), 2);
    }
}
