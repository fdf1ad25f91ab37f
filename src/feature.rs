//! Typed feature collections for the map layers.
//!
//! Each dataset gets its own record type with explicit optional fields, so
//! attribute presence is checked by the type system rather than probed at
//! draw time. Every record in a collection shares one CRS; reprojection is a
//! whole-collection operation that returns a new collection and never touches
//! the source.

use geo::{BoundingRect, InteriorPoint, MultiPolygon, Point, Rect};

use crate::{error::PlotError, frame::Frame, proj::Reprojector};

/// One administrative boundary polygon.
#[derive(Debug, Clone)]
pub struct Country {
    /// ISO 3166-1 alpha-3 code.
    pub iso: String,
    pub shape: MultiPolygon<f64>,
    /// Label anchor, guaranteed inside the shape once computed.
    pub anchor: Option<Point<f64>>,
}

/// World administrative boundaries.
#[derive(Debug, Clone, Default)]
pub struct CountryLayer {
    pub records: Vec<Country>,
}

impl CountryLayer {
    pub fn new(records: Vec<Country>) -> Self {
        Self { records }
    }

    /// Drop records whose ISO code appears in the denylist. Runs before
    /// reprojection so the transform stays total over the admitted input.
    pub fn admit(self, denylist: &[String]) -> Self {
        let records = self
            .records
            .into_iter()
            .filter(|c| !denylist.iter().any(|iso| iso == &c.iso))
            .collect();
        Self { records }
    }

    /// Compute and cache an interior label anchor for every record.
    pub fn with_anchors(mut self) -> Self {
        for record in &mut self.records {
            record.anchor = record.shape.interior_point();
        }
        self
    }

    /// Transform all shapes and anchors to the CRS of `proj`.
    pub fn reproject(&self, proj: &Reprojector) -> Result<Self, PlotError> {
        let mut records = Vec::with_capacity(self.records.len());
        for record in &self.records {
            records.push(Country {
                iso: record.iso.clone(),
                shape: proj.multi_polygon(&record.shape)?,
                anchor: record.anchor.as_ref().map(|p| proj.point(p)).transpose()?,
            });
        }
        Ok(Self { records })
    }

    /// Look up one country by ISO code.
    pub fn find(&self, iso: &str) -> Option<&Country> {
        self.records.iter().find(|c| c.iso == iso)
    }

    /// Keep only records whose extent overlaps the frame.
    pub fn clip_to(&self, frame: &Frame) -> Self {
        let records = self
            .records
            .iter()
            .filter(|c| c.shape.bounding_rect().is_some_and(|r| frame.intersects(&r)))
            .cloned()
            .collect();
        Self { records }
    }

    /// Keep only records whose label anchor falls inside the frame.
    pub fn clip_anchors_to(&self, frame: &Frame) -> Self {
        let records = self
            .records
            .iter()
            .filter(|c| c.anchor.is_some_and(|a| frame.contains(a.x(), a.y())))
            .cloned()
            .collect();
        Self { records }
    }
}

/// One populated place.
#[derive(Debug, Clone)]
pub struct Place {
    pub name: String,
    /// Name in the local language, when the source provides one.
    pub local_name: Option<String>,
    /// Font family able to shape the local name.
    pub font: Option<String>,
    pub population: f64,
    /// True for national capitals.
    pub capital: bool,
    /// ISO code of the containing country.
    pub iso: String,
    pub location: Point<f64>,
}

/// Populated places (cities and towns).
#[derive(Debug, Clone, Default)]
pub struct PlaceLayer {
    pub records: Vec<Place>,
}

impl PlaceLayer {
    pub fn new(records: Vec<Place>) -> Self {
        Self { records }
    }

    /// Transform all locations to the CRS of `proj`.
    pub fn reproject(&self, proj: &Reprojector) -> Result<Self, PlotError> {
        let mut records = Vec::with_capacity(self.records.len());
        for record in &self.records {
            records.push(Place { location: proj.point(&record.location)?, ..record.clone() });
        }
        Ok(Self { records })
    }

    /// Keep only records located inside the frame.
    pub fn clip_to(&self, frame: &Frame) -> Self {
        let records = self
            .records
            .iter()
            .filter(|p| frame.contains(p.location.x(), p.location.y()))
            .cloned()
            .collect();
        Self { records }
    }
}

/// One lake or marine polygon.
#[derive(Debug, Clone)]
pub struct WaterBody {
    /// Feature name; unnamed water bodies are drawn but never labeled.
    pub name: Option<String>,
    /// Prominence tier; lower is more prominent.
    pub scale_rank: i32,
    pub shape: MultiPolygon<f64>,
    /// Label anchor, guaranteed inside the shape once computed.
    pub anchor: Option<Point<f64>>,
}

/// Lake or marine polygons.
#[derive(Debug, Clone, Default)]
pub struct WaterLayer {
    pub records: Vec<WaterBody>,
}

impl WaterLayer {
    pub fn new(records: Vec<WaterBody>) -> Self {
        Self { records }
    }

    /// Compute and cache an interior label anchor for every record.
    pub fn with_anchors(mut self) -> Self {
        for record in &mut self.records {
            record.anchor = record.shape.interior_point();
        }
        self
    }

    /// Transform all shapes and anchors to the CRS of `proj`.
    pub fn reproject(&self, proj: &Reprojector) -> Result<Self, PlotError> {
        let mut records = Vec::with_capacity(self.records.len());
        for record in &self.records {
            records.push(WaterBody {
                name: record.name.clone(),
                scale_rank: record.scale_rank,
                shape: proj.multi_polygon(&record.shape)?,
                anchor: record.anchor.as_ref().map(|p| proj.point(p)).transpose()?,
            });
        }
        Ok(Self { records })
    }

    /// Keep only records whose extent overlaps the frame.
    pub fn clip_to(&self, frame: &Frame) -> Self {
        let records = self
            .records
            .iter()
            .filter(|w| w.shape.bounding_rect().is_some_and(|r| frame.intersects(&r)))
            .cloned()
            .collect();
        Self { records }
    }

    /// Keep only records whose label anchor falls inside the frame.
    pub fn clip_anchors_to(&self, frame: &Frame) -> Self {
        let records = self
            .records
            .iter()
            .filter(|w| w.anchor.is_some_and(|a| frame.contains(a.x(), a.y())))
            .cloned()
            .collect();
        Self { records }
    }
}

/// Tight extent of a multipolygon, for framing.
pub fn shape_extent(shape: &MultiPolygon<f64>) -> Option<Rect<f64>> {
    shape.bounding_rect()
}

#[cfg(test)]
mod tests {
    use geo::{Contains, polygon};

    use super::*;

    fn l_shaped_country(iso: &str) -> Country {
        // Concave outline: the centroid falls outside, the anchor must not.
        Country {
            iso: iso.to_string(),
            shape: MultiPolygon(vec![polygon![
                (x: 0.0, y: 0.0),
                (x: 10.0, y: 0.0),
                (x: 10.0, y: 1.0),
                (x: 1.0, y: 1.0),
                (x: 1.0, y: 10.0),
                (x: 0.0, y: 10.0),
            ]]),
            anchor: None,
        }
    }

    #[test]
    fn anchor_lies_inside_concave_polygon() {
        let layer = CountryLayer::new(vec![l_shaped_country("AAA")]).with_anchors();

        let record = &layer.records[0];
        let anchor = record.anchor.expect("anchor computed");
        assert!(record.shape.contains(&anchor));
    }

    #[test]
    fn anchor_is_deterministic() {
        let a = CountryLayer::new(vec![l_shaped_country("AAA")]).with_anchors();
        let b = CountryLayer::new(vec![l_shaped_country("AAA")]).with_anchors();

        assert_eq!(a.records[0].anchor, b.records[0].anchor);
    }

    #[test]
    fn denylisted_records_are_excluded_before_transform() {
        let layer = CountryLayer::new(vec![l_shaped_country("AAA"), l_shaped_country("BBB")])
            .admit(&["BBB".to_string()])
            .with_anchors();

        let proj = Reprojector::to_working("EPSG:3857").unwrap();
        let projected = layer.reproject(&proj).expect("transform is total over admitted input");

        assert_eq!(projected.records.len(), 1);
        assert!(projected.find("BBB").is_none());
        assert!(projected.find("AAA").is_some());
    }

    #[test]
    fn reproject_does_not_mutate_source() {
        let layer = CountryLayer::new(vec![l_shaped_country("AAA")]).with_anchors();
        let before = layer.records[0].shape.clone();

        let proj = Reprojector::to_working("EPSG:3857").unwrap();
        let _ = layer.reproject(&proj).unwrap();

        assert_eq!(layer.records[0].shape, before);
    }
}
