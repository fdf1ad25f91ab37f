//! Dataset readers: raw vector/tabular files into typed feature collections.
//!
//! All readers return collections in the geographic source CRS; projection
//! to the working CRS happens afterwards, collection-at-a-time.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use geo::Point;
use polars::prelude::DataType;
use shapefile::Shape;

use crate::common::{field_f64, field_string, read_from_csv, read_shapefile, shp_to_geo};
use crate::feature::{Country, CountryLayer, Place, PlaceLayer, WaterBody, WaterLayer};

/// Attribute column carrying the ISO code in the admin boundaries dataset.
const ISO_FIELD: &str = "ISO_CODE";
/// Scale rank assigned to water bodies that don't carry one; high enough to
/// never be labeled.
const UNRANKED: i32 = 99;

/// World administrative boundary polygons.
pub fn read_world_admin(path: &Path) -> Result<CountryLayer> {
    let items = read_shapefile(path)?;

    let mut records = Vec::with_capacity(items.len());
    for (shape, record) in &items {
        let Shape::Polygon(polygon) = shape else { continue };
        let iso = field_string(record, ISO_FIELD).unwrap_or_default();
        records.push(Country { iso, shape: shp_to_geo(polygon), anchor: None });
    }

    log::info!("admin boundaries: {} countries from {}", records.len(), path.display());
    Ok(CountryLayer::new(records))
}

/// Populated places from the worldcities table.
pub fn read_places(path: &Path) -> Result<PlaceLayer> {
    let df = read_from_csv(path)
        .with_context(|| format!("Failed to read places table {}", path.display()))?;

    let name = df.column("name")?.str()?;
    let local_name = df.column("localname").ok().and_then(|c| c.str().ok());
    let font = df.column("fontname").ok().and_then(|c| c.str().ok());
    let capital = df.column("capital").ok().and_then(|c| c.str().ok());
    let iso = df.column("iso3")?.str()?;

    let population = df.column("population")?.cast(&DataType::Float64)?;
    let population = population.f64()?;
    let longitude = df.column("longitude")?.cast(&DataType::Float64)?;
    let longitude = longitude.f64()?;
    let latitude = df.column("latitude")?.cast(&DataType::Float64)?;
    let latitude = latitude.f64()?;

    let mut records = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let (Some(name), Some(iso)) = (name.get(i), iso.get(i)) else {
            log::debug!("places row {i}: missing name or country code, dropped");
            continue;
        };
        let (Some(lon), Some(lat)) = (longitude.get(i), latitude.get(i)) else {
            log::debug!("places row {i}: missing coordinates, dropped");
            continue;
        };

        records.push(Place {
            name: name.to_string(),
            local_name: local_name.as_ref().and_then(|c| c.get(i)).map(str::to_string),
            font: font.as_ref().and_then(|c| c.get(i)).map(str::to_string),
            population: population.get(i).unwrap_or(0.0),
            capital: capital.as_ref().and_then(|c| c.get(i)) == Some("primary"),
            iso: iso.to_string(),
            location: Point::new(lon, lat),
        });
    }

    log::info!("places: {} records from {}", records.len(), path.display());
    Ok(PlaceLayer::new(records))
}

/// Lake or marine polygons; both datasets share the same schema.
pub fn read_water(path: &Path) -> Result<WaterLayer> {
    let items = read_shapefile(path)?;

    let mut records = Vec::with_capacity(items.len());
    for (shape, record) in &items {
        let Shape::Polygon(polygon) = shape else { continue };
        records.push(WaterBody {
            name: field_string(record, "name"),
            scale_rank: field_f64(record, "scalerank").map(|v| v as i32).unwrap_or(UNRANKED),
            shape: shp_to_geo(polygon),
            anchor: None,
        });
    }

    log::info!("water: {} polygons from {}", records.len(), path.display());
    Ok(WaterLayer::new(records))
}

/// Per-country data values for the thematic layer: `iso_name,value` rows.
pub fn read_values(path: &Path) -> Result<HashMap<String, f64>> {
    let df = read_from_csv(path)
        .with_context(|| format!("Failed to read data table {}", path.display()))?;

    let iso = df.column("iso_name")?.str()?;
    let value = df.column("value")?.cast(&DataType::Float64)?;
    let value = value.f64()?;

    let mut values = HashMap::with_capacity(df.height());
    for i in 0..df.height() {
        if let (Some(iso), Some(value)) = (iso.get(i), value.get(i)) {
            values.insert(iso.to_string(), value);
        }
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn places_reader_maps_all_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("worldcities.csv");
        fs::write(
            &path,
            "id,name,localname,fontname,latitude,longitude,population,capital,iso3\n\
             1,Tokyo,東京,Noto Sans JP,35.68,139.69,37400068,primary,JPN\n\
             2,Osaka,大阪,Noto Sans JP,34.69,135.50,19281000,admin,JPN\n\
             3,Plainville,,,40.0,-75.0,12000,,USA\n",
        )
        .unwrap();

        let layer = read_places(&path).unwrap();
        assert_eq!(layer.records.len(), 3);

        let tokyo = &layer.records[0];
        assert!(tokyo.capital);
        assert_eq!(tokyo.local_name.as_deref(), Some("東京"));
        assert_eq!(tokyo.font.as_deref(), Some("Noto Sans JP"));
        assert_eq!(tokyo.location.x(), 139.69);

        let plainville = &layer.records[2];
        assert!(!plainville.capital);
        assert_eq!(plainville.local_name, None);
        assert_eq!(plainville.font, None);
    }

    #[test]
    fn values_reader_builds_iso_map() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("values.csv");
        fs::write(&path, "iso_name,value\nUSA,120.5\nCAN,44\n").unwrap();

        let values = read_values(&path).unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values["USA"], 120.5);
        assert_eq!(values["CAN"], 44.0);
    }
}
