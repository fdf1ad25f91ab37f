use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerReader, prelude::CsvReader};
use shapefile::{Reader, Shape, dbase::FieldValue, dbase::Record};

/// Reads a CSV file from `path` into a Polars DataFrame.
pub fn read_from_csv(path: &Path) -> Result<DataFrame> {
    let file =
        File::open(path).with_context(|| format!("Failed to open CSV: {}", path.display()))?;
    let df = CsvReader::new(file).finish()?;
    Ok(df)
}

/// Reads all shapes + attribute records from a given `.shp` file path.
pub fn read_shapefile(path: &Path) -> Result<Vec<(Shape, Record)>> {
    let mut reader = Reader::from_path(path)
        .with_context(|| format!("Failed to open shapefile: {}", path.display()))?;

    let mut items = Vec::with_capacity(reader.shape_count()?);
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result.context("Error reading shape+record")?;
        items.push((shape, record));
    }
    Ok(items)
}

/// Pull a text attribute out of a dbase record. Empty strings count as absent.
pub fn field_string(record: &Record, name: &str) -> Option<String> {
    match record.get(name)? {
        FieldValue::Character(Some(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Pull a numeric attribute out of a dbase record, accepting the numeric
/// encodings dbase writers actually produce.
pub fn field_f64(record: &Record, name: &str) -> Option<f64> {
    match record.get(name)? {
        FieldValue::Numeric(v) => *v,
        FieldValue::Float(v) => v.map(f64::from),
        FieldValue::Double(v) => Some(*v),
        FieldValue::Integer(v) => Some(f64::from(*v)),
        _ => None,
    }
}
