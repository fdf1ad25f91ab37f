//! Error types used by the crate.

use thiserror::Error;

/// Countrymap error type.
#[derive(Debug, Error)]
pub enum PlotError {
    /// Target country code missing from the settings table.
    #[error("no settings row for country code {0:?}")]
    SettingsLookup(String),
    /// A geometry could not be transformed to the working CRS.
    #[error("projection failed: {0}")]
    Projection(String),
    /// Unsupported or malformed CRS identifier.
    #[error("unrecognized CRS identifier {0:?}")]
    UnknownCrs(String),
    /// Degenerate (zero-size) extent passed to the frame calculator.
    #[error("cannot frame a zero-size extent")]
    InvalidExtent,
    /// A required attribute is absent on a record slated for labeling.
    #[error("record {record} is missing attribute {attribute:?}")]
    MissingAttribute {
        /// Index of the record within its collection.
        record: usize,
        /// Name of the absent attribute.
        attribute: &'static str,
    },
    /// A legend entry could not be parsed as a numeric bin range.
    #[error("malformed bin range label {0:?}")]
    MalformedBinLabel(String),
    /// Error reading/writing data to the FS.
    #[error("failed to read file")]
    FsIo(#[from] std::io::Error),
    /// Raster decoding error.
    #[error("image decode error: {0:?}")]
    ImageDecode(#[from] image::ImageError),
    /// The composed figure markup was rejected by the rasterizer.
    #[error("figure rasterization error: {0}")]
    Raster(String),
}
