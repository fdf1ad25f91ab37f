//! Fixed visual theme shared by every layer: colors, stroke widths, marker
//! sizes, font sizes, and the draw-priority planes.

/// Draw-priority tier for canvas elements. Later variants render on top of
/// earlier ones; elements on the same plane keep insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Plane {
    /// Raster basemap, below everything.
    Basemap,
    /// Administrative boundary strokes.
    Admin,
    /// Marine polygons (oceans, seas, bays).
    Marine,
    /// Thematic data fill, when a data layer is present.
    Data,
    /// Lake polygons, above the data fill.
    Lake,
    /// Markers and text labels.
    Label,
    /// Legend box, topmost.
    Legend,
}

/// Label color for the highlighted target country.
pub const HIGHLIGHT_COLOR: &str = "black";
/// Default label and marker-outline color.
pub const DEFAULT_COLOR: &str = "darkslategray";
/// Water polygon fill.
pub const WATER_COLOR: &str = "lightsteelblue";
/// Administrative boundary stroke.
pub const BORDER_COLOR: &str = "silver";
/// Water polygon border and water label color.
pub const WATER_BORDER_COLOR: &str = "steelblue";

/// Halo stroke opacity behind label glyphs.
pub const HALO_ALPHA: f64 = 0.8;
/// Halo stroke width in pixels.
pub const HALO_WIDTH: f64 = 1.0;

/// Water polygon fill opacity.
pub const WATER_ALPHA: f64 = 0.95;
/// Water polygon border stroke width.
pub const WATER_BORDER_WIDTH: f64 = 0.05;
/// Administrative boundary stroke width.
pub const ADMIN_BORDER_WIDTH: f64 = 0.5;
/// Basemap opacity.
pub const BASEMAP_ALPHA: f64 = 0.5;

/// Circle marker radius for populated places, in pixels.
pub const MARKER_SIZE: f64 = 3.0;
/// Marker outline stroke width.
pub const MARKER_OUTLINE_WIDTH: f64 = 0.25;

/// Default font family for all labels.
pub const FONT_NAME: &str = "Noto Sans";
/// "small" font size in pixels (country labels, legend entries).
pub const FONT_SIZE_SMALL: f64 = 11.0;
/// "x-small" font size in pixels (place and water labels).
pub const FONT_SIZE_XSMALL: f64 = 9.0;

/// Sequential fill ramp for the data layer, light to dark, one per class bin.
/// Bins past the end reuse the last entry.
pub const DATA_RAMP: [&str; 6] =
    ["#f7fbff", "#d0e1f2", "#94c4df", "#4b98c9", "#1665ab", "#08306b"];

/// Fill opacity for data-layer polygons.
pub const DATA_ALPHA: f64 = 0.85;
