//! Draws one feature collection per call onto the shared canvas, each layer
//! kind with its fixed theme and draw-priority plane. Empty collections are
//! no-ops: a small country with no lakes in frame still renders.

use std::collections::HashMap;

use geo::{Rect, coord};

use crate::basemap::Basemap;
use crate::canvas::Canvas;
use crate::error::PlotError;
use crate::feature::{CountryLayer, PlaceLayer, WaterLayer};
use crate::frame::Frame;
use crate::legend::Classification;
use crate::proj::Reprojector;
use crate::theme::{self, Plane};

/// Embed the grayscale basemap under everything else. `inverse` maps the
/// working CRS back to geographic coordinates so only the raster window the
/// frame can see is encoded.
pub fn draw_basemap(
    canvas: &mut Canvas,
    basemap: &Basemap,
    proj: &Reprojector,
    inverse: &Reprojector,
) -> Result<(), PlotError> {
    let region = frame_region(canvas.frame(), inverse)?;
    let Some((bounds, png)) = basemap.embed(region)? else {
        return Ok(());
    };

    let min = proj.coord(bounds.min())?;
    let max = proj.coord(bounds.max())?;
    canvas.image(Plane::Basemap, min.x, min.y, max.x, max.y, &png, theme::BASEMAP_ALPHA);
    Ok(())
}

/// Geographic region visible through the frame.
fn frame_region(frame: &Frame, inverse: &Reprojector) -> Result<Rect<f64>, PlotError> {
    let min = inverse.coord(coord! { x: frame.left, y: frame.bottom })?;
    let max = inverse.coord(coord! { x: frame.right, y: frame.top })?;
    Ok(Rect::new(min, max))
}

/// Thin silver boundary strokes for every admitted country outline.
pub fn draw_admin_boundaries(canvas: &mut Canvas, layer: &CountryLayer) {
    for record in &layer.records {
        canvas.boundary(Plane::Admin, &record.shape, theme::BORDER_COLOR, theme::ADMIN_BORDER_WIDTH);
    }
}

/// Filled water polygons. Marine polygons sit below the data layer, lakes
/// above it; the caller picks the plane.
pub fn draw_water(canvas: &mut Canvas, layer: &WaterLayer, plane: Plane) {
    for record in &layer.records {
        canvas.polygon(
            plane,
            &record.shape,
            theme::WATER_COLOR,
            theme::WATER_ALPHA,
            theme::WATER_BORDER_COLOR,
            theme::WATER_BORDER_WIDTH,
        );
    }
}

/// White circle markers for populated places.
pub fn draw_places(canvas: &mut Canvas, layer: &PlaceLayer) {
    for record in &layer.records {
        canvas.circle(
            Plane::Label,
            record.location.x(),
            record.location.y(),
            theme::MARKER_SIZE,
            "white",
            theme::DEFAULT_COLOR,
            theme::MARKER_OUTLINE_WIDTH,
        );
    }
}

/// Capital markers: the place circle plus a smaller star overlay.
pub fn draw_capitals(canvas: &mut Canvas, layer: &PlaceLayer) {
    draw_places(canvas, layer);
    for record in &layer.records {
        canvas.star(
            Plane::Label,
            record.location.x(),
            record.location.y(),
            theme::MARKER_SIZE * 2.0 / 3.0,
            theme::DEFAULT_COLOR,
        );
    }
}

/// Choropleth fill over admin polygons for countries with a data value.
/// Countries absent from `values` keep the basemap showing through.
pub fn draw_data(
    canvas: &mut Canvas,
    layer: &CountryLayer,
    values: &HashMap<String, f64>,
    classification: &Classification,
) {
    for record in &layer.records {
        let Some(&value) = values.get(&record.iso) else { continue };
        let bin = classification.bin(value);
        let fill = theme::DATA_RAMP[bin.min(theme::DATA_RAMP.len() - 1)];
        canvas.polygon(
            Plane::Data,
            &record.shape,
            fill,
            theme::DATA_ALPHA,
            theme::BORDER_COLOR,
            theme::ADMIN_BORDER_WIDTH * 0.5,
        );
    }
}
