//! Text annotation of rendered layers.
//!
//! Every label is placed at its record's representative point with a white
//! halo stroke so it stays legible over any background. Records missing a
//! required attribute lose their label, never the render: partial labeling is
//! acceptable, an aborted map is not.

use crate::canvas::{Align, Canvas, TextStyle};
use crate::error::PlotError;
use crate::feature::{CountryLayer, Place, PlaceLayer, WaterLayer};
use crate::theme::{self, Plane};

/// Matplotlib-convention pixel offset of the primary label from its anchor.
const LABEL_OFFSET: (f64, f64) = (1.0, 1.0);
/// Offset of the secondary (local name) label, one line below.
const LOCAL_OFFSET: (f64, f64) = (1.0, -4.0);

/// ISO-code labels on every admin polygon; the target country is highlighted.
pub fn label_countries(canvas: &mut Canvas, layer: &CountryLayer, target_iso: &str) {
    for (i, record) in layer.records.iter().enumerate() {
        if record.iso.is_empty() {
            log::debug!(
                "skipping country label: {}",
                PlotError::MissingAttribute { record: i, attribute: "iso" }
            );
            continue;
        }
        let Some(anchor) = record.anchor else { continue };

        let color =
            if record.iso == target_iso { theme::HIGHLIGHT_COLOR } else { theme::DEFAULT_COLOR };
        let style = TextStyle {
            size: theme::FONT_SIZE_SMALL,
            weight: "bold",
            color: color.to_string(),
            align: Align::Middle,
            vcenter: false,
            halo: true,
        };
        canvas.text(Plane::Label, anchor.x(), anchor.y(), (0.0, 0.0), &record.iso, &style);
    }
}

/// Name labels for one place subset; capitals get bold text.
pub fn label_places(canvas: &mut Canvas, layer: &PlaceLayer, capitals: bool) {
    let weight = if capitals { "bold" } else { "500" };
    for record in &layer.records {
        label_place(canvas, record, weight);
    }
}

fn label_place(canvas: &mut Canvas, place: &Place, weight: &'static str) {
    let style = TextStyle {
        size: theme::FONT_SIZE_XSMALL,
        weight,
        color: theme::DEFAULT_COLOR.to_string(),
        align: Align::Start,
        vcenter: false,
        halo: true,
    };
    canvas.text(
        Plane::Label,
        place.location.x(),
        place.location.y(),
        LABEL_OFFSET,
        &place.name,
        &style,
    );

    // Second line in the local script, in a font able to shape it. The
    // override is scoped to this one annotation.
    let Some(local_name) = &place.local_name else { return };
    match &place.font {
        Some(font) => canvas.with_font(font.as_str(), |canvas| {
            canvas.text(
                Plane::Label,
                place.location.x(),
                place.location.y(),
                LOCAL_OFFSET,
                local_name,
                &style,
            );
        }),
        None => canvas.text(
            Plane::Label,
            place.location.x(),
            place.location.y(),
            LOCAL_OFFSET,
            local_name,
            &style,
        ),
    }
}

/// Water-body labels at their interior anchors; multi-word names stack one
/// word per line, centered both ways.
pub fn label_waters(canvas: &mut Canvas, layer: &WaterLayer) {
    for (i, record) in layer.records.iter().enumerate() {
        let Some(name) = record.name.as_deref() else {
            log::debug!(
                "skipping water label: {}",
                PlotError::MissingAttribute { record: i, attribute: "name" }
            );
            continue;
        };
        let Some(anchor) = record.anchor else { continue };

        let style = TextStyle {
            size: theme::FONT_SIZE_XSMALL,
            weight: "500",
            color: theme::WATER_BORDER_COLOR.to_string(),
            align: Align::Middle,
            vcenter: true,
            halo: true,
        };
        let wrapped = name.replace(' ', "\n");
        canvas.text(Plane::Label, anchor.x(), anchor.y(), LABEL_OFFSET, &wrapped, &style);
    }
}
