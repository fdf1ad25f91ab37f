//! The shared drawing surface.
//!
//! Layers append SVG elements tagged with a draw-priority [`Plane`]; at finish
//! time elements are emitted bottom-to-top by plane (insertion order within a
//! plane), so layering is a property of the element kind rather than of call
//! order. The composed document is rasterized to PNG through resvg.

use std::fmt::Write as _;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use geo::MultiPolygon;
use png::{BitDepth, ColorType, Encoder};

use crate::error::PlotError;
use crate::frame::Frame;
use crate::theme::{self, Plane};

/// Fraction of the canvas width kept as margin on each side.
const MARGIN_FRAC: f64 = 0.05;

/// Horizontal/vertical text anchoring relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Anchor at the left edge of the text.
    Start,
    /// Anchor at the text center.
    Middle,
}

/// Appearance of one text label.
#[derive(Debug, Clone)]
pub struct TextStyle {
    pub size: f64,
    /// CSS font weight: "bold", "500", ...
    pub weight: &'static str,
    pub color: String,
    pub align: Align,
    /// Center vertically on the anchor point as well.
    pub vcenter: bool,
    /// Draw a white halo stroke behind the glyphs.
    pub halo: bool,
}

/// One country map's drawing surface.
pub struct Canvas {
    width: u32,
    height: u32,
    margin: f64,
    scale: f64,
    frame: Frame,
    elements: Vec<(Plane, String)>,
    default_font: String,
    font_stack: Vec<String>,
}

impl Canvas {
    /// Build a canvas `width_px` wide mapping the given frame. The frame is
    /// square, so the pixel area inside the margins is square too.
    pub fn new(frame: Frame, width_px: u32) -> Self {
        let margin = width_px as f64 * MARGIN_FRAC;
        let scale = (width_px as f64 - 2.0 * margin) / frame.width();
        let height = (frame.height() * scale + 2.0 * margin).round() as u32;

        Self {
            width: width_px,
            height,
            margin,
            scale,
            frame,
            elements: Vec::new(),
            default_font: theme::FONT_NAME.to_string(),
            font_stack: Vec::new(),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Pixel margin kept clear on every side.
    #[inline]
    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Working CRS -> pixel coords (Y down).
    pub fn project(&self, x: f64, y: f64) -> (f64, f64) {
        let px = self.margin + (x - self.frame.left) * self.scale;
        let py = self.margin + (self.frame.top - y) * self.scale;
        (px, py)
    }

    /// Append a raw SVG element on the given plane. Coordinates inside the
    /// markup must already be pixel coordinates.
    pub fn push(&mut self, plane: Plane, markup: String) {
        self.elements.push((plane, markup));
    }

    // --- fonts -------------------------------------------------------------

    /// Font family used for labels that don't override it.
    pub fn active_font(&self) -> &str {
        self.font_stack.last().map(String::as_str).unwrap_or(&self.default_font)
    }

    /// Run `body` with `family` as the active font, restoring the previous
    /// font afterwards regardless of whether `body` succeeded.
    pub fn with_font<R>(&mut self, family: &str, body: impl FnOnce(&mut Self) -> R) -> R {
        self.font_stack.push(family.to_string());
        let out = body(self);
        self.font_stack.pop();
        out
    }

    // --- geometry ----------------------------------------------------------

    /// Filled polygon with a border stroke.
    pub fn polygon(
        &mut self,
        plane: Plane,
        shape: &MultiPolygon<f64>,
        fill: &str,
        fill_opacity: f64,
        stroke: &str,
        stroke_width: f64,
    ) {
        let d = self.multipolygon_path(shape);
        if d.is_empty() {
            return;
        }
        self.push(
            plane,
            format!(
                r#"<path fill-rule="evenodd" fill="{fill}" fill-opacity="{fill_opacity}" stroke="{stroke}" stroke-width="{stroke_width}" d="{d}"/>"#
            ),
        );
    }

    /// Boundary-only polygon outline (no fill).
    pub fn boundary(&mut self, plane: Plane, shape: &MultiPolygon<f64>, stroke: &str, width: f64) {
        let d = self.multipolygon_path(shape);
        if d.is_empty() {
            return;
        }
        self.push(
            plane,
            format!(r#"<path fill="none" stroke="{stroke}" stroke-width="{width}" d="{d}"/>"#),
        );
    }

    /// Circle marker at a world coordinate.
    pub fn circle(
        &mut self,
        plane: Plane,
        x: f64,
        y: f64,
        radius: f64,
        fill: &str,
        stroke: &str,
        stroke_width: f64,
    ) {
        let (px, py) = self.project(x, y);
        self.push(
            plane,
            format!(
                r#"<circle cx="{px:.2}" cy="{py:.2}" r="{radius}" fill="{fill}" stroke="{stroke}" stroke-width="{stroke_width}"/>"#
            ),
        );
    }

    /// Five-pointed star marker at a world coordinate.
    pub fn star(&mut self, plane: Plane, x: f64, y: f64, radius: f64, fill: &str) {
        let (cx, cy) = self.project(x, y);
        let inner = radius * 0.382;

        let mut points = String::new();
        for i in 0..10 {
            let r = if i % 2 == 0 { radius } else { inner };
            let angle = std::f64::consts::PI * (i as f64 / 5.0) - std::f64::consts::FRAC_PI_2;
            let _ = write!(points, "{:.2},{:.2} ", cx + r * angle.cos(), cy + r * angle.sin());
        }
        self.push(plane, format!(r#"<polygon points="{}" fill="{fill}"/>"#, points.trim_end()));
    }

    /// Embedded raster image covering a world-coordinate rectangle.
    pub fn image(
        &mut self,
        plane: Plane,
        left: f64,
        bottom: f64,
        right: f64,
        top: f64,
        png_base64: &str,
        opacity: f64,
    ) {
        let (x0, y0) = self.project(left, top);
        let (x1, y1) = self.project(right, bottom);
        self.push(
            plane,
            format!(
                r#"<image x="{x0:.2}" y="{y0:.2}" width="{w:.2}" height="{h:.2}" opacity="{opacity}" preserveAspectRatio="none" href="data:image/png;base64,{png_base64}"/>"#,
                w = x1 - x0,
                h = y1 - y0,
            ),
        );
    }

    /// Text label at a world coordinate, offset in pixels. Newlines split the
    /// text into stacked lines.
    pub fn text(
        &mut self,
        plane: Plane,
        x: f64,
        y: f64,
        offset: (f64, f64),
        content: &str,
        style: &TextStyle,
    ) {
        let (px, py) = self.project(x, y);
        // Pixel offsets are matplotlib-style: positive dy moves up.
        let (px, py) = (px + offset.0, py - offset.1);

        let lines: Vec<&str> = content.split('\n').collect();
        let line_height = style.size * 1.1;
        // Vertical centering over all lines; otherwise the anchor is the baseline.
        let y_start = if style.vcenter {
            py - line_height * (lines.len() as f64 - 1.0) / 2.0 + style.size * 0.35
        } else {
            py
        };

        let anchor = match style.align {
            Align::Start => "start",
            Align::Middle => "middle",
        };
        let halo = if style.halo {
            format!(
                r#" stroke="white" stroke-width="{}" stroke-opacity="{}" paint-order="stroke""#,
                theme::HALO_WIDTH,
                theme::HALO_ALPHA
            )
        } else {
            String::new()
        };

        let mut markup = format!(
            r#"<text x="{px:.2}" y="{y_start:.2}" font-family="{family}" font-size="{size}" font-weight="{weight}" fill="{color}" text-anchor="{anchor}"{halo}>"#,
            family = xml_escape(self.active_font()),
            size = style.size,
            weight = style.weight,
            color = style.color,
        );
        for (i, line) in lines.iter().enumerate() {
            let dy = if i == 0 { 0.0 } else { line_height };
            let _ = write!(
                markup,
                r#"<tspan x="{px:.2}" dy="{dy:.2}">{}</tspan>"#,
                xml_escape(line)
            );
        }
        markup.push_str("</text>");

        self.push(plane, markup);
    }

    // --- output ------------------------------------------------------------

    /// Assemble the SVG document: elements sorted by plane, stable within a
    /// plane, over a white background.
    pub fn finish(&self) -> String {
        let mut order: Vec<usize> = (0..self.elements.len()).collect();
        order.sort_by_key(|&i| self.elements[i].0);

        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{family}, sans-serif">"#,
            w = self.width,
            h = self.height,
            family = xml_escape(&self.default_font),
        );
        svg.push('\n');
        svg.push_str(r##"<rect width="100%" height="100%" fill="#ffffff"/>"##);
        svg.push('\n');
        for i in order {
            svg.push_str(&self.elements[i].1);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }

    /// Rasterize the composed document and write it as a PNG.
    pub fn write_png(&self, path: &Path) -> Result<(), PlotError> {
        let svg = self.finish();

        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        fontdb.set_sans_serif_family(self.default_font.clone());

        let mut opt = usvg::Options::default();
        opt.fontdb = Arc::new(fontdb);

        let tree = usvg::Tree::from_str(&svg, &opt)
            .map_err(|e| PlotError::Raster(format!("SVG parse error: {e}")))?;

        let mut pixmap = tiny_skia::Pixmap::new(self.width, self.height)
            .ok_or_else(|| PlotError::Raster("pixmap alloc failed".to_string()))?;
        resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

        encode_png(&pixmap, path)
    }

    fn multipolygon_path(&self, shape: &MultiPolygon<f64>) -> String {
        let mut out = String::new();
        for polygon in &shape.0 {
            self.ring_to_path(polygon.exterior(), &mut out);
            for interior in polygon.interiors() {
                self.ring_to_path(interior, &mut out);
            }
        }
        out
    }

    /// Append a ring as an SVG subpath: "M x,y L x,y ... Z"
    fn ring_to_path(&self, ring: &geo::LineString<f64>, out: &mut String) {
        let mut coords = ring.0.iter().map(|c| self.project(c.x, c.y));
        if let Some((x, y)) = coords.next() {
            let _ = write!(out, " M{x:.3},{y:.3}");
            for (x, y) in coords {
                let _ = write!(out, " L{x:.3},{y:.3}");
            }
            out.push('Z');
        }
    }
}

/// Write the pixmap as an RGBA PNG. The canvas background is opaque, so the
/// premultiplied pixel data round-trips unchanged.
fn encode_png(pixmap: &tiny_skia::Pixmap, path: &Path) -> Result<(), PlotError> {
    let file = File::create(path)?;
    let mut encoder = Encoder::new(file, pixmap.width(), pixmap.height());
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    let mut writer =
        encoder.write_header().map_err(|e| PlotError::Raster(format!("png header: {e}")))?;
    writer
        .write_image_data(pixmap.data())
        .map_err(|e| PlotError::Raster(format!("png body: {e}")))?;
    Ok(())
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
