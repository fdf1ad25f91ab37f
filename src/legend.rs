//! Legend for the thematic data layer.
//!
//! Classification is an external capability: this module consumes bin edges
//! plus the data extremes and only rewrites the textual presentation. Bin
//! boundaries and bin membership are never altered here.

use std::fmt::Write as _;

use crate::canvas::Canvas;
use crate::error::PlotError;
use crate::theme::{self, Plane};

/// A binned numeric variable: ascending interior edges plus the data range
/// they partition.
#[derive(Debug, Clone)]
pub struct Classification {
    breaks: Vec<f64>,
    data_min: f64,
    data_max: f64,
}

impl Classification {
    /// Wrap externally supplied class breaks around the observed values.
    /// Returns `None` when there are no values to classify.
    pub fn from_breaks(mut breaks: Vec<f64>, values: &[f64]) -> Option<Self> {
        let first = *values.first()?;
        let (data_min, data_max) = values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        breaks.sort_by(|a, b| a.total_cmp(b));
        Some(Self { breaks, data_min, data_max })
    }

    /// Bin index for a value: bin `i` covers `[edge_i, edge_i+1)`.
    pub fn bin(&self, value: f64) -> usize {
        self.breaks.partition_point(|edge| value >= *edge)
    }

    #[inline]
    pub fn num_bins(&self) -> usize {
        self.breaks.len() + 1
    }

    #[inline]
    pub fn data_max(&self) -> f64 {
        self.data_max
    }

    /// Raw interval labels in the classifier's own notation, lower bound
    /// inclusive, last bin closed on the data maximum.
    pub fn range_labels(&self) -> Vec<String> {
        let mut edges = Vec::with_capacity(self.breaks.len() + 2);
        edges.push(self.data_min);
        edges.extend_from_slice(&self.breaks);
        edges.push(self.data_max);

        edges
            .windows(2)
            .enumerate()
            .map(|(i, pair)| {
                if i == self.breaks.len() {
                    format!("[{}, {}]", pair[0], pair[1])
                } else {
                    format!("[{}, {})", pair[0], pair[1])
                }
            })
            .collect()
    }
}

/// Rewrite one bin-range label ("[10.2, 250.7)" in any bracket style) into a
/// readable "<lower><unit> to <upper><unit>" string, with numeric precision
/// chosen by the magnitude of the data maximum.
pub fn format_bin_label(label: &str, units: &str, data_max: f64) -> Result<String, PlotError> {
    let mut parts = label.split(',');
    let lower = parts.next().unwrap_or_default();
    let upper = parts.next_back().unwrap_or(lower);

    let strip = |s: &str| s.trim().trim_matches(['[', ']', '(', ')']).trim().to_string();
    let parse = |s: String| {
        s.parse::<f64>().map_err(|_| PlotError::MalformedBinLabel(label.to_string()))
    };
    let lower = parse(strip(lower))?;
    let upper = parse(strip(upper))?;

    let fmt = |v: f64| {
        if data_max > 999.0 {
            grouped(v, 0)
        } else if data_max > 99.0 {
            grouped(v, 1)
        } else if data_max > 9.0 {
            grouped(v, 2)
        } else {
            significant(v, 3)
        }
    };
    Ok(format!("{}{units} to {}{units}", fmt(lower), fmt(upper)))
}

/// Fixed-decimal formatting with thousands separators.
fn grouped(value: f64, decimals: usize) -> String {
    let formatted = format!("{value:.decimals$}");
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 4);
    out.push_str(sign);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Significant-digit formatting, trailing zeros trimmed.
fn significant(value: f64, digits: i32) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let exponent = value.abs().log10().floor() as i32;
    let decimals = (digits - 1 - exponent).max(0) as usize;
    let formatted = format!("{value:.decimals$}");
    if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        formatted
    }
}

/// A ready-to-draw legend: title plus one formatted entry per class bin.
#[derive(Debug, Clone)]
pub struct Legend {
    pub title: String,
    pub entries: Vec<(String, &'static str)>,
}

impl Legend {
    /// Format the classification's bin ranges into legend entries.
    pub fn from_classification(
        classification: &Classification,
        title: &str,
        units: &str,
    ) -> Result<Self, PlotError> {
        let entries = classification
            .range_labels()
            .iter()
            .enumerate()
            .map(|(bin, label)| {
                let text = format_bin_label(label, units, classification.data_max())?;
                let color = theme::DATA_RAMP[bin.min(theme::DATA_RAMP.len() - 1)];
                Ok((text, color))
            })
            .collect::<Result<Vec<_>, PlotError>>()?;

        Ok(Self { title: title.to_string(), entries })
    }

    /// Draw the legend box in the top-right corner, above every layer.
    /// Entry fonts and swatch sizes are uniform so dense legends stay tidy.
    pub fn draw(&self, canvas: &mut Canvas) {
        let size = theme::FONT_SIZE_SMALL;
        let pad = 6.0;
        let swatch = 6.0;
        let row = size * 1.4;

        let longest = self
            .entries
            .iter()
            .map(|(text, _)| text.chars().count())
            .chain([self.title.chars().count()])
            .max()
            .unwrap_or(0);
        let box_w = longest as f64 * size * 0.6 + swatch + pad * 3.0;
        let box_h = row * (self.entries.len() as f64 + 1.0) + pad * 2.0;
        let x = canvas.width() as f64 - canvas.margin() - box_w;
        let y = canvas.margin();

        let mut markup = format!(
            r#"<g font-size="{size}" font-weight="500"><rect x="{x:.1}" y="{y:.1}" width="{box_w:.1}" height="{box_h:.1}" fill="white" fill-opacity="0.8" stroke="{border}" stroke-width="0.5"/>"#,
            border = theme::BORDER_COLOR,
        );

        // Title and entries share the swatch column's left edge.
        let text_x = x + pad;
        let mut text_y = y + pad + size;
        let _ = write!(markup, r#"<text x="{text_x:.1}" y="{text_y:.1}">{}</text>"#, self.title);

        for (text, color) in &self.entries {
            text_y += row;
            let _ = write!(
                markup,
                r#"<rect x="{text_x:.1}" y="{sy:.1}" width="{swatch}" height="{swatch}" fill="{color}" stroke="{border}" stroke-width="0.25"/><text x="{lx:.1}" y="{text_y:.1}">{text}</text>"#,
                sy = text_y - swatch,
                border = theme::BORDER_COLOR,
                lx = text_x + swatch + pad,
            );
        }
        markup.push_str("</g>");

        canvas.push(Plane::Legend, markup);
    }
}
