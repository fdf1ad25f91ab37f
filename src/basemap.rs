//! Georeferenced raster basemap.
//!
//! The basemap is a plain raster (PNG/JPEG/TIFF) georeferenced by an ESRI
//! world file next to it. Before embedding, the raster is cropped to the
//! region the frame can see and converted to grayscale; the Mercator-unsafe
//! polar band is cut off rather than stretched.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use geo::{Rect, coord};
use image::{DynamicImage, ImageFormat};

use crate::error::PlotError;

/// Latitude band where the mercator-family CRSs stay finite.
const MAX_LAT: f64 = 85.06;

/// A georeferenced raster image in geographic coordinates.
pub struct Basemap {
    image: DynamicImage,
    /// Geographic bounds of the full raster (lon/lat).
    bounds: Rect<f64>,
}

/// Pixel size and top-left pixel center from an ESRI world file.
#[derive(Debug, Clone, Copy, PartialEq)]
struct WorldFile {
    x_scale: f64,
    y_scale: f64,
    x_origin: f64,
    y_origin: f64,
}

impl WorldFile {
    /// Parse the six-line world file format. Rotation terms are not
    /// supported; north-up rasters only.
    fn parse(text: &str) -> Result<Self> {
        let values: Vec<f64> = text
            .split_whitespace()
            .map(|line| line.parse::<f64>().context("non-numeric world file entry"))
            .collect::<Result<_>>()?;
        if values.len() != 6 {
            bail!("world file must have exactly 6 entries, got {}", values.len());
        }
        if values[1] != 0.0 || values[2] != 0.0 {
            bail!("rotated rasters are not supported");
        }
        Ok(Self { x_scale: values[0], y_scale: values[3], x_origin: values[4], y_origin: values[5] })
    }

    /// Geographic bounds for a raster of `width` x `height` pixels. The world
    /// file origin is the *center* of the top-left pixel.
    fn bounds(&self, width: u32, height: u32) -> Rect<f64> {
        let left = self.x_origin - self.x_scale / 2.0;
        let top = self.y_origin - self.y_scale / 2.0;
        let right = left + self.x_scale * width as f64;
        let bottom = top + self.y_scale * height as f64;
        Rect::new(coord! { x: left, y: bottom }, coord! { x: right, y: top })
    }
}

/// World file candidates for a raster path: derived extension (`.pgw` for
/// `.png`, `.tfw` for `.tif`, ...) then the generic `.wld`.
fn world_file_candidates(raster: &Path) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(ext) = raster.extension().and_then(|e| e.to_str()) {
        let lower = ext.to_ascii_lowercase();
        let derived = match lower.as_str() {
            "png" => Some("pgw"),
            "jpg" | "jpeg" => Some("jgw"),
            "tif" | "tiff" => Some("tfw"),
            _ => None,
        };
        if let Some(derived) = derived {
            candidates.push(raster.with_extension(derived));
        }
    }
    candidates.push(raster.with_extension("wld"));
    candidates
}

impl Basemap {
    pub fn new(image: DynamicImage, bounds: Rect<f64>) -> Self {
        Self { image, bounds }
    }

    /// Load a raster and its sidecar world file.
    pub fn load(path: &Path) -> Result<Self> {
        let image = image::open(path)
            .with_context(|| format!("Failed to decode basemap {}", path.display()))?;

        let world_path = world_file_candidates(path)
            .into_iter()
            .find(|p| p.is_file())
            .with_context(|| format!("No world file next to basemap {}", path.display()))?;
        let world = WorldFile::parse(&std::fs::read_to_string(&world_path)?)
            .with_context(|| format!("Bad world file {}", world_path.display()))?;

        let bounds = world.bounds(image.width(), image.height());
        log::debug!(
            "basemap {}: {}x{} px, lon {:.2}..{:.2}, lat {:.2}..{:.2}",
            path.display(),
            image.width(),
            image.height(),
            bounds.min().x,
            bounds.max().x,
            bounds.min().y,
            bounds.max().y
        );
        Ok(Self { image, bounds })
    }

    #[inline]
    pub fn bounds(&self) -> Rect<f64> {
        self.bounds
    }

    /// Crop to the part of `region` this raster covers (clamped to the
    /// mercator-safe latitude band), grayscale it, and encode as base64 PNG.
    ///
    /// Returns the geographic bounds of the cropped window plus the encoded
    /// pixels, or `None` when the raster and the region are disjoint.
    pub fn embed(&self, region: Rect<f64>) -> Result<Option<(Rect<f64>, String)>, PlotError> {
        let left = region.min().x.max(self.bounds.min().x);
        let right = region.max().x.min(self.bounds.max().x);
        let bottom = region.min().y.max(self.bounds.min().y).max(-MAX_LAT);
        let top = region.max().y.min(self.bounds.max().y).min(MAX_LAT);
        if left >= right || bottom >= top {
            return Ok(None);
        }

        let (width, height) = (self.image.width() as f64, self.image.height() as f64);
        let px_per_lon = width / self.bounds.width();
        let px_per_lat = height / self.bounds.height();

        let x0 = ((left - self.bounds.min().x) * px_per_lon).floor().max(0.0);
        let x1 = ((right - self.bounds.min().x) * px_per_lon).ceil().min(width);
        let y0 = ((self.bounds.max().y - top) * px_per_lat).floor().max(0.0);
        let y1 = ((self.bounds.max().y - bottom) * px_per_lat).ceil().min(height);
        let (w, h) = ((x1 - x0) as u32, (y1 - y0) as u32);
        if w == 0 || h == 0 {
            return Ok(None);
        }

        let crop = self.image.crop_imm(x0 as u32, y0 as u32, w, h).grayscale();

        let mut png = Vec::new();
        crop.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

        // Bounds of the actual pixel window, which is at least as large as
        // the requested region.
        let cropped = Rect::new(
            coord! {
                x: self.bounds.min().x + x0 / px_per_lon,
                y: self.bounds.max().y - y1 / px_per_lat,
            },
            coord! {
                x: self.bounds.min().x + x1 / px_per_lon,
                y: self.bounds.max().y - y0 / px_per_lat,
            },
        );
        Ok(Some((cropped, BASE64.encode(&png))))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use image::RgbaImage;

    use super::*;

    fn global_basemap() -> Basemap {
        let image = DynamicImage::ImageRgba8(RgbaImage::new(360, 180));
        let bounds = Rect::new(coord! { x: -180.0, y: -90.0 }, coord! { x: 180.0, y: 90.0 });
        Basemap::new(image, bounds)
    }

    #[test]
    fn world_file_bounds_use_pixel_centers() {
        let world = WorldFile::parse("1.0\n0.0\n0.0\n-1.0\n-179.5\n89.5\n").unwrap();
        let bounds = world.bounds(360, 180);

        assert_relative_eq!(bounds.min().x, -180.0);
        assert_relative_eq!(bounds.max().x, 180.0);
        assert_relative_eq!(bounds.min().y, -90.0);
        assert_relative_eq!(bounds.max().y, 90.0);
    }

    #[test]
    fn world_file_rejects_rotation_terms() {
        assert!(WorldFile::parse("1.0\n0.1\n0.0\n-1.0\n0.0\n0.0\n").is_err());
    }

    #[test]
    fn embed_crops_to_region() {
        let basemap = global_basemap();
        let region = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 10.0, y: 20.0 });

        let (bounds, _) = basemap.embed(region).unwrap().expect("overlapping region");

        assert_relative_eq!(bounds.min().x, 0.0);
        assert_relative_eq!(bounds.max().x, 10.0);
        assert_relative_eq!(bounds.min().y, 0.0);
        assert_relative_eq!(bounds.max().y, 20.0);
    }

    #[test]
    fn embed_clamps_polar_band() {
        let basemap = global_basemap();
        let region = Rect::new(coord! { x: -180.0, y: 60.0 }, coord! { x: 180.0, y: 90.0 });

        let (bounds, _) = basemap.embed(region).unwrap().expect("overlapping region");

        assert!(bounds.max().y <= 86.0);
    }

    #[test]
    fn disjoint_region_embeds_nothing() {
        let basemap = Basemap::new(
            DynamicImage::ImageRgba8(RgbaImage::new(10, 10)),
            Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 10.0, y: 10.0 }),
        );
        let region = Rect::new(coord! { x: 20.0, y: 20.0 }, coord! { x: 30.0, y: 30.0 });

        assert!(basemap.embed(region).unwrap().is_none());
    }
}
