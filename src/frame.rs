//! Square, buffered bounding frames for consistent map framing.

use geo::Rect;

use crate::error::PlotError;

/// Default margin fraction added around the tight extent.
pub const DEFAULT_BUFFER: f64 = 0.1;

/// Axis limits of the rendered map, in the working CRS.
///
/// Always square: both sides equal `max(extent_w, extent_h) * (1 + buffer)`,
/// centered on the extent midpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Frame {
    /// Build a square frame around `extent`, expanded by `buffer` and with the
    /// margin split evenly on both sides of the shorter dimension.
    ///
    /// A zero-size or non-finite extent is a caller precondition violation and
    /// yields [`PlotError::InvalidExtent`].
    pub fn buffered(extent: Rect<f64>, buffer: f64) -> Result<Self, PlotError> {
        let lenx = extent.width();
        let leny = extent.height();
        let maxl = lenx.max(leny);
        if maxl <= 0.0 || !maxl.is_finite() {
            return Err(PlotError::InvalidExtent);
        }

        let side = maxl * (1.0 + buffer);
        let xmargin = (side - lenx) / 2.0;
        let ymargin = (side - leny) / 2.0;

        Ok(Self {
            left: extent.min().x - xmargin,
            right: extent.max().x + xmargin,
            top: extent.max().y + ymargin,
            bottom: extent.min().y - ymargin,
        })
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// True if `rect` overlaps the frame. Used to cull features that cannot
    /// appear on the canvas.
    pub fn intersects(&self, rect: &Rect<f64>) -> bool {
        rect.min().x <= self.right
            && rect.max().x >= self.left
            && rect.min().y <= self.top
            && rect.max().y >= self.bottom
    }

    /// True if the point falls within the frame.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.bottom && y <= self.top
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use geo::{Rect, coord};

    use super::*;

    fn extent(minx: f64, miny: f64, maxx: f64, maxy: f64) -> Rect<f64> {
        Rect::new(coord! { x: minx, y: miny }, coord! { x: maxx, y: maxy })
    }

    #[test]
    fn frame_is_square_with_buffered_long_side() {
        let frame = Frame::buffered(extent(0.0, 0.0, 40.0, 10.0), 0.1).unwrap();

        assert_relative_eq!(frame.width(), frame.height());
        assert_relative_eq!(frame.width(), 40.0 * 1.1);
    }

    #[test]
    fn frame_preserves_extent_midpoint() {
        let frame = Frame::buffered(extent(2.0, -8.0, 10.0, 4.0), 0.25).unwrap();

        assert_relative_eq!((frame.left + frame.right) / 2.0, 6.0);
        assert_relative_eq!((frame.top + frame.bottom) / 2.0, -2.0);
    }

    #[test]
    fn margin_splits_evenly_on_short_dimension() {
        let frame = Frame::buffered(extent(0.0, 0.0, 40.0, 10.0), 0.0).unwrap();

        // Long side unchanged, short side padded by 15 on each end.
        assert_relative_eq!(frame.left, 0.0);
        assert_relative_eq!(frame.right, 40.0);
        assert_relative_eq!(frame.bottom, -15.0);
        assert_relative_eq!(frame.top, 25.0);
    }

    #[test]
    fn zero_size_extent_is_rejected() {
        let err = Frame::buffered(extent(3.0, 4.0, 3.0, 4.0), 0.1).unwrap_err();
        assert!(matches!(err, PlotError::InvalidExtent));
    }

    #[test]
    fn intersects_and_contains() {
        let frame = Frame::buffered(extent(0.0, 0.0, 10.0, 10.0), 0.0).unwrap();

        assert!(frame.contains(5.0, 5.0));
        assert!(!frame.contains(11.0, 5.0));
        assert!(frame.intersects(&extent(9.0, 9.0, 20.0, 20.0)));
        assert!(!frame.intersects(&extent(11.0, 11.0, 20.0, 20.0)));
    }
}
