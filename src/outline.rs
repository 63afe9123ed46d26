//! Outline construction sinks.
//!
//! Glyph decoding emits a stream of path commands into an [`OutlineBuilder`].
//! Two builders are provided: [`SvgPathBuilder`] renders the stream as SVG
//! path data, [`BBoxBuilder`] accumulates a bounding box.

use core::fmt::Write;

use crate::geom::{Point, Transform};

/// A trait for glyph outline construction.
///
/// Every contour arrives as one `move_to`, zero or more segments and exactly
/// one `close`.
pub trait OutlineBuilder {
    /// Appends a MoveTo segment. Start of a contour.
    fn move_to(&mut self, x: f32, y: f32);

    /// Appends a LineTo segment.
    fn line_to(&mut self, x: f32, y: f32);

    /// Appends a quadratic Bézier segment.
    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32);

    /// Appends a cubic Bézier segment.
    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32);

    /// Appends a ClosePath segment. End of a contour.
    fn close(&mut self);
}

/// An [`OutlineBuilder`] that renders the command stream as SVG path data.
///
/// Coordinates are passed through the configured [`Transform`], rounded to
/// `precision` decimal digits and written in the most compact form SVG
/// allows: no leading `+`, trailing zeros trimmed, and a separator only
/// where the next coordinate would otherwise fuse with the previous one
/// (a leading `-` separates by itself).
#[derive(Debug)]
pub struct SvgPathBuilder {
    path: String,
    relative: bool,
    precision: usize,
    ts: Transform,
    prev: Point,
}

impl SvgPathBuilder {
    /// Creates a builder.
    ///
    /// `relative` selects lowercase relative commands, `precision` is the
    /// number of decimal digits per coordinate and `ts` is applied to every
    /// point before formatting.
    pub fn new(relative: bool, precision: usize, ts: Transform) -> Self {
        SvgPathBuilder {
            path: String::new(),
            relative,
            precision,
            ts,
            prev: Point::default(),
        }
    }

    /// Consumes the builder and returns the accumulated path data.
    #[inline]
    pub fn finish(self) -> String {
        self.path
    }

    /// Returns the path data accumulated so far.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.path
    }

    fn letter(&self, absolute: char, relative: char) -> char {
        if self.relative {
            relative
        } else {
            absolute
        }
    }

    /// Writes one coordinate pair and returns the transformed point, which
    /// becomes the reference for relative deltas once the command ends.
    fn write_point(&mut self, p: Point, sep: bool) -> Point {
        let p = self.ts.apply(p);
        let d = if self.relative { p - self.prev } else { p };

        if sep && d.x >= 0.0 {
            self.path.push(' ');
        }
        self.write_coord(d.x);
        if d.y >= 0.0 {
            self.path.push(',');
        }
        self.write_coord(d.y);

        p
    }

    fn write_coord(&mut self, v: f32) {
        let start = self.path.len();
        let _ = write!(self.path, "{:.*}", self.precision, v);
        if self.precision > 0 {
            let trimmed = self.path[start..]
                .trim_end_matches('0')
                .trim_end_matches('.')
                .len();
            self.path.truncate(start + trimmed);
        }
    }
}

impl OutlineBuilder for SvgPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        let letter = self.letter('M', 'm');
        self.path.push(letter);
        self.prev = self.write_point(Point::new(x, y), false);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let letter = self.letter('L', 'l');
        self.path.push(letter);
        self.prev = self.write_point(Point::new(x, y), false);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let letter = self.letter('Q', 'q');
        self.path.push(letter);
        self.write_point(Point::new(x1, y1), false);
        self.prev = self.write_point(Point::new(x, y), true);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let letter = self.letter('C', 'c');
        self.path.push(letter);
        self.write_point(Point::new(x1, y1), false);
        self.write_point(Point::new(x2, y2), true);
        self.prev = self.write_point(Point::new(x, y), true);
    }

    fn close(&mut self) {
        self.path.push('Z');
    }
}

/// An [`OutlineBuilder`] that accumulates the bounding box of every control
/// point it sees.
///
/// Control points of a Bézier segment can lie outside the curve, so the
/// result is an upper bound on the ink extents.
#[derive(Clone, Copy, Default, Debug)]
pub struct BBoxBuilder {
    min: Option<Point>,
    max: Option<Point>,
}

impl BBoxBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        BBoxBuilder::default()
    }

    /// Returns the accumulated `(min, max)` corners, or `None` when no point
    /// was ever offered.
    pub fn rect(&self) -> Option<(Point, Point)> {
        Some((self.min?, self.max?))
    }

    fn extend(&mut self, x: f32, y: f32) {
        match (&mut self.min, &mut self.max) {
            (Some(min), Some(max)) => {
                min.x = min.x.min(x);
                min.y = min.y.min(y);
                max.x = max.x.max(x);
                max.y = max.y.max(y);
            }
            _ => {
                self.min = Some(Point::new(x, y));
                self.max = Some(Point::new(x, y));
            }
        }
    }
}

impl OutlineBuilder for BBoxBuilder {
    fn move_to(&mut self, _x: f32, _y: f32) {}

    fn line_to(&mut self, x: f32, y: f32) {
        self.extend(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.extend(x1, y1);
        self.extend(x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.extend(x1, y1);
        self.extend(x2, y2);
        self.extend(x, y);
    }

    fn close(&mut self) {}
}
