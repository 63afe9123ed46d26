//! Glyph outlines, reconstructed from the `glyf` point and component
//! streams.
//!
//! Simple glyphs store their contours as a packed run of flags followed by
//! delta-encoded coordinates; composite glyphs reference other glyphs
//! through affine transforms. Both are walked on demand, straight from the
//! byte views sliced at font-open time.

use log::{error, warn};

use crate::font::Font;
use crate::geom::{Point, Transform};
use crate::outline::{BBoxBuilder, OutlineBuilder, SvgPathBuilder};
use crate::parser::Reader;
use crate::tables::glyf;
use crate::{GlyphId, Result};

/// Components are not allowed to nest deeper than this. Not defined by the
/// format; a backstop against malformed fonts.
const MAX_COMPONENT_DEPTH: u8 = 32;

// https://learn.microsoft.com/en-us/typography/opentype/spec/glyf#simple-glyph-description
#[derive(Clone, Copy, Default)]
struct SimpleGlyphFlags(u8);

#[rustfmt::skip]
impl SimpleGlyphFlags {
    #[inline] fn on_curve_point(self) -> bool { self.0 & 0x01 != 0 }
    #[inline] fn x_short(self) -> bool { self.0 & 0x02 != 0 }
    #[inline] fn y_short(self) -> bool { self.0 & 0x04 != 0 }
    #[inline] fn repeat_flag(self) -> bool { self.0 & 0x08 != 0 }
    #[inline] fn x_is_same_or_positive_short(self) -> bool { self.0 & 0x10 != 0 }
    #[inline] fn y_is_same_or_positive_short(self) -> bool { self.0 & 0x20 != 0 }
}

// https://learn.microsoft.com/en-us/typography/opentype/spec/glyf#composite-glyph-description
#[derive(Clone, Copy)]
struct CompositeGlyphFlags(u16);

#[rustfmt::skip]
impl CompositeGlyphFlags {
    #[inline] fn arg_1_and_2_are_words(self) -> bool { self.0 & 0x0001 != 0 }
    #[inline] fn args_are_xy_values(self) -> bool { self.0 & 0x0002 != 0 }
    #[inline] fn we_have_a_scale(self) -> bool { self.0 & 0x0008 != 0 }
    #[inline] fn more_components(self) -> bool { self.0 & 0x0020 != 0 }
    #[inline] fn we_have_an_x_and_y_scale(self) -> bool { self.0 & 0x0040 != 0 }
    #[inline] fn we_have_a_two_by_two(self) -> bool { self.0 & 0x0080 != 0 }
}

/// One point of a simple glyph's packed stream.
#[derive(Clone, Copy, Debug)]
struct GlyphPoint {
    point: Point,
    on_curve: bool,
    /// Closes the current contour.
    last: bool,
}

/// An iterator decoding the packed flag/coordinate streams of a simple
/// glyph.
///
/// The flag, x and y runs are walked in lockstep through three independent
/// readers; coordinates accumulate as deltas. The iterator simply ends if
/// the streams turn out shorter than the advertised point count.
struct GlyphPoints<'a> {
    flags: Reader<'a>,
    x_coords: Reader<'a>,
    y_coords: Reader<'a>,
    endpoints: Reader<'a>,
    next_endpoint: Option<u16>,
    point_index: u16,
    points_left: u16,
    flag_repeats: u8,
    last_flags: SimpleGlyphFlags,
    x: i16,
    y: i16,
}

impl<'a> GlyphPoints<'a> {
    /// Prepares the iterator from a simple glyph body (everything after the
    /// 10-byte glyph header).
    fn new(data: &'a [u8], number_of_contours: u16) -> Option<Self> {
        let mut r = Reader::new(data);
        let endpoints_len = usize::from(number_of_contours) * 2;
        let mut endpoints = Reader::new(r.read(endpoints_len).ok()?);

        let points_total = {
            let mut last = endpoints;
            last.seek(-2);
            last.read_u16().ok()?.checked_add(1)?
        };

        // Skip the hinting bytecode.
        let instructions_len = r.read_u16().ok()?;
        r.advance(usize::from(instructions_len));

        let flags_offset = r.tell();
        let x_coords_len = resolve_x_coords_len(&mut r, points_total)?;
        let x_coords_offset = r.tell();
        let y_coords_offset = x_coords_offset + x_coords_len;

        let next_endpoint = endpoints.read_u16().ok();
        Some(GlyphPoints {
            flags: r.view(flags_offset, x_coords_offset),
            x_coords: r.view(x_coords_offset, y_coords_offset),
            y_coords: r.view(y_coords_offset, data.len()),
            endpoints,
            next_endpoint,
            point_index: 0,
            // A single-point glyph cannot form a contour.
            points_left: if points_total == 1 { 0 } else { points_total },
            flag_repeats: 0,
            last_flags: SimpleGlyphFlags::default(),
            x: 0,
            y: 0,
        })
    }
}

/// The number of x-stream bytes depends on every flag, so the whole flag
/// run has to be scanned before the coordinate streams can be located.
fn resolve_x_coords_len(r: &mut Reader, points_total: u16) -> Option<usize> {
    let mut flags_left = points_total;
    let mut x_coords_len = 0usize;
    while flags_left > 0 {
        let flags = SimpleGlyphFlags(r.read_u8().ok()?);

        let repeats = if flags.repeat_flag() {
            u16::from(r.read_u8().ok()?) + 1
        } else {
            1
        };
        if repeats > flags_left {
            return None;
        }
        flags_left -= repeats;

        if flags.x_short() {
            // Coordinate is 1 byte long.
            x_coords_len += usize::from(repeats);
        } else if !flags.x_is_same_or_positive_short() {
            // Coordinate is 2 bytes long.
            x_coords_len += usize::from(repeats) * 2;
        }
    }

    Some(x_coords_len)
}

impl Iterator for GlyphPoints<'_> {
    type Item = GlyphPoint;

    fn next(&mut self) -> Option<Self::Item> {
        if self.points_left == 0 {
            return None;
        }

        if self.flag_repeats == 0 {
            self.last_flags = SimpleGlyphFlags(self.flags.read_u8().ok()?);
            if self.last_flags.repeat_flag() {
                self.flag_repeats = self.flags.read_u8().ok()?;
            }
        } else {
            self.flag_repeats -= 1;
        }

        let dx = match (
            self.last_flags.x_short(),
            self.last_flags.x_is_same_or_positive_short(),
        ) {
            (true, true) => i16::from(self.x_coords.read_u8().ok()?),
            (true, false) => -i16::from(self.x_coords.read_u8().ok()?),
            (false, true) => 0, // same as the previous coordinate
            (false, false) => self.x_coords.read_i16().ok()?,
        };
        self.x = self.x.wrapping_add(dx);

        let dy = match (
            self.last_flags.y_short(),
            self.last_flags.y_is_same_or_positive_short(),
        ) {
            (true, true) => i16::from(self.y_coords.read_u8().ok()?),
            (true, false) => -i16::from(self.y_coords.read_u8().ok()?),
            (false, true) => 0,
            (false, false) => self.y_coords.read_i16().ok()?,
        };
        self.y = self.y.wrapping_add(dy);

        let index = self.point_index;
        self.point_index += 1;
        self.points_left -= 1;

        let mut last = false;
        if let Some(endpoint) = self.next_endpoint {
            if index >= endpoint {
                last = true;
                self.next_endpoint = self.endpoints.read_u16().ok();
            }
        }

        Some(GlyphPoint {
            point: Point::new(f32::from(self.x), f32::from(self.y)),
            on_curve: self.last_flags.on_curve_point(),
            last,
        })
    }
}

/// Turns a point stream into outline commands.
///
/// Off-curve points are quadratic control points; two adjacent off-curve
/// points imply an on-curve point halfway between them. Useful links:
///
/// - https://developer.apple.com/fonts/TrueType-Reference-Manual/RM01/Chap1.html
/// - https://stackoverflow.com/a/20772557
fn points_to_contours(
    points: impl Iterator<Item = GlyphPoint>,
    ts: Transform,
    builder: &mut dyn OutlineBuilder,
) {
    let mut first_on_curve: Option<Point> = None;
    let mut first_off_curve: Option<Point> = None;
    let mut last_off_curve: Option<Point> = None;

    let quad_to = |builder: &mut dyn OutlineBuilder, ctrl: Point, to: Point| {
        let ctrl = ts.apply(ctrl);
        let to = ts.apply(to);
        builder.quad_to(ctrl.x, ctrl.y, to.x, to.y);
    };

    for point in points {
        let p = point.point;
        if first_on_curve.is_none() {
            if point.on_curve {
                first_on_curve = Some(p);
                let m = ts.apply(p);
                builder.move_to(m.x, m.y);
            } else if let Some(off) = first_off_curve {
                // A contour that starts off-curve opens at the implied
                // midpoint of its first two control points.
                let mid = off.lerp(p, 0.5);
                first_on_curve = Some(mid);
                last_off_curve = Some(p);
                let m = ts.apply(mid);
                builder.move_to(m.x, m.y);
            } else {
                first_off_curve = Some(p);
            }
        } else {
            match (last_off_curve, point.on_curve) {
                (Some(off), true) => {
                    last_off_curve = None;
                    quad_to(builder, off, p);
                }
                (Some(off), false) => {
                    let mid = off.lerp(p, 0.5);
                    last_off_curve = Some(p);
                    quad_to(builder, off, mid);
                }
                (None, true) => {
                    let l = ts.apply(p);
                    builder.line_to(l.x, l.y);
                }
                (None, false) => {
                    last_off_curve = Some(p);
                }
            }
        }

        if point.last {
            if let (Some(first_off), Some(last_off)) = (first_off_curve, last_off_curve) {
                let mid = last_off.lerp(first_off, 0.5);
                last_off_curve = None;
                quad_to(builder, last_off, mid);
            }
            if let Some(first_on) = first_on_curve {
                if let Some(first_off) = first_off_curve {
                    quad_to(builder, first_off, first_on);
                } else if let Some(last_off) = last_off_curve {
                    quad_to(builder, last_off, first_on);
                }
                // A trailing on-curve point needs no explicit segment:
                // the straight closing edge is implied by the close.
                builder.close();
            }

            first_on_curve = None;
            first_off_curve = None;
            last_off_curve = None;
        }
    }
}

/// A glyph of a parsed font.
///
/// Holds the glyph header and a view over the undecoded point or component
/// stream. Cheap to copy; decoding happens on every outline request.
#[derive(Clone, Copy)]
pub struct Glyph<'a> {
    font: &'a Font<'a>,
    glyph_id: GlyphId,
    record: glyf::Record<'a>,
}

impl<'a> Glyph<'a> {
    pub(crate) fn new(font: &'a Font<'a>, glyph_id: GlyphId) -> Self {
        // `Font::glyph` only hands out ids present in the glyf table.
        let record = font
            .glyf()
            .and_then(|table| table.get(glyph_id))
            .copied()
            .unwrap_or(glyf::Record::BLANK);
        Glyph {
            font,
            glyph_id,
            record,
        }
    }

    /// Returns the glyph id.
    #[inline]
    pub fn id(&self) -> GlyphId {
        self.glyph_id
    }

    /// Checks whether the glyph has no outline.
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.record.is_blank()
    }

    /// Computes the glyph's approximate bounding box by walking its points.
    ///
    /// The box stored in the glyph header is not always correct (icon fonts
    /// are notorious for stale boxes), so it is recomputed here. Control
    /// points count as extents, which can overestimate the ink.
    pub fn bbox(&self) -> Option<(Point, Point)> {
        if self.record.is_composite() {
            let mut builder = BBoxBuilder::new();
            self.build_outline(&mut builder, Transform::identity());
            builder.rect()
        } else if self.record.is_blank() {
            None
        } else {
            let points =
                GlyphPoints::new(self.record.data, self.record.number_of_contours as u16)?;
            let mut rect: Option<(Point, Point)> = None;
            for GlyphPoint { point, .. } in points {
                rect = Some(match rect {
                    None => (point, point),
                    Some((min, max)) => (
                        Point::new(min.x.min(point.x), min.y.min(point.y)),
                        Point::new(max.x.max(point.x), max.y.max(point.y)),
                    ),
                });
            }
            rect
        }
    }

    /// Feeds the glyph's outline into `builder`, transforming every point
    /// through `ts`.
    ///
    /// Problems inside the glyph data (truncated streams, missing or
    /// cyclic composite references) are logged and the affected part is
    /// skipped; whatever was already emitted stays emitted.
    pub fn build_outline(&self, builder: &mut dyn OutlineBuilder, ts: Transform) {
        let mut visited = vec![self.glyph_id];
        self.outline_impl(builder, ts, &mut visited, 0);
    }

    fn outline_impl(
        &self,
        builder: &mut dyn OutlineBuilder,
        ts: Transform,
        visited: &mut Vec<GlyphId>,
        depth: u8,
    ) {
        if depth >= MAX_COMPONENT_DEPTH {
            warn!("glyph {}: component nesting too deep", self.glyph_id.0);
            return;
        }

        if self.record.is_composite() {
            if let Err(e) = self.outline_composite(builder, ts, visited, depth) {
                warn!("glyph {}: broken composite data: {}", self.glyph_id.0, e);
            }
        } else if !self.record.is_blank() {
            match GlyphPoints::new(self.record.data, self.record.number_of_contours as u16) {
                Some(points) => points_to_contours(points, ts, builder),
                None => warn!("glyph {}: broken outline data", self.glyph_id.0),
            }
        }
    }

    fn outline_composite(
        &self,
        builder: &mut dyn OutlineBuilder,
        parent_ts: Transform,
        visited: &mut Vec<GlyphId>,
        depth: u8,
    ) -> Result<()> {
        let mut r = Reader::new(self.record.data);
        loop {
            let flags = CompositeGlyphFlags(r.read_u16()?);
            let child_id = GlyphId(r.read_u16()?);

            let mut ts = Transform::identity();
            let (arg1, arg2) = if flags.arg_1_and_2_are_words() {
                (f32::from(r.read_i16()?), f32::from(r.read_i16()?))
            } else {
                (f32::from(r.read_i8()?), f32::from(r.read_i8()?))
            };
            // Arguments are either an offset or a pair of point indices to
            // align; point alignment is ignored, but the bytes are consumed
            // either way to keep the component stream in step.
            if flags.args_are_xy_values() {
                ts.e = arg1;
                ts.f = arg2;
            }

            if flags.we_have_a_two_by_two() {
                ts.a = r.read_f2dot14()?;
                ts.b = r.read_f2dot14()?;
                ts.c = r.read_f2dot14()?;
                ts.d = r.read_f2dot14()?;
            } else if flags.we_have_an_x_and_y_scale() {
                ts.a = r.read_f2dot14()?;
                ts.d = r.read_f2dot14()?;
            } else if flags.we_have_a_scale() {
                ts.a = r.read_f2dot14()?;
                ts.d = ts.a;
            }

            match self.font.glyph(child_id) {
                Some(child) => {
                    if visited.contains(&child_id) {
                        error!(
                            "glyph {}: composite cycle through glyph {}",
                            self.glyph_id.0, child_id.0
                        );
                    } else {
                        visited.push(child_id);
                        child.outline_impl(builder, parent_ts.compose(ts), visited, depth + 1);
                        visited.pop();
                    }
                }
                None => warn!(
                    "glyph {}: component references missing glyph {}",
                    self.glyph_id.0, child_id.0
                ),
            }

            if !flags.more_components() {
                return Ok(());
            }
        }
    }

    /// Renders the glyph as a 100×100 SVG path.
    ///
    /// The glyph's bounding box is centered inside an em-sized square, the
    /// y-axis is flipped (fonts point up, SVG points down) and everything
    /// is scaled to a 100×100 viewport. `ts` is applied on top, after
    /// normalization. Returns the path data together with the bounding box
    /// it was computed from; a contour-less glyph yields an empty path.
    pub fn to_svg_path(
        &self,
        ts: Transform,
        relative: bool,
        precision: usize,
    ) -> (String, Option<(Point, Point)>) {
        let (min, max) = match self.bbox() {
            Some(bbox) => bbox,
            None => return (String::new(), None),
        };

        let mid = (min + max) * 0.5;
        let em = f32::from(self.font.head().units_per_em)
            .max((max.x - min.x) * 1.1)
            .max((max.y - min.y) * 1.1);
        let center = Point::new(em / 2.0, em / 2.0) - mid;

        let ts = ts
            .compose(Transform::new(1.0, 0.0, 0.0, -1.0, 0.0, 100.0))
            .scale(100.0 / em, 100.0 / em)
            .translate(center.x, center.y);

        let mut builder = SvgPathBuilder::new(relative, precision, ts);
        self.build_outline(&mut builder, Transform::identity());
        (builder.finish(), Some((min, max)))
    }
}

impl core::fmt::Debug for Glyph<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Glyph")
            .field("id", &self.glyph_id.0)
            .field("contours", &self.record.number_of_contours)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on(x: f32, y: f32, last: bool) -> GlyphPoint {
        GlyphPoint {
            point: Point::new(x, y),
            on_curve: true,
            last,
        }
    }

    fn off(x: f32, y: f32, last: bool) -> GlyphPoint {
        GlyphPoint {
            point: Point::new(x, y),
            on_curve: false,
            last,
        }
    }

    fn contours(points: Vec<GlyphPoint>) -> String {
        let mut builder = SvgPathBuilder::new(false, 2, Transform::identity());
        points_to_contours(points.into_iter(), Transform::identity(), &mut builder);
        builder.finish()
    }

    #[test]
    fn all_on_curve_square() {
        let path = contours(vec![
            on(0.0, 0.0, false),
            on(10.0, 0.0, false),
            on(10.0, 10.0, false),
            on(0.0, 10.0, true),
        ]);
        assert_eq!(path, "M0,0L10,0L10,10L0,10Z");
    }

    #[test]
    fn implicit_on_curve_between_off_points() {
        let path = contours(vec![
            on(0.0, 0.0, false),
            off(10.0, 0.0, false),
            off(20.0, 10.0, false),
            on(0.0, 10.0, true),
        ]);
        assert_eq!(path, "M0,0Q10,0 15,5Q20,10 0,10Z");
    }

    #[test]
    fn trailing_off_curve_closes_with_quad() {
        let path = contours(vec![
            on(0.0, 0.0, false),
            on(10.0, 0.0, false),
            off(10.0, 10.0, true),
        ]);
        assert_eq!(path, "M0,0L10,0Q10,10 0,0Z");
    }

    #[test]
    fn contour_starting_off_curve() {
        // The contour opens at the midpoint of the two leading off-curve
        // points and closes back through the first one.
        let path = contours(vec![
            off(0.0, 0.0, false),
            off(10.0, 0.0, false),
            on(10.0, 10.0, true),
        ]);
        assert_eq!(path, "M5,0Q10,0 10,10Q0,0 5,0Z");
    }

    #[test]
    fn two_contours_reset_state() {
        let path = contours(vec![
            on(0.0, 0.0, false),
            on(5.0, 0.0, true),
            on(20.0, 20.0, false),
            on(25.0, 20.0, true),
        ]);
        assert_eq!(path, "M0,0L5,0ZM20,20L25,20Z");
    }

    #[test]
    fn decode_packed_point_stream() {
        // One contour, four points: flags mix short, repeated and
        // same-as-previous coordinate encodings.
        let data = [
            0x00, 0x03, // endPtsOfContours[0]: 3
            0x00, 0x00, // instructionLength: 0
            // Flags
            0x31, // on curve, x same/positive, y same/positive
            0x33, // on curve, x positive short, y same/positive
            0x35, // on curve, x same, y positive short
            0x23, // on curve, x negative short, y same
            // X coordinates
            0x0A, // +10
            0x0A, // -10
            // Y coordinates
            0x0A, // +10
        ];

        let points: Vec<_> = GlyphPoints::new(&data, 1).unwrap().collect();
        assert_eq!(points.len(), 4);
        assert_eq!(points[0].point, Point::new(0.0, 0.0));
        assert_eq!(points[1].point, Point::new(10.0, 0.0));
        assert_eq!(points[2].point, Point::new(10.0, 10.0));
        assert_eq!(points[3].point, Point::new(0.0, 10.0));
        assert!(points.iter().all(|p| p.on_curve));
        assert!(points[3].last);
        assert!(!points[2].last);
    }

    #[test]
    fn repeat_flag_replicates() {
        let data = [
            0x00, 0x02, // endPtsOfContours[0]: 2
            0x00, 0x00, // instructionLength: 0
            // Flags
            0x3B, 0x02, // on curve, x positive short; repeat 2 more
            // X coordinates
            0x01, 0x02, 0x03,
            // Y coordinates (all implied same)
        ];

        let points: Vec<_> = GlyphPoints::new(&data, 1).unwrap().collect();
        assert_eq!(points.len(), 3);
        assert_eq!(points[2].point, Point::new(6.0, 0.0));
    }

    #[test]
    fn single_point_glyph_yields_nothing() {
        let data = [
            0x00, 0x00, // endPtsOfContours[0]: 0
            0x00, 0x00, // instructionLength: 0
            0x31, // flags for the single point
        ];
        assert_eq!(GlyphPoints::new(&data, 1).unwrap().count(), 0);
    }

    #[test]
    fn truncated_stream_stops_early() {
        let data = [
            0x00, 0x02, // endPtsOfContours[0]: 2
            0x00, 0x00, // instructionLength: 0
            0x0B, 0x02, // on curve, x positive short; repeat 2 more
            // X stream is missing entirely.
        ];
        let points: Vec<_> = GlyphPoints::new(&data, 1).unwrap().collect();
        assert!(points.is_empty());
    }
}
