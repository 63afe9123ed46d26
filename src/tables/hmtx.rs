//! A [Horizontal Metrics Table](
//! https://learn.microsoft.com/en-us/typography/opentype/spec/hmtx)
//! implementation.

use crate::parser::Reader;
use crate::{GlyphId, Result};

/// One paired `hmtx` record.
#[derive(Clone, Copy, Debug)]
pub struct Metrics {
    /// Advance width in font units.
    pub advance: u16,
    /// Left side bearing in font units.
    pub side_bearing: i16,
}

/// A decoded Horizontal Metrics Table.
///
/// 'As an optimization, the number of records can be less than the number
/// of glyphs, in which case the advance width value of the last record
/// applies to all remaining glyph IDs.'
#[derive(Clone, Debug)]
pub struct Table {
    metrics: Vec<Metrics>,
    trailing_bearings: Vec<i16>,
}

impl Table {
    /// Parses the table from raw data.
    ///
    /// `number_of_metrics` comes from `hhea`, `glyph_count` from `maxp`.
    pub fn parse(data: &[u8], number_of_metrics: u16, glyph_count: u16) -> Result<Self> {
        let mut r = Reader::new(data);

        let mut metrics = Vec::with_capacity(usize::from(number_of_metrics));
        for _ in 0..number_of_metrics {
            metrics.push(Metrics {
                advance: r.read_u16()?,
                side_bearing: r.read_i16()?,
            });
        }

        // The remaining glyphs share the last advance and carry only a
        // side bearing each.
        let trailing = glyph_count.saturating_sub(number_of_metrics);
        let mut trailing_bearings = Vec::with_capacity(usize::from(trailing));
        for _ in 0..trailing {
            trailing_bearings.push(r.read_i16()?);
        }

        Ok(Table {
            metrics,
            trailing_bearings,
        })
    }

    /// Returns the glyph's advance width.
    pub fn advance(&self, glyph_id: GlyphId) -> Option<u16> {
        let index = usize::from(glyph_id.0);
        if index < self.metrics.len() {
            Some(self.metrics[index].advance)
        } else if index < self.metrics.len() + self.trailing_bearings.len() {
            self.metrics.last().map(|m| m.advance)
        } else {
            None
        }
    }

    /// Returns the glyph's left side bearing.
    pub fn side_bearing(&self, glyph_id: GlyphId) -> Option<i16> {
        let index = usize::from(glyph_id.0);
        if index < self.metrics.len() {
            Some(self.metrics[index].side_bearing)
        } else {
            self.trailing_bearings
                .get(index - self.metrics.len())
                .copied()
        }
    }
}
