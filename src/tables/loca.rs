//! An [Index to Location Table](
//! https://learn.microsoft.com/en-us/typography/opentype/spec/loca)
//! implementation.

use core::ops::Range;

use crate::parser::Reader;
use crate::tables::head::IndexToLocationFormat;
use crate::{Error, GlyphId, Result};

/// A decoded Index to Location Table.
///
/// Holds `glyph_count + 1` byte offsets into the `glyf` table; glyph `i`
/// occupies `offsets[i]..offsets[i + 1]`.
#[derive(Clone, Debug)]
pub struct Table {
    offsets: Vec<u32>,
}

impl Table {
    /// Parses the table from raw data.
    ///
    /// Short offsets store the actual offset divided by 2 and are scaled
    /// back here. 'The offsets must be in ascending order.'
    pub fn parse(data: &[u8], glyph_count: u16, format: IndexToLocationFormat) -> Result<Self> {
        let mut r = Reader::new(data);
        let total = usize::from(glyph_count) + 1;

        let mut offsets = Vec::with_capacity(total);
        for _ in 0..total {
            let offset = match format {
                IndexToLocationFormat::Short => u32::from(r.read_u16()?) * 2,
                IndexToLocationFormat::Long => r.read_u32()?,
            };
            if let Some(prev) = offsets.last() {
                if offset < *prev {
                    return Err(Error::Malformed("'loca' offsets are not in ascending order"));
                }
            }
            offsets.push(offset);
        }

        Ok(Table { offsets })
    }

    /// Returns the number of glyph slots.
    pub fn len(&self) -> u16 {
        (self.offsets.len() - 1) as u16
    }

    /// Checks whether the table has no glyph slots.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the glyph's byte range inside the `glyf` table.
    ///
    /// The range is empty for blank glyphs.
    pub fn glyph_range(&self, glyph_id: GlyphId) -> Option<Range<usize>> {
        let index = usize::from(glyph_id.0);
        let start = *self.offsets.get(index)?;
        let end = *self.offsets.get(index + 1)?;
        Some(start as usize..end as usize)
    }
}
