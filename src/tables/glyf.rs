//! A [Glyph Data Table](
//! https://learn.microsoft.com/en-us/typography/opentype/spec/glyf)
//! implementation.

use crate::parser::Reader;
use crate::tables::loca;
use crate::{Error, GlyphId, Rect, Result};

/// The decoded header of a single `glyf` entry.
///
/// The point or component stream is kept as an undecoded view and walked on
/// demand.
#[derive(Clone, Copy, Debug)]
pub struct Record<'a> {
    /// Positive for a simple glyph, negative for a composite, zero for a
    /// blank glyph.
    pub number_of_contours: i16,
    /// The bounding box stored in the glyph header.
    ///
    /// Not always trustworthy; icon fonts are known to store stale boxes.
    pub bbox: Rect,
    /// Everything after the 10-byte header.
    pub data: &'a [u8],
}

impl<'a> Record<'a> {
    pub(crate) const BLANK: Record<'static> = Record {
        number_of_contours: 0,
        bbox: Rect {
            x_min: 0,
            y_min: 0,
            x_max: 0,
            y_max: 0,
        },
        data: &[],
    };

    fn parse(data: &'a [u8]) -> Result<Self> {
        if data.is_empty() {
            return Ok(Record::BLANK);
        }

        let mut r = Reader::new(data);
        let number_of_contours = r.read_i16()?;
        let bbox = Rect {
            x_min: r.read_i16()?,
            y_min: r.read_i16()?,
            x_max: r.read_i16()?,
            y_max: r.read_i16()?,
        };
        Ok(Record {
            number_of_contours,
            bbox,
            data: &data[r.tell()..],
        })
    }

    /// Checks whether the glyph has no outline at all.
    pub fn is_blank(&self) -> bool {
        self.number_of_contours == 0
    }

    /// Checks whether the glyph is composed out of other glyphs.
    pub fn is_composite(&self) -> bool {
        self.number_of_contours < 0
    }
}

/// A decoded Glyph Data table: one [`Record`] per glyph id.
#[derive(Clone, Debug)]
pub struct Table<'a> {
    records: Vec<Record<'a>>,
}

impl<'a> Table<'a> {
    /// Parses the table, slicing one record per `loca` slot.
    pub fn parse(data: &'a [u8], loca: &loca::Table) -> Result<Self> {
        let mut records = Vec::with_capacity(usize::from(loca.len()));
        for id in 0..loca.len() {
            // The range exists for every id below loca.len().
            let range = match loca.glyph_range(GlyphId(id)) {
                Some(range) => range,
                None => break,
            };
            let slice = data
                .get(range)
                .ok_or(Error::Malformed("'loca' offset past the end of 'glyf'"))?;
            records.push(Record::parse(slice)?);
        }
        Ok(Table { records })
    }

    /// Returns the record for a glyph id.
    pub fn get(&self, glyph_id: GlyphId) -> Option<&Record<'a>> {
        self.records.get(usize::from(glyph_id.0))
    }

    /// Returns the number of records.
    pub fn len(&self) -> u16 {
        self.records.len() as u16
    }

    /// Checks whether the table has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns an iterator over `(glyph id, record)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (GlyphId, &Record<'a>)> {
        self.records
            .iter()
            .enumerate()
            .map(|(id, record)| (GlyphId(id as u16), record))
    }
}
