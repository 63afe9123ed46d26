//! A [Character to Glyph Index Mapping Table](
//! https://learn.microsoft.com/en-us/typography/opentype/spec/cmap)
//! implementation.

use std::collections::HashMap;

use log::warn;

use crate::parser::Reader;
use crate::{Error, GlyphId, Result};

/// A decoded Character to Glyph Index Mapping Table.
///
/// Both directions are materialized: codepoint → glyph for lookup and
/// glyph → codepoint for joining against `post` names. When several
/// codepoints share a glyph the last one wins on the glyph side.
#[derive(Clone, Default, Debug)]
pub struct Table {
    codepoint_to_glyph: HashMap<u32, u16>,
    glyph_to_codepoint: HashMap<u16, u32>,
}

impl Table {
    /// Parses the table from raw data.
    ///
    /// A Unicode subtable is selected by preference: platform 0 encoding 4
    /// beats platform 0 encoding 3. Subtable formats 4 ("segment mapping to
    /// delta values") and 12 ("segmented coverage") are supported.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = Reader::new(data);
        r.advance(2); // version

        let num_tables = r.read_u16()?;
        let mut unicode_offset = None;
        for _ in 0..num_tables {
            let platform_id = r.read_u16()?;
            let encoding_id = r.read_u16()?;
            let offset = r.read_u32()?;
            if platform_id == 0 && encoding_id == 4 {
                unicode_offset = Some(offset);
            } else if unicode_offset.is_none() && platform_id == 0 && encoding_id == 3 {
                unicode_offset = Some(offset);
            }
        }
        let offset =
            unicode_offset.ok_or(Error::UnsupportedFormat("no Unicode 'cmap' subtable"))?;

        r.seek(offset as isize);
        let format = r.read_u16()?;

        let mut table = Table::default();
        match format {
            4 => table.parse_format4(&mut r)?,
            12 => table.parse_format12(&mut r)?,
            _ => return Err(Error::UnsupportedFormat("'cmap' subtable format")),
        }
        Ok(table)
    }

    // https://learn.microsoft.com/en-us/typography/opentype/spec/cmap#format-4-segment-mapping-to-delta-values
    fn parse_format4(&mut self, r: &mut Reader) -> Result<()> {
        let length = r.read_u16()?;
        let mut s = r.view(r.tell(), r.tell() + usize::from(length));
        s.advance(2); // language

        let seg_count = s.read_u16()? / 2;
        s.advance(6); // searchRange + entrySelector + rangeShift

        let mut end_codes = Vec::with_capacity(usize::from(seg_count));
        for _ in 0..seg_count {
            end_codes.push(s.read_u16()?);
        }
        s.advance(2); // reservedPad
        let mut start_codes = Vec::with_capacity(usize::from(seg_count));
        for _ in 0..seg_count {
            start_codes.push(s.read_u16()?);
        }
        let mut id_deltas = Vec::with_capacity(usize::from(seg_count));
        for _ in 0..seg_count {
            id_deltas.push(s.read_i16()?);
        }
        let mut id_range_offsets = Vec::with_capacity(usize::from(seg_count));
        for _ in 0..seg_count {
            id_range_offsets.push(s.read_u16()?);
        }

        for i in 0..usize::from(seg_count) {
            let (start, end) = (start_codes[i], end_codes[i]);
            if start == 0xFFFF && end == 0xFFFF {
                break;
            }
            if id_range_offsets[i] != 0 {
                // Glyph-index-array segments are not used by icon fonts.
                warn!(
                    "'cmap' format 4 segment {:#06X}..={:#06X} uses idRangeOffset; skipped",
                    start, end
                );
                continue;
            }
            for code_point in start..=end {
                let glyph_id = code_point.wrapping_add(id_deltas[i] as u16);
                self.insert(u32::from(code_point), glyph_id);
            }
        }
        Ok(())
    }

    // https://learn.microsoft.com/en-us/typography/opentype/spec/cmap#format-12-segmented-coverage
    fn parse_format12(&mut self, r: &mut Reader) -> Result<()> {
        r.advance(10); // reserved + length + language
        let num_groups = r.read_u32()?;
        for _ in 0..num_groups {
            let start_char_code = r.read_u32()?;
            let end_char_code = r.read_u32()?;
            let start_glyph_id = r.read_u32()?;
            for code_point in start_char_code..=end_char_code {
                let glyph_id = start_glyph_id + (code_point - start_char_code);
                self.insert(code_point, glyph_id as u16);
            }
        }
        Ok(())
    }

    fn insert(&mut self, code_point: u32, glyph_id: u16) {
        self.codepoint_to_glyph.insert(code_point, glyph_id);
        self.glyph_to_codepoint.insert(glyph_id, code_point);
    }

    /// Resolves a glyph id for a codepoint.
    pub fn glyph_index(&self, code_point: u32) -> Option<GlyphId> {
        self.codepoint_to_glyph.get(&code_point).copied().map(GlyphId)
    }

    /// Resolves a codepoint for a glyph id.
    pub fn code_point(&self, glyph_id: GlyphId) -> Option<u32> {
        self.glyph_to_codepoint.get(&glyph_id.0).copied()
    }

    /// Returns the number of mapped codepoints.
    pub fn len(&self) -> usize {
        self.codepoint_to_glyph.len()
    }

    /// Checks whether no codepoint is mapped.
    pub fn is_empty(&self) -> bool {
        self.codepoint_to_glyph.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_header(platform_id: u16, encoding_id: u16, subtable: &[u8]) -> Vec<u8> {
        let mut data = vec![
            0x00, 0x00, // version: 0
            0x00, 0x01, // numTables: 1
        ];
        data.extend_from_slice(&platform_id.to_be_bytes());
        data.extend_from_slice(&encoding_id.to_be_bytes());
        data.extend_from_slice(&12u32.to_be_bytes()); // subtable offset
        data.extend_from_slice(subtable);
        data
    }

    const FORMAT4_SINGLE_SEGMENT: &[u8] = &[
        0x00, 0x04, // format: 4
        0x00, 0x20, // length: 32
        0x00, 0x00, // language: 0
        0x00, 0x04, // 2 x segCount: 4
        0x00, 0x02, // searchRange: 2
        0x00, 0x00, // entrySelector: 0
        0x00, 0x02, // rangeShift: 2
        // End character codes
        0x00, 0x43, // char code [0]: 67
        0xFF, 0xFF, // char code [1]: 65535
        0x00, 0x00, // reservedPad
        // Start character codes
        0x00, 0x41, // char code [0]: 65
        0xFF, 0xFF, // char code [1]: 65535
        // Deltas
        0xFF, 0xC0, // delta [0]: -64
        0x00, 0x01, // delta [1]: 1
        // Offsets into glyph index array
        0x00, 0x00, // offset [0]: 0
        0x00, 0x00, // offset [1]: 0
    ];

    #[test]
    fn format4_single_segment() {
        let data = with_header(0, 3, FORMAT4_SINGLE_SEGMENT);
        let table = Table::parse(&data).unwrap();
        assert_eq!(table.glyph_index(0x41), Some(GlyphId(1)));
        assert_eq!(table.glyph_index(0x42), Some(GlyphId(2)));
        assert_eq!(table.glyph_index(0x43), Some(GlyphId(3)));
        assert_eq!(table.glyph_index(0x44), None);
        assert_eq!(table.code_point(GlyphId(2)), Some(0x42));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn format4_skips_range_offset_segments() {
        let data = with_header(
            0,
            3,
            &[
                0x00, 0x04, // format: 4
                0x00, 0x28, // length: 40
                0x00, 0x00, // language: 0
                0x00, 0x06, // 2 x segCount: 6
                0x00, 0x04, // searchRange: 4
                0x00, 0x01, // entrySelector: 1
                0x00, 0x02, // rangeShift: 2
                // End character codes
                0x00, 0x41, // char code [0]: 65
                0x00, 0x50, // char code [1]: 80
                0xFF, 0xFF, // char code [2]: 65535
                0x00, 0x00, // reservedPad
                // Start character codes
                0x00, 0x41, // char code [0]: 65
                0x00, 0x50, // char code [1]: 80
                0xFF, 0xFF, // char code [2]: 65535
                // Deltas
                0xFF, 0xC0, // delta [0]: -64
                0x00, 0x00, // delta [1]: 0
                0x00, 0x01, // delta [2]: 1
                // Offsets into glyph index array
                0x00, 0x00, // offset [0]: 0
                0x00, 0x02, // offset [1]: 2 <- unsupported, skipped
                0x00, 0x00, // offset [2]: 0
            ],
        );
        let table = Table::parse(&data).unwrap();
        assert_eq!(table.glyph_index(0x41), Some(GlyphId(1)));
        assert_eq!(table.glyph_index(0x50), None);
    }

    #[test]
    fn format12_groups() {
        let data = with_header(
            0,
            4,
            &[
                0x00, 0x0C, // format: 12
                0x00, 0x00, // reserved
                0x00, 0x00, 0x00, 0x28, // length: 40
                0x00, 0x00, 0x00, 0x00, // language: 0
                0x00, 0x00, 0x00, 0x02, // numGroups: 2
                // Group [0]
                0x00, 0x01, 0xF3, 0x00, // startCharCode: 0x1F300
                0x00, 0x01, 0xF3, 0x02, // endCharCode: 0x1F302
                0x00, 0x00, 0x00, 0x05, // startGlyphID: 5
                // Group [1]
                0x00, 0x00, 0x00, 0x41, // startCharCode: 65
                0x00, 0x00, 0x00, 0x41, // endCharCode: 65
                0x00, 0x00, 0x00, 0x01, // startGlyphID: 1
            ],
        );
        let table = Table::parse(&data).unwrap();
        assert_eq!(table.glyph_index(0x1F300), Some(GlyphId(5)));
        assert_eq!(table.glyph_index(0x1F301), Some(GlyphId(6)));
        assert_eq!(table.glyph_index(0x1F302), Some(GlyphId(7)));
        assert_eq!(table.glyph_index(0x1F303), None);
        assert_eq!(table.glyph_index(0x41), Some(GlyphId(1)));
        assert_eq!(table.code_point(GlyphId(6)), Some(0x1F301));
    }

    #[test]
    fn last_writer_wins_on_shared_glyphs() {
        let data = with_header(
            0,
            4,
            &[
                0x00, 0x0C, // format: 12
                0x00, 0x00, // reserved
                0x00, 0x00, 0x00, 0x28, // length: 40
                0x00, 0x00, 0x00, 0x00, // language: 0
                0x00, 0x00, 0x00, 0x02, // numGroups: 2
                // Both groups map to glyph 9.
                0x00, 0x00, 0x00, 0x30, // startCharCode: 48
                0x00, 0x00, 0x00, 0x30, // endCharCode: 48
                0x00, 0x00, 0x00, 0x09, // startGlyphID: 9
                0x00, 0x00, 0x00, 0x60, // startCharCode: 96
                0x00, 0x00, 0x00, 0x60, // endCharCode: 96
                0x00, 0x00, 0x00, 0x09, // startGlyphID: 9
            ],
        );
        let table = Table::parse(&data).unwrap();
        assert_eq!(table.glyph_index(0x30), Some(GlyphId(9)));
        assert_eq!(table.glyph_index(0x60), Some(GlyphId(9)));
        assert_eq!(table.code_point(GlyphId(9)), Some(0x60));
    }

    #[test]
    fn prefers_encoding_4_over_3() {
        // Two records: (0, 3) first pointing at a format 12 subtable,
        // (0, 4) second pointing at the format 4 subtable.
        let mut data = vec![
            0x00, 0x00, // version: 0
            0x00, 0x02, // numTables: 2
        ];
        let subtables_at = 4 + 2 * 8;
        data.extend_from_slice(&0u16.to_be_bytes());
        data.extend_from_slice(&3u16.to_be_bytes());
        data.extend_from_slice(&(subtables_at as u32).to_be_bytes());
        data.extend_from_slice(&0u16.to_be_bytes());
        data.extend_from_slice(&4u16.to_be_bytes());
        let format12 = [
            0x00, 0x0C, // format: 12
            0x00, 0x00, // reserved
            0x00, 0x00, 0x00, 0x1C, // length: 28
            0x00, 0x00, 0x00, 0x00, // language
            0x00, 0x00, 0x00, 0x01, // numGroups: 1
            0x00, 0x00, 0x00, 0x41, // startCharCode: 65
            0x00, 0x00, 0x00, 0x41, // endCharCode: 65
            0x00, 0x00, 0x00, 0x63, // startGlyphID: 99
        ];
        data.extend_from_slice(&((subtables_at + format12.len()) as u32).to_be_bytes());
        data.extend_from_slice(&format12);
        data.extend_from_slice(FORMAT4_SINGLE_SEGMENT);

        let table = Table::parse(&data).unwrap();
        // The format 4 subtable behind (0, 4) wins.
        assert_eq!(table.glyph_index(0x41), Some(GlyphId(1)));
    }

    #[test]
    fn no_unicode_subtable() {
        let data = with_header(3, 0, FORMAT4_SINGLE_SEGMENT);
        assert_eq!(
            Table::parse(&data).unwrap_err(),
            Error::UnsupportedFormat("no Unicode 'cmap' subtable")
        );
    }

    #[test]
    fn unknown_format() {
        let data = with_header(0, 3, &[0x00, 0x06]);
        assert_eq!(
            Table::parse(&data).unwrap_err(),
            Error::UnsupportedFormat("'cmap' subtable format")
        );
    }
}
