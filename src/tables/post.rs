//! A [PostScript Table](
//! https://learn.microsoft.com/en-us/typography/opentype/spec/post)
//! implementation.

use std::collections::HashMap;

use crate::parser::Reader;
use crate::{GlyphId, Result};

const VERSION_2: u32 = 0x00020000;
/// Everything between the version field and the version 2.0 name data.
const HEADER_SIZE: usize = 28;
/// 'If the name index is between 0 and 257, treat the name index as a glyph
/// index in the Macintosh standard order.' Only custom names above that
/// range matter for icon fonts.
const MACINTOSH_NAMES_COUNT: u16 = 258;

/// Glyph names from a version 2.0 `post` table.
///
/// Any other table version decodes to an empty map: standard Macintosh
/// names carry no icon-specific information.
#[derive(Clone, Default, Debug)]
pub struct Table {
    names: HashMap<u16, String>,
}

impl Table {
    /// Parses the table from raw data.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = Reader::new(data);
        if r.read_u32()? != VERSION_2 {
            return Ok(Table::default());
        }
        r.advance(HEADER_SIZE);

        // https://learn.microsoft.com/en-us/typography/opentype/spec/post#version-20
        let glyph_count = r.read_u16()?;
        let mut custom_indices = vec![];
        for glyph_id in 0..glyph_count {
            let name_index = r.read_u16()?;
            if name_index >= MACINTOSH_NAMES_COUNT {
                custom_indices.push((glyph_id, name_index - MACINTOSH_NAMES_COUNT));
            }
        }

        let max_index = match custom_indices.iter().map(|&(_, index)| index).max() {
            Some(max) => max,
            None => return Ok(Table::default()),
        };

        let mut strings = Vec::with_capacity(usize::from(max_index) + 1);
        for _ in 0..=max_index {
            let length = r.read_u8()?;
            strings.push(r.read_string(usize::from(length))?);
        }

        let names = custom_indices
            .into_iter()
            .map(|(glyph_id, index)| (glyph_id, strings[usize::from(index)].clone()))
            .collect();
        Ok(Table { names })
    }

    /// Returns the glyph's PostScript name.
    pub fn name(&self, glyph_id: GlyphId) -> Option<&str> {
        self.names.get(&glyph_id.0).map(String::as_str)
    }

    /// Returns the number of named glyphs.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Checks whether the table names no glyphs.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version2(indices: &[u16], strings: &[&str]) -> Vec<u8> {
        let mut data = vec![];
        data.extend_from_slice(&VERSION_2.to_be_bytes());
        data.extend_from_slice(&[0; HEADER_SIZE]);
        data.extend_from_slice(&(indices.len() as u16).to_be_bytes());
        for index in indices {
            data.extend_from_slice(&index.to_be_bytes());
        }
        for s in strings {
            data.push(s.len() as u8);
            data.extend_from_slice(s.as_bytes());
        }
        data
    }

    #[test]
    fn custom_names() {
        let data = version2(&[0, 258, 260, 259], &["alarm", "anchor", "cloud"]);
        let table = Table::parse(&data).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.name(GlyphId(0)), None); // .notdef
        assert_eq!(table.name(GlyphId(1)), Some("alarm"));
        assert_eq!(table.name(GlyphId(2)), Some("cloud"));
        assert_eq!(table.name(GlyphId(3)), Some("anchor"));
    }

    #[test]
    fn only_standard_names() {
        let data = version2(&[0, 1, 36], &[]);
        let table = Table::parse(&data).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn other_versions_are_empty() {
        let mut data = vec![];
        data.extend_from_slice(&0x00030000u32.to_be_bytes());
        let table = Table::parse(&data).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.name(GlyphId(0)), None);
    }
}
