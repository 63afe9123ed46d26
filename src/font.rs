// SFNT organization:
// https://learn.microsoft.com/en-us/typography/opentype/spec/otff

use core::fmt::Write;
use std::collections::HashMap;

use crate::geom::Transform;
use crate::glyph::Glyph;
use crate::parser::Reader;
use crate::tables::{cmap, glyf, head, hhea, hmtx, loca, maxp, name, post};
use crate::{Error, GlyphId, Result, Tag};

const SFNT_VERSION_TRUE_TYPE: u32 = 0x00010000;
const SFNT_VERSION_OPEN_TYPE: u32 = 0x4F54544F; // 'OTTO'

/// Default cell size of a [specimen](Font::specimen) in SVG units.
const SPECIMEN_SIZE: f32 = 32.0;
/// Default padding between specimen cells.
const SPECIMEN_PADDING: f32 = 6.0;
/// Default number of specimen columns.
const SPECIMEN_COLUMNS: u16 = 35;

/// The flavor of an SFNT container.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FontKind {
    /// TrueType outlines in a `glyf` table.
    TrueType,
    /// OpenType CFF outlines. Detected, not decoded.
    OpenType,
}

/// A table directory entry.
#[derive(Clone, Copy, Debug)]
pub struct TableRecord {
    /// Checksum of the table data. Not verified.
    pub checksum: u32,
    /// Byte offset of the table from the beginning of the font.
    pub offset: u32,
    /// Byte length of the table.
    pub length: u32,
}

/// A parsed font.
///
/// Opening a font parses the table directory and decodes every supported
/// table once; the font is immutable afterwards and freely sharable across
/// threads for read-only use. All decoded views borrow from the byte buffer
/// passed to [`open`](Font::open).
pub struct Font<'a> {
    #[allow(dead_code)]
    data: &'a [u8],
    kind: FontKind,
    tables: HashMap<Tag, TableRecord>,
    glyph_count: u16,
    head: head::Table,
    name: name::Table,
    hhea: hhea::Table,
    hmtx: hmtx::Table,
    post: post::Table,
    cmap: cmap::Table,
    loca: Option<loca::Table>,
    glyf: Option<glyf::Table<'a>>,
}

impl<'a> Font<'a> {
    /// Opens a font from raw SFNT data.
    ///
    /// Required tables: `maxp`, `head`, `name`, `hhea`, `hmtx`, `post` and
    /// `cmap`. `loca` and `glyf` are optional so that OpenType fonts can
    /// still be inspected, but without them no outline can be produced.
    pub fn open(data: &'a [u8]) -> Result<Font<'a>> {
        let mut r = Reader::new(data);
        let kind = match r.read_u32()? {
            SFNT_VERSION_TRUE_TYPE => FontKind::TrueType,
            SFNT_VERSION_OPEN_TYPE => FontKind::OpenType,
            _ => return Err(Error::UnsupportedFormat("unknown SFNT version")),
        };

        let num_tables = r.read_u16()?;
        r.advance(6); // searchRange + entrySelector + rangeShift

        let mut tables = HashMap::with_capacity(usize::from(num_tables));
        for _ in 0..num_tables {
            let tag = Tag(r.read_u32()?);
            let record = TableRecord {
                checksum: r.read_u32()?,
                offset: r.read_u32()?,
                length: r.read_u32()?,
            };
            tables.insert(tag, record);
        }

        let table_data = |tag: &[u8; 4]| -> Result<&'a [u8]> {
            let tag = Tag::from_bytes(tag);
            let record = tables.get(&tag).ok_or(Error::MissingTable(tag))?;
            let start = record.offset as usize;
            let end = start.checked_add(record.length as usize).ok_or(Error::Truncated)?;
            data.get(start..end).ok_or(Error::Truncated)
        };

        // Maximum Profile holds the glyph count everything else is sized by.
        let glyph_count = maxp::parse(table_data(b"maxp")?)?;
        let head = head::Table::parse(table_data(b"head")?)?;
        let name = name::Table::parse(table_data(b"name")?)?;
        let hhea = hhea::Table::parse(table_data(b"hhea")?)?;
        let hmtx = hmtx::Table::parse(table_data(b"hmtx")?, hhea.number_of_metrics, glyph_count)?;
        let post = post::Table::parse(table_data(b"post")?)?;
        let cmap = cmap::Table::parse(table_data(b"cmap")?)?;

        let loca = if tables.contains_key(&Tag::from_bytes(b"loca")) {
            Some(loca::Table::parse(
                table_data(b"loca")?,
                glyph_count,
                head.index_to_loc_format,
            )?)
        } else {
            None
        };
        let glyf = match &loca {
            Some(loca) if tables.contains_key(&Tag::from_bytes(b"glyf")) => {
                Some(glyf::Table::parse(table_data(b"glyf")?, loca)?)
            }
            _ => None,
        };

        Ok(Font {
            data,
            kind,
            tables,
            glyph_count,
            head,
            name,
            hhea,
            hmtx,
            post,
            cmap,
            loca,
            glyf,
        })
    }

    /// Returns the container flavor.
    #[inline]
    pub fn kind(&self) -> FontKind {
        self.kind
    }

    /// Returns the total number of glyphs, from `maxp`.
    #[inline]
    pub fn glyph_count(&self) -> u16 {
        self.glyph_count
    }

    /// Returns the directory entry of a table, if present.
    pub fn table_record(&self, tag: Tag) -> Option<&TableRecord> {
        self.tables.get(&tag)
    }

    /// Returns the decoded `head` table.
    #[inline]
    pub fn head(&self) -> &head::Table {
        &self.head
    }

    /// Returns the decoded `name` table.
    #[inline]
    pub fn name(&self) -> &name::Table {
        &self.name
    }

    /// Returns the decoded `hhea` table.
    #[inline]
    pub fn hhea(&self) -> &hhea::Table {
        &self.hhea
    }

    /// Returns the decoded `hmtx` table.
    #[inline]
    pub fn hmtx(&self) -> &hmtx::Table {
        &self.hmtx
    }

    /// Returns the decoded `post` table.
    #[inline]
    pub fn post(&self) -> &post::Table {
        &self.post
    }

    /// Returns the decoded `cmap` table.
    #[inline]
    pub fn cmap(&self) -> &cmap::Table {
        &self.cmap
    }

    /// Returns the decoded `loca` table. `None` for OpenType fonts.
    #[inline]
    pub fn loca(&self) -> Option<&loca::Table> {
        self.loca.as_ref()
    }

    /// Returns the decoded `glyf` table. `None` for OpenType fonts.
    #[inline]
    pub fn glyf(&self) -> Option<&glyf::Table<'a>> {
        self.glyf.as_ref()
    }

    /// Returns a glyph handle by glyph id.
    pub fn glyph(&self, glyph_id: GlyphId) -> Option<Glyph<'_>> {
        self.glyf.as_ref()?.get(glyph_id)?;
        Some(Glyph::new(self, glyph_id))
    }

    /// Returns the glyph mapped to a Unicode codepoint.
    ///
    /// Fails with [`Error::UnsupportedFormat`] for OpenType fonts, whose CFF
    /// outlines we cannot decode.
    pub fn glyph_by_codepoint(&self, code_point: u32) -> Result<Option<Glyph<'_>>> {
        if self.kind != FontKind::TrueType {
            return Err(Error::UnsupportedFormat("CFF outlines are not supported"));
        }
        Ok(self
            .cmap
            .glyph_index(code_point)
            .and_then(|glyph_id| self.glyph(glyph_id)))
    }

    /// Builds a mapping from PostScript glyph names to codepoints.
    ///
    /// Joins `post` names against the reverse `cmap`; unnamed glyphs,
    /// unmapped glyphs and codepoint 0 are skipped.
    pub fn codepoint_by_name(&self) -> HashMap<String, u32> {
        let mut mapping = HashMap::new();
        for glyph_id in (0..self.glyph_count).map(GlyphId) {
            let code_point = match self.cmap.code_point(glyph_id) {
                Some(code_point) if code_point != 0 => code_point,
                _ => continue,
            };
            if let Some(name) = self.post.name(glyph_id) {
                mapping.insert(name.to_string(), code_point);
            }
        }
        mapping
    }

    /// Renders every non-blank glyph onto a grid as one big SVG path.
    ///
    /// Corner marks pin the full grid extent so the path's bounding box is
    /// stable regardless of where the outlines land.
    pub fn specimen(&self) -> String {
        self.specimen_with(SPECIMEN_SIZE, SPECIMEN_COLUMNS, SPECIMEN_PADDING)
    }

    /// [`specimen`](Font::specimen) with explicit cell size, column count
    /// and padding.
    pub fn specimen_with(&self, size: f32, columns: u16, padding: f32) -> String {
        let glyf = match &self.glyf {
            Some(glyf) if !glyf.is_empty() => glyf,
            _ => return String::new(),
        };
        let columns = u32::from(columns.max(1));

        let mut out = String::from("M0,0h1v1h-1z"); // top-left corner mark
        let scale = size / 100.0;
        let cell = size + padding;

        let mut row = 0;
        let mut index = 0u32;
        for (glyph_id, record) in glyf.iter() {
            if record.is_blank() {
                continue;
            }
            row = index / columns;
            let column = index % columns;
            index += 1;

            let ts = Transform::identity()
                .translate(padding + column as f32 * cell, padding + row as f32 * cell)
                .scale(scale, scale);
            if let Some(glyph) = self.glyph(glyph_id) {
                let (path, _) = glyph.to_svg_path(ts, false, 2);
                out.push_str(&path);
                out.push('\n');
            }
        }

        // Bottom-right corner mark.
        let mark_x = padding + columns as f32 * cell;
        let mark_y = padding + (row + 1) as f32 * cell;
        let _ = write!(out, "M{},{}h1v1h-1z", mark_x, mark_y);
        out
    }
}

impl core::fmt::Debug for Font<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Font")
            .field("family", &self.name.family)
            .field("kind", &self.kind)
            .field("glyph_count", &self.glyph_count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sfnt_version() {
        let data = [0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert_eq!(
            Font::open(&data).unwrap_err(),
            Error::UnsupportedFormat("unknown SFNT version")
        );
    }

    #[test]
    fn empty_data() {
        assert_eq!(Font::open(&[]).unwrap_err(), Error::Truncated);
    }

    #[test]
    fn missing_required_table() {
        let data = [
            0x00, 0x01, 0x00, 0x00, // sfntVersion: TrueType
            0x00, 0x00, // numTables: 0
            0x00, 0x00, // searchRange
            0x00, 0x00, // entrySelector
            0x00, 0x00, // rangeShift
        ];
        assert_eq!(
            Font::open(&data).unwrap_err(),
            Error::MissingTable(Tag::from_bytes(b"maxp"))
        );
    }
}
