//! A [Font Header Table](
//! https://learn.microsoft.com/en-us/typography/opentype/spec/head)
//! implementation.

use crate::parser::Reader;
use crate::{Error, Rect, Result};

/// 'Set to 0x5F0F3CF5.'
const MAGIC_NUMBER: u32 = 0x5F0F3CF5;

/// An index format used by the [Index to Location Table](
/// https://learn.microsoft.com/en-us/typography/opentype/spec/loca).
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum IndexToLocationFormat {
    Short,
    Long,
}

/// A decoded `head` table.
#[derive(Clone, Copy, Debug)]
pub struct Table {
    /// Font revision, as set by the font manufacturer.
    pub revision: f32,
    /// Header flags.
    pub flags: u16,
    /// Units per em.
    pub units_per_em: u16,
    /// Creation time as a Unix timestamp.
    pub created: i64,
    /// Modification time as a Unix timestamp.
    pub modified: i64,
    /// A bounding box that encloses any glyph in the font.
    pub global_bbox: Rect,
    /// Mac style bits.
    pub mac_style: u16,
    /// Smallest readable size in pixels.
    pub lowest_rec_ppem: u16,
    /// Deprecated direction hint.
    pub font_direction_hint: i16,
    /// The offset format of the `loca` table.
    pub index_to_loc_format: IndexToLocationFormat,
    /// Glyph data format. Always 0 for current fonts.
    pub glyph_data_format: i16,
}

impl Table {
    /// Parses the table from raw data.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = Reader::new(data);
        r.advance(4); // majorVersion + minorVersion
        let revision = r.read_fixed()?;
        r.advance(4); // checksumAdjustment
        if r.read_u32()? != MAGIC_NUMBER {
            return Err(Error::Malformed("invalid 'head' magic number"));
        }
        let flags = r.read_u16()?;
        let units_per_em = r.read_u16()?;
        let created = r.read_long_date()?;
        let modified = r.read_long_date()?;
        let global_bbox = Rect {
            x_min: r.read_i16()?,
            y_min: r.read_i16()?,
            x_max: r.read_i16()?,
            y_max: r.read_i16()?,
        };
        let mac_style = r.read_u16()?;
        let lowest_rec_ppem = r.read_u16()?;
        let font_direction_hint = r.read_i16()?;
        let index_to_loc_format = match r.read_i16()? {
            0 => IndexToLocationFormat::Short,
            1 => IndexToLocationFormat::Long,
            _ => return Err(Error::Malformed("unknown 'loca' offset format")),
        };
        let glyph_data_format = r.read_i16()?;

        Ok(Table {
            revision,
            flags,
            units_per_em,
            created,
            modified,
            global_bbox,
            mac_style,
            lowest_rec_ppem,
            font_direction_hint,
            index_to_loc_format,
            glyph_data_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn head_data(magic: u32, loc_format: i16) -> Vec<u8> {
        let mut data = vec![];
        data.extend_from_slice(&[0x00, 0x01, 0x00, 0x00]); // version: 1.0
        data.extend_from_slice(&0x00018000u32.to_be_bytes()); // revision: 1.5
        data.extend_from_slice(&[0; 4]); // checksum adjustment
        data.extend_from_slice(&magic.to_be_bytes());
        data.extend_from_slice(&[0x00, 0x0B]); // flags
        data.extend_from_slice(&2048u16.to_be_bytes()); // unitsPerEm
        data.extend_from_slice(&0x7C25B080u64.to_be_bytes()); // created: 1970-01-01
        data.extend_from_slice(&0x7C25B081u64.to_be_bytes()); // modified
        data.extend_from_slice(&(-100i16).to_be_bytes()); // xMin
        data.extend_from_slice(&(-200i16).to_be_bytes()); // yMin
        data.extend_from_slice(&2000i16.to_be_bytes()); // xMax
        data.extend_from_slice(&1800i16.to_be_bytes()); // yMax
        data.extend_from_slice(&[0x00, 0x00]); // macStyle
        data.extend_from_slice(&[0x00, 0x08]); // lowestRecPPEM
        data.extend_from_slice(&2i16.to_be_bytes()); // fontDirectionHint
        data.extend_from_slice(&loc_format.to_be_bytes()); // indexToLocFormat
        data.extend_from_slice(&[0x00, 0x00]); // glyphDataFormat
        data
    }

    #[test]
    fn parse_full_table() {
        let table = Table::parse(&head_data(MAGIC_NUMBER, 0)).unwrap();
        assert_eq!(table.revision, 1.5);
        assert_eq!(table.units_per_em, 2048);
        assert_eq!(table.created, 0);
        assert_eq!(table.modified, 1);
        assert_eq!(table.global_bbox.x_min, -100);
        assert_eq!(table.global_bbox.y_max, 1800);
        assert_eq!(table.index_to_loc_format, IndexToLocationFormat::Short);
        assert_eq!(table.lowest_rec_ppem, 8);
    }

    #[test]
    fn long_offset_format() {
        let table = Table::parse(&head_data(MAGIC_NUMBER, 1)).unwrap();
        assert_eq!(table.index_to_loc_format, IndexToLocationFormat::Long);
    }

    #[test]
    fn bad_magic_is_rejected() {
        assert_eq!(
            Table::parse(&head_data(0xDEADBEEF, 0)).unwrap_err(),
            Error::Malformed("invalid 'head' magic number")
        );
    }

    #[test]
    fn truncated_table() {
        let data = head_data(MAGIC_NUMBER, 0);
        assert_eq!(Table::parse(&data[..30]).unwrap_err(), Error::Truncated);
    }
}
