//! A [Naming Table](
//! https://learn.microsoft.com/en-us/typography/opentype/spec/name)
//! implementation.

use crate::parser::Reader;
use crate::Result;

// https://learn.microsoft.com/en-us/typography/opentype/spec/name#platform-ids
const WINDOWS_PLATFORM_ID: u16 = 3;
const WINDOWS_ENGLISH_US: u16 = 1033;
const WINDOWS_UNICODE_BMP: u16 = 1;
const WINDOWS_UNICODE_FULL: u16 = 10;

/// The display strings of a font.
///
/// Decoded from Windows English (platform 3, language 1033) Unicode records;
/// fields without such a record stay empty.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Table {
    /// Copyright notice (name ID 0).
    pub copyright: String,
    /// Font family (name ID 1).
    pub family: String,
    /// Font subfamily (name ID 2).
    pub subfamily: String,
    /// Unique font identifier (name ID 3).
    pub unique_id: String,
    /// Full font name (name ID 4).
    pub full_name: String,
    /// Version string (name ID 5).
    pub version: String,
}

struct NameRecord {
    name_id: u16,
    length: u16,
    offset: u16,
}

impl Table {
    /// Parses the table from raw data.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = Reader::new(data);
        r.advance(2); // version
        let count = r.read_u16()?;
        let storage_offset = r.read_u16()?;

        let mut records = vec![];
        for _ in 0..count {
            let platform_id = r.read_u16()?;
            let encoding_id = r.read_u16()?;
            let language_id = r.read_u16()?;
            let record = NameRecord {
                name_id: r.read_u16()?,
                length: r.read_u16()?,
                offset: r.read_u16()?,
            };

            if platform_id != WINDOWS_PLATFORM_ID || language_id != WINDOWS_ENGLISH_US {
                continue;
            }
            if encoding_id != WINDOWS_UNICODE_BMP && encoding_id != WINDOWS_UNICODE_FULL {
                continue;
            }
            records.push(record);
        }

        let mut table = Table::default();
        for record in records {
            let field = match record.name_id {
                0 => &mut table.copyright,
                1 => &mut table.family,
                2 => &mut table.subfamily,
                3 => &mut table.unique_id,
                4 => &mut table.full_name,
                5 => &mut table.version,
                _ => continue,
            };

            let start = usize::from(storage_offset) + usize::from(record.offset);
            let mut s = r.view(start, start + usize::from(record.length));
            *field = utf16_be(&mut s, usize::from(record.length))?;
        }
        Ok(table)
    }
}

/// Name strings are stored as UTF-16BE.
fn utf16_be(r: &mut Reader, length: usize) -> Result<String> {
    let mut units = Vec::with_capacity(length / 2);
    for _ in 0..length / 2 {
        units.push(r.read_u16()?);
    }
    Ok(String::from_utf16_lossy(&units))
}
