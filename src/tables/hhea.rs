//! A [Horizontal Header Table](
//! https://learn.microsoft.com/en-us/typography/opentype/spec/hhea)
//! implementation.

use crate::parser::Reader;
use crate::Result;

/// A decoded Horizontal Header Table.
#[derive(Clone, Copy, Debug)]
pub struct Table {
    /// Distance from the baseline to the highest ascender.
    pub ascender: i16,
    /// Distance from the baseline to the lowest descender. Typically negative.
    pub descender: i16,
    /// Recommended additional line spacing.
    pub line_gap: i16,
    /// Maximum advance width over all `hmtx` records.
    pub advance_width_max: u16,
    /// Minimum left side bearing.
    pub min_left_side_bearing: i16,
    /// Minimum right side bearing.
    pub min_right_side_bearing: i16,
    /// `max(lsb + (xMax - xMin))` over all glyphs.
    pub x_max_extent: i16,
    /// Caret slope rise.
    pub caret_slope_rise: i16,
    /// Caret slope run.
    pub caret_slope_run: i16,
    /// Caret offset for slanted fonts.
    pub caret_offset: i16,
    /// The number of paired records in the `hmtx` table.
    pub number_of_metrics: u16,
}

impl Table {
    /// Parses the table from raw data.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = Reader::new(data);
        r.advance(4); // majorVersion + minorVersion
        let ascender = r.read_i16()?;
        let descender = r.read_i16()?;
        let line_gap = r.read_i16()?;
        let advance_width_max = r.read_u16()?;
        let min_left_side_bearing = r.read_i16()?;
        let min_right_side_bearing = r.read_i16()?;
        let x_max_extent = r.read_i16()?;
        let caret_slope_rise = r.read_i16()?;
        let caret_slope_run = r.read_i16()?;
        let caret_offset = r.read_i16()?;
        r.advance(10); // reserved + metricDataFormat (always 0)
        let number_of_metrics = r.read_u16()?;

        Ok(Table {
            ascender,
            descender,
            line_gap,
            advance_width_max,
            min_left_side_bearing,
            min_right_side_bearing,
            x_max_extent,
            caret_slope_rise,
            caret_slope_run,
            caret_offset,
            number_of_metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_table() {
        let data = [
            0x00, 0x01, // majorVersion: 1
            0x00, 0x00, // minorVersion: 0
            0x07, 0x80, // ascender: 1920
            0xFE, 0x00, // descender: -512
            0x00, 0x00, // lineGap: 0
            0x08, 0x00, // advanceWidthMax: 2048
            0x00, 0x10, // minLeftSideBearing: 16
            0x00, 0x20, // minRightSideBearing: 32
            0x07, 0xF0, // xMaxExtent: 2032
            0x00, 0x01, // caretSlopeRise: 1
            0x00, 0x00, // caretSlopeRun: 0
            0x00, 0x00, // caretOffset: 0
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // reserved
            0x00, 0x00, // metricDataFormat: 0
            0x00, 0x05, // numberOfHMetrics: 5
        ];

        let table = Table::parse(&data).unwrap();
        assert_eq!(table.ascender, 1920);
        assert_eq!(table.descender, -512);
        assert_eq!(table.advance_width_max, 2048);
        assert_eq!(table.caret_slope_rise, 1);
        assert_eq!(table.number_of_metrics, 5);
    }
}
