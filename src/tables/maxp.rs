//! A [Maximum Profile](
//! https://learn.microsoft.com/en-us/typography/opentype/spec/maxp)
//! implementation.

use crate::parser::Reader;
use crate::Result;

/// Parses the number of glyphs out of a `maxp` table.
///
/// We care only about `numGlyphs`; the rest of the table describes
/// rasterizer limits we never hit.
pub fn parse(data: &[u8]) -> Result<u16> {
    let mut r = Reader::new(data);
    r.advance(4); // version
    r.read_u16()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn num_glyphs() {
        let data = [
            0x00, 0x00, 0x50, 0x00, // version: 0.5
            0x01, 0x23, // numGlyphs: 291
        ];
        assert_eq!(parse(&data).unwrap(), 291);
    }

    #[test]
    fn too_short() {
        assert_eq!(parse(&[0x00, 0x01]).unwrap_err(), Error::Truncated);
    }
}
