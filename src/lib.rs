/*!
A TrueType font reader for icon display.

`iconfont` decodes just enough of an SFNT font to be useful as the backend of
an icon browser:

- resolve a Unicode codepoint to a glyph through `cmap`;
- reconstruct the glyph's vector outline from the `glyf` point stream as a
  sequence of move/line/quad/cubic/close commands;
- render the outline as a normalized 100×100 SVG path.

The decoded tables are `head`, `name`, `post` (v2), `cmap` (formats 4 and 12),
`maxp`, `hhea`, `hmtx`, `loca` and `glyf`. OpenType CFF outlines are detected
but not decoded.

## Error handling

Structural problems found while opening a font (truncated data, missing
required tables, violated format invariants) surface as [`Error`]. Per-glyph
problems found while walking an outline (a composite component referencing a
missing glyph, a cycle between composites) are logged through the [`log`]
facade and skipped, so one bad glyph does not disable the font.

## Example

```no_run
use iconfont::{Font, Icon};

let data = std::fs::read("icons.ttf").unwrap();
let font = Font::open(&data).unwrap();
let icon = Icon::new(&font, "alarm", 0xE855).unwrap().unwrap();
println!("{}", icon.to_svg_string());
```
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

use thiserror::Error;

mod font;
mod geom;
mod glyph;
mod icon;
mod outline;
mod parser;
mod tables;

pub use font::{Font, FontKind, TableRecord};
pub use geom::{Point, Transform};
pub use glyph::Glyph;
pub use icon::Icon;
pub use outline::{BBoxBuilder, OutlineBuilder, SvgPathBuilder};
pub use parser::Reader;
pub use tables::{cmap, glyf, head, hhea, hmtx, loca, maxp, name, post};

/// A result with the crate's [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

/// Everything that can go wrong while opening a font.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A read reached past the end of the font data or of a table view.
    #[error("unexpected end of font data")]
    Truncated,

    /// The SFNT magic, a cmap subtable or an outline format is not supported.
    #[error("unsupported font format: {0}")]
    UnsupportedFormat(&'static str),

    /// A required table is absent.
    #[error("font table '{0}' is missing")]
    MissingTable(Tag),

    /// A format invariant was violated.
    #[error("malformed font: {0}")]
    Malformed(&'static str),
}

/// A type-safe wrapper for glyph ID.
#[repr(transparent)]
#[derive(Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Default, Debug)]
pub struct GlyphId(pub u16);

/// A 4-byte table tag.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(pub u32);

impl Tag {
    /// Creates a `Tag` from bytes.
    #[inline]
    pub const fn from_bytes(bytes: &[u8; 4]) -> Self {
        Tag(((bytes[0] as u32) << 24)
            | ((bytes[1] as u32) << 16)
            | ((bytes[2] as u32) << 8)
            | (bytes[3] as u32))
    }

    /// Returns tag as a 4-element byte array.
    #[inline]
    pub const fn to_bytes(self) -> [u8; 4] {
        [
            (self.0 >> 24 & 0xff) as u8,
            (self.0 >> 16 & 0xff) as u8,
            (self.0 >> 8 & 0xff) as u8,
            (self.0 & 0xff) as u8,
        ]
    }
}

impl core::fmt::Debug for Tag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Tag({})", self)
    }
}

impl core::fmt::Display for Tag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for b in self.to_bytes() {
            f.write_str((b as char).encode_utf8(&mut [0; 4]))?;
        }
        Ok(())
    }
}

/// A rectangle in font units.
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub struct Rect {
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
}

impl Rect {
    /// Returns rect's width.
    #[inline]
    pub fn width(&self) -> i16 {
        self.x_max - self.x_min
    }

    /// Returns rect's height.
    #[inline]
    pub fn height(&self) -> i16 {
        self.y_max - self.y_min
    }
}
