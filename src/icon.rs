//! Icon projection: a named codepoint rendered as a standalone SVG
//! document.

use core::fmt::Write;

use crate::font::Font;
use crate::geom::Transform;
use crate::glyph::Glyph;
use crate::Result;

/// Decimal digits per emitted SVG coordinate.
const PATH_PRECISION: usize = 2;

/// A single icon of a font: a glyph addressed by name and codepoint.
///
/// The name → codepoint mapping is supplied by the caller (icon sets ship
/// it as metadata next to the font file); the codepoint → glyph step goes
/// through the font's `cmap`.
#[derive(Clone, Debug)]
pub struct Icon<'a> {
    font: &'a Font<'a>,
    name: String,
    code_point: u32,
    glyph: Glyph<'a>,
}

impl<'a> Icon<'a> {
    /// Looks up the glyph for `code_point` and wraps it as an icon.
    ///
    /// Returns `Ok(None)` when the font maps no glyph to the codepoint and
    /// an error for fonts whose outlines we cannot decode.
    pub fn new(
        font: &'a Font<'a>,
        name: impl Into<String>,
        code_point: u32,
    ) -> Result<Option<Icon<'a>>> {
        let glyph = match font.glyph_by_codepoint(code_point)? {
            Some(glyph) => glyph,
            None => return Ok(None),
        };
        Ok(Some(Icon {
            font,
            name: name.into(),
            code_point,
            glyph,
        }))
    }

    /// Returns the icon's name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the icon's codepoint.
    #[inline]
    pub fn codepoint(&self) -> u32 {
        self.code_point
    }

    /// Returns the underlying font.
    #[inline]
    pub fn font(&self) -> &'a Font<'a> {
        self.font
    }

    /// Returns the underlying glyph.
    #[inline]
    pub fn glyph(&self) -> &Glyph<'a> {
        &self.glyph
    }

    /// Renders the icon as a complete SVG document with a 100×100 viewBox.
    ///
    /// Returns an empty string when the glyph has no contours.
    pub fn to_svg_string(&self) -> String {
        let (path, _) = self
            .glyph
            .to_svg_path(Transform::identity(), false, PATH_PRECISION);
        if path.is_empty() {
            return String::new();
        }

        let mut svg = String::new();
        let _ = writeln!(svg, r#"<?xml version="1.0"?>"#);
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">"#
        );
        let _ = writeln!(svg, r#"  <path d="{}"/>"#, path);
        svg.push_str("</svg>\n");
        svg
    }
}
