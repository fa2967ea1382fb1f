//! The `Fonts` external collaborator (spec.md §1, §6). Font shaping and
//! glyph metrics are out of scope for this crate; layout only consumes
//! them through this handle-based trait.

use crate::boxtree::ifc::GlyphMetrics;
use crate::unit::Unit;

/// An opaque handle into the environment's font registry, as carried by a
/// computed `font-family`/cascaded style (spec.md §6).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FontHandle(pub u32);

/// The resolved font identity `Fonts::get` returns for a handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FontId(pub u32);

/// One shaped glyph, as the IFC builder consumes it (spec.md §4.5: "shape
/// with the IFC's font (external call) and append `(glyph_index,
/// metrics)` pairs").
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ShapedGlyph {
    pub glyph_index: u16,
    pub metrics: GlyphMetrics,
}

/// Font registry consumed by box generation and the IFC builder (spec.md
/// §6). Shaping is expected to return synchronously (spec.md §5: "font
/// shaping is an external pure call").
pub trait Fonts {
    /// Resolves a handle to an opaque font identity. Empty/invalid handles
    /// are not an error; they produce a font whose metrics are all zero
    /// (spec.md §6).
    fn get(&self, handle: FontHandle) -> FontId;

    fn ascender(&self, font: FontId) -> Unit;

    /// The font's descender, stored as a positive value (spec.md §4.5).
    fn descender(&self, font: FontId) -> Unit;

    fn shape(&self, font: FontId, text: &str) -> Vec<ShapedGlyph>;
}

/// A test double that resolves every handle to a zero-metric font and
/// shapes every string as one placeholder glyph per character. Used by
/// this crate's own tests; not meant to stand in for a real shaping
/// backend.
pub struct NullFonts;

impl Fonts for NullFonts {
    fn get(&self, _handle: FontHandle) -> FontId {
        FontId(0)
    }

    fn ascender(&self, _font: FontId) -> Unit {
        Unit::ZERO
    }

    fn descender(&self, _font: FontId) -> Unit {
        Unit::ZERO
    }

    fn shape(&self, _font: FontId, text: &str) -> Vec<ShapedGlyph> {
        text.chars()
            .map(|_| ShapedGlyph {
                glyph_index: 1,
                metrics: GlyphMetrics::default(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_fonts_produces_zero_metrics() {
        let fonts = NullFonts;
        let font = fonts.get(FontHandle(42));
        assert_eq!(fonts.ascender(font), Unit::ZERO);
        assert_eq!(fonts.descender(font), Unit::ZERO);
    }

    #[test]
    fn null_fonts_shapes_one_glyph_per_char() {
        let fonts = NullFonts;
        let font = fonts.get(FontHandle(0));
        assert_eq!(fonts.shape(font, "abc").len(), 3);
    }
}
