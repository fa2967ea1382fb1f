//! Inline Formatting Contexts: the glyph/special token stream and line
//! boxes produced by the IFC builder (spec.md §3, §4.5).
//!
//! spec.md's source encoding packs a reserved `0` glyph index plus a
//! following 16-bit `Special{kind,data}` slot into the same flat array
//! (§3 "Special glyph encoding"). This crate keeps that *wire contract*
//! testable (`Special::bits`, property test below) but represents the
//! stream itself as a tagged `Token` enum rather than a raw `u16` array,
//! per spec.md §9's own design note ("Tag-dispatch polymorphism... maps to
//! tagged variants... `Special.Kind`. Pattern-match exhaustively").

use crate::boxtree::block::{BackgroundImagesHandle, ResolvedInsets};
use crate::declarations::values::Color;
use crate::error::{Error, Result};
use crate::unit::Unit;

pub type InlineBoxIndex = u16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u16)]
pub enum SpecialKind {
    ZeroGlyphIndex = 1,
    BoxStart = 2,
    BoxEnd = 3,
    InlineBlock = 4,
    LineBreak = 5,
    ContinuationBlock = 6,
}

/// A non-glyph token, carried after a reserved `0` glyph index (spec.md
/// §3). `kind` is never `0`, so `bits()` is never the all-zero pattern
/// (testable property 6, spec.md §8).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Special {
    pub kind: SpecialKind,
    pub data: u16,
}

impl Special {
    pub fn zero_glyph_index() -> Self {
        Special {
            kind: SpecialKind::ZeroGlyphIndex,
            data: 0,
        }
    }

    pub fn box_start(inline_box: InlineBoxIndex) -> Self {
        Special {
            kind: SpecialKind::BoxStart,
            data: inline_box,
        }
    }

    pub fn box_end(inline_box: InlineBoxIndex) -> Self {
        Special {
            kind: SpecialKind::BoxEnd,
            data: inline_box,
        }
    }

    pub fn inline_block(block_index: u16) -> Self {
        Special {
            kind: SpecialKind::InlineBlock,
            data: block_index,
        }
    }

    pub fn line_break() -> Self {
        Special {
            kind: SpecialKind::LineBreak,
            data: 0,
        }
    }

    pub fn continuation_block(block_index: u16) -> Self {
        Special {
            kind: SpecialKind::ContinuationBlock,
            data: block_index,
        }
    }

    /// The packed 32-bit wire representation: kind in the high 16 bits,
    /// data in the low 16 (spec.md §3). `kind` is a non-zero discriminant,
    /// so this is never `0`.
    pub fn bits(self) -> u32 {
        ((self.kind as u32) << 16) | self.data as u32
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GlyphMetrics {
    pub offset: Unit,
    pub advance: Unit,
    pub width: Unit,
}

/// One entry of an IFC's content stream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Token {
    Glyph {
        glyph_index: u16,
        metrics: GlyphMetrics,
    },
    Special(Special),
}

/// A completed line (spec.md §4.5): a half-open range over the token
/// stream, the baseline it was laid out against, and which inline box (if
/// any) was open when the line started.
///
/// `inline_box` is `None` only for an empty line (spec.md §9's resolution
/// of the `LineBox.inline_box` optionality ambiguity: "treat as optional
/// but require that line boxes produced for non-empty content always set
/// it").
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineBox {
    pub baseline: Unit,
    pub start: u32,
    pub end: u32,
    pub inline_box: Option<InlineBoxIndex>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoxProperties {
    pub border: Unit,
    pub padding: Unit,
    pub border_color: Color,
}

/// One inline box within an IFC (spec.md §3): inline-start/end and
/// block-start/end edge properties, plus background/margins/insets.
#[derive(Clone, Debug, PartialEq)]
pub struct InlineBox {
    pub inline_start: BoxProperties,
    pub inline_end: BoxProperties,
    pub block_start: BoxProperties,
    pub block_end: BoxProperties,
    pub background: Color,
    pub margin_inline_start: Unit,
    pub margin_inline_end: Unit,
    pub insets: ResolvedInsets,
}

impl Default for InlineBox {
    fn default() -> Self {
        InlineBox {
            inline_start: BoxProperties::default(),
            inline_end: BoxProperties::default(),
            block_start: BoxProperties::default(),
            block_end: BoxProperties::default(),
            background: Color {
                r: 0,
                g: 0,
                b: 0,
                a: 0,
            },
            margin_inline_start: Unit::ZERO,
            margin_inline_end: Unit::ZERO,
            insets: ResolvedInsets::default(),
        }
    }
}

/// One Inline Formatting Context: a token stream, its line boxes, and its
/// inline boxes (spec.md §3). Font, font color, ascender and (positive)
/// descender are per-IFC.
pub struct InlineFormattingContext {
    pub id: super::block::IfcId,
    pub font_color: Color,
    pub ascender: Unit,
    pub descender: Unit,
    tokens: Vec<Token>,
    line_boxes: Vec<LineBox>,
    inline_boxes: Vec<InlineBox>,
    pub background_images: Vec<BackgroundImagesHandle>,
}

impl InlineFormattingContext {
    pub fn new(id: super::block::IfcId, font_color: Color, ascender: Unit, descender: Unit) -> Self {
        InlineFormattingContext {
            id,
            font_color,
            ascender,
            descender,
            tokens: Vec::new(),
            line_boxes: Vec::new(),
            inline_boxes: Vec::new(),
            background_images: Vec::new(),
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn push_glyph(&mut self, glyph_index: u16, metrics: GlyphMetrics) {
        if glyph_index == 0 {
            self.push_special(Special::zero_glyph_index());
        } else {
            self.tokens.push(Token::Glyph {
                glyph_index,
                metrics,
            });
        }
    }

    pub fn push_special(&mut self, special: Special) {
        self.tokens.push(Token::Special(special));
    }

    /// Opens a new inline box and emits its `BoxStart` token. Fails once
    /// the IFC's inline-box list would exceed 2^16 entries (spec.md §6).
    pub fn open_inline_box(&mut self) -> Result<InlineBoxIndex> {
        if self.inline_boxes.len() >= u16::MAX as usize {
            return Err(Error::SizeLimitExceeded);
        }
        let index = self.inline_boxes.len() as u16;
        self.inline_boxes.push(InlineBox::default());
        self.push_special(Special::box_start(index));
        Ok(index)
    }

    pub fn close_inline_box(&mut self, index: InlineBoxIndex) {
        self.push_special(Special::box_end(index));
    }

    pub fn inline_box(&self, index: InlineBoxIndex) -> &InlineBox {
        &self.inline_boxes[index as usize]
    }

    pub fn inline_box_mut(&mut self, index: InlineBoxIndex) -> &mut InlineBox {
        &mut self.inline_boxes[index as usize]
    }

    pub fn inline_box_count(&self) -> usize {
        self.inline_boxes.len()
    }

    pub fn push_line_box(&mut self, line: LineBox) {
        debug_assert!(
            line.end >= line.start,
            "line box interval must not be inverted"
        );
        debug_assert!(
            line.start == line.end || line.inline_box.is_some(),
            "non-empty line boxes must record their opening inline box"
        );
        self.line_boxes.push(line);
    }

    pub fn line_boxes(&self) -> &[LineBox] {
        &self.line_boxes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn special_bit_pattern_is_never_all_zero() {
        let specials = [
            Special::zero_glyph_index(),
            Special::box_start(0),
            Special::box_end(0),
            Special::inline_block(0),
            Special::line_break(),
            Special::continuation_block(0),
        ];
        for special in specials {
            assert_ne!(special.bits(), 0);
        }
    }

    #[test]
    fn zero_glyph_is_escaped_as_a_special_token() {
        let mut ifc = InlineFormattingContext::new(0, Color { r: 0, g: 0, b: 0, a: 255 }, Unit::ZERO, Unit::ZERO);
        ifc.push_glyph(0, GlyphMetrics::default());
        assert_eq!(
            ifc.tokens(),
            &[Token::Special(Special::zero_glyph_index())]
        );
    }

    #[test]
    fn open_inline_box_emits_box_start_and_grows_the_inline_box_list() {
        let mut ifc = InlineFormattingContext::new(0, Color { r: 0, g: 0, b: 0, a: 255 }, Unit::ZERO, Unit::ZERO);
        let i = ifc.open_inline_box().unwrap();
        assert_eq!(i, 0);
        assert_eq!(ifc.inline_box_count(), 1);
        ifc.close_inline_box(i);
        assert_eq!(
            ifc.tokens(),
            &[
                Token::Special(Special::box_start(0)),
                Token::Special(Special::box_end(0)),
            ]
        );
    }
}
