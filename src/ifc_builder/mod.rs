//! Inline content -> glyph/special stream + line breaking (spec.md §4.5).
//!
//! Grounded on the teacher's `flow/inline.rs` `InlineLevelContent`/
//! `InlineLevelBox`/`TextRun` shape — an owned tree of tagged inline
//! variants — adapted here to an index-based IFC with a parallel-array
//! token stream instead of an owned box tree, per spec.md §9's "Arena +
//! index ownership" rule.

use crate::boxtree::ifc::{InlineBox, InlineBoxIndex, InlineFormattingContext, LineBox, Special};
use crate::error::Result;
use crate::fonts::{FontId, Fonts};
use crate::unit::Unit;
use smallvec::SmallVec;

struct OpenInlineBox {
    index: InlineBoxIndex,
    properties: InlineBox,
}

/// Tracks the stack of currently-open inline boxes while the mode-stack
/// machine (`generation::mod`) walks inline content, so a block
/// encountered mid-inline can split the IFC and re-open the same boxes in
/// a fresh one (spec.md §4.5, CSS2 §9.2.1.1). Nesting rarely runs deep, so
/// this stays inline up to 4 levels before spilling to the heap.
#[derive(Default)]
pub struct IfcBuilder {
    open: SmallVec<[OpenInlineBox; 4]>,
}

impl IfcBuilder {
    pub fn new() -> Self {
        IfcBuilder {
            open: SmallVec::new(),
        }
    }

    /// Shapes `text` with `font` and appends the resulting glyphs (spec.md
    /// §4.5).
    pub fn push_text_run<F: Fonts>(
        &mut self,
        ifc: &mut InlineFormattingContext,
        fonts: &F,
        font: FontId,
        text: &str,
    ) {
        for glyph in fonts.shape(font, text) {
            ifc.push_glyph(glyph.glyph_index, glyph.metrics);
        }
    }

    /// Opens a new inline box, appending `BoxStart` (spec.md §4.5).
    pub fn enter_inline_box(
        &mut self,
        ifc: &mut InlineFormattingContext,
        properties: InlineBox,
    ) -> Result<InlineBoxIndex> {
        let index = ifc.open_inline_box()?;
        *ifc.inline_box_mut(index) = properties.clone();
        self.open.push(OpenInlineBox { index, properties });
        Ok(index)
    }

    /// Closes the innermost still-open inline box, appending `BoxEnd`.
    pub fn exit_inline_box(&mut self, ifc: &mut InlineFormattingContext) {
        if let Some(open) = self.open.pop() {
            ifc.close_inline_box(open.index);
        }
    }

    /// An inline-block child, laid out recursively elsewhere in
    /// shrink-to-fit mode; `block_index` is that child's block in the
    /// subtree it was appended to (spec.md §4.5).
    pub fn emit_inline_block(&mut self, ifc: &mut InlineFormattingContext, block_index: u16) {
        ifc.push_special(Special::inline_block(block_index));
    }

    pub fn emit_line_break(&mut self, ifc: &mut InlineFormattingContext) {
        ifc.push_special(Special::line_break());
    }

    /// Terminates `current_ifc` for a block box encountered inside inline
    /// context (CSS2 §9.2.1.1, spec.md §4.5): emits `ContinuationBlock`,
    /// then closes every still-open inline box innermost-first. The caller
    /// lays the block out in flow, opens a fresh anonymous IFC, and calls
    /// `reopen_in_new_ifc` to resume the same (by style) inline boxes so
    /// surrounding inline content reads as continuous.
    pub fn split_for_block(&mut self, current_ifc: &mut InlineFormattingContext, block_index: u16) {
        current_ifc.push_special(Special::continuation_block(block_index));
        for open in self.open.iter().rev() {
            current_ifc.close_inline_box(open.index);
        }
    }

    /// Re-opens, in `new_ifc`, every inline box that was open when
    /// `split_for_block` ran (spec.md §4.5's "anonymous splitting").
    pub fn reopen_in_new_ifc(&mut self, new_ifc: &mut InlineFormattingContext) -> Result<()> {
        let previously_open = std::mem::take(&mut self.open);
        for open in previously_open {
            let index = new_ifc.open_inline_box()?;
            *new_ifc.inline_box_mut(index) = open.properties.clone();
            self.open.push(OpenInlineBox {
                index,
                properties: open.properties,
            });
        }
        Ok(())
    }

    pub fn has_open_boxes(&self) -> bool {
        !self.open.is_empty()
    }
}

/// Greedy line-breaking over an IFC's finished token stream (spec.md
/// §4.5): breaks before a glyph that would overflow `available_width`, and
/// always breaks after a forced `LineBreak`. Baseline is the IFC's
/// ascender for every line (spec.md §4.5).
pub fn break_lines(ifc: &mut InlineFormattingContext, available_width: Unit) {
    use crate::boxtree::ifc::{SpecialKind, Token};

    let tokens: Vec<Token> = ifc.tokens().to_vec();
    let baseline = ifc.ascender;

    let mut line_start: u32 = 0;
    let mut cursor = Unit::ZERO;
    let mut open_boxes: Vec<InlineBoxIndex> = Vec::new();
    let mut line_opening_box: Option<InlineBoxIndex> = None;
    let mut line_has_content = false;

    let flush = |ifc: &mut InlineFormattingContext, start: u32, end: u32, opening: Option<InlineBoxIndex>| {
        if end > start {
            ifc.push_line_box(LineBox {
                baseline,
                start,
                end,
                inline_box: opening,
            });
        }
    };

    for (i, token) in tokens.iter().enumerate() {
        let idx = i as u32;
        match token {
            Token::Glyph { metrics, .. } => {
                if line_has_content && cursor + metrics.advance > available_width {
                    flush(ifc, line_start, idx, line_opening_box);
                    line_start = idx;
                    cursor = Unit::ZERO;
                    line_opening_box = open_boxes.last().copied();
                    line_has_content = false;
                }
                if !line_has_content {
                    line_opening_box = open_boxes.last().copied();
                }
                cursor += metrics.advance;
                line_has_content = true;
            }
            Token::Special(special) => match special.kind {
                SpecialKind::BoxStart => open_boxes.push(special.data),
                SpecialKind::BoxEnd => {
                    open_boxes.pop();
                }
                SpecialKind::LineBreak => {
                    flush(ifc, line_start, idx + 1, line_opening_box.or(open_boxes.last().copied()));
                    line_start = idx + 1;
                    cursor = Unit::ZERO;
                    line_opening_box = open_boxes.last().copied();
                    line_has_content = false;
                }
                _ => {}
            },
        }
    }

    flush(ifc, line_start, tokens.len() as u32, line_opening_box);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxtree::ifc::{GlyphMetrics, Token};
    use crate::declarations::values::Color;
    use crate::fonts::{FontHandle, NullFonts};

    fn new_ifc() -> InlineFormattingContext {
        InlineFormattingContext::new(
            0,
            Color {
                r: 0,
                g: 0,
                b: 0,
                a: 255,
            },
            Unit::from_px(10).unwrap(),
            Unit::from_px(2).unwrap(),
        )
    }

    #[test]
    fn split_for_block_closes_open_boxes_then_reopens_in_new_ifc() {
        let fonts = NullFonts;
        let font = fonts.get(FontHandle(0));
        let mut first = new_ifc();
        let mut builder = IfcBuilder::new();

        let span = builder.enter_inline_box(&mut first, InlineBox::default()).unwrap();
        builder.push_text_run(&mut first, &fonts, font, "A");
        builder.split_for_block(&mut first, 7);

        assert_eq!(
            first.tokens()[0],
            Token::Special(Special::box_start(span))
        );
        assert!(matches!(
            first.tokens().last().unwrap(),
            Token::Special(s) if s.kind == crate::boxtree::ifc::SpecialKind::BoxEnd
        ));
        assert!(first
            .tokens()
            .iter()
            .any(|t| matches!(t, Token::Special(s) if s.kind == crate::boxtree::ifc::SpecialKind::ContinuationBlock)));

        let mut second = new_ifc();
        builder.reopen_in_new_ifc(&mut second).unwrap();
        builder.push_text_run(&mut second, &fonts, font, "B");
        builder.exit_inline_box(&mut second);

        assert!(matches!(second.tokens()[0], Token::Special(s) if s.kind == crate::boxtree::ifc::SpecialKind::BoxStart));
        assert!(matches!(second.tokens().last().unwrap(), Token::Special(s) if s.kind == crate::boxtree::ifc::SpecialKind::BoxEnd));
    }

    #[test]
    fn forced_line_break_starts_a_new_line() {
        let mut ifc = new_ifc();
        ifc.push_glyph(
            1,
            GlyphMetrics {
                offset: Unit::ZERO,
                advance: Unit::from_px(5).unwrap(),
                width: Unit::from_px(5).unwrap(),
            },
        );
        ifc.push_special(Special::line_break());
        ifc.push_glyph(
            1,
            GlyphMetrics {
                offset: Unit::ZERO,
                advance: Unit::from_px(5).unwrap(),
                width: Unit::from_px(5).unwrap(),
            },
        );
        break_lines(&mut ifc, Unit::from_px(1000).unwrap());
        assert_eq!(ifc.line_boxes().len(), 2);
    }

    #[test]
    fn overflowing_glyph_wraps_to_a_new_line() {
        let mut ifc = new_ifc();
        for _ in 0..3 {
            ifc.push_glyph(
                1,
                GlyphMetrics {
                    offset: Unit::ZERO,
                    advance: Unit::from_px(10).unwrap(),
                    width: Unit::from_px(10).unwrap(),
                },
            );
        }
        break_lines(&mut ifc, Unit::from_px(15).unwrap());
        assert!(ifc.line_boxes().len() >= 2);
    }
}
