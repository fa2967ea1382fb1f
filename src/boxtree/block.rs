//! Subtree block storage: a struct-of-arrays per subtree (spec.md §3
//! "Subtree block (struct-of-arrays)", §9 "deliberately separates hot
//! fields (`skip`, `type`) from cold ones... for cache-friendly
//! traversal"). `skip` and `block_type` are kept in their own dense `Vec`s
//! so a pure tree walk (the hot path during painting and hit-testing)
//! never touches the cold geometry/color columns.

use crate::declarations::values::Color;
use crate::element_tree::Element;
use crate::error::{Error, Result};
use crate::unit::Unit;

pub type SubtreeId = u32;
pub type StackingContextId = u32;
pub type IfcId = u32;

/// A reference to a block: which subtree, and its index within it
/// (spec.md §3: "`BlockRef = (subtree_id, index)`").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockRef {
    pub subtree: SubtreeId,
    pub index: u16,
}

/// Tag-dispatch variant for what a block *is* (spec.md §3, §9). A
/// `SubtreeProxy` is a leaf that attaches another subtree as if its root
/// were this block's only child.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockType {
    Block,
    IfcContainer(IfcId),
    SubtreeProxy(SubtreeId),
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: Unit,
    pub y: Unit,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: Unit,
    pub height: Unit,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Edges {
    pub top: Unit,
    pub right: Unit,
    pub bottom: Unit,
    pub left: Unit,
}

/// The four geometric rectangles a block carries (spec.md §3). `border_pos`
/// is relative to the parent's content-box origin, or the screen for the
/// initial containing block (spec.md §9's resolution of the
/// `border_pos`-reference-frame ambiguity; see `DESIGN.md`).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoxOffsets {
    pub border_pos: Point,
    pub border_size: Size,
    pub content_pos: Point,
    pub content_size: Size,
}

/// Resolved inset values; `None` means the inset was `auto` and never
/// affects position (spec.md §4.3: insets resolve "relative only").
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ResolvedInsets {
    pub top: Option<Unit>,
    pub right: Option<Unit>,
    pub bottom: Option<Unit>,
    pub left: Option<Unit>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BorderColors {
    pub top: Color,
    pub right: Color,
    pub bottom: Color,
    pub left: Color,
}

impl Default for BorderColors {
    fn default() -> Self {
        let black = Color {
            r: 0,
            g: 0,
            b: 0,
            a: 255,
        };
        BorderColors {
            top: black,
            right: black,
            bottom: black,
            left: black,
        }
    }
}

/// A background image, already resolved against the box tree's
/// `background_images` store (spec.md §4.7).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BackgroundImagesHandle(pub u32);

/// Cosmetic-pass output attached to a block (spec.md §4.7:
/// `BlockBoxBackground`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockBackground {
    pub color: Color,
    pub images: Vec<BackgroundImagesHandle>,
}

/// One subtree: a contiguous, skip-encoded list of blocks rooted at index 0
/// (spec.md §3, GLOSSARY). `parent` is the back-reference to the proxy
/// block in another subtree that attached this one; `None` only for the
/// root subtree.
pub struct Subtree {
    pub id: SubtreeId,
    pub parent: Option<BlockRef>,
    skip: Vec<u16>,
    block_type: Vec<BlockType>,
    stacking_context: Vec<Option<StackingContextId>>,
    offset: Vec<Point>,
    box_offsets: Vec<BoxOffsets>,
    borders: Vec<Edges>,
    margins: Vec<Edges>,
    insets: Vec<ResolvedInsets>,
    border_colors: Vec<BorderColors>,
    background: Vec<BlockBackground>,
    element: Vec<Option<Element>>,
}

impl Subtree {
    pub fn new(id: SubtreeId, parent: Option<BlockRef>) -> Self {
        Subtree {
            id,
            parent,
            skip: Vec::new(),
            block_type: Vec::new(),
            stacking_context: Vec::new(),
            offset: Vec::new(),
            box_offsets: Vec::new(),
            borders: Vec::new(),
            margins: Vec::new(),
            insets: Vec::new(),
            border_colors: Vec::new(),
            background: Vec::new(),
            element: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.skip.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skip.is_empty()
    }

    /// Appends a new block with `skip = 1` (a leaf until its parent patches
    /// the skip once its own subtree closes). Fails once the subtree would
    /// exceed 2^16 blocks (spec.md §6).
    pub fn push_block(&mut self, block_type: BlockType, element: Option<Element>) -> Result<u16> {
        if self.skip.len() >= u16::MAX as usize {
            return Err(Error::SizeLimitExceeded);
        }
        let index = self.skip.len() as u16;
        self.skip.push(1);
        self.block_type.push(block_type);
        self.stacking_context.push(None);
        self.offset.push(Point::default());
        self.box_offsets.push(BoxOffsets::default());
        self.borders.push(Edges::default());
        self.margins.push(Edges::default());
        self.insets.push(ResolvedInsets::default());
        self.border_colors.push(BorderColors::default());
        self.background.push(BlockBackground::default());
        self.element.push(element);
        Ok(index)
    }

    /// Sets block `index`'s skip: how many blocks (including itself) its
    /// subtree spans (spec.md §3: "skip of root = subtree length").
    pub fn set_skip(&mut self, index: u16, skip: u16) {
        self.skip[index as usize] = skip;
    }

    pub fn skip_at(&self, index: u16) -> u16 {
        self.skip[index as usize]
    }

    pub fn block_type(&self, index: u16) -> BlockType {
        self.block_type[index as usize]
    }

    pub fn set_stacking_context(&mut self, index: u16, sc: StackingContextId) {
        self.stacking_context[index as usize] = Some(sc);
    }

    pub fn stacking_context(&self, index: u16) -> Option<StackingContextId> {
        self.stacking_context[index as usize]
    }

    pub fn set_offset(&mut self, index: u16, offset: Point) {
        self.offset[index as usize] = offset;
    }

    pub fn offset(&self, index: u16) -> Point {
        self.offset[index as usize]
    }

    pub fn set_box_offsets(&mut self, index: u16, box_offsets: BoxOffsets) {
        self.box_offsets[index as usize] = box_offsets;
    }

    pub fn box_offsets(&self, index: u16) -> BoxOffsets {
        self.box_offsets[index as usize]
    }

    pub fn set_borders(&mut self, index: u16, borders: Edges) {
        self.borders[index as usize] = borders;
    }

    pub fn borders(&self, index: u16) -> Edges {
        self.borders[index as usize]
    }

    pub fn set_margins(&mut self, index: u16, margins: Edges) {
        self.margins[index as usize] = margins;
    }

    pub fn margins(&self, index: u16) -> Edges {
        self.margins[index as usize]
    }

    pub fn set_insets(&mut self, index: u16, insets: ResolvedInsets) {
        self.insets[index as usize] = insets;
    }

    pub fn insets(&self, index: u16) -> ResolvedInsets {
        self.insets[index as usize]
    }

    pub fn set_border_colors(&mut self, index: u16, colors: BorderColors) {
        self.border_colors[index as usize] = colors;
    }

    pub fn border_colors(&self, index: u16) -> BorderColors {
        self.border_colors[index as usize]
    }

    pub fn set_background(&mut self, index: u16, background: BlockBackground) {
        self.background[index as usize] = background;
    }

    pub fn background(&self, index: u16) -> &BlockBackground {
        &self.background[index as usize]
    }

    pub fn element(&self, index: u16) -> Option<Element> {
        self.element[index as usize]
    }

    /// Iterates `index`'s direct children via skip-encoding (spec.md §9):
    /// the first child is at `index + 1`; each subsequent sibling is
    /// reached by adding that child's own skip.
    pub fn children_of(&self, index: u16) -> ChildBlocks<'_> {
        let end = index as usize + self.skip[index as usize] as usize;
        ChildBlocks {
            subtree: self,
            next: index as usize + 1,
            end,
        }
    }
}

pub struct ChildBlocks<'a> {
    subtree: &'a Subtree,
    next: usize,
    end: usize,
}

impl<'a> Iterator for ChildBlocks<'a> {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        if self.next >= self.end {
            return None;
        }
        let current = self.next as u16;
        self.next += self.subtree.skip[self.next] as usize;
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_encoding_yields_correct_pre_order_children() {
        let mut subtree = Subtree::new(0, None);
        let root = subtree.push_block(BlockType::Block, None).unwrap();
        let a = subtree.push_block(BlockType::Block, None).unwrap();
        let _a_child = subtree.push_block(BlockType::Block, None).unwrap();
        let b = subtree.push_block(BlockType::Block, None).unwrap();
        subtree.set_skip(a, 2);
        subtree.set_skip(b, 1);
        subtree.set_skip(root, subtree.len() as u16);

        let children: Vec<u16> = subtree.children_of(root).collect();
        assert_eq!(children, vec![a, b]);
    }

    #[test]
    fn size_limit_exceeded_once_u16_capacity_is_reached() {
        let mut subtree = Subtree::new(0, None);
        for i in 0..u16::MAX {
            let r = subtree.push_block(BlockType::Block, None);
            if i == u16::MAX - 1 {
                // still succeeds for the last in-range slot
                assert!(r.is_ok());
            }
        }
        assert!(matches!(
            subtree.push_block(BlockType::Block, None),
            Err(Error::SizeLimitExceeded)
        ));
    }
}
