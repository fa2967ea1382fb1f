//! Cosmetic pass: re-resolves color-related aggregates after geometry is
//! fixed and writes them onto the box tree (spec.md §4.7).
//!
//! Grounded on the same document-order walk `generation::mod` uses
//! (`ElementTree::pre_order`), reusing `style::compute_values` to get each
//! element's inherited `color` right without re-deriving the cascade. This
//! pass never touches a block's or inline box's geometry fields — only
//! `background`/`border_colors` (blocks) and `InlineBox::background`
//! (inline boxes).

use crate::boxtree::{BoxTree, GeneratedBox};
use crate::boxtree::block::{BlockBackground, BorderColors};
use crate::declarations::values::ImageHandle;
use crate::element_tree::{Element, ElementTree};
use crate::style::{compute_values, values::ComputedValues};

/// Walks `root`'s subtree in document order, recomputing each visited
/// element's style and writing its color/background fields onto whatever
/// box it generated (spec.md §4.7). `images` is accepted for parity with
/// the environment's collaborator set (spec.md §6) even though this crate
/// only persists an interned handle list, never decoded pixels.
pub fn run<I: crate::images::Images>(
    tree: &ElementTree,
    root: Element,
    _images: &I,
    box_tree: &mut BoxTree,
) {
    log::trace!("cosmetic: starting document-order walk");
    let mut stack: Vec<(Element, ComputedValues)> = Vec::new();

    for element in tree.pre_order(root) {
        while let Some((ancestor, _)) = stack.last() {
            if *ancestor == tree.parent(element) {
                break;
            }
            stack.pop();
        }

        let parent_computed = stack.last().map(|(_, computed)| computed);
        let computed = compute_values(tree.cascaded_values(element), parent_computed);

        apply_to_box(box_tree, element, &computed);

        stack.push((element, computed));
    }
    log::trace!("cosmetic: done");
}

fn apply_to_box(box_tree: &mut BoxTree, element: Element, computed: &ComputedValues) {
    match box_tree.generated_box(element) {
        Some(GeneratedBox::Block(block_ref)) => {
            let images: Vec<ImageHandle> = computed.background.image.clone();
            let handle = box_tree.background_images.intern(images);
            box_tree.subtree_mut(block_ref.subtree).set_background(
                block_ref.index,
                BlockBackground {
                    color: computed.colors.background_color,
                    images: if handle.0 == u32::MAX { Vec::new() } else { vec![handle] },
                },
            );
            box_tree.subtree_mut(block_ref.subtree).set_border_colors(
                block_ref.index,
                BorderColors {
                    top: computed.colors.border_top_color,
                    right: computed.colors.border_right_color,
                    bottom: computed.colors.border_bottom_color,
                    left: computed.colors.border_left_color,
                },
            );
        }
        Some(GeneratedBox::InlineBox { ifc, inline_index }) => {
            box_tree.ifc_mut(ifc).inline_box_mut(inline_index).background =
                computed.colors.background_color;
        }
        Some(GeneratedBox::Text { .. }) | None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxtree::{BoxTreeBuilder};
    use crate::boxtree::block::{BlockRef, BlockType, BoxOffsets};
    use crate::declarations::values::{Color, OuterDisplay, Specified};
    use crate::element_tree::{Category, Placement};
    use crate::images::NullImages;
    use crate::unit::Unit;

    fn red() -> Color {
        Color { r: 255, g: 0, b: 0, a: 255 }
    }

    #[test]
    fn block_background_color_reaches_the_block() {
        let mut tree = ElementTree::new();
        let root = tree.allocate_elements(1).unwrap()[0];
        tree.init_element(root, Category::Element, Placement::Orphan);
        tree.cascaded_values_mut(root).box_style.display = Some(Specified::Value(OuterDisplay::Block));
        tree.cascaded_values_mut(root).colors.background_color = Some(Specified::Value(red()));

        let mut builder = BoxTreeBuilder::new();
        let subtree = builder.push_subtree(None).unwrap();
        let index = builder.subtree_mut(subtree).push_block(BlockType::Block, Some(root)).unwrap();
        builder
            .subtree_mut(subtree)
            .set_box_offsets(index, BoxOffsets::default());
        builder.register_box(root, GeneratedBox::Block(BlockRef { subtree, index }));
        let mut box_tree = builder.finish(BlockRef { subtree, index });

        let images = NullImages;
        run(&tree, root, &images, &mut box_tree);

        assert_eq!(box_tree.subtree(subtree).background(index).color, red());
    }

    #[test]
    fn cosmetic_pass_never_touches_geometry() {
        let mut tree = ElementTree::new();
        let root = tree.allocate_elements(1).unwrap()[0];
        tree.init_element(root, Category::Element, Placement::Orphan);

        let mut builder = BoxTreeBuilder::new();
        let subtree = builder.push_subtree(None).unwrap();
        let index = builder.subtree_mut(subtree).push_block(BlockType::Block, Some(root)).unwrap();
        let geometry = BoxOffsets {
            border_pos: Default::default(),
            border_size: crate::boxtree::block::Size { width: Unit::from_px(10).unwrap(), height: Unit::from_px(20).unwrap() },
            content_pos: Default::default(),
            content_size: crate::boxtree::block::Size { width: Unit::from_px(10).unwrap(), height: Unit::from_px(20).unwrap() },
        };
        builder.subtree_mut(subtree).set_box_offsets(index, geometry);
        builder.register_box(root, GeneratedBox::Block(BlockRef { subtree, index }));
        let mut box_tree = builder.finish(BlockRef { subtree, index });

        let images = NullImages;
        run(&tree, root, &images, &mut box_tree);

        assert_eq!(box_tree.subtree(subtree).box_offsets(index), geometry);
    }
}
