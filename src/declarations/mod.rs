//! Append-only store of parsed CSS declaration blocks (spec.md §3, §4.2).
//!
//! A block holds, per aggregate group, two parallel lists — one for
//! `!important` declarations, one for `normal` ones — exactly as spec.md §3
//! describes. Blocks are referenced by an opaque `BlockId`; nothing is ever
//! removed once appended (CSS declaration blocks are immutable once parsed,
//! and the cascade only ever reads them).

pub mod values;

use values::{
    AllKeyword, BackgroundValues, BoxStyleValues, ColorsValues, ContentHeightValues,
    ContentWidthValues, CssWideKeyword, HorizontalEdgesValues, InsetsValues, MergeOver,
    VerticalEdgesValues,
};

/// Opaque reference to a block in a `DeclarationsStore`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockId(u32);

/// `!important` vs. `normal` declaration importance (spec.md §3, §4.2).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Importance {
    Important,
    Normal,
}

#[derive(Clone, Default)]
struct GroupSlot<T> {
    important: Vec<T>,
    normal: Vec<T>,
}

impl<T> GroupSlot<T> {
    fn list_mut(&mut self, importance: Importance) -> &mut Vec<T> {
        match importance {
            Importance::Important => &mut self.important,
            Importance::Normal => &mut self.normal,
        }
    }

    fn list(&self, importance: Importance) -> &[T] {
        match importance {
            Importance::Important => &self.important,
            Importance::Normal => &self.normal,
        }
    }
}

#[derive(Default)]
struct Block {
    box_style: GroupSlot<BoxStyleValues>,
    content_width: GroupSlot<ContentWidthValues>,
    content_height: GroupSlot<ContentHeightValues>,
    horizontal_edges: GroupSlot<HorizontalEdgesValues>,
    vertical_edges: GroupSlot<VerticalEdgesValues>,
    insets: GroupSlot<InsetsValues>,
    background: GroupSlot<BackgroundValues>,
    colors: GroupSlot<ColorsValues>,
}

/// Append-only declaration block storage (spec.md §3, §4.2).
#[derive(Default)]
pub struct DeclarationsStore {
    blocks: Vec<Block>,
}

macro_rules! group_accessors {
    ($add_fn:ident, $apply_fn:ident, $field:ident, $ty:ty) => {
        /// Records `values`' explicitly-set fields into `block`'s
        /// `importance` list for this group (spec.md §4.2:
        /// "`add_values(importance, values)` stores per-group declared
        /// values").
        pub fn $add_fn(&mut self, block: BlockId, importance: Importance, values: $ty) {
            self.blocks[block.0 as usize]
                .$field
                .list_mut(importance)
                .push(values);
        }

        /// Folds every recorded value for this group and importance into
        /// `out`, later entries overriding earlier ones (spec.md §4.2:
        /// "`apply(group, block, importance, &out)` merges block values
        /// into an aggregate").
        pub fn $apply_fn(&self, block: BlockId, importance: Importance, out: &mut $ty) {
            for values in self.blocks[block.0 as usize].$field.list(importance) {
                out.merge_over(values);
            }
        }
    };
}

impl DeclarationsStore {
    pub fn new() -> Self {
        DeclarationsStore { blocks: Vec::new() }
    }

    /// Allocates a new, empty block and returns its id (spec.md §4.2:
    /// "`open_block()` -> mutable block id").
    pub fn open_block(&mut self) -> BlockId {
        let id = BlockId(self.blocks.len() as u32);
        self.blocks.push(Block::default());
        id
    }

    /// Records a CSS-wide keyword (`inherit`/`initial`/`unset`) applying to
    /// every aggregate group in `block` at once (spec.md §4.2: "`add_all`
    /// records a CSS-wide keyword applied to every group" — the `all:
    /// <keyword>` shorthand).
    pub fn add_all(&mut self, block: BlockId, importance: Importance, cwk: CssWideKeyword) {
        let b = &mut self.blocks[block.0 as usize];
        b.box_style.list_mut(importance).push(BoxStyleValues::all(cwk));
        b.content_width
            .list_mut(importance)
            .push(ContentWidthValues::all(cwk));
        b.content_height
            .list_mut(importance)
            .push(ContentHeightValues::all(cwk));
        b.horizontal_edges
            .list_mut(importance)
            .push(HorizontalEdgesValues::all(cwk));
        b.vertical_edges
            .list_mut(importance)
            .push(VerticalEdgesValues::all(cwk));
        b.insets.list_mut(importance).push(InsetsValues::all(cwk));
        b.background
            .list_mut(importance)
            .push(BackgroundValues::all(cwk));
        b.colors.list_mut(importance).push(ColorsValues::all(cwk));
    }

    group_accessors!(
        add_box_style_values,
        apply_box_style,
        box_style,
        BoxStyleValues
    );
    group_accessors!(
        add_content_width_values,
        apply_content_width,
        content_width,
        ContentWidthValues
    );
    group_accessors!(
        add_content_height_values,
        apply_content_height,
        content_height,
        ContentHeightValues
    );
    group_accessors!(
        add_horizontal_edges_values,
        apply_horizontal_edges,
        horizontal_edges,
        HorizontalEdgesValues
    );
    group_accessors!(
        add_vertical_edges_values,
        apply_vertical_edges,
        vertical_edges,
        VerticalEdgesValues
    );
    group_accessors!(add_insets_values, apply_insets, insets, InsetsValues);
    group_accessors!(
        add_background_values,
        apply_background,
        background,
        BackgroundValues
    );
    group_accessors!(add_colors_values, apply_colors, colors, ColorsValues);
}

#[cfg(test)]
mod tests {
    use super::*;
    use values::{LengthPercentage, LengthPercentageAuto, OuterDisplay, Specified};

    #[test]
    fn later_add_values_call_overrides_earlier_same_importance() {
        let mut store = DeclarationsStore::new();
        let block = store.open_block();
        store.add_content_width_values(
            block,
            Importance::Normal,
            ContentWidthValues {
                width: Some(Specified::Value(LengthPercentageAuto::Auto)),
                ..Default::default()
            },
        );
        store.add_content_width_values(
            block,
            Importance::Normal,
            ContentWidthValues {
                width: Some(Specified::Value(LengthPercentageAuto::LengthPercentage(
                    LengthPercentage::Px(crate::unit::Unit::from_raw(40)),
                ))),
                ..Default::default()
            },
        );

        let mut out = ContentWidthValues::default();
        store.apply_content_width(block, Importance::Normal, &mut out);
        assert_eq!(
            out.width,
            Some(Specified::Value(LengthPercentageAuto::LengthPercentage(
                LengthPercentage::Px(crate::unit::Unit::from_raw(40))
            )))
        );
    }

    #[test]
    fn important_and_normal_lists_are_independent() {
        let mut store = DeclarationsStore::new();
        let block = store.open_block();
        store.add_box_style_values(
            block,
            Importance::Important,
            BoxStyleValues {
                display: Some(Specified::Value(OuterDisplay::Block)),
                ..Default::default()
            },
        );

        let mut important_out = BoxStyleValues::default();
        store.apply_box_style(block, Importance::Important, &mut important_out);
        assert_eq!(
            important_out.display,
            Some(Specified::Value(OuterDisplay::Block))
        );

        let mut normal_out = BoxStyleValues::default();
        store.apply_box_style(block, Importance::Normal, &mut normal_out);
        assert_eq!(normal_out.display, None);
    }

    #[test]
    fn add_all_sets_every_group() {
        let mut store = DeclarationsStore::new();
        let block = store.open_block();
        store.add_all(block, Importance::Normal, CssWideKeyword::Inherit);

        let mut box_style = BoxStyleValues::default();
        store.apply_box_style(block, Importance::Normal, &mut box_style);
        assert_eq!(box_style.display, Some(Specified::Inherit));

        let mut colors = ColorsValues::default();
        store.apply_colors(block, Importance::Normal, &mut colors);
        assert_eq!(colors.color, Some(Specified::Inherit));
    }
}
