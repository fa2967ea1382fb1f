//! Per-element cascaded values (spec.md §3: "Element... cascaded values").
//!
//! The shape mirrors `declarations::values`' aggregate groups exactly,
//! holding the single winning `Specified<T>` per field after the cascade
//! has resolved precedence — no importance dimension survives here, and no
//! per-block structure either; this is the flattened, per-element result
//! the style computer consumes (spec.md §4.3 takes "specified aggregates"
//! as its input, which is what this type represents).

use crate::declarations::values::{
    BackgroundValues, BoxStyleValues, ColorsValues, ContentHeightValues, ContentWidthValues,
    HorizontalEdgesValues, InsetsValues, VerticalEdgesValues,
};

/// The cascaded, per-group declared values attached to one element.
/// Rewritten wholesale by the cascade engine on every run (spec.md §4.2:
/// "clear its cascaded values and apply every recorded `(block,
/// importance)` in the recorded order").
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CascadedValues {
    pub box_style: BoxStyleValues,
    pub content_width: ContentWidthValues,
    pub content_height: ContentHeightValues,
    pub horizontal_edges: HorizontalEdgesValues,
    pub vertical_edges: VerticalEdgesValues,
    pub insets: InsetsValues,
    pub background: BackgroundValues,
    pub colors: ColorsValues,
}

impl CascadedValues {
    /// Resets every group to "nothing declared", the first step of
    /// re-cascading an element (spec.md §4.2).
    pub fn clear(&mut self) {
        *self = CascadedValues::default();
    }
}
