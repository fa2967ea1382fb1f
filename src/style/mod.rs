//! Style computer: per-element specified -> computed value resolution
//! (spec.md §4.3, run during box generation as each element is visited).
//!
//! Only `color` inherits by default in the groups this crate models (CSS2's
//! other inheriting properties — `font-*`, `text-*` — are out of scope,
//! spec.md's Non-goals). Every other field falls back to its CSS2 initial
//! value when nothing in the cascade set it.

pub mod values;

use crate::declarations::values::Specified;
use crate::element_tree::CascadedValues;
pub use values::ComputedValues;

/// Resolves one field's `Specified<T>` into a concrete `T`.
///
/// - `None` (nothing declared) behaves like `unset`: inherited properties
///   inherit, others take the initial value.
/// - `Specified::Value(v)` is used as-is.
/// - `Specified::Inherit` always takes the parent's value.
/// - `Specified::Initial` always takes the initial value.
/// - `Specified::Unset` behaves like `None`.
fn resolve<T: Clone>(
    declared: Option<Specified<T>>,
    inherits: bool,
    parent_value: &T,
    initial_value: &T,
) -> T {
    match declared {
        None | Some(Specified::Unset) => {
            if inherits {
                parent_value.clone()
            } else {
                initial_value.clone()
            }
        }
        Some(Specified::Value(v)) => v,
        Some(Specified::Inherit) => parent_value.clone(),
        Some(Specified::Initial) => initial_value.clone(),
    }
}

/// Computes `cascaded`'s values given the element's parent's already-computed
/// values (`None` for the root element, which inherits nothing).
pub fn compute_values(cascaded: &CascadedValues, parent: Option<&ComputedValues>) -> ComputedValues {
    let initial = ComputedValues::default();
    let parent = parent.unwrap_or(&initial);

    ComputedValues {
        box_style: values::ComputedBoxStyle {
            display: resolve(
                cascaded.box_style.display,
                false,
                &parent.box_style.display,
                &initial.box_style.display,
            ),
            position: resolve(
                cascaded.box_style.position,
                false,
                &parent.box_style.position,
                &initial.box_style.position,
            ),
            z_index: resolve(
                cascaded.box_style.z_index,
                false,
                &parent.box_style.z_index,
                &initial.box_style.z_index,
            ),
        },
        content_width: values::ComputedContentWidth {
            width: resolve(
                cascaded.content_width.width,
                false,
                &parent.content_width.width,
                &initial.content_width.width,
            ),
            min_width: resolve(
                cascaded.content_width.min_width,
                false,
                &parent.content_width.min_width,
                &initial.content_width.min_width,
            ),
            max_width: resolve(
                cascaded.content_width.max_width,
                false,
                &parent.content_width.max_width,
                &initial.content_width.max_width,
            ),
        },
        content_height: values::ComputedContentHeight {
            height: resolve(
                cascaded.content_height.height,
                false,
                &parent.content_height.height,
                &initial.content_height.height,
            ),
            min_height: resolve(
                cascaded.content_height.min_height,
                false,
                &parent.content_height.min_height,
                &initial.content_height.min_height,
            ),
            max_height: resolve(
                cascaded.content_height.max_height,
                false,
                &parent.content_height.max_height,
                &initial.content_height.max_height,
            ),
        },
        horizontal_edges: values::ComputedHorizontalEdges {
            margin_left: resolve(
                cascaded.horizontal_edges.margin_left,
                false,
                &parent.horizontal_edges.margin_left,
                &initial.horizontal_edges.margin_left,
            ),
            margin_right: resolve(
                cascaded.horizontal_edges.margin_right,
                false,
                &parent.horizontal_edges.margin_right,
                &initial.horizontal_edges.margin_right,
            ),
            border_left_width: resolve(
                cascaded.horizontal_edges.border_left_width,
                false,
                &parent.horizontal_edges.border_left_width,
                &initial.horizontal_edges.border_left_width,
            ),
            border_left_style: resolve(
                cascaded.horizontal_edges.border_left_style,
                false,
                &parent.horizontal_edges.border_left_style,
                &initial.horizontal_edges.border_left_style,
            ),
            border_right_width: resolve(
                cascaded.horizontal_edges.border_right_width,
                false,
                &parent.horizontal_edges.border_right_width,
                &initial.horizontal_edges.border_right_width,
            ),
            border_right_style: resolve(
                cascaded.horizontal_edges.border_right_style,
                false,
                &parent.horizontal_edges.border_right_style,
                &initial.horizontal_edges.border_right_style,
            ),
            padding_left: resolve(
                cascaded.horizontal_edges.padding_left,
                false,
                &parent.horizontal_edges.padding_left,
                &initial.horizontal_edges.padding_left,
            ),
            padding_right: resolve(
                cascaded.horizontal_edges.padding_right,
                false,
                &parent.horizontal_edges.padding_right,
                &initial.horizontal_edges.padding_right,
            ),
        },
        vertical_edges: values::ComputedVerticalEdges {
            margin_top: resolve(
                cascaded.vertical_edges.margin_top,
                false,
                &parent.vertical_edges.margin_top,
                &initial.vertical_edges.margin_top,
            ),
            margin_bottom: resolve(
                cascaded.vertical_edges.margin_bottom,
                false,
                &parent.vertical_edges.margin_bottom,
                &initial.vertical_edges.margin_bottom,
            ),
            border_top_width: resolve(
                cascaded.vertical_edges.border_top_width,
                false,
                &parent.vertical_edges.border_top_width,
                &initial.vertical_edges.border_top_width,
            ),
            border_top_style: resolve(
                cascaded.vertical_edges.border_top_style,
                false,
                &parent.vertical_edges.border_top_style,
                &initial.vertical_edges.border_top_style,
            ),
            border_bottom_width: resolve(
                cascaded.vertical_edges.border_bottom_width,
                false,
                &parent.vertical_edges.border_bottom_width,
                &initial.vertical_edges.border_bottom_width,
            ),
            border_bottom_style: resolve(
                cascaded.vertical_edges.border_bottom_style,
                false,
                &parent.vertical_edges.border_bottom_style,
                &initial.vertical_edges.border_bottom_style,
            ),
            padding_top: resolve(
                cascaded.vertical_edges.padding_top,
                false,
                &parent.vertical_edges.padding_top,
                &initial.vertical_edges.padding_top,
            ),
            padding_bottom: resolve(
                cascaded.vertical_edges.padding_bottom,
                false,
                &parent.vertical_edges.padding_bottom,
                &initial.vertical_edges.padding_bottom,
            ),
        },
        insets: values::ComputedInsets {
            top: resolve(
                cascaded.insets.top,
                false,
                &parent.insets.top,
                &initial.insets.top,
            ),
            right: resolve(
                cascaded.insets.right,
                false,
                &parent.insets.right,
                &initial.insets.right,
            ),
            bottom: resolve(
                cascaded.insets.bottom,
                false,
                &parent.insets.bottom,
                &initial.insets.bottom,
            ),
            left: resolve(
                cascaded.insets.left,
                false,
                &parent.insets.left,
                &initial.insets.left,
            ),
        },
        background: values::ComputedBackground {
            image: resolve(
                cascaded.background.image.clone(),
                false,
                &parent.background.image,
                &initial.background.image,
            ),
            repeat: resolve(
                cascaded.background.repeat,
                false,
                &parent.background.repeat,
                &initial.background.repeat,
            ),
            position: resolve(
                cascaded.background.position,
                false,
                &parent.background.position,
                &initial.background.position,
            ),
            clip: resolve(
                cascaded.background.clip,
                false,
                &parent.background.clip,
                &initial.background.clip,
            ),
            origin: resolve(
                cascaded.background.origin,
                false,
                &parent.background.origin,
                &initial.background.origin,
            ),
            size: resolve(
                cascaded.background.size,
                false,
                &parent.background.size,
                &initial.background.size,
            ),
        },
        colors: values::ComputedColors {
            color: resolve(
                cascaded.colors.color,
                true,
                &parent.colors.color,
                &initial.colors.color,
            ),
            background_color: resolve(
                cascaded.colors.background_color,
                false,
                &parent.colors.background_color,
                &initial.colors.background_color,
            ),
            border_top_color: resolve(
                cascaded.colors.border_top_color,
                false,
                &parent.colors.border_top_color,
                &initial.colors.border_top_color,
            ),
            border_right_color: resolve(
                cascaded.colors.border_right_color,
                false,
                &parent.colors.border_right_color,
                &initial.colors.border_right_color,
            ),
            border_bottom_color: resolve(
                cascaded.colors.border_bottom_color,
                false,
                &parent.colors.border_bottom_color,
                &initial.colors.border_bottom_color,
            ),
            border_left_color: resolve(
                cascaded.colors.border_left_color,
                false,
                &parent.colors.border_left_color,
                &initial.colors.border_left_color,
            ),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declarations::values::{Color, Specified};

    #[test]
    fn color_inherits_by_default_when_undeclared() {
        let mut parent_cascaded = CascadedValues::default();
        parent_cascaded.colors.color = Some(Specified::Value(Color {
            r: 10,
            g: 20,
            b: 30,
            a: 255,
        }));
        let parent_computed = compute_values(&parent_cascaded, None);

        let child_cascaded = CascadedValues::default();
        let child_computed = compute_values(&child_cascaded, Some(&parent_computed));

        assert_eq!(child_computed.colors.color, parent_computed.colors.color);
    }

    #[test]
    fn background_color_does_not_inherit() {
        let mut parent_cascaded = CascadedValues::default();
        parent_cascaded.colors.background_color = Some(Specified::Value(Color {
            r: 255,
            g: 0,
            b: 0,
            a: 255,
        }));
        let parent_computed = compute_values(&parent_cascaded, None);

        let child_cascaded = CascadedValues::default();
        let child_computed = compute_values(&child_cascaded, Some(&parent_computed));

        assert_ne!(
            child_computed.colors.background_color,
            parent_computed.colors.background_color
        );
    }

    #[test]
    fn explicit_inherit_keyword_pulls_parent_value_for_noninherited_property() {
        let mut parent_cascaded = CascadedValues::default();
        parent_cascaded.colors.background_color = Some(Specified::Value(Color {
            r: 1,
            g: 2,
            b: 3,
            a: 255,
        }));
        let parent_computed = compute_values(&parent_cascaded, None);

        let mut child_cascaded = CascadedValues::default();
        child_cascaded.colors.background_color = Some(Specified::Inherit);
        let child_computed = compute_values(&child_cascaded, Some(&parent_computed));

        assert_eq!(
            child_computed.colors.background_color,
            parent_computed.colors.background_color
        );
    }
}
