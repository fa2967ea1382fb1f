//! Computed-value types: the same shape as `declarations::values`' groups
//! but with every `Option<Specified<T>>` resolved down to a concrete `T`
//! (spec.md §3: "Computed values — cascaded values after defaulting,
//! inheritance, and unit resolution"). Percentage/auto forms are *not* yet
//! resolved to units here — that's the sizing solver's job (spec.md §4.3);
//! this stage only finishes what the cascade left symbolic (keywords,
//! inheritance, initial defaulting).

use crate::declarations::values::{
    BackgroundBox, BackgroundRepeat, BackgroundSize, BorderStyleKeyword, BorderWidth, Color,
    ImageHandle, Inset, LengthPercentage, LengthPercentageAuto, MaxSize, OuterDisplay,
    PositionKeyword, ZIndex,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComputedBoxStyle {
    pub display: OuterDisplay,
    pub position: PositionKeyword,
    pub z_index: ZIndex,
}

impl Default for ComputedBoxStyle {
    fn default() -> Self {
        ComputedBoxStyle {
            display: OuterDisplay::Inline,
            position: PositionKeyword::Static,
            z_index: ZIndex::Auto,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComputedContentWidth {
    pub width: LengthPercentageAuto,
    pub min_width: LengthPercentage,
    pub max_width: MaxSize,
}

impl Default for ComputedContentWidth {
    fn default() -> Self {
        ComputedContentWidth {
            width: LengthPercentageAuto::Auto,
            min_width: LengthPercentage::Px(crate::unit::Unit::ZERO),
            max_width: MaxSize::None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComputedContentHeight {
    pub height: LengthPercentageAuto,
    pub min_height: LengthPercentage,
    pub max_height: MaxSize,
}

impl Default for ComputedContentHeight {
    fn default() -> Self {
        ComputedContentHeight {
            height: LengthPercentageAuto::Auto,
            min_height: LengthPercentage::Px(crate::unit::Unit::ZERO),
            max_height: MaxSize::None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComputedHorizontalEdges {
    pub margin_left: LengthPercentageAuto,
    pub margin_right: LengthPercentageAuto,
    pub border_left_width: BorderWidth,
    pub border_left_style: BorderStyleKeyword,
    pub border_right_width: BorderWidth,
    pub border_right_style: BorderStyleKeyword,
    pub padding_left: LengthPercentage,
    pub padding_right: LengthPercentage,
}

impl Default for ComputedHorizontalEdges {
    fn default() -> Self {
        ComputedHorizontalEdges {
            margin_left: LengthPercentageAuto::LengthPercentage(LengthPercentage::Px(
                crate::unit::Unit::ZERO,
            )),
            margin_right: LengthPercentageAuto::LengthPercentage(LengthPercentage::Px(
                crate::unit::Unit::ZERO,
            )),
            border_left_width: BorderWidth::Medium,
            border_left_style: BorderStyleKeyword::None,
            border_right_width: BorderWidth::Medium,
            border_right_style: BorderStyleKeyword::None,
            padding_left: LengthPercentage::Px(crate::unit::Unit::ZERO),
            padding_right: LengthPercentage::Px(crate::unit::Unit::ZERO),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComputedVerticalEdges {
    pub margin_top: LengthPercentageAuto,
    pub margin_bottom: LengthPercentageAuto,
    pub border_top_width: BorderWidth,
    pub border_top_style: BorderStyleKeyword,
    pub border_bottom_width: BorderWidth,
    pub border_bottom_style: BorderStyleKeyword,
    pub padding_top: LengthPercentage,
    pub padding_bottom: LengthPercentage,
}

impl Default for ComputedVerticalEdges {
    fn default() -> Self {
        ComputedVerticalEdges {
            margin_top: LengthPercentageAuto::LengthPercentage(LengthPercentage::Px(
                crate::unit::Unit::ZERO,
            )),
            margin_bottom: LengthPercentageAuto::LengthPercentage(LengthPercentage::Px(
                crate::unit::Unit::ZERO,
            )),
            border_top_width: BorderWidth::Medium,
            border_top_style: BorderStyleKeyword::None,
            border_bottom_width: BorderWidth::Medium,
            border_bottom_style: BorderStyleKeyword::None,
            padding_top: LengthPercentage::Px(crate::unit::Unit::ZERO),
            padding_bottom: LengthPercentage::Px(crate::unit::Unit::ZERO),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComputedInsets {
    pub top: Inset,
    pub right: Inset,
    pub bottom: Inset,
    pub left: Inset,
}

impl Default for ComputedInsets {
    fn default() -> Self {
        ComputedInsets {
            top: Inset::Auto,
            right: Inset::Auto,
            bottom: Inset::Auto,
            left: Inset::Auto,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct ComputedBackground {
    pub image: Vec<ImageHandle>,
    pub repeat: BackgroundRepeat,
    pub position: (LengthPercentage, LengthPercentage),
    pub clip: BackgroundBox,
    pub origin: BackgroundBox,
    pub size: BackgroundSize,
}

impl Default for BackgroundRepeat {
    fn default() -> Self {
        BackgroundRepeat::Repeat
    }
}
impl Default for BackgroundBox {
    fn default() -> Self {
        BackgroundBox::BorderBox
    }
}
impl Default for BackgroundSize {
    fn default() -> Self {
        BackgroundSize::Auto
    }
}
impl Default for LengthPercentage {
    fn default() -> Self {
        LengthPercentage::Px(crate::unit::Unit::ZERO)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComputedColors {
    pub color: Color,
    pub background_color: Color,
    pub border_top_color: Color,
    pub border_right_color: Color,
    pub border_bottom_color: Color,
    pub border_left_color: Color,
}

/// CSS2's initial `color` value (black) and initial `background-color`
/// (transparent).
const INITIAL_COLOR: Color = Color {
    r: 0,
    g: 0,
    b: 0,
    a: 255,
};
const TRANSPARENT: Color = Color {
    r: 0,
    g: 0,
    b: 0,
    a: 0,
};

impl Default for ComputedColors {
    fn default() -> Self {
        ComputedColors {
            color: INITIAL_COLOR,
            background_color: TRANSPARENT,
            border_top_color: INITIAL_COLOR,
            border_right_color: INITIAL_COLOR,
            border_bottom_color: INITIAL_COLOR,
            border_left_color: INITIAL_COLOR,
        }
    }
}

/// The fully computed per-element style, grouped the same way as
/// `CascadedValues` (spec.md §4.3).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComputedValues {
    pub box_style: ComputedBoxStyle,
    pub content_width: ComputedContentWidth,
    pub content_height: ComputedContentHeight,
    pub horizontal_edges: ComputedHorizontalEdges,
    pub vertical_edges: ComputedVerticalEdges,
    pub insets: ComputedInsets,
    pub background: ComputedBackground,
    pub colors: ComputedColors,
}
