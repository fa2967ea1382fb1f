//! Declared-value types held in a `DeclarationsStore` block (spec.md §3,
//! §4.2) and, post-cascade, in a `CascadedValues` (`element_tree::cascaded`).
//!
//! Every property value is wrapped in `Specified<T>` rather than bare `T` so
//! a CSS-wide keyword (`inherit`/`initial`/`unset`) can stand in for any
//! field uniformly — `DeclarationsStore::add_all` (the `all: <keyword>`
//! case) synthesizes one of these per group with every field set to the
//! same keyword (spec.md §4.2: "`add_all(importance, cwk)` records a
//! CSS-wide keyword applied to every group").

use crate::unit::Unit;
use color::Rgba8;

/// A color value. CSS color syntax parsing is out of scope (spec.md §1); by
/// the time a value reaches the declarations store it is already a plain
/// RGBA color, grounded on `takumi/Cargo.toml`'s use of the `color` crate.
pub type Color = Rgba8;

/// A property value after CSS-wide-keyword resolution at the declaration
/// level, but before the cascade has picked a winner across declarations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Specified<T> {
    Value(T),
    Inherit,
    Initial,
    Unset,
}

impl<T> Specified<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Specified<U> {
        match self {
            Specified::Value(v) => Specified::Value(f(v)),
            Specified::Inherit => Specified::Inherit,
            Specified::Initial => Specified::Initial,
            Specified::Unset => Specified::Unset,
        }
    }
}

/// A `CssWideKeyword` recorded by `add_all` against every group at once
/// (spec.md §4.2).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CssWideKeyword {
    Inherit,
    Initial,
    Unset,
}

impl CssWideKeyword {
    pub fn into_specified<T>(self) -> Specified<T> {
        match self {
            CssWideKeyword::Inherit => Specified::Inherit,
            CssWideKeyword::Initial => Specified::Initial,
            CssWideKeyword::Unset => Specified::Unset,
        }
    }
}

/// `px` or `%`, as declared (spec.md §4.3's per-field rules reference both
/// forms for every length-ish property).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LengthPercentage {
    Px(Unit),
    Percent(f32),
}

/// A length, percentage, or `auto` (width/height/margins).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LengthPercentageAuto {
    LengthPercentage(LengthPercentage),
    Auto,
}

/// A length, percentage, or `none` (max-width/max-height: §4.3 "`max-width:
/// none` -> +infinity").
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MaxSize {
    LengthPercentage(LengthPercentage),
    None,
}

/// `border-*-width`: either a `px` length or one of the three keyword
/// widths (spec.md §4.3: "keyword `thin/medium/thick` (fixed integer
/// units)").
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BorderWidth {
    Thin,
    Medium,
    Thick,
    Px(Unit),
}

impl BorderWidth {
    /// The fixed unit widths CSS2 implementations commonly use for the
    /// keyword forms (1px/3px/5px at the engine's default scale).
    pub fn resolve(self) -> Unit {
        match self {
            BorderWidth::Thin => Unit::from_raw(1 * crate::unit::UNITS_PER_PX),
            BorderWidth::Medium => Unit::from_raw(3 * crate::unit::UNITS_PER_PX),
            BorderWidth::Thick => Unit::from_raw(5 * crate::unit::UNITS_PER_PX),
            BorderWidth::Px(u) => u,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BorderStyleKeyword {
    None,
    Hidden,
    Solid,
    Dashed,
    Dotted,
    Double,
    Groove,
    Ridge,
    Inset,
    Outset,
}

impl BorderStyleKeyword {
    /// Border-width style-multiplier (spec.md §4.3: "0 if border-style is
    /// `none`/`hidden`, else 1").
    pub fn width_multiplier(self) -> i32 {
        match self {
            BorderStyleKeyword::None | BorderStyleKeyword::Hidden => 0,
            _ => 1,
        }
    }
}

/// `top`/`right`/`bottom`/`left` under `position: relative` (spec.md §4.3:
/// "insets (relative only)").
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Inset {
    LengthPercentage(LengthPercentage),
    Auto,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OuterDisplay {
    Block,
    Inline,
    InlineBlock,
    None,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PositionKeyword {
    Static,
    Relative,
    Absolute,
}

/// `z-index` (spec.md §3 "Stacking context... `z_index` (signed 32-bit)"):
/// either the `auto` keyword or an integer. Only meaningful on a positioned
/// box (CSS2 §9.9.1); `auto` behaves as `0` for this engine's sort/tiebreak
/// (spec.md §4.6, §8 testable property 7).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZIndex {
    Auto,
    Integer(i32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackgroundRepeat {
    Repeat,
    RepeatX,
    RepeatY,
    NoRepeat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackgroundBox {
    BorderBox,
    PaddingBox,
    ContentBox,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BackgroundSize {
    Auto,
    Cover,
    Contain,
    LengthPercentage(LengthPercentage, LengthPercentage),
}

/// An opaque handle into the environment's image registry (spec.md §6:
/// "Images.get(handle) -> pixel dimensions and storage reference"). Image
/// *decode* is out of scope; only the handle travels through declarations
/// and the box tree's `background_images` store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub u32);

// --- Aggregate groups (spec.md §3's declarations-store group list,
// "box-style, content-width, horizontal-edges, vertical-edges, insets,
// background, colors…"; content_width is split into content-width and
// content-height here, matching the sizing solver's own input list in
// spec.md §4.3 which names `content_width` and `content_height` as
// separate solver inputs). Every field is `Option<Specified<T>>`: `None`
// means "not declared in this block", distinct from an explicit
// `inherit`/`initial`/`unset`.

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoxStyleValues {
    pub display: Option<Specified<OuterDisplay>>,
    pub position: Option<Specified<PositionKeyword>>,
    pub z_index: Option<Specified<ZIndex>>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ContentWidthValues {
    pub width: Option<Specified<LengthPercentageAuto>>,
    pub min_width: Option<Specified<LengthPercentage>>,
    pub max_width: Option<Specified<MaxSize>>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ContentHeightValues {
    pub height: Option<Specified<LengthPercentageAuto>>,
    pub min_height: Option<Specified<LengthPercentage>>,
    pub max_height: Option<Specified<MaxSize>>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HorizontalEdgesValues {
    pub margin_left: Option<Specified<LengthPercentageAuto>>,
    pub margin_right: Option<Specified<LengthPercentageAuto>>,
    pub border_left_width: Option<Specified<BorderWidth>>,
    pub border_left_style: Option<Specified<BorderStyleKeyword>>,
    pub border_right_width: Option<Specified<BorderWidth>>,
    pub border_right_style: Option<Specified<BorderStyleKeyword>>,
    pub padding_left: Option<Specified<LengthPercentage>>,
    pub padding_right: Option<Specified<LengthPercentage>>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VerticalEdgesValues {
    pub margin_top: Option<Specified<LengthPercentageAuto>>,
    pub margin_bottom: Option<Specified<LengthPercentageAuto>>,
    pub border_top_width: Option<Specified<BorderWidth>>,
    pub border_top_style: Option<Specified<BorderStyleKeyword>>,
    pub border_bottom_width: Option<Specified<BorderWidth>>,
    pub border_bottom_style: Option<Specified<BorderStyleKeyword>>,
    pub padding_top: Option<Specified<LengthPercentage>>,
    pub padding_bottom: Option<Specified<LengthPercentage>>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InsetsValues {
    pub top: Option<Specified<Inset>>,
    pub right: Option<Specified<Inset>>,
    pub bottom: Option<Specified<Inset>>,
    pub left: Option<Specified<Inset>>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BackgroundValues {
    pub image: Option<Specified<Vec<ImageHandle>>>,
    pub repeat: Option<Specified<BackgroundRepeat>>,
    pub position: Option<Specified<(LengthPercentage, LengthPercentage)>>,
    pub clip: Option<Specified<BackgroundBox>>,
    pub origin: Option<Specified<BackgroundBox>>,
    pub size: Option<Specified<BackgroundSize>>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColorsValues {
    pub color: Option<Specified<Color>>,
    pub background_color: Option<Specified<Color>>,
    pub border_top_color: Option<Specified<Color>>,
    pub border_right_color: Option<Specified<Color>>,
    pub border_bottom_color: Option<Specified<Color>>,
    pub border_left_color: Option<Specified<Color>>,
}

/// Merges `other`'s explicitly-declared fields over `base`'s, field by
/// field. Used both to fold a block's same-importance declaration list
/// (later entries override earlier) and to apply one block's resolved
/// group values onto a `CascadedValues` slot.
pub trait MergeOver {
    fn merge_over(&mut self, other: &Self);
}

macro_rules! impl_merge_over {
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        impl MergeOver for $ty {
            fn merge_over(&mut self, other: &Self) {
                $(
                    if other.$field.is_some() {
                        self.$field = other.$field.clone();
                    }
                )+
            }
        }
    };
}

impl_merge_over!(BoxStyleValues {
    display,
    position,
    z_index,
});
impl_merge_over!(ContentWidthValues {
    width,
    min_width,
    max_width,
});
impl_merge_over!(ContentHeightValues {
    height,
    min_height,
    max_height,
});
impl_merge_over!(HorizontalEdgesValues {
    margin_left,
    margin_right,
    border_left_width,
    border_left_style,
    border_right_width,
    border_right_style,
    padding_left,
    padding_right,
});
impl_merge_over!(VerticalEdgesValues {
    margin_top,
    margin_bottom,
    border_top_width,
    border_top_style,
    border_bottom_width,
    border_bottom_style,
    padding_top,
    padding_bottom,
});
impl_merge_over!(InsetsValues {
    top,
    right,
    bottom,
    left,
});
impl_merge_over!(BackgroundValues {
    image,
    repeat,
    position,
    clip,
    origin,
    size,
});
impl_merge_over!(ColorsValues {
    color,
    background_color,
    border_top_color,
    border_right_color,
    border_bottom_color,
    border_left_color,
});

/// Builds a group-values struct with every field set to the same CSS-wide
/// keyword, for `DeclarationsStore::add_all`.
pub trait AllKeyword {
    fn all(keyword: CssWideKeyword) -> Self;
}

macro_rules! impl_all_keyword {
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        impl AllKeyword for $ty {
            fn all(keyword: CssWideKeyword) -> Self {
                Self {
                    $($field: Some(keyword.into_specified()),)+
                    ..Default::default()
                }
            }
        }
    };
}

impl_all_keyword!(BoxStyleValues {
    display,
    position,
    z_index,
});
impl_all_keyword!(ContentWidthValues {
    width,
    min_width,
    max_width,
});
impl_all_keyword!(ContentHeightValues {
    height,
    min_height,
    max_height,
});
impl_all_keyword!(HorizontalEdgesValues {
    margin_left,
    margin_right,
    border_left_width,
    border_left_style,
    border_right_width,
    border_right_style,
    padding_left,
    padding_right,
});
impl_all_keyword!(VerticalEdgesValues {
    margin_top,
    margin_bottom,
    border_top_width,
    border_top_style,
    border_bottom_width,
    border_bottom_style,
    padding_top,
    padding_bottom,
});
impl_all_keyword!(InsetsValues {
    top,
    right,
    bottom,
    left,
});
impl_all_keyword!(BackgroundValues {
    image,
    repeat,
    position,
    clip,
    origin,
    size,
});
impl_all_keyword!(ColorsValues {
    color,
    background_color,
    border_top_color,
    border_right_color,
    border_bottom_color,
    border_left_color,
});
