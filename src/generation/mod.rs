//! Box generation: element tree -> box tree (spec.md §4.4).
//!
//! Grounded on the teacher's `layout::build_layout_tree` recursive descent
//! (`layout/mod.rs`) over the styled DOM, generalized from an owned
//! `LayoutBox` tree into pushes against `BoxTreeBuilder`'s index-based
//! storage. The descent itself still recurses through Rust's call stack
//! rather than an explicit frame `Vec` — a function call is a perfectly
//! good mode-stack machine, and it is the shape the teacher already uses.

use crate::boxtree::block::{BlockRef, BlockType, BoxOffsets, Point, SubtreeId};
use crate::boxtree::{BoxTree, BoxTreeBuilder, GeneratedBox};
use crate::boxtree::block::Size;
use crate::declarations::values::{LengthPercentageAuto, OuterDisplay, PositionKeyword, ZIndex};
use crate::element_tree::{Category, Element, ElementTree};
use crate::error::Result;
use crate::fonts::{FontHandle, Fonts};
use crate::ifc_builder::{self, IfcBuilder};
use crate::sizing::{self, Resolved, SizeMode};
use crate::style::{compute_values, values::ComputedValues};
use crate::unit::Unit;

/// Scoped state threaded through one `generate()` call: the source tree,
/// the font collaborator, and every absolutely positioned box discovered
/// along the way but not yet sized (spec.md §4.4, §9's deferred-absolute
/// design note).
struct GenerationContext<'a, F: Fonts> {
    tree: &'a ElementTree,
    fonts: &'a F,
    pending_absolutes: Vec<PendingAbsolute>,
}

/// An absolutely positioned box, discovered (and structurally attached via
/// a `SubtreeProxy`) during the main walk, but sized and positioned only
/// once its containing block's content box is final (spec.md §9: "resolved
/// in a single deferred pass after the whole document walk completes").
struct PendingAbsolute {
    element: Element,
    computed: ComputedValues,
    containing_block: BlockRef,
    sct_parent: usize,
}

/// Runs box generation over `tree`, rooted at `root`, against a viewport of
/// `viewport_width` x `viewport_height` device-pixel `Unit`s (spec.md §4.4,
/// §6).
pub fn generate<F: Fonts>(
    tree: &ElementTree,
    root: Element,
    fonts: &F,
    viewport_width: Unit,
    viewport_height: Unit,
) -> Result<BoxTree> {
    let mut builder = BoxTreeBuilder::new();

    let root_subtree = builder.push_subtree(None)?;
    let icb_index = builder
        .subtree_mut(root_subtree)
        .push_block(BlockType::Block, None)?;
    let icb = BlockRef {
        subtree: root_subtree,
        index: icb_index,
    };
    builder.subtree_mut(root_subtree).set_box_offsets(
        icb_index,
        BoxOffsets {
            border_pos: Point::default(),
            border_size: Size {
                width: viewport_width,
                height: viewport_height,
            },
            content_pos: Point::default(),
            content_size: Size {
                width: viewport_width,
                height: viewport_height,
            },
        },
    );
    // The ICB is synthetic (no source element, no declared z-index); its
    // own stacking context is always the SCT root and never sorts against
    // siblings, so `0` is its correct resolved z-index, not a stand-in.
    let sct_root = builder.sct_mut().push(None, icb, 0);
    builder
        .subtree_mut(root_subtree)
        .set_stacking_context(icb_index, builder.sct_mut().node_id(sct_root));

    let mut ctx = GenerationContext {
        tree,
        fonts,
        pending_absolutes: Vec::new(),
    };

    let root_computed = compute_values(tree.cascaded_values(root), None);
    let root_display = effective_display(&root_computed, true);

    if root_display != OuterDisplay::None {
        if root_computed.box_style.position == PositionKeyword::Absolute {
            ctx.pending_absolutes.push(PendingAbsolute {
                element: root,
                computed: root_computed,
                containing_block: icb,
                sct_parent: sct_root,
            });
        } else {
            lay_out_block(
                &mut ctx,
                &mut builder,
                root,
                &root_computed,
                root_subtree,
                viewport_width,
                Some(viewport_height),
                SizeMode::Normal,
                Unit::ZERO,
                sct_root,
            )?;
        }
    }

    let subtree_len = builder.subtree(root_subtree).len() as u16;
    builder
        .subtree_mut(root_subtree)
        .set_skip(icb_index, subtree_len);

    resolve_pending_absolutes(&mut ctx, &mut builder)?;

    log::trace!("generation: done");
    Ok(builder.finish(icb))
}

/// The `z_index` an element's stacking context sorts by (spec.md §3, §4.6).
/// `auto` paints as if `0` were specified but still only applies to a
/// positioned box; callers only invoke this where `position` is already
/// known non-static.
fn resolved_z_index(computed: &ComputedValues) -> i32 {
    match computed.box_style.z_index {
        ZIndex::Integer(z) => z,
        ZIndex::Auto => 0,
    }
}

/// `display` as it actually governs box generation (spec.md §4.4): an
/// absolutely positioned element always generates a block box regardless of
/// its declared `display`, and the root element's own `inline` display is
/// promoted to `block` (there is no parent flow for it to participate in
/// inline).
fn effective_display(computed: &ComputedValues, is_root: bool) -> OuterDisplay {
    if computed.box_style.position == PositionKeyword::Absolute {
        return OuterDisplay::Block;
    }
    if is_root && computed.box_style.display == OuterDisplay::Inline {
        return OuterDisplay::Block;
    }
    computed.box_style.display
}

/// Lays out `element` as a block box at `subtree[?]`, following CSS2 §10's
/// width/height/margin resolution (`sizing::mod`), then recurses into its
/// children in flow. Returns the pushed block's index and its margin-box
/// height, so the caller can stack the next sibling beneath it.
#[allow(clippy::too_many_arguments)]
fn lay_out_block<F: Fonts>(
    ctx: &mut GenerationContext<F>,
    builder: &mut BoxTreeBuilder,
    element: Element,
    computed: &ComputedValues,
    subtree: SubtreeId,
    cb_width: Unit,
    cb_height: Option<Unit>,
    mode: SizeMode,
    y_cursor: Unit,
    sct_parent: usize,
) -> Result<(u16, Unit)> {
    let h = sizing::resolve_horizontal(
        computed.content_width.min_width,
        computed.content_width.max_width,
        computed.content_width.width,
        &computed.horizontal_edges,
        cb_width,
        mode,
    );
    let v = sizing::resolve_vertical(
        computed.content_height.min_height,
        computed.content_height.max_height,
        computed.content_height.height,
        &computed.vertical_edges,
        cb_width,
        cb_height,
        mode,
    );

    let space = cb_width - h.border_left - h.border_right - h.padding_left - h.padding_right;
    let (width, margin_left, margin_right) =
        sizing::adjust_width_and_margins(h.width, h.margin_left, h.margin_right, space);
    let width = sizing::clamp_to_min_max(width, h.min_width, h.max_width);

    let index = builder
        .subtree_mut(subtree)
        .push_block(BlockType::Block, Some(element))?;
    builder.register_box(element, GeneratedBox::Block(BlockRef { subtree, index }));

    let sct_node = if computed.box_style.position != PositionKeyword::Static {
        builder.sct_mut().push(
            Some(sct_parent),
            BlockRef { subtree, index },
            resolved_z_index(computed),
        )
    } else {
        sct_parent
    };
    builder
        .subtree_mut(subtree)
        .set_stacking_context(index, builder.sct_mut().node_id(sct_node));

    let content_height_for_children = match v.height {
        Resolved::Used(used) => Some(sizing::clamp_to_min_max(used, v.min_height, v.max_height)),
        Resolved::Auto => None,
    };

    let containing_block = BlockRef { subtree, index };
    let auto_height_used = lay_out_flow_children(
        ctx,
        builder,
        element,
        computed,
        subtree,
        width,
        content_height_for_children,
        containing_block,
        sct_node,
    )?;

    let content_height = match v.height {
        Resolved::Used(used) => sizing::clamp_to_min_max(used, v.min_height, v.max_height),
        Resolved::Auto => sizing::clamp_to_min_max(auto_height_used, v.min_height, v.max_height),
    };

    let border_size = Size {
        width: width + h.border_left + h.border_right + h.padding_left + h.padding_right,
        height: content_height + v.border_top + v.border_bottom + v.padding_top + v.padding_bottom,
    };

    let is_static = computed.box_style.position == PositionKeyword::Static;
    let insets = sizing::resolve_insets(&computed.insets, is_static, cb_width, cb_height);

    let border_pos = Point {
        x: margin_left,
        y: y_cursor + v.margin_top,
    };
    builder.subtree_mut(subtree).set_box_offsets(
        index,
        BoxOffsets {
            border_pos,
            border_size,
            content_pos: Point {
                x: h.border_left + h.padding_left,
                y: v.border_top + v.padding_top,
            },
            content_size: Size {
                width,
                height: content_height,
            },
        },
    );
    builder.subtree_mut(subtree).set_borders(
        index,
        crate::boxtree::block::Edges {
            top: v.border_top,
            right: h.border_right,
            bottom: v.border_bottom,
            left: h.border_left,
        },
    );
    builder.subtree_mut(subtree).set_margins(
        index,
        crate::boxtree::block::Edges {
            top: v.margin_top,
            right: margin_right,
            bottom: v.margin_bottom,
            left: margin_left,
        },
    );
    builder.subtree_mut(subtree).set_insets(index, insets);

    let relative_shift = if computed.box_style.position == PositionKeyword::Relative {
        Point {
            x: insets
                .left
                .unwrap_or_else(|| insets.right.map(|r| -r).unwrap_or(Unit::ZERO)),
            y: insets
                .top
                .unwrap_or_else(|| insets.bottom.map(|b| -b).unwrap_or(Unit::ZERO)),
        }
    } else {
        Point::default()
    };
    builder.subtree_mut(subtree).set_offset(
        index,
        Point {
            x: border_pos.x + relative_shift.x,
            y: border_pos.y + relative_shift.y,
        },
    );

    let skip = builder.subtree(subtree).len() as u16 - index;
    builder.subtree_mut(subtree).set_skip(index, skip);

    let margin_box_height = v.margin_top + border_size.height + v.margin_bottom;
    Ok((index, margin_box_height))
}

/// Walks `parent`'s children in document order, stacking in-flow block
/// boxes vertically and grouping contiguous inline-level content (text,
/// `inline`, `inline-block`) into one IFC per run (spec.md §4.4). Returns
/// the total stacked height, used as the parent's auto content height.
#[allow(clippy::too_many_arguments)]
fn lay_out_flow_children<F: Fonts>(
    ctx: &mut GenerationContext<F>,
    builder: &mut BoxTreeBuilder,
    parent: Element,
    parent_computed: &ComputedValues,
    subtree: SubtreeId,
    cb_width: Unit,
    cb_height: Option<Unit>,
    containing_block: BlockRef,
    sct_parent: usize,
) -> Result<Unit> {
    let children: Vec<Element> = ctx.tree.children(parent).collect();
    let mut i = 0;
    let mut y_cursor = Unit::ZERO;

    while i < children.len() {
        let child = children[i];

        if ctx.tree.category(child) == Category::Text {
            let end = find_run_end(ctx, &children, i, parent_computed);
            let height = lay_out_inline_run(
                ctx,
                builder,
                &children[i..end],
                parent_computed,
                subtree,
                cb_width,
                containing_block,
                sct_parent,
                y_cursor,
            )?;
            y_cursor += height;
            i = end;
            continue;
        }

        let computed = compute_values(ctx.tree.cascaded_values(child), Some(parent_computed));

        if computed.box_style.position == PositionKeyword::Absolute {
            ctx.pending_absolutes.push(PendingAbsolute {
                element: child,
                computed,
                containing_block,
                sct_parent,
            });
            i += 1;
            continue;
        }

        match effective_display(&computed, false) {
            OuterDisplay::None => {
                i += 1;
            }
            OuterDisplay::Block => {
                let (_, margin_box_height) = lay_out_block(
                    ctx,
                    builder,
                    child,
                    &computed,
                    subtree,
                    cb_width,
                    cb_height,
                    SizeMode::Normal,
                    y_cursor,
                    sct_parent,
                )?;
                y_cursor += margin_box_height;
                i += 1;
            }
            OuterDisplay::Inline | OuterDisplay::InlineBlock => {
                let end = find_run_end(ctx, &children, i, parent_computed);
                let height = lay_out_inline_run(
                    ctx,
                    builder,
                    &children[i..end],
                    parent_computed,
                    subtree,
                    cb_width,
                    containing_block,
                    sct_parent,
                    y_cursor,
                )?;
                y_cursor += height;
                i = end;
            }
        }
    }

    Ok(y_cursor)
}

/// Finds the end (exclusive) of the contiguous inline-level run starting at
/// `start`: text nodes and `inline`/`inline-block` elements, stopping at the
/// first `display: block` child or the end of the list.
fn find_run_end<F: Fonts>(
    ctx: &GenerationContext<F>,
    children: &[Element],
    start: usize,
    parent_computed: &ComputedValues,
) -> usize {
    let mut j = start;
    while j < children.len() {
        let el = children[j];
        match ctx.tree.category(el) {
            Category::Text => j += 1,
            Category::Element => {
                let computed = compute_values(ctx.tree.cascaded_values(el), Some(parent_computed));
                if computed.box_style.position == PositionKeyword::Absolute {
                    j += 1;
                    continue;
                }
                match effective_display(&computed, false) {
                    OuterDisplay::Inline | OuterDisplay::InlineBlock => j += 1,
                    _ => break,
                }
            }
        }
    }
    j
}

/// Per-run state: which IFC/ifc-container block is currently receiving
/// tokens, and the vertical cursor within the run (advances on every
/// finalized IFC segment or interstitial block, spec.md §4.5).
struct InlineRunState {
    current_ifc: u32,
    current_ifc_block: u16,
    local_cursor: Unit,
}

#[allow(clippy::too_many_arguments)]
fn lay_out_inline_run<F: Fonts>(
    ctx: &mut GenerationContext<F>,
    builder: &mut BoxTreeBuilder,
    items: &[Element],
    parent_computed: &ComputedValues,
    subtree: SubtreeId,
    cb_width: Unit,
    containing_block: BlockRef,
    sct_parent: usize,
    y_start: Unit,
) -> Result<Unit> {
    let (ifc_id, block_index) = open_ifc(builder, subtree, ctx.fonts, parent_computed, sct_parent)?;
    let mut ifcb = IfcBuilder::new();
    let mut state = InlineRunState {
        current_ifc: ifc_id,
        current_ifc_block: block_index,
        local_cursor: y_start,
    };

    for &item in items {
        lay_out_inline_item(
            ctx,
            builder,
            &mut ifcb,
            &mut state,
            item,
            parent_computed,
            subtree,
            cb_width,
            containing_block,
            sct_parent,
        )?;
    }

    let height = finalize_ifc(
        builder,
        subtree,
        state.current_ifc,
        state.current_ifc_block,
        cb_width,
        state.local_cursor,
    );
    state.local_cursor += height;

    Ok(state.local_cursor - y_start)
}

/// Lays out one inline-level item into the IFC `state` currently points at:
/// a text run, a nested inline box (recursing into its own children), an
/// inline-block (laid out in shrink-to-fit and referenced via a `Special`),
/// or a block box interrupting inline content (CSS2 §9.2.1.1 split, spec.md
/// §4.5).
#[allow(clippy::too_many_arguments)]
fn lay_out_inline_item<F: Fonts>(
    ctx: &mut GenerationContext<F>,
    builder: &mut BoxTreeBuilder,
    ifcb: &mut IfcBuilder,
    state: &mut InlineRunState,
    element: Element,
    parent_computed: &ComputedValues,
    subtree: SubtreeId,
    cb_width: Unit,
    containing_block: BlockRef,
    sct_parent: usize,
) -> Result<()> {
    if ctx.tree.category(element) == Category::Text {
        let text = ctx.tree.text(element).unwrap_or("");
        let font = ctx.fonts.get(FontHandle(0));
        ifcb.push_text_run(builder.ifc_mut(state.current_ifc), ctx.fonts, font, text);
        builder.register_box(element, GeneratedBox::Text { ifc: state.current_ifc });
        return Ok(());
    }

    let computed = compute_values(ctx.tree.cascaded_values(element), Some(parent_computed));

    if computed.box_style.position == PositionKeyword::Absolute {
        ctx.pending_absolutes.push(PendingAbsolute {
            element,
            computed,
            containing_block,
            sct_parent,
        });
        return Ok(());
    }

    match effective_display(&computed, false) {
        OuterDisplay::None => Ok(()),
        OuterDisplay::Inline => {
            let props = inline_box_properties(&computed, cb_width);
            let index = ifcb.enter_inline_box(builder.ifc_mut(state.current_ifc), props)?;
            builder.register_box(
                element,
                GeneratedBox::InlineBox {
                    ifc: state.current_ifc,
                    inline_index: index,
                },
            );
            for child in ctx.tree.children(element).collect::<Vec<_>>() {
                lay_out_inline_item(
                    ctx,
                    builder,
                    ifcb,
                    state,
                    child,
                    &computed,
                    subtree,
                    cb_width,
                    containing_block,
                    sct_parent,
                )?;
            }
            ifcb.exit_inline_box(builder.ifc_mut(state.current_ifc));
            Ok(())
        }
        OuterDisplay::InlineBlock => {
            let (index, _) = lay_out_block(
                ctx,
                builder,
                element,
                &computed,
                subtree,
                cb_width,
                None,
                SizeMode::ShrinkToFit,
                Unit::ZERO,
                sct_parent,
            )?;
            ifcb.emit_inline_block(builder.ifc_mut(state.current_ifc), index);
            Ok(())
        }
        OuterDisplay::Block => {
            // The preceding inline segment's height must be folded into the
            // cursor before the interrupting block is positioned (CSS2
            // §9.2.1.1): otherwise the block lands at the inline segment's
            // own start instead of below it.
            let h = finalize_ifc(
                builder,
                subtree,
                state.current_ifc,
                state.current_ifc_block,
                cb_width,
                state.local_cursor,
            );
            state.local_cursor += h;

            let (index, margin_box_height) = lay_out_block(
                ctx,
                builder,
                element,
                &computed,
                subtree,
                cb_width,
                None,
                SizeMode::Normal,
                state.local_cursor,
                sct_parent,
            )?;
            ifcb.split_for_block(builder.ifc_mut(state.current_ifc), index);
            state.local_cursor += margin_box_height;

            let (new_ifc, new_block) =
                open_ifc(builder, subtree, ctx.fonts, parent_computed, sct_parent)?;
            ifcb.reopen_in_new_ifc(builder.ifc_mut(new_ifc))?;
            state.current_ifc = new_ifc;
            state.current_ifc_block = new_block;
            Ok(())
        }
    }
}

/// Opens a fresh IFC plus its `IfcContainer` block, and registers the IFC
/// with the enclosing stacking context (spec.md §4.4, §4.6).
fn open_ifc<F: Fonts>(
    builder: &mut BoxTreeBuilder,
    subtree: SubtreeId,
    fonts: &F,
    context_computed: &ComputedValues,
    sct_parent: usize,
) -> Result<(u32, u16)> {
    let font = fonts.get(FontHandle(0));
    let ascender = fonts.ascender(font);
    let descender = fonts.descender(font);
    let ifc_id = builder.push_ifc(context_computed.colors.color, ascender, descender)?;
    let block_index = builder
        .subtree_mut(subtree)
        .push_block(BlockType::IfcContainer(ifc_id), None)?;
    builder.sct_mut().add_ifc(sct_parent, ifc_id);
    Ok((ifc_id, block_index))
}

/// Runs line-breaking over `ifc_id`'s finished token stream, writes its
/// `IfcContainer` block's geometry (a simplified single-column stack of
/// lines; real line/float interaction is out of this engine's scope), and
/// returns the height consumed.
fn finalize_ifc(
    builder: &mut BoxTreeBuilder,
    subtree: SubtreeId,
    ifc_id: u32,
    block_index: u16,
    cb_width: Unit,
    y: Unit,
) -> Unit {
    ifc_builder::break_lines(builder.ifc_mut(ifc_id), cb_width);

    let ifc = builder.ifc_mut(ifc_id);
    let line_height = ifc.ascender + ifc.descender;
    let lines = ifc.line_boxes().len().max(1) as i32;
    let height = line_height * lines;

    builder
        .subtree_mut(subtree)
        .set_offset(block_index, Point { x: Unit::ZERO, y });
    builder.subtree_mut(subtree).set_box_offsets(
        block_index,
        BoxOffsets {
            border_pos: Point { x: Unit::ZERO, y },
            border_size: Size {
                width: cb_width,
                height,
            },
            content_pos: Point::default(),
            content_size: Size {
                width: cb_width,
                height,
            },
        },
    );
    builder.subtree_mut(subtree).set_skip(block_index, 1);
    height
}

/// Builds an `InlineBox`'s edge properties from computed style (spec.md
/// §4.5): border/padding resolved the same way a block's edges are,
/// mapping physical left/right onto inline-start/end (no vertical writing
/// modes, spec.md's Non-goals).
fn inline_box_properties(computed: &ComputedValues, cb_width: Unit) -> crate::boxtree::ifc::InlineBox {
    use crate::boxtree::ifc::BoxProperties;

    let he = &computed.horizontal_edges;
    let ve = &computed.vertical_edges;
    let colors = &computed.colors;
    let is_static = computed.box_style.position != PositionKeyword::Relative;
    let insets = sizing::resolve_insets(&computed.insets, is_static, cb_width, None);

    let margin_inline_start = match sizing::resolve_margin(he.margin_left, cb_width, SizeMode::Normal) {
        Resolved::Used(u) => u,
        Resolved::Auto => Unit::ZERO,
    };
    let margin_inline_end = match sizing::resolve_margin(he.margin_right, cb_width, SizeMode::Normal) {
        Resolved::Used(u) => u,
        Resolved::Auto => Unit::ZERO,
    };

    crate::boxtree::ifc::InlineBox {
        inline_start: BoxProperties {
            border: sizing::resolve_border_width(he.border_left_width, he.border_left_style),
            padding: sizing::resolve_padding(he.padding_left, cb_width),
            border_color: colors.border_left_color,
        },
        inline_end: BoxProperties {
            border: sizing::resolve_border_width(he.border_right_width, he.border_right_style),
            padding: sizing::resolve_padding(he.padding_right, cb_width),
            border_color: colors.border_right_color,
        },
        block_start: BoxProperties {
            border: sizing::resolve_border_width(ve.border_top_width, ve.border_top_style),
            padding: sizing::resolve_padding(ve.padding_top, cb_width),
            border_color: colors.border_top_color,
        },
        block_end: BoxProperties {
            border: sizing::resolve_border_width(ve.border_bottom_width, ve.border_bottom_style),
            padding: sizing::resolve_padding(ve.padding_bottom, cb_width),
            border_color: colors.border_bottom_color,
        },
        background: colors.background_color,
        margin_inline_start,
        margin_inline_end,
        insets,
    }
}

/// Second pass (spec.md §9): now that every containing block's content box
/// is final, size and position each deferred absolutely positioned box
/// against it, laying out its own content into the subtree that was
/// already attached via `SubtreeProxy` at discovery time.
fn resolve_pending_absolutes<F: Fonts>(
    ctx: &mut GenerationContext<F>,
    builder: &mut BoxTreeBuilder,
) -> Result<()> {
    let pending = std::mem::take(&mut ctx.pending_absolutes);

    for abs in pending {
        let cb_box = builder
            .subtree(abs.containing_block.subtree)
            .box_offsets(abs.containing_block.index);
        let cb_width = cb_box.content_size.width;
        let cb_height = Some(cb_box.content_size.height);

        let subtree_id = builder.push_subtree(Some(abs.containing_block))?;
        let proxy_index = builder
            .subtree_mut(abs.containing_block.subtree)
            .push_block(BlockType::SubtreeProxy(subtree_id), None)?;
        builder
            .subtree_mut(abs.containing_block.subtree)
            .set_skip(proxy_index, 1);

        let mode = if abs.computed.content_width.width == LengthPercentageAuto::Auto {
            SizeMode::ShrinkToFit
        } else {
            SizeMode::Normal
        };

        let (index, _) = lay_out_block(
            ctx,
            builder,
            abs.element,
            &abs.computed,
            subtree_id,
            cb_width,
            cb_height,
            mode,
            Unit::ZERO,
            abs.sct_parent,
        )?;

        let insets = sizing::resolve_insets(&abs.computed.insets, false, cb_width, cb_height);
        let x = insets.left.unwrap_or(Unit::ZERO);
        let y = insets.top.unwrap_or(Unit::ZERO);

        let mut offsets = builder.subtree(subtree_id).box_offsets(index);
        offsets.border_pos = Point { x, y };
        builder.subtree_mut(subtree_id).set_box_offsets(index, offsets);
        builder.subtree_mut(subtree_id).set_offset(index, Point { x, y });

        let margins = builder.subtree(subtree_id).margins(index);
        builder.subtree_mut(abs.containing_block.subtree).set_box_offsets(
            proxy_index,
            BoxOffsets {
                border_pos: Point { x, y },
                border_size: Size {
                    width: offsets.border_size.width + margins.left + margins.right,
                    height: offsets.border_size.height + margins.top + margins.bottom,
                },
                content_pos: offsets.content_pos,
                content_size: offsets.content_size,
            },
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declarations::values::{BorderStyleKeyword, BorderWidth, Color, LengthPercentage, Specified};
    use crate::element_tree::{Placement};
    use crate::fonts::NullFonts;

    fn color(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b, a: 255 }
    }

    #[test]
    fn s1_display_none_root_produces_only_the_icb() {
        let mut tree = ElementTree::new();
        let root = tree.allocate_elements(1).unwrap()[0];
        tree.init_element(root, Category::Element, Placement::Orphan);
        tree.cascaded_values_mut(root).box_style.display = Some(Specified::Value(OuterDisplay::None));

        let fonts = NullFonts;
        let (w, h) = crate::unit::viewport_units(100, 50).unwrap();
        let box_tree = generate(&tree, root, &fonts, w, h).unwrap();

        assert_eq!(box_tree.subtree_count(), 1);
        let st = box_tree.subtree(0);
        assert_eq!(st.len(), 1);
        assert_eq!(st.skip_at(0), 1);
        assert_eq!(st.box_offsets(0).border_size, Size { width: w, height: h });
    }

    #[test]
    fn s2_fixed_width_with_auto_margins_centers_in_viewport() {
        let mut tree = ElementTree::new();
        let root = tree.allocate_elements(1).unwrap()[0];
        tree.init_element(root, Category::Element, Placement::Orphan);
        let cascaded = tree.cascaded_values_mut(root);
        cascaded.box_style.display = Some(Specified::Value(OuterDisplay::Block));
        cascaded.content_width.width = Some(Specified::Value(LengthPercentageAuto::LengthPercentage(
            LengthPercentage::Px(Unit::from_px(100).unwrap()),
        )));
        cascaded.horizontal_edges.margin_left = Some(Specified::Value(LengthPercentageAuto::Auto));
        cascaded.horizontal_edges.margin_right = Some(Specified::Value(LengthPercentageAuto::Auto));

        let fonts = NullFonts;
        let (w, h) = crate::unit::viewport_units(300, 100).unwrap();
        let box_tree = generate(&tree, root, &fonts, w, h).unwrap();

        let st = box_tree.subtree(0);
        assert_eq!(st.len(), 2);
        assert_eq!(st.skip_at(0), 2);
        assert_eq!(st.skip_at(1), 1);

        let child = st.box_offsets(1);
        assert_eq!(child.content_size.width, Unit::from_px(100).unwrap());
        assert_eq!(child.border_pos.x, Unit::from_px(100).unwrap());
        assert_eq!(child.border_pos.y, Unit::ZERO);
    }

    #[test]
    fn s3_min_max_clamp_enforced_end_to_end() {
        let mut tree = ElementTree::new();
        let root = tree.allocate_elements(1).unwrap()[0];
        tree.init_element(root, Category::Element, Placement::Orphan);
        let cascaded = tree.cascaded_values_mut(root);
        cascaded.box_style.display = Some(Specified::Value(OuterDisplay::Block));
        cascaded.content_width.width = Some(Specified::Value(LengthPercentageAuto::LengthPercentage(
            LengthPercentage::Px(Unit::from_px(50).unwrap()),
        )));
        cascaded.content_width.min_width =
            Some(Specified::Value(LengthPercentage::Px(Unit::from_px(100).unwrap())));

        let fonts = NullFonts;
        let (w, h) = crate::unit::viewport_units(300, 100).unwrap();
        let box_tree = generate(&tree, root, &fonts, w, h).unwrap();

        let st = box_tree.subtree(0);
        assert_eq!(st.box_offsets(1).content_size.width, Unit::from_px(100).unwrap());
    }

    #[test]
    fn display_none_child_is_skipped_with_no_descendants() {
        let mut tree = ElementTree::new();
        let root = tree.allocate_elements(1).unwrap()[0];
        tree.init_element(root, Category::Element, Placement::Orphan);
        tree.cascaded_values_mut(root).box_style.display = Some(Specified::Value(OuterDisplay::Block));

        let hidden = tree.allocate_elements(1).unwrap()[0];
        tree.init_element(hidden, Category::Element, Placement::LastChildOf(root));
        tree.cascaded_values_mut(hidden).box_style.display = Some(Specified::Value(OuterDisplay::None));

        let grandchild = tree.allocate_elements(1).unwrap()[0];
        tree.init_element(grandchild, Category::Element, Placement::LastChildOf(hidden));

        let fonts = NullFonts;
        let (w, h) = crate::unit::viewport_units(100, 100).unwrap();
        let box_tree = generate(&tree, root, &fonts, w, h).unwrap();

        let st = box_tree.subtree(0);
        assert_eq!(st.len(), 2);
        assert!(box_tree.generated_box(hidden).is_none());
        assert!(box_tree.generated_box(grandchild).is_none());
    }

    #[test]
    fn s5_inline_break_across_block_splits_and_reopens_the_ifc() {
        let mut tree = ElementTree::new();
        let root = tree.allocate_elements(1).unwrap()[0];
        tree.init_element(root, Category::Element, Placement::Orphan);
        tree.cascaded_values_mut(root).box_style.display = Some(Specified::Value(OuterDisplay::Block));

        let span = tree.allocate_elements(1).unwrap()[0];
        tree.init_element(span, Category::Element, Placement::LastChildOf(root));
        tree.cascaded_values_mut(span).box_style.display = Some(Specified::Value(OuterDisplay::Inline));

        let text_a = tree.allocate_elements(1).unwrap()[0];
        tree.init_element(text_a, Category::Text, Placement::LastChildOf(span));
        tree.set_text(text_a, "A".to_string());

        let div = tree.allocate_elements(1).unwrap()[0];
        tree.init_element(div, Category::Element, Placement::LastChildOf(span));
        tree.cascaded_values_mut(div).box_style.display = Some(Specified::Value(OuterDisplay::Block));

        let text_b = tree.allocate_elements(1).unwrap()[0];
        tree.init_element(text_b, Category::Text, Placement::LastChildOf(span));
        tree.set_text(text_b, "B".to_string());

        let fonts = NullFonts;
        let (w, h) = crate::unit::viewport_units(200, 200).unwrap();
        let box_tree = generate(&tree, root, &fonts, w, h).unwrap();

        assert_eq!(box_tree.ifc_count(), 2);

        use crate::boxtree::ifc::{SpecialKind, Token};
        let first = box_tree.ifc(0);
        assert!(matches!(
            first.tokens()[0],
            Token::Special(s) if s.kind == SpecialKind::BoxStart
        ));
        assert!(matches!(
            first.tokens().last().unwrap(),
            Token::Special(s) if s.kind == SpecialKind::BoxEnd
        ));
        assert!(first
            .tokens()
            .iter()
            .any(|t| matches!(t, Token::Special(s) if s.kind == SpecialKind::ContinuationBlock)));

        let second = box_tree.ifc(1);
        assert!(matches!(
            second.tokens()[0],
            Token::Special(s) if s.kind == SpecialKind::BoxStart
        ));
        assert!(matches!(
            second.tokens().last().unwrap(),
            Token::Special(s) if s.kind == SpecialKind::BoxEnd
        ));
    }

    #[test]
    fn absolute_child_gets_a_proxied_subtree_and_round_trips() {
        let mut tree = ElementTree::new();
        let root = tree.allocate_elements(1).unwrap()[0];
        tree.init_element(root, Category::Element, Placement::Orphan);
        tree.cascaded_values_mut(root).box_style.display = Some(Specified::Value(OuterDisplay::Block));

        let positioned = tree.allocate_elements(1).unwrap()[0];
        tree.init_element(positioned, Category::Element, Placement::LastChildOf(root));
        let cascaded = tree.cascaded_values_mut(positioned);
        cascaded.box_style.position = Some(Specified::Value(PositionKeyword::Absolute));
        cascaded.content_width.width = Some(Specified::Value(LengthPercentageAuto::LengthPercentage(
            LengthPercentage::Px(Unit::from_px(20).unwrap()),
        )));

        let fonts = NullFonts;
        let (w, h) = crate::unit::viewport_units(100, 100).unwrap();
        let box_tree = generate(&tree, root, &fonts, w, h).unwrap();

        assert_eq!(box_tree.subtree_count(), 2);
        match box_tree.generated_box(positioned) {
            Some(GeneratedBox::Block(r)) => {
                assert_eq!(r.subtree, 1);
                assert!(box_tree.block_round_trips(r.subtree, r.index));
            }
            other => panic!("expected a block, got {:?}", other),
        }
    }

    #[test]
    fn cascaded_border_and_color_reach_the_finished_block() {
        let mut tree = ElementTree::new();
        let root = tree.allocate_elements(1).unwrap()[0];
        tree.init_element(root, Category::Element, Placement::Orphan);
        let cascaded = tree.cascaded_values_mut(root);
        cascaded.box_style.display = Some(Specified::Value(OuterDisplay::Block));
        cascaded.horizontal_edges.border_left_width =
            Some(Specified::Value(BorderWidth::Px(Unit::from_px(2).unwrap())));
        cascaded.horizontal_edges.border_left_style = Some(Specified::Value(BorderStyleKeyword::Solid));
        cascaded.colors.border_left_color = Some(Specified::Value(color(255, 0, 0)));

        let fonts = NullFonts;
        let (w, h) = crate::unit::viewport_units(100, 100).unwrap();
        let box_tree = generate(&tree, root, &fonts, w, h).unwrap();

        let st = box_tree.subtree(0);
        assert_eq!(st.borders(1).left, Unit::from_px(2).unwrap());
    }
}
