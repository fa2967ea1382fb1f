//! A CSS layout engine: styled element trees to a geometric box tree
//! (spec.md §1, §2).
//!
//! `run()` is the library's single entry point: given an already-cascaded
//! element tree, a viewport, and the font/image collaborators, it produces
//! a fresh `boxtree::BoxTree` (spec.md §6). Cascading itself is a separate,
//! earlier step — see `cascade::run_cascade` — since the element tree's
//! cascaded values are expected to already be current by the time `run()`
//! is called (spec.md §3: "Lifecycle... cascaded values are (re)written by
//! the cascade engine").

pub mod boxtree;
pub mod cascade;
pub mod cosmetic;
pub mod declarations;
pub mod element_tree;
pub mod error;
pub mod fonts;
pub mod generation;
pub mod ifc_builder;
pub mod images;
pub mod sizing;
pub mod style;
pub mod unit;

use boxtree::BoxTree;
use element_tree::{Element, ElementTree};
use error::Result;
use fonts::Fonts;
use images::Images;

/// The read-only collaborators `run()` borrows for one layout pass (spec.md
/// §6's "environment"). The element tree must already carry current
/// cascaded values.
pub struct Environment<'a, F: Fonts, I: Images> {
    pub tree: &'a ElementTree,
    pub fonts: &'a F,
    pub images: &'a I,
}

/// Runs box generation followed by the cosmetic pass over `root`'s subtree
/// against a `width_px` x `height_px` viewport (spec.md §4.4, §4.7, §6).
///
/// On any error the caller gets nothing back: this function never returns
/// a partially built `BoxTree` (spec.md §7's "any failure aborts `run()`,
/// leaving the Environment unmodified").
pub fn run<F: Fonts, I: Images>(
    environment: &Environment<F, I>,
    root: Element,
    width_px: i32,
    height_px: i32,
) -> Result<BoxTree> {
    let (viewport_width, viewport_height) = unit::viewport_units(width_px, height_px)?;

    let mut box_tree = generation::generate(
        environment.tree,
        root,
        environment.fonts,
        viewport_width,
        viewport_height,
    )?;

    cosmetic::run(environment.tree, root, environment.images, &mut box_tree);

    Ok(box_tree)
}
