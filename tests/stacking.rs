//! Stacking-context sibling ordering (spec.md §8 property 7 / S6): siblings
//! sort by `z_index` ascending, ties breaking to document order.

use zss::declarations::values::{OuterDisplay, PositionKeyword, Specified, ZIndex};
use zss::element_tree::{Category, ElementTree, Placement};
use zss::fonts::NullFonts;
use zss::images::NullImages;
use zss::{run, Environment};

fn positioned_child(tree: &mut ElementTree, parent: zss::element_tree::Element, z_index: i32) {
    let child = tree.allocate_elements(1).unwrap()[0];
    tree.init_element(child, Category::Element, Placement::LastChildOf(parent));
    let cascaded = tree.cascaded_values_mut(child);
    cascaded.box_style.display = Some(Specified::Value(OuterDisplay::Block));
    cascaded.box_style.position = Some(Specified::Value(PositionKeyword::Absolute));
    cascaded.box_style.z_index = Some(Specified::Value(ZIndex::Integer(z_index)));
}

#[test]
fn three_positioned_siblings_sort_by_z_index() {
    let mut tree = ElementTree::new();
    let root = tree.allocate_elements(1).unwrap()[0];
    tree.init_element(root, Category::Element, Placement::Orphan);
    tree.cascaded_values_mut(root).box_style.display = Some(Specified::Value(OuterDisplay::Block));

    positioned_child(&mut tree, root, -1);
    positioned_child(&mut tree, root, 0);
    positioned_child(&mut tree, root, 2);

    let fonts = NullFonts;
    let images = NullImages;
    let environment = Environment {
        tree: &tree,
        fonts: &fonts,
        images: &images,
    };
    let box_tree = run(&environment, root, 200, 200).unwrap();

    let sct = box_tree.sct();
    let order: Vec<i32> = sct.children_of(0).map(|c| sct.z_index_at(c)).collect();
    assert_eq!(order, vec![-1, 0, 2]);
}

#[test]
fn negative_z_index_sibling_sorts_below_the_parents_own_content() {
    // z_index < 0 means "paints below the establishing context's own
    // content"; since the ICB's own stacking context is always the SCT
    // root (z=0) a negative sibling must sort strictly before its
    // higher-z-index siblings among the root's children.
    let mut tree = ElementTree::new();
    let root = tree.allocate_elements(1).unwrap()[0];
    tree.init_element(root, Category::Element, Placement::Orphan);
    tree.cascaded_values_mut(root).box_style.display = Some(Specified::Value(OuterDisplay::Block));

    positioned_child(&mut tree, root, 2);
    positioned_child(&mut tree, root, -1);

    let fonts = NullFonts;
    let images = NullImages;
    let environment = Environment {
        tree: &tree,
        fonts: &fonts,
        images: &images,
    };
    let box_tree = run(&environment, root, 200, 200).unwrap();

    let sct = box_tree.sct();
    let first_child = sct.children_of(0).next().unwrap();
    assert_eq!(sct.z_index_at(first_child), -1);
}

#[test]
fn declared_z_index_auto_sorts_as_zero() {
    let mut tree = ElementTree::new();
    let root = tree.allocate_elements(1).unwrap()[0];
    tree.init_element(root, Category::Element, Placement::Orphan);
    tree.cascaded_values_mut(root).box_style.display = Some(Specified::Value(OuterDisplay::Block));

    let positioned = tree.allocate_elements(1).unwrap()[0];
    tree.init_element(positioned, Category::Element, Placement::LastChildOf(root));
    let cascaded = tree.cascaded_values_mut(positioned);
    cascaded.box_style.display = Some(Specified::Value(OuterDisplay::Block));
    cascaded.box_style.position = Some(Specified::Value(PositionKeyword::Absolute));
    cascaded.box_style.z_index = Some(Specified::Value(ZIndex::Auto));

    positioned_child(&mut tree, root, -3);

    let fonts = NullFonts;
    let images = NullImages;
    let environment = Environment {
        tree: &tree,
        fonts: &fonts,
        images: &images,
    };
    let box_tree = run(&environment, root, 200, 200).unwrap();

    let sct = box_tree.sct();
    let order: Vec<i32> = sct.children_of(0).map(|c| sct.z_index_at(c)).collect();
    assert_eq!(order, vec![-3, 0]);
}
