//! The cascade engine: prioritized sources -> per-element cascaded values
//! (spec.md §3 "Cascade list", §4.2).
//!
//! Selector *matching* (not parsing — selector syntax is as out of scope as
//! any other CSS syntax, spec.md §1) is modeled behind a small `Matcher`
//! trait rather than re-hosting a selector engine; see `DESIGN.md`'s note on
//! the dropped `selectors`/`cssparser` dependencies.

use crate::declarations::DeclarationsStore;
use crate::element_tree::{CascadedValues, Element, ElementTree};
use std::collections::HashMap;

pub use crate::declarations::{BlockId, Importance};

/// Where a cascade source came from, fixing its precedence band (spec.md
/// §3: "Three ordered sequences (`user`, `author`, `user_agent`)").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    User,
    Author,
    UserAgent,
}

/// Matches an already-parsed selector against an element during cascade
/// traversal. Implementations are supplied by the caller (the zml/
/// stylesheet-loader collaborator); this crate only consumes them.
pub trait Matcher {
    fn matches(&self, tree: &ElementTree, element: Element) -> bool;
}

/// A style-attribute declaration block split by importance, keyed per
/// element (spec.md §3: "a source carries per-element style-attribute
/// blocks (important and normal)").
#[derive(Clone, Copy, Debug, Default)]
pub struct StyleAttributeBlocks {
    pub important: Option<BlockId>,
    pub normal: Option<BlockId>,
}

/// One leaf of a cascade list: style attributes plus selector-matched
/// blocks, both already sorted by cascade order within their importance
/// (spec.md §3).
pub struct CascadeSource {
    pub style_attributes: HashMap<Element, StyleAttributeBlocks>,
    pub selectors_important: Vec<(Box<dyn Matcher>, BlockId)>,
    pub selectors_normal: Vec<(Box<dyn Matcher>, BlockId)>,
}

impl CascadeSource {
    pub fn new() -> Self {
        CascadeSource {
            style_attributes: HashMap::new(),
            selectors_important: Vec::new(),
            selectors_normal: Vec::new(),
        }
    }

    fn selectors(&self, importance: Importance) -> &[(Box<dyn Matcher>, BlockId)] {
        match importance {
            Importance::Important => &self.selectors_important,
            Importance::Normal => &self.selectors_normal,
        }
    }
}

impl Default for CascadeSource {
    fn default() -> Self {
        Self::new()
    }
}

/// A node in a cascade list: either a leaf pointing at a source, or an
/// inner node holding a further ordered sequence (spec.md §3). "Order
/// within a sequence is higher cascade order first."
pub enum CascadeNode {
    Leaf(CascadeSource),
    Inner(Vec<CascadeNode>),
}

/// The three origin sequences the cascade traverses (spec.md §3, §4.2).
#[derive(Default)]
pub struct CascadeList {
    pub user: Vec<CascadeNode>,
    pub author: Vec<CascadeNode>,
    pub user_agent: Vec<CascadeNode>,
}

impl CascadeList {
    pub fn new() -> Self {
        Self::default()
    }

    fn nodes_for(&self, origin: Origin) -> &[CascadeNode] {
        match origin {
            Origin::User => &self.user,
            Origin::Author => &self.author,
            Origin::UserAgent => &self.user_agent,
        }
    }
}

/// Fixed six-phase traversal order (spec.md §4.2 step 1).
const PHASES: [(Origin, Importance); 6] = [
    (Origin::UserAgent, Importance::Important),
    (Origin::User, Importance::Important),
    (Origin::Author, Importance::Important),
    (Origin::Author, Importance::Normal),
    (Origin::User, Importance::Normal),
    (Origin::UserAgent, Importance::Normal),
];

/// Runs the cascade over `document_root`'s subtree, writing freshly
/// resolved cascaded values onto every element visited (spec.md §4.2).
///
/// Traversal and matching are pure; the only runtime failure a real
/// implementation can hit here is allocator exhaustion (spec.md §4.2,
/// "out-of-memory is the only runtime failure"), which the accumulator
/// below does not need to model explicitly since it only grows `Vec`s the
/// caller already budgeted for via `ElementTree::allocate_elements`.
pub fn run_cascade(
    cascade_list: &CascadeList,
    declarations: &DeclarationsStore,
    tree: &mut ElementTree,
    document_root: Element,
) {
    log::trace!("cascade: starting six-phase traversal");
    let mut accumulated: HashMap<Element, Vec<(BlockId, Importance)>> = HashMap::new();

    for (origin, importance) in PHASES {
        visit_nodes(
            cascade_list.nodes_for(origin),
            origin,
            importance,
            tree,
            document_root,
            &mut accumulated,
        );
    }

    for (element, entries) in accumulated {
        if !tree.is_alive(element) {
            continue;
        }
        let cascaded = tree.cascaded_values_mut(element);
        cascaded.clear();
        for (block, importance) in entries {
            apply_block(declarations, block, importance, cascaded);
        }
    }
    log::trace!("cascade: done");
}

fn visit_nodes(
    nodes: &[CascadeNode],
    origin: Origin,
    importance: Importance,
    tree: &ElementTree,
    document_root: Element,
    accumulated: &mut HashMap<Element, Vec<(BlockId, Importance)>>,
) {
    for node in nodes {
        match node {
            CascadeNode::Inner(children) => {
                visit_nodes(children, origin, importance, tree, document_root, accumulated);
            }
            CascadeNode::Leaf(source) => {
                if origin == Origin::Author {
                    for (&element, blocks) in &source.style_attributes {
                        let block = match importance {
                            Importance::Important => blocks.important,
                            Importance::Normal => blocks.normal,
                        };
                        if let Some(block) = block {
                            accumulated
                                .entry(element)
                                .or_default()
                                .push((block, importance));
                        }
                    }
                } else if !source.style_attributes.is_empty() {
                    // Invariant (spec.md §4.2): only author sources carry
                    // style attributes. Input that violates this is
                    // ambiguous, not fatal (spec.md §7): log and ignore.
                    log::warn!(
                        "cascade: ignoring style-attribute blocks on a non-author source ({:?})",
                        origin
                    );
                }

                for (matcher, block) in source.selectors(importance) {
                    for element in tree.pre_order(document_root) {
                        if matcher.matches(tree, element) {
                            accumulated
                                .entry(element)
                                .or_default()
                                .push((*block, importance));
                        }
                    }
                }
            }
        }
    }
}

fn apply_block(
    declarations: &DeclarationsStore,
    block: BlockId,
    importance: Importance,
    out: &mut CascadedValues,
) {
    declarations.apply_box_style(block, importance, &mut out.box_style);
    declarations.apply_content_width(block, importance, &mut out.content_width);
    declarations.apply_content_height(block, importance, &mut out.content_height);
    declarations.apply_horizontal_edges(block, importance, &mut out.horizontal_edges);
    declarations.apply_vertical_edges(block, importance, &mut out.vertical_edges);
    declarations.apply_insets(block, importance, &mut out.insets);
    declarations.apply_background(block, importance, &mut out.background);
    declarations.apply_colors(block, importance, &mut out.colors);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declarations::values::{BoxStyleValues, OuterDisplay, Specified};
    use crate::declarations::Importance as DeclImportance;
    use crate::element_tree::{Category, Placement};

    struct AlwaysMatch;
    impl Matcher for AlwaysMatch {
        fn matches(&self, _tree: &ElementTree, _element: Element) -> bool {
            true
        }
    }

    #[test]
    fn higher_precedence_band_wins_last_wins_semantics() {
        let mut tree = ElementTree::new();
        let root = tree.allocate_elements(1).unwrap()[0];
        tree.init_element(root, Category::Element, Placement::Orphan);

        let mut declarations = DeclarationsStore::new();
        let ua_block = declarations.open_block();
        declarations.add_box_style_values(
            ua_block,
            DeclImportance::Normal,
            BoxStyleValues {
                display: Some(Specified::Value(OuterDisplay::Inline)),
                ..Default::default()
            },
        );
        let author_block = declarations.open_block();
        declarations.add_box_style_values(
            author_block,
            DeclImportance::Normal,
            BoxStyleValues {
                display: Some(Specified::Value(OuterDisplay::Block)),
                ..Default::default()
            },
        );

        let mut list = CascadeList::new();
        list.user_agent.push(CascadeNode::Leaf(CascadeSource {
            style_attributes: HashMap::new(),
            selectors_important: Vec::new(),
            selectors_normal: vec![(Box::new(AlwaysMatch), ua_block)],
        }));
        list.author.push(CascadeNode::Leaf(CascadeSource {
            style_attributes: HashMap::new(),
            selectors_important: Vec::new(),
            selectors_normal: vec![(Box::new(AlwaysMatch), author_block)],
        }));

        run_cascade(&list, &declarations, &mut tree, root);

        assert_eq!(
            tree.cascaded_values(root).box_style.display,
            Some(Specified::Value(OuterDisplay::Block))
        );
    }

    #[test]
    fn important_author_beats_normal_author() {
        let mut tree = ElementTree::new();
        let root = tree.allocate_elements(1).unwrap()[0];
        tree.init_element(root, Category::Element, Placement::Orphan);

        let mut declarations = DeclarationsStore::new();
        let normal_block = declarations.open_block();
        declarations.add_box_style_values(
            normal_block,
            DeclImportance::Normal,
            BoxStyleValues {
                display: Some(Specified::Value(OuterDisplay::Block)),
                ..Default::default()
            },
        );
        let important_block = declarations.open_block();
        declarations.add_box_style_values(
            important_block,
            DeclImportance::Important,
            BoxStyleValues {
                display: Some(Specified::Value(OuterDisplay::Inline)),
                ..Default::default()
            },
        );

        let mut list = CascadeList::new();
        list.author.push(CascadeNode::Leaf(CascadeSource {
            style_attributes: HashMap::new(),
            selectors_important: vec![(Box::new(AlwaysMatch), important_block)],
            selectors_normal: vec![(Box::new(AlwaysMatch), normal_block)],
        }));

        run_cascade(&list, &declarations, &mut tree, root);

        assert_eq!(
            tree.cascaded_values(root).box_style.display,
            Some(Specified::Value(OuterDisplay::Inline))
        );
    }
}
