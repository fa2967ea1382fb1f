//! The styled, DOM-like element tree (spec.md §3, §4.1).
//!
//! Nodes are reached through a generational handle (`Element`) into a
//! struct-of-arrays store with a free list, the same shape as
//! `azul/src/id_tree.rs`'s `Arena<T>`/`NodeHierarchy` (parent, first/last
//! child, prev/next sibling) combined with the generation-checked liveness
//! of `understory_box_tree/src/tree.rs`'s `Tree` (`generations`, `free_list`,
//! `is_alive`). Unlike `id_tree::NodeId`, which is append-only, `Element`
//! handles can be invalidated by `destroy_element` and its slot reused; the
//! generation counter is what lets a stale handle be detected rather than
//! silently aliasing a new node.

pub mod cascaded;

use crate::error::{Error, Result};
pub use cascaded::CascadedValues;
use std::fmt;

/// Namespace id meaning "no namespace" (spec.md §3).
pub const NO_NAMESPACE: u16 = 254;
/// Namespace id that is reserved as a wildcard, never used at rest.
pub const WILDCARD_NAMESPACE: u16 = 255;
/// Name id reserved for "unset".
pub const ANONYMOUS_NAME: u32 = u32::MAX;

/// A fully-qualified element type: `(namespace id, name id)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub namespace: u16,
    pub name: u32,
}

impl QualifiedName {
    pub const ANONYMOUS: QualifiedName = QualifiedName {
        namespace: NO_NAMESPACE,
        name: ANONYMOUS_NAME,
    };
}

/// Whether a node is an element or a text node (spec.md §3).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Element,
    Text,
}

/// A generational handle into an `ElementTree`.
///
/// Two handles compare equal only if both index and generation match, so a
/// destroyed-and-reused slot never aliases the handle that pointed at the
/// old occupant (spec.md §4.1's invariant: "destroyed handles never match a
/// live generation").
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Element {
    index: u16,
    generation: u32,
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Element({}, gen {})", self.index, self.generation)
    }
}

/// The sentinel "no element" handle (spec.md §3). Never returned as a live
/// handle by `allocate_element`.
pub const NULL_ELEMENT: Element = Element {
    index: u16::MAX,
    generation: u32::MAX,
};

impl Element {
    #[inline]
    pub fn is_null(self) -> bool {
        self == NULL_ELEMENT
    }

    #[inline]
    fn slot(self) -> usize {
        self.index as usize
    }
}

impl Default for Element {
    fn default() -> Self {
        NULL_ELEMENT
    }
}

/// Where to place a newly allocated element relative to the tree.
pub enum Placement {
    Orphan,
    FirstChildOf(Element),
    LastChildOf(Element),
}

#[derive(Clone)]
struct Slots {
    generation: Vec<u32>,
    category: Vec<Category>,
    qualified_name: Vec<QualifiedName>,
    parent: Vec<Element>,
    first_child: Vec<Element>,
    last_child: Vec<Element>,
    next_sibling: Vec<Element>,
    previous_sibling: Vec<Element>,
    text: Vec<Option<String>>,
    cascaded: Vec<CascadedValues>,
    occupied: Vec<bool>,
}

impl Slots {
    fn new() -> Self {
        Slots {
            generation: Vec::new(),
            category: Vec::new(),
            qualified_name: Vec::new(),
            parent: Vec::new(),
            first_child: Vec::new(),
            last_child: Vec::new(),
            next_sibling: Vec::new(),
            previous_sibling: Vec::new(),
            text: Vec::new(),
            cascaded: Vec::new(),
            occupied: Vec::new(),
        }
    }

    fn push_default(&mut self) {
        self.generation.push(0);
        self.category.push(Category::Element);
        self.qualified_name.push(QualifiedName::ANONYMOUS);
        self.parent.push(NULL_ELEMENT);
        self.first_child.push(NULL_ELEMENT);
        self.last_child.push(NULL_ELEMENT);
        self.next_sibling.push(NULL_ELEMENT);
        self.previous_sibling.push(NULL_ELEMENT);
        self.text.push(None);
        self.cascaded.push(CascadedValues::default());
        self.occupied.push(false);
    }
}

/// The styled element tree: a struct-of-arrays store of elements reached by
/// generational handle, plus a free list for reuse (spec.md §4.1).
pub struct ElementTree {
    slots: Slots,
    free_list: Vec<u16>,
}

impl Default for ElementTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementTree {
    pub fn new() -> Self {
        ElementTree {
            slots: Slots::new(),
            free_list: Vec::new(),
        }
    }

    /// Allocates `n` elements with undefined contents, reusing free-list
    /// slots where possible (spec.md §4.1). Fails with `MaxSizeExceeded`
    /// once the 16-bit index space would be exhausted.
    pub fn allocate_elements(&mut self, n: usize) -> Result<Vec<Element>> {
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            out.push(self.allocate_one()?);
        }
        Ok(out)
    }

    fn allocate_one(&mut self) -> Result<Element> {
        if let Some(index) = self.free_list.pop() {
            let slot = index as usize;
            let generation = self.slots.generation[slot];
            self.slots.occupied[slot] = true;
            return Ok(Element { index, generation });
        }
        let next_index = self.slots.generation.len();
        if next_index >= u16::MAX as usize {
            return Err(Error::MaxSizeExceeded);
        }
        self.slots.push_default();
        let index = next_index as u16;
        self.slots.occupied[next_index] = true;
        Ok(Element {
            index,
            generation: 0,
        })
    }

    /// Asserts `element` is live; programmer error otherwise (spec.md §4.1:
    /// "a stale handle is a programmer error").
    fn check_live(&self, element: Element) {
        debug_assert!(!element.is_null(), "null_element used as a live handle");
        let slot = element.slot();
        debug_assert!(
            slot < self.slots.generation.len()
                && self.slots.occupied[slot]
                && self.slots.generation[slot] == element.generation,
            "stale or invalid element handle: {:?}",
            element
        );
    }

    /// Initializes a freshly allocated element's category and tree
    /// placement. `parent` (when given) must be `Category::Element`: text
    /// nodes may not have children (spec.md §4.1).
    pub fn init_element(&mut self, element: Element, category: Category, placement: Placement) {
        self.check_live(element);
        let slot = element.slot();
        self.slots.category[slot] = category;

        match placement {
            Placement::Orphan => {}
            Placement::FirstChildOf(parent) => self.link_first_child(parent, element),
            Placement::LastChildOf(parent) => self.link_last_child(parent, element),
        }
    }

    fn link_first_child(&mut self, parent: Element, child: Element) {
        self.check_live(parent);
        debug_assert_eq!(
            self.slots.category[parent.slot()],
            Category::Element,
            "text node cannot have children"
        );
        let old_first = self.slots.first_child[parent.slot()];
        self.slots.next_sibling[child.slot()] = old_first;
        self.slots.previous_sibling[child.slot()] = NULL_ELEMENT;
        if !old_first.is_null() {
            self.slots.previous_sibling[old_first.slot()] = child;
        } else {
            self.slots.last_child[parent.slot()] = child;
        }
        self.slots.first_child[parent.slot()] = child;
        self.slots.parent[child.slot()] = parent;
    }

    fn link_last_child(&mut self, parent: Element, child: Element) {
        self.check_live(parent);
        debug_assert_eq!(
            self.slots.category[parent.slot()],
            Category::Element,
            "text node cannot have children"
        );
        let old_last = self.slots.last_child[parent.slot()];
        self.slots.previous_sibling[child.slot()] = old_last;
        self.slots.next_sibling[child.slot()] = NULL_ELEMENT;
        if !old_last.is_null() {
            self.slots.next_sibling[old_last.slot()] = child;
        } else {
            self.slots.first_child[parent.slot()] = child;
        }
        self.slots.last_child[parent.slot()] = child;
        self.slots.parent[child.slot()] = parent;
    }

    /// Unlinks `element` from its siblings and parent, bumps its generation,
    /// and pushes it onto the free list (spec.md §4.1). A no-op if the
    /// generation is already at its maximum (the slot is permanently
    /// retired rather than risk generation wraparound aliasing).
    pub fn destroy_element(&mut self, element: Element) {
        self.check_live(element);
        let slot = element.slot();

        let parent = self.slots.parent[slot];
        let prev = self.slots.previous_sibling[slot];
        let next = self.slots.next_sibling[slot];

        if !prev.is_null() {
            self.slots.next_sibling[prev.slot()] = next;
        } else if !parent.is_null() {
            self.slots.first_child[parent.slot()] = next;
        }
        if !next.is_null() {
            self.slots.previous_sibling[next.slot()] = prev;
        } else if !parent.is_null() {
            self.slots.last_child[parent.slot()] = prev;
        }

        self.slots.parent[slot] = NULL_ELEMENT;
        self.slots.previous_sibling[slot] = NULL_ELEMENT;
        self.slots.next_sibling[slot] = NULL_ELEMENT;
        self.slots.first_child[slot] = NULL_ELEMENT;
        self.slots.last_child[slot] = NULL_ELEMENT;
        self.slots.text[slot] = None;
        self.slots.cascaded[slot] = CascadedValues::default();
        self.slots.occupied[slot] = false;

        if self.slots.generation[slot] == u32::MAX {
            // Generation space exhausted for this slot: retire it forever
            // rather than risk a stale handle aliasing a new occupant.
            return;
        }
        self.slots.generation[slot] += 1;
        self.free_list.push(element.index);
    }

    pub fn is_alive(&self, element: Element) -> bool {
        if element.is_null() {
            return false;
        }
        let slot = element.slot();
        slot < self.slots.generation.len()
            && self.slots.occupied[slot]
            && self.slots.generation[slot] == element.generation
    }

    pub fn category(&self, element: Element) -> Category {
        self.check_live(element);
        self.slots.category[element.slot()]
    }

    pub fn set_qualified_name(&mut self, element: Element, name: QualifiedName) {
        self.check_live(element);
        self.slots.qualified_name[element.slot()] = name;
    }

    pub fn qualified_name(&self, element: Element) -> QualifiedName {
        self.check_live(element);
        self.slots.qualified_name[element.slot()]
    }

    pub fn set_text(&mut self, element: Element, text: String) {
        self.check_live(element);
        debug_assert_eq!(self.slots.category[element.slot()], Category::Text);
        self.slots.text[element.slot()] = Some(text);
    }

    pub fn text(&self, element: Element) -> Option<&str> {
        self.check_live(element);
        self.slots.text[element.slot()].as_deref()
    }

    pub fn parent(&self, element: Element) -> Element {
        self.check_live(element);
        self.slots.parent[element.slot()]
    }

    pub fn first_child(&self, element: Element) -> Element {
        self.check_live(element);
        self.slots.first_child[element.slot()]
    }

    pub fn last_child(&self, element: Element) -> Element {
        self.check_live(element);
        self.slots.last_child[element.slot()]
    }

    pub fn next_sibling(&self, element: Element) -> Element {
        self.check_live(element);
        self.slots.next_sibling[element.slot()]
    }

    pub fn previous_sibling(&self, element: Element) -> Element {
        self.check_live(element);
        self.slots.previous_sibling[element.slot()]
    }

    pub fn cascaded_values(&self, element: Element) -> &CascadedValues {
        self.check_live(element);
        &self.slots.cascaded[element.slot()]
    }

    pub fn cascaded_values_mut(&mut self, element: Element) -> &mut CascadedValues {
        self.check_live(element);
        &mut self.slots.cascaded[element.slot()]
    }

    /// Iterates an element's children, first to last.
    pub fn children(&self, element: Element) -> Children<'_> {
        Children {
            tree: self,
            next: self.first_child(element),
        }
    }

    /// Iterates the subtree rooted at `root` in pre-order (depth-first,
    /// parents before children), the order box generation walks in
    /// (spec.md §5).
    pub fn pre_order(&self, root: Element) -> PreOrder<'_> {
        PreOrder {
            tree: self,
            root,
            current: Some(root),
        }
    }
}

pub struct Children<'a> {
    tree: &'a ElementTree,
    next: Element,
}

impl<'a> Iterator for Children<'a> {
    type Item = Element;
    fn next(&mut self) -> Option<Element> {
        if self.next.is_null() {
            return None;
        }
        let current = self.next;
        self.next = self.tree.next_sibling(current);
        Some(current)
    }
}

/// Pre-order (document-order) depth-first traversal of a subtree.
pub struct PreOrder<'a> {
    tree: &'a ElementTree,
    root: Element,
    current: Option<Element>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = Element;

    fn next(&mut self) -> Option<Element> {
        let current = self.current?;
        let ret = current;

        let first_child = self.tree.first_child(current);
        if !first_child.is_null() {
            self.current = Some(first_child);
            return Some(ret);
        }

        let mut node = current;
        loop {
            if node == self.root {
                self.current = None;
                return Some(ret);
            }
            let next_sibling = self.tree.next_sibling(node);
            if !next_sibling.is_null() {
                self.current = Some(next_sibling);
                return Some(ret);
            }
            node = self.tree.parent(node);
            if node.is_null() {
                self.current = None;
                return Some(ret);
            }
        }
    }
}
