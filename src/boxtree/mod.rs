//! The box tree: layout's output data model (spec.md §3).
//!
//! Owns every subtree, every IFC, the stacking-context tree, and the
//! element-to-box map. Built fresh by box generation (`generation::run`)
//! on every `run()`; nothing here is mutated after the pipeline finishes
//! except by the cosmetic pass, which only ever touches color/background
//! fields (spec.md §4.7).

pub mod block;
pub mod ifc;
pub mod sct;

use crate::element_tree::Element;
use crate::error::{Error, Result};
use block::{BackgroundImagesHandle, BlockRef, IfcId, Subtree, SubtreeId};
use ifc::InlineFormattingContext;
use sct::{StackingContextTree, StackingContextTreeBuilder};
use std::collections::HashMap;

/// Where an element's generated box lives (spec.md §3:
/// "`element_to_generated_box`: mapping from element handle to either
/// `block_ref`, `inline_box (ifc_id, inline_index)`, or `text (ifc_id)`").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeneratedBox {
    Block(BlockRef),
    InlineBox { ifc: IfcId, inline_index: u16 },
    Text { ifc: IfcId },
}

/// Handle-indexed storage of background-image slices (spec.md §3). Each
/// background-bearing block/inline-box holds a `BackgroundImagesHandle`
/// rather than owning its own image-handle vector, so identical background
/// declarations (a common case — most elements in a document share a
/// handful of distinct backgrounds) share one allocation.
#[derive(Default)]
pub struct BackgroundImagesStore {
    slices: Vec<Vec<crate::declarations::values::ImageHandle>>,
}

impl BackgroundImagesStore {
    pub fn intern(&mut self, images: Vec<crate::declarations::values::ImageHandle>) -> BackgroundImagesHandle {
        if images.is_empty() {
            return BackgroundImagesHandle(u32::MAX);
        }
        if let Some(pos) = self.slices.iter().position(|existing| existing == &images) {
            return BackgroundImagesHandle(pos as u32);
        }
        let handle = BackgroundImagesHandle(self.slices.len() as u32);
        self.slices.push(images);
        handle
    }

    pub fn get(&self, handle: BackgroundImagesHandle) -> &[crate::declarations::values::ImageHandle] {
        if handle.0 == u32::MAX {
            return &[];
        }
        &self.slices[handle.0 as usize]
    }
}

/// The finished box tree (spec.md §3).
pub struct BoxTree {
    subtrees: Vec<Subtree>,
    pub initial_containing_block: BlockRef,
    ifcs: Vec<InlineFormattingContext>,
    sct: StackingContextTree,
    element_to_generated_box: HashMap<Element, GeneratedBox>,
    pub background_images: BackgroundImagesStore,
}

impl BoxTree {
    /// Read access to a subtree's geometry and block data (spec.md §6: the
    /// finished box tree is the painter's input). Mutation stays
    /// crate-internal; nothing outside `generation`/`cosmetic` writes to a
    /// finished `BoxTree`.
    pub fn subtree(&self, id: SubtreeId) -> &Subtree {
        &self.subtrees[id as usize]
    }

    pub(crate) fn subtree_mut(&mut self, id: SubtreeId) -> &mut Subtree {
        &mut self.subtrees[id as usize]
    }

    pub fn subtree_count(&self) -> usize {
        self.subtrees.len()
    }

    pub fn ifc(&self, id: IfcId) -> &InlineFormattingContext {
        &self.ifcs[id as usize]
    }

    pub(crate) fn ifc_mut(&mut self, id: IfcId) -> &mut InlineFormattingContext {
        &mut self.ifcs[id as usize]
    }

    pub fn ifc_count(&self) -> usize {
        self.ifcs.len()
    }

    pub fn sct(&self) -> &StackingContextTree {
        &self.sct
    }

    pub fn generated_box(&self, element: Element) -> Option<GeneratedBox> {
        self.element_to_generated_box.get(&element).copied()
    }

    /// Testable property 8 (spec.md §8): for every generated block,
    /// `element_to_generated_box[box.element]` recovers a ref whose
    /// `(subtree,index)` points back to that block.
    pub fn block_round_trips(&self, subtree: SubtreeId, index: u16) -> bool {
        match self.subtree(subtree).element(index) {
            None => true,
            Some(element) => matches!(
                self.generated_box(element),
                Some(GeneratedBox::Block(r)) if r.subtree == subtree && r.index == index
            ),
        }
    }
}

/// Scoped construction state for one `run()` (spec.md §5: "each
/// long-lived structure uses a single explicit allocator; per-`run()`
/// scratch allocations live on a scoped arena released on return"). Box
/// generation (`generation::mod`) pushes subtrees/IFCs/stacking contexts
/// through this builder; `finish()` freezes it into a `BoxTree`.
pub struct BoxTreeBuilder {
    subtrees: Vec<Subtree>,
    ifcs: Vec<InlineFormattingContext>,
    sct: StackingContextTreeBuilder,
    element_to_generated_box: HashMap<Element, GeneratedBox>,
    background_images: BackgroundImagesStore,
}

impl BoxTreeBuilder {
    pub fn new() -> Self {
        BoxTreeBuilder {
            subtrees: Vec::new(),
            ifcs: Vec::new(),
            sct: StackingContextTreeBuilder::new(),
            element_to_generated_box: HashMap::new(),
            background_images: BackgroundImagesStore::default(),
        }
    }

    /// Allocates a new, empty subtree. Fails once there are already 2^16
    /// subtrees (spec.md §6).
    pub fn push_subtree(&mut self, parent: Option<BlockRef>) -> Result<SubtreeId> {
        if self.subtrees.len() >= u16::MAX as usize {
            return Err(Error::SizeLimitExceeded);
        }
        let id = self.subtrees.len() as SubtreeId;
        self.subtrees.push(Subtree::new(id, parent));
        Ok(id)
    }

    pub fn subtree(&self, id: SubtreeId) -> &Subtree {
        &self.subtrees[id as usize]
    }

    pub fn subtree_mut(&mut self, id: SubtreeId) -> &mut Subtree {
        &mut self.subtrees[id as usize]
    }

    /// Allocates a fresh IFC. Fails once there are already 2^16 IFCs
    /// (spec.md §6).
    pub fn push_ifc(
        &mut self,
        font_color: crate::declarations::values::Color,
        ascender: crate::unit::Unit,
        descender: crate::unit::Unit,
    ) -> Result<IfcId> {
        if self.ifcs.len() >= u16::MAX as usize {
            return Err(Error::SizeLimitExceeded);
        }
        let id = self.ifcs.len() as IfcId;
        self.ifcs
            .push(InlineFormattingContext::new(id, font_color, ascender, descender));
        Ok(id)
    }

    pub fn ifc_mut(&mut self, id: IfcId) -> &mut InlineFormattingContext {
        &mut self.ifcs[id as usize]
    }

    pub fn sct_mut(&mut self) -> &mut StackingContextTreeBuilder {
        &mut self.sct
    }

    pub fn register_box(&mut self, element: Element, generated: GeneratedBox) {
        self.element_to_generated_box.insert(element, generated);
    }

    pub fn intern_background_images(
        &mut self,
        images: Vec<crate::declarations::values::ImageHandle>,
    ) -> BackgroundImagesHandle {
        self.background_images.intern(images)
    }

    /// Freezes the builder into a finished `BoxTree`. `initial_containing_block`
    /// must be the root block of the root subtree (spec.md §3).
    pub fn finish(self, initial_containing_block: BlockRef) -> BoxTree {
        BoxTree {
            subtrees: self.subtrees,
            initial_containing_block,
            ifcs: self.ifcs,
            sct: self.sct.finish(),
            element_to_generated_box: self.element_to_generated_box,
            background_images: self.background_images,
        }
    }
}

impl Default for BoxTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
