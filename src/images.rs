//! The `Images` external collaborator (spec.md §1, §6). Raster decode is
//! out of scope; the cosmetic pass only ever needs an image's pixel
//! dimensions and a storage reference to hand to the painter.

use crate::declarations::values::ImageHandle;

/// What `Images::get` returns for a live handle (spec.md §6: "pixel
/// dimensions and storage reference").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
    /// Opaque reference the painter uses to fetch pixel data; this crate
    /// never interprets it.
    pub storage_ref: u64,
}

/// Image registry consumed by the cosmetic pass (spec.md §6).
pub trait Images {
    fn get(&self, handle: ImageHandle) -> Option<ImageDimensions>;
}

/// A test double with no registered images; every handle misses.
pub struct NullImages;

impl Images for NullImages {
    fn get(&self, _handle: ImageHandle) -> Option<ImageDimensions> {
        None
    }
}
