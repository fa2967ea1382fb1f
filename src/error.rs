//! Error taxonomy exported by the core (spec.md §7).
//!
//! Resource exhaustion is the only runtime failure the engine surfaces;
//! programmer errors (stale handles, text-node-as-parent, generation
//! overflow) are assertions, not `Result` variants, per spec.md §7.

use thiserror::Error;

/// The error type returned by `run()` and its internal collaborators.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An allocation failed. The only failure traversal and matching can
    /// produce (spec.md §4.2).
    #[error("out of memory")]
    OutOfMemory,

    /// A subtree, the subtree list, the IFC list, or an IFC's inline-box
    /// list grew past its 2^16 capacity (spec.md §6).
    #[error("size limit exceeded")]
    SizeLimitExceeded,

    /// The requested viewport does not fit in the fixed-point unit space:
    /// `pixels * 4` must be representable in `i32` (spec.md §3, §6).
    #[error("viewport too large")]
    ViewportTooLarge,

    /// The 16-bit element index space was exhausted (spec.md §4.1).
    #[error("max element count exceeded")]
    MaxSizeExceeded,
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, Error>;
