//! Array-mapped scan tree geometry
//!
//! The tree is never materialized as linked nodes: a node is just a
//! flat index into the sum buffer, with children at fixed arithmetic
//! offsets (heap layout, root at index 0).
//!
//! The leaf row is padded to the next power of two, so every internal
//! node has exactly two children and navigation stays branch-free.

mod layout;

pub use layout::TreeLayout;
