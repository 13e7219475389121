//! Append-only group accumulator.
//!
//! A fixed-depth incremental Merkle tree over identity commitments. Inserts
//! touch only the O(depth) nodes on the leaf-to-root path; membership
//! proofs can be produced for any inserted leaf at any time. The tree is a
//! pure function of its insertion history: two trees fed the same
//! commitment sequence always agree on every root.

mod snapshot;
mod tree;

pub use snapshot::SnapshotError;
pub use tree::{GroupTree, MAX_DEPTH, TreeError};
