//! The incremental Merkle tree.

#![allow(clippy::indexing_slicing, reason = "Allow indexing for clarity")]

use sigil_core::base::{Element, hash_pair};
use sigil_core::schema::membership::{MembershipProof, PathStep, Side};
use thiserror::Error;

/// Maximum supported tree depth.
pub const MAX_DEPTH: u8 = 32;

/// Errors that can occur when working with the group tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// The requested depth is zero or above [`MAX_DEPTH`].
    #[error("tree depth must be in 1..={MAX_DEPTH}, got {0}")]
    InvalidDepth(u8),

    /// The tree's `2^depth` leaf slots are exhausted.
    #[error("tree is full: capacity {capacity} leaves")]
    TreeFull {
        /// Total leaf capacity of the tree.
        capacity: u64,
    },

    /// The leaf index was never inserted or is out of range.
    #[error("leaf index {0} was never inserted")]
    LeafNotFound(u64),

    /// A size did not fit the platform word or u64.
    #[error("size conversion overflow")]
    SizeOverflow,
}

/// An append-only, fixed-depth binary Merkle tree of identity commitments.
///
/// Every level of the tree is cached, so inserts update exactly the
/// `depth` nodes on the changed path and membership proofs for arbitrary
/// inserted leaves are O(depth) lookups. Empty subtrees use the zero
/// cascade `zero[0] = Element::ZERO`, `zero[l+1] = H(zero[l], zero[l])`.
///
/// Once a leaf index is assigned a commitment it is never reassigned; the
/// root changes only on insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupTree {
    depth: u8,
    capacity: u64,
    /// `zeros[l]` is the root of an empty subtree of height `l`.
    zeros: Vec<Element>,
    /// `levels[0]` holds the leaves; `levels[depth]` holds the root.
    /// Each level stores only the nodes covering inserted leaves.
    levels: Vec<Vec<Element>>,
}

impl GroupTree {
    /// Create an empty tree of the given depth (capacity `2^depth` leaves).
    ///
    /// # Errors
    /// Returns [`TreeError::InvalidDepth`] for depth 0 or above
    /// [`MAX_DEPTH`].
    pub fn new(depth: u8) -> Result<Self, TreeError> {
        if depth == 0 || depth > MAX_DEPTH {
            return Err(TreeError::InvalidDepth(depth));
        }
        let capacity = 1_u64
            .checked_shl(u32::from(depth))
            .ok_or(TreeError::InvalidDepth(depth))?;

        let level_count = usize::from(depth).saturating_add(1);
        let mut zeros = Vec::with_capacity(level_count);
        let mut zero = Element::ZERO;
        zeros.push(zero);
        for _ in 0..depth {
            zero = hash_pair(zero, zero);
            zeros.push(zero);
        }

        Ok(Self {
            depth,
            capacity,
            zeros,
            levels: vec![Vec::new(); level_count],
        })
    }

    /// The tree's fixed depth.
    #[must_use]
    pub const fn depth(&self) -> u8 {
        self.depth
    }

    /// Total leaf capacity (`2^depth`).
    #[must_use]
    pub const fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Number of inserted leaves.
    ///
    /// # Errors
    /// Returns [`TreeError::SizeOverflow`] if the count does not fit `u64`.
    pub fn leaf_count(&self) -> Result<u64, TreeError> {
        u64::try_from(self.levels[0].len()).map_err(|_| TreeError::SizeOverflow)
    }

    /// The commitment at `index`, if that slot was ever assigned.
    #[must_use]
    pub fn leaf(&self, index: u64) -> Option<Element> {
        let index = usize::try_from(index).ok()?;
        self.levels[0].get(index).copied()
    }

    /// The latest root. Side-effect-free.
    #[must_use]
    pub fn current_root(&self) -> Element {
        let top = usize::from(self.depth);
        self.levels[top]
            .first()
            .copied()
            .unwrap_or(self.zeros[top])
    }

    /// Append a commitment at the next free leaf slot.
    ///
    /// Recomputes only the nodes on the path from the new leaf to the
    /// root. Returns the assigned leaf index.
    ///
    /// # Errors
    /// Returns [`TreeError::TreeFull`] when all `2^depth` slots are used.
    pub fn insert(&mut self, commitment: Element) -> Result<u64, TreeError> {
        let index = self.levels[0].len();
        let index_u64 = u64::try_from(index).map_err(|_| TreeError::SizeOverflow)?;
        if index_u64 >= self.capacity {
            return Err(TreeError::TreeFull {
                capacity: self.capacity,
            });
        }

        self.levels[0].push(commitment);

        let mut node = commitment;
        let mut idx = index;
        for level in 0..usize::from(self.depth) {
            let parent_idx = idx / 2;
            node = if idx.is_multiple_of(2) {
                // A freshly appended even node never has a right sibling yet.
                let right = self.levels[level]
                    .get(idx.saturating_add(1))
                    .copied()
                    .unwrap_or(self.zeros[level]);
                hash_pair(node, right)
            } else {
                let left = self.levels[level][idx.saturating_sub(1)];
                hash_pair(left, node)
            };

            let parent_level = &mut self.levels[level.saturating_add(1)];
            if parent_idx == parent_level.len() {
                parent_level.push(node);
            } else {
                parent_level[parent_idx] = node;
            }
            idx = parent_idx;
        }

        Ok(index_u64)
    }

    /// Reconstruct the sibling path for an inserted leaf against the
    /// current root.
    ///
    /// # Errors
    /// Returns [`TreeError::LeafNotFound`] if `leaf_index` was never
    /// inserted.
    pub fn prove_membership(&self, leaf_index: u64) -> Result<MembershipProof, TreeError> {
        let mut idx =
            usize::try_from(leaf_index).map_err(|_| TreeError::LeafNotFound(leaf_index))?;
        if idx >= self.levels[0].len() {
            return Err(TreeError::LeafNotFound(leaf_index));
        }

        let mut siblings = Vec::with_capacity(usize::from(self.depth));
        for level in 0..usize::from(self.depth) {
            let step = if idx.is_multiple_of(2) {
                PathStep {
                    sibling: self.levels[level]
                        .get(idx.saturating_add(1))
                        .copied()
                        .unwrap_or(self.zeros[level]),
                    side: Side::Right,
                }
            } else {
                PathStep {
                    sibling: self.levels[level][idx.saturating_sub(1)],
                    side: Side::Left,
                }
            };
            siblings.push(step);
            idx /= 2;
        }

        Ok(MembershipProof {
            root: self.current_root(),
            leaf_index,
            siblings,
        })
    }

    pub(crate) fn leaves(&self) -> &[Element] {
        &self.levels[0]
    }
}

#[cfg(test)]
mod tests {
    use test_utils::{fe, fes};

    use super::*;

    mod construction {
        use super::*;

        #[test]
        fn rejects_invalid_depths() {
            assert_eq!(GroupTree::new(0), Err(TreeError::InvalidDepth(0)));
            assert_eq!(GroupTree::new(33), Err(TreeError::InvalidDepth(33)));
        }

        #[test]
        fn empty_root_is_the_zero_cascade() {
            let tree = GroupTree::new(4).expect("tree creation failed");
            let mut zero = Element::ZERO;
            for _ in 0..4 {
                zero = hash_pair(zero, zero);
            }
            assert_eq!(tree.current_root(), zero);
        }
    }

    mod insert {
        use super::*;

        #[test]
        fn assigns_sequential_indices() {
            let mut tree = GroupTree::new(4).expect("tree creation failed");
            for expected in 0..5_u64 {
                let index = tree.insert(fe!(expected)).expect("insert failed");
                assert_eq!(index, expected);
            }
            assert_eq!(tree.leaf_count(), Ok(5));
        }

        #[test]
        fn root_changes_on_every_insert() {
            let mut tree = GroupTree::new(4).expect("tree creation failed");
            let mut roots = vec![tree.current_root()];
            for i in 1..=4_u64 {
                tree.insert(fe!(i)).expect("insert failed");
                let root = tree.current_root();
                assert!(!roots.contains(&root));
                roots.push(root);
            }
        }

        #[test]
        fn identical_histories_agree_on_roots() {
            let mut a = GroupTree::new(6).expect("tree creation failed");
            let mut b = GroupTree::new(6).expect("tree creation failed");
            for i in 0..10_u64 {
                a.insert(fe!(i.saturating_add(100))).expect("insert failed");
                b.insert(fe!(i.saturating_add(100))).expect("insert failed");
                assert_eq!(a.current_root(), b.current_root());
            }
        }

        #[test]
        fn fills_to_capacity_then_fails() {
            let mut tree = GroupTree::new(2).expect("tree creation failed");
            for i in 0..4_u64 {
                tree.insert(fe!(i)).expect("insert failed");
            }
            assert_eq!(
                tree.insert(fe!(4)),
                Err(TreeError::TreeFull { capacity: 4 })
            );
            // The failed insert must not have disturbed the tree.
            assert_eq!(tree.leaf_count(), Ok(4));
        }

        #[test]
        fn incremental_root_matches_batch_rebuild() {
            // Rebuild from scratch after every insert and compare roots.
            for n in 1..=9_u64 {
                let mut incremental = GroupTree::new(4).expect("tree creation failed");
                for i in 0..n {
                    incremental.insert(fe!(i.saturating_add(1))).expect("insert failed");
                }
                let mut fresh = GroupTree::new(4).expect("tree creation failed");
                for i in 0..n {
                    fresh.insert(fe!(i.saturating_add(1))).expect("insert failed");
                }
                assert_eq!(incremental.current_root(), fresh.current_root());
            }
        }
    }

    mod prove_membership {
        use super::*;

        #[test]
        fn every_inserted_leaf_verifies() {
            let mut tree = GroupTree::new(4).expect("tree creation failed");
            let leaves: Vec<Element> = fes![10_u64, 11, 12, 13, 14, 15, 16];
            for leaf in &leaves {
                tree.insert(*leaf).expect("insert failed");
            }
            for (index, leaf) in leaves.iter().enumerate() {
                let proof = tree
                    .prove_membership(u64::try_from(index).expect("index fits"))
                    .expect("proof generation failed");
                assert_eq!(proof.root, tree.current_root());
                assert_eq!(proof.siblings.len(), 4);
                assert!(proof.verifies_for(*leaf));
            }
        }

        #[test]
        fn never_inserted_leaf_fails() {
            let mut tree = GroupTree::new(4).expect("tree creation failed");
            tree.insert(fe!(1)).expect("insert failed");
            assert_eq!(tree.prove_membership(1), Err(TreeError::LeafNotFound(1)));
            assert_eq!(
                tree.prove_membership(999),
                Err(TreeError::LeafNotFound(999))
            );
        }

        #[test]
        fn wrong_leaf_does_not_verify() {
            let mut tree = GroupTree::new(4).expect("tree creation failed");
            tree.insert(fe!(1)).expect("insert failed");
            tree.insert(fe!(2)).expect("insert failed");
            let proof = tree.prove_membership(0).expect("proof generation failed");
            assert!(!proof.verifies_for(fe!(2)));
        }

        #[test]
        fn old_proofs_stale_after_growth() {
            let mut tree = GroupTree::new(4).expect("tree creation failed");
            tree.insert(fe!(1)).expect("insert failed");
            let proof = tree.prove_membership(0).expect("proof generation failed");
            tree.insert(fe!(2)).expect("insert failed");
            // The path still verifies against its own (old) root, which no
            // longer matches the tree.
            assert!(proof.verifies_for(fe!(1)));
            assert_ne!(proof.root, tree.current_root());
        }
    }
}
