//! Merkle membership proof model.

use serde::{Deserialize, Serialize};

use crate::base::{Element, hash_pair};

/// Which side of the current node a sibling hash sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// The sibling is the left child; the current node is the right child.
    Left,
    /// The sibling is the right child; the current node is the left child.
    Right,
}

/// One step of an authentication path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    /// The sibling hash at this level.
    pub sibling: Element,
    /// The side the sibling sits on.
    pub side: Side,
}

/// The sibling path proving a leaf belongs to a tree with a given root.
///
/// Derived on demand from a tree snapshot; not persisted independently of
/// the tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipProof {
    /// The root the path is anchored to.
    pub root: Element,
    /// The leaf's index in the tree.
    pub leaf_index: u64,
    /// Sibling hashes ordered leaf-to-root.
    pub siblings: Vec<PathStep>,
}

impl MembershipProof {
    /// Recompute the root implied by this path for the given leaf value.
    #[must_use]
    pub fn compute_root(&self, leaf: Element) -> Element {
        self.siblings.iter().fold(leaf, |current, step| match step.side {
            Side::Left => hash_pair(step.sibling, current),
            Side::Right => hash_pair(current, step.sibling),
        })
    }

    /// `true` if the path reproduces its own anchored root for `leaf`.
    #[must_use]
    pub fn verifies_for(&self, leaf: Element) -> bool {
        self.compute_root(leaf) == self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_root_respects_sides() {
        let leaf = Element::from(3_u64);
        let sibling = Element::from(9_u64);
        let left = MembershipProof {
            root: hash_pair(sibling, leaf),
            leaf_index: 1,
            siblings: vec![PathStep {
                sibling,
                side: Side::Left,
            }],
        };
        let right = MembershipProof {
            root: hash_pair(leaf, sibling),
            leaf_index: 0,
            siblings: vec![PathStep {
                sibling,
                side: Side::Right,
            }],
        };
        assert!(left.verifies_for(leaf));
        assert!(right.verifies_for(leaf));
        assert_ne!(left.root, right.root);
    }
}
