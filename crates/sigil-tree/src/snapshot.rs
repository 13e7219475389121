//! Binary tree snapshots.
//!
//! A snapshot stores only the depth and the ordered leaf sequence; internal
//! nodes are rebuilt on load. Because the tree is a pure function of its
//! insertion history, a reloaded snapshot reproduces the pre-snapshot root
//! exactly, preserving the append-only invariant across restarts.

use sigil_core::base::{ELEMENT_SIZE, Element};
use thiserror::Error;

use crate::tree::{GroupTree, TreeError};

const MAGIC: &[u8; 4] = b"SGTR";
const VERSION: u8 = 1;
const HEADER_LEN: usize = 4 + 1 + 1 + 8;

/// Errors decoding a tree snapshot.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    /// The snapshot is shorter than its fixed header.
    #[error("snapshot is too short")]
    TooShort,

    /// The snapshot does not start with the expected magic bytes.
    #[error("snapshot magic mismatch")]
    BadMagic,

    /// The snapshot version is not supported.
    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u8),

    /// The payload length does not match the declared leaf count.
    #[error("snapshot length mismatch: expected {expected} leaf bytes, got {actual}")]
    LengthMismatch {
        /// Expected payload length in bytes.
        expected: usize,
        /// Actual payload length in bytes.
        actual: usize,
    },

    /// A stored leaf is not a canonical field element encoding.
    #[error("leaf {0} is not a canonical field element")]
    NonCanonicalLeaf(u64),

    /// Rebuilding the tree failed.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl GroupTree {
    /// Serialize the tree to its binary snapshot form.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let leaves = self.leaves();
        let mut out = Vec::with_capacity(
            HEADER_LEN.saturating_add(leaves.len().saturating_mul(ELEMENT_SIZE)),
        );
        out.extend_from_slice(MAGIC);
        out.push(VERSION);
        out.push(self.depth());
        let leaf_count = u64::try_from(leaves.len()).unwrap_or(u64::MAX);
        out.extend_from_slice(&leaf_count.to_le_bytes());
        for leaf in leaves {
            out.extend_from_slice(&leaf.to_bytes());
        }
        out
    }

    /// Rebuild a tree from its binary snapshot form.
    ///
    /// # Errors
    /// Returns a [`SnapshotError`] for truncated, corrupted, or
    /// version-mismatched snapshots.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let (magic, rest) = bytes
            .split_first_chunk::<4>()
            .ok_or(SnapshotError::TooShort)?;
        if magic != MAGIC {
            return Err(SnapshotError::BadMagic);
        }
        let (&[version, depth], rest) =
            rest.split_first_chunk::<2>().ok_or(SnapshotError::TooShort)?;
        if version != VERSION {
            return Err(SnapshotError::UnsupportedVersion(version));
        }
        let (count_bytes, payload) = rest
            .split_first_chunk::<8>()
            .ok_or(SnapshotError::TooShort)?;
        let leaf_count = u64::from_le_bytes(*count_bytes);

        let expected = usize::try_from(leaf_count)
            .ok()
            .and_then(|count| count.checked_mul(ELEMENT_SIZE))
            .ok_or(SnapshotError::TooShort)?;
        if payload.len() != expected {
            return Err(SnapshotError::LengthMismatch {
                expected,
                actual: payload.len(),
            });
        }

        let mut tree = Self::new(depth)?;
        for (index, chunk) in payload.chunks_exact(ELEMENT_SIZE).enumerate() {
            let mut repr = [0_u8; ELEMENT_SIZE];
            repr.copy_from_slice(chunk);
            let index_u64 = u64::try_from(index).map_err(|_| TreeError::SizeOverflow)?;
            let leaf =
                Element::from_bytes(&repr).ok_or(SnapshotError::NonCanonicalLeaf(index_u64))?;
            tree.insert(leaf)?;
        }
        Ok(tree)
    }
}

#[cfg(test)]
#[allow(
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    reason = "Test fixtures index into snapshots they just built"
)]
mod tests {
    use test_utils::fe;

    use super::*;

    fn populated_tree() -> GroupTree {
        let mut tree = GroupTree::new(4).expect("tree creation failed");
        for i in 1..=5_u64 {
            tree.insert(fe!(i)).expect("insert failed");
        }
        tree
    }

    #[test]
    fn roundtrip_preserves_root_and_proofs() {
        let tree = populated_tree();
        let restored = GroupTree::from_bytes(&tree.to_bytes()).expect("snapshot load failed");
        assert_eq!(restored.current_root(), tree.current_root());
        assert_eq!(restored.leaf_count(), tree.leaf_count());
        let proof = restored.prove_membership(2).expect("proof generation failed");
        assert!(proof.verifies_for(fe!(3)));
    }

    #[test]
    fn restored_tree_stays_append_only() {
        let tree = populated_tree();
        let mut restored = GroupTree::from_bytes(&tree.to_bytes()).expect("snapshot load failed");
        let index = restored.insert(fe!(99)).expect("insert failed");
        assert_eq!(index, 5);
        assert_eq!(restored.leaf(2), Some(fe!(3)));
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = populated_tree().to_bytes();
        bytes[0] = b'X';
        assert_eq!(GroupTree::from_bytes(&bytes), Err(SnapshotError::BadMagic));
    }

    #[test]
    fn rejects_truncated_payload() {
        let mut bytes = populated_tree().to_bytes();
        bytes.truncate(bytes.len() - 1);
        assert!(matches!(
            GroupTree::from_bytes(&bytes),
            Err(SnapshotError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn rejects_non_canonical_leaf() {
        let mut bytes = populated_tree().to_bytes();
        let len = bytes.len();
        for byte in &mut bytes[len - 32..] {
            *byte = 0xff;
        }
        assert_eq!(
            GroupTree::from_bytes(&bytes),
            Err(SnapshotError::NonCanonicalLeaf(4))
        );
    }

    #[test]
    fn rejects_unknown_version() {
        let mut bytes = populated_tree().to_bytes();
        bytes[4] = 9;
        assert_eq!(
            GroupTree::from_bytes(&bytes),
            Err(SnapshotError::UnsupportedVersion(9))
        );
    }
}
