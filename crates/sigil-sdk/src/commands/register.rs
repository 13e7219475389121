//! Registration against a group-tree snapshot.
//!
//! The snapshot file is the published `leaf index -> commitment` mapping
//! of the protocol: the registrar appends commitments here and members
//! reconstruct membership proofs from it. Writes go through a temp file
//! and rename so a crash never leaves a torn snapshot.

use std::io::ErrorKind;
use std::path::Path;

use eyre::Context as _;
use sigil_core::base::Element;
use sigil_core::schema::membership::MembershipProof;
use sigil_tree::GroupTree;

/// Load a tree snapshot.
///
/// # Errors
/// Returns an error if the file cannot be read or decoded.
pub async fn load_tree(snapshot: &Path) -> eyre::Result<GroupTree> {
    let bytes = tokio::fs::read(snapshot)
        .await
        .wrap_err_with(|| format!("Failed to read tree snapshot {}", snapshot.display()))?;
    GroupTree::from_bytes(&bytes).wrap_err("Failed to decode tree snapshot")
}

async fn load_or_create(snapshot: &Path, depth: u8) -> eyre::Result<GroupTree> {
    match tokio::fs::read(snapshot).await {
        Ok(bytes) => GroupTree::from_bytes(&bytes).wrap_err("Failed to decode tree snapshot"),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(depth, "creating new group tree");
            GroupTree::new(depth).wrap_err("Failed to create tree")
        }
        Err(e) => Err(e).wrap_err_with(|| {
            format!("Failed to read tree snapshot {}", snapshot.display())
        }),
    }
}

async fn persist(snapshot: &Path, tree: &GroupTree) -> eyre::Result<()> {
    let tmp = snapshot.with_extension("tmp");
    tokio::fs::write(&tmp, tree.to_bytes())
        .await
        .wrap_err_with(|| format!("Failed to write tree snapshot {}", tmp.display()))?;
    tokio::fs::rename(&tmp, snapshot)
        .await
        .wrap_err("Failed to replace tree snapshot")
}

/// Append a commitment to the snapshot at `snapshot`, creating a tree of
/// `depth` if the snapshot does not exist yet.
///
/// Returns the assigned leaf index and the new root.
///
/// # Errors
/// Returns an error on I/O failure, snapshot corruption, or a full tree.
pub async fn register_commitment(
    snapshot: &Path,
    depth: u8,
    commitment: Element,
) -> eyre::Result<(u64, Element)> {
    let mut tree = load_or_create(snapshot, depth).await?;
    let index = tree.insert(commitment).wrap_err("Failed to insert commitment")?;
    persist(snapshot, &tree).await?;
    let root = tree.current_root();
    tracing::info!(index, %root, "registered commitment");
    Ok((index, root))
}

/// Reconstruct a membership proof for `leaf_index` from the snapshot.
///
/// # Errors
/// Returns an error on I/O failure or if the leaf was never inserted.
pub async fn prove_membership(snapshot: &Path, leaf_index: u64) -> eyre::Result<MembershipProof> {
    let tree = load_tree(snapshot).await?;
    tree.prove_membership(leaf_index)
        .wrap_err_with(|| format!("Failed to prove membership for leaf {leaf_index}"))
}

#[cfg(test)]
mod tests {
    use test_utils::fe;

    use super::*;

    #[tokio::test]
    async fn registers_and_proves_across_reloads() {
        let dir = tempfile::tempdir().expect("tempdir creation failed");
        let snapshot = dir.path().join("group.tree");

        let (i0, _) = register_commitment(&snapshot, 4, fe!(10))
            .await
            .expect("register failed");
        let (i1, root) = register_commitment(&snapshot, 4, fe!(11))
            .await
            .expect("register failed");
        assert_eq!((i0, i1), (0, 1));

        let proof = prove_membership(&snapshot, 1).await.expect("prove failed");
        assert_eq!(proof.root, root);
        assert!(proof.verifies_for(fe!(11)));
    }

    #[tokio::test]
    async fn missing_leaf_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir creation failed");
        let snapshot = dir.path().join("group.tree");
        register_commitment(&snapshot, 4, fe!(10))
            .await
            .expect("register failed");
        assert!(prove_membership(&snapshot, 5).await.is_err());
    }
}
