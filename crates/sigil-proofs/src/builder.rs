//! The signal proof builder.

use sigil_core::base::signal_digest;
use sigil_core::identity::Identity;
use sigil_core::schema::membership::MembershipProof;
use sigil_core::schema::signal::SignalProof;
use sigil_core::scope::Scope;

use crate::backend::SignalBackend;
use crate::error::ProofError;
use crate::witness::SignalWitness;

/// Build a signal proof for an identity, anchored to a membership proof.
///
/// Pure and stateless; safe to run in parallel across sessions. The
/// backend call dominates the cost (seconds-scale for real circuits), so
/// callers that need timeouts or cancellation should wrap this in a
/// blocking task (see `sigil-sdk`).
///
/// # Errors
/// - [`ProofError::MembershipMismatch`] if the membership proof does not
///   authenticate `identity.commitment()` against its own root.
/// - [`ProofError::ProvingFailure`] if the backend rejects the witness or
///   fails internally.
pub fn build_proof(
    identity: &Identity,
    membership: &MembershipProof,
    scope: Scope,
    payload: &[u8],
    backend: &dyn SignalBackend,
) -> Result<SignalProof, ProofError> {
    if !membership.verifies_for(identity.commitment()) {
        return Err(ProofError::MembershipMismatch);
    }

    let witness = SignalWitness {
        trapdoor: identity.trapdoor(),
        nullifier_secret: identity.nullifier_secret(),
        leaf_index: membership.leaf_index,
        siblings: membership.siblings.clone(),
        root: membership.root,
        scope,
        signal_digest: signal_digest(payload),
    };

    let public = witness.public_inputs();
    debug_assert_eq!(public.root, membership.root);
    debug_assert_eq!(public.nullifier_hash, identity.nullifier_hash(scope));
    debug_assert_eq!(public.scope, scope.element());

    let proof = backend.prove(&witness)?;
    Ok(SignalProof { proof, public })
}

#[cfg(test)]
mod tests {
    use secrecy::SecretSlice;
    use sigil_core::base::Element;
    use sigil_tree::GroupTree;
    use test_utils::fe;

    use super::*;
    use crate::backend::TranscriptBackend;

    fn identity(material: &[u8]) -> Identity {
        Identity::derive(&SecretSlice::from(material.to_vec())).expect("derive failed")
    }

    fn registered(identity: &Identity) -> (GroupTree, MembershipProof) {
        let mut tree = GroupTree::new(4).expect("tree creation failed");
        tree.insert(fe!(1)).expect("insert failed");
        let index = tree.insert(identity.commitment()).expect("insert failed");
        let proof = tree.prove_membership(index).expect("proof generation failed");
        (tree, proof)
    }

    #[test]
    fn builds_proof_with_expected_public_outputs() {
        let identity = identity(b"signature");
        let (tree, membership) = registered(&identity);
        let scope = Scope::new(b"epoch-1");

        let signal = build_proof(&identity, &membership, scope, b"hello", &TranscriptBackend)
            .expect("build failed");

        assert_eq!(signal.public.root, tree.current_root());
        assert_eq!(signal.public.signal_digest, signal_digest(b"hello"));
        assert_eq!(signal.public.nullifier_hash, identity.nullifier_hash(scope));
        let verified = TranscriptBackend
            .verify(&signal.proof, &signal.public)
            .expect("verify errored");
        assert!(verified);
    }

    #[test]
    fn building_twice_yields_the_same_nullifier_hash() {
        let identity = identity(b"signature");
        let (_tree, membership) = registered(&identity);
        let scope = Scope::new(b"epoch-1");

        let first = build_proof(&identity, &membership, scope, b"first", &TranscriptBackend)
            .expect("build failed");
        let second = build_proof(&identity, &membership, scope, b"second", &TranscriptBackend)
            .expect("build failed");
        assert_eq!(first.public.nullifier_hash, second.public.nullifier_hash);
        assert_ne!(first.public.signal_digest, second.public.signal_digest);
    }

    #[test]
    fn distinct_scopes_yield_distinct_nullifier_hashes() {
        let identity = identity(b"signature");
        let (_tree, membership) = registered(&identity);

        let a = build_proof(
            &identity,
            &membership,
            Scope::new(b"epoch-1"),
            b"hello",
            &TranscriptBackend,
        )
        .expect("build failed");
        let b = build_proof(
            &identity,
            &membership,
            Scope::new(b"epoch-2"),
            b"hello",
            &TranscriptBackend,
        )
        .expect("build failed");
        assert_ne!(a.public.nullifier_hash, b.public.nullifier_hash);
    }

    #[test]
    fn someone_elses_membership_proof_is_rejected() {
        let alice = identity(b"alice signature");
        let mallory = identity(b"mallory signature");
        let (_tree, membership) = registered(&alice);

        let err = build_proof(
            &mallory,
            &membership,
            Scope::new(b"epoch-1"),
            b"hello",
            &TranscriptBackend,
        )
        .expect_err("foreign membership proof must fail");
        assert_eq!(err, ProofError::MembershipMismatch);
    }

    #[test]
    fn corrupted_path_is_rejected() {
        let identity = identity(b"signature");
        let (_tree, mut membership) = registered(&identity);
        if let Some(step) = membership.siblings.first_mut() {
            step.sibling = Element::from(77_u64);
        }

        let err = build_proof(
            &identity,
            &membership,
            Scope::new(b"epoch-1"),
            b"hello",
            &TranscriptBackend,
        )
        .expect_err("corrupted path must fail");
        assert_eq!(err, ProofError::MembershipMismatch);
    }
}
