//! Witness assembly.

use sigil_core::base::{Element, hash_pair};
use sigil_core::schema::membership::PathStep;
use sigil_core::schema::signal::PublicInputs;
use sigil_core::scope::Scope;

/// The private and public assignment handed to a proving backend.
///
/// Binds the identity secrets, the membership path, the anchored root,
/// the scope, and the signal digest. The backend's job is to prove the
/// relation without revealing the private parts.
#[derive(Clone, Debug)]
pub struct SignalWitness {
    /// Private: the identity trapdoor.
    pub trapdoor: Element,
    /// Private: the identity nullifier secret.
    pub nullifier_secret: Element,
    /// Private: the leaf's index in the group tree.
    pub leaf_index: u64,
    /// Private: the sibling path, leaf-to-root.
    pub siblings: Vec<PathStep>,
    /// Public: the root the membership claim is anchored to.
    pub root: Element,
    /// Public: the scope the nullifier is bound to.
    pub scope: Scope,
    /// Public: the signal payload digest.
    pub signal_digest: Element,
}

impl SignalWitness {
    /// The identity commitment implied by the private secrets.
    #[must_use]
    pub fn commitment(&self) -> Element {
        hash_pair(self.trapdoor, self.nullifier_secret)
    }

    /// The public outputs this witness commits to.
    #[must_use]
    pub fn public_inputs(&self) -> PublicInputs {
        PublicInputs {
            nullifier_hash: hash_pair(self.nullifier_secret, self.scope.element()),
            signal_digest: self.signal_digest,
            root: self.root,
            scope: self.scope.element(),
        }
    }
}
