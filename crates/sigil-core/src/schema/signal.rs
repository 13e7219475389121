//! Signal proof, public inputs, and accepted-signal models.

use serde::{Deserialize, Serialize};
use serde_with::hex::Hex;
use serde_with::serde_as;

use crate::base::{ELEMENT_SIZE, Element};

/// The public outputs a signal proof commits to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicInputs {
    /// Nullifier hash: the sole de-duplication key.
    pub nullifier_hash: Element,
    /// Digest binding the signal payload.
    pub signal_digest: Element,
    /// The group-tree root the membership claim is anchored to.
    pub root: Element,
    /// The scope element the nullifier hash was derived under. Binding it
    /// here pins a proof to one scope; the gate rejects submissions whose
    /// claimed scope disagrees.
    pub scope: Element,
}

impl PublicInputs {
    /// Canonical byte encoding: the four element reprs concatenated.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; ELEMENT_SIZE * 4] {
        let mut out = [0_u8; ELEMENT_SIZE * 4];
        let (a, rest) = out.split_at_mut(ELEMENT_SIZE);
        let (b, rest) = rest.split_at_mut(ELEMENT_SIZE);
        let (c, d) = rest.split_at_mut(ELEMENT_SIZE);
        a.copy_from_slice(&self.nullifier_hash.to_bytes());
        b.copy_from_slice(&self.signal_digest.to_bytes());
        c.copy_from_slice(&self.root.to_bytes());
        d.copy_from_slice(&self.scope.to_bytes());
        out
    }
}

/// An opaque proof plus its public outputs, ready for submission.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalProof {
    /// Backend proof bytes.
    #[serde_as(as = "Hex")]
    pub proof: Vec<u8>,
    /// The public outputs the proof commits to.
    pub public: PublicInputs,
}

/// A record of an accepted signal, as persisted by the gate's log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedSignal {
    /// Monotonic sequence number in the gate's log.
    pub seq: u64,
    /// The scope the signal was accepted in.
    pub scope: Element,
    /// The recorded nullifier hash.
    pub nullifier_hash: Element,
    /// The accepted signal's public digest.
    pub signal_digest: Element,
}
