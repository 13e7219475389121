//! The proving-backend capability.

use blake2b_simd::Params;
use sigil_core::schema::membership::{MembershipProof, Side};
use sigil_core::schema::signal::PublicInputs;

use crate::error::BackendError;
use crate::witness::SignalWitness;

/// A substitutable non-interactive proving system.
///
/// Implementations own the circuit and its proving/verification keys as
/// opaque artifacts. `prove` must reject witnesses that do not satisfy
/// the relation; `verify` must accept exactly the proofs produced for
/// the claimed public inputs.
pub trait SignalBackend: Send + Sync {
    /// Produce a proof for the witness.
    ///
    /// # Errors
    /// Returns [`BackendError::ConstraintUnsatisfied`] for witnesses that
    /// do not satisfy the relation, [`BackendError::External`] for
    /// backend-internal failures.
    fn prove(&self, witness: &SignalWitness) -> Result<Vec<u8>, BackendError>;

    /// Check a proof against its claimed public inputs.
    ///
    /// # Errors
    /// Returns [`BackendError::External`] for backend-internal failures;
    /// an invalid proof is `Ok(false)`, not an error.
    fn verify(&self, proof: &[u8], public: &PublicInputs) -> Result<bool, BackendError>;
}

const DOM_PROOF: &[u8] = b"sigil:proof";
const PROOF_LEN: usize = 64;

/// A transcript-bound stand-in for the external circuit.
///
/// `prove` natively checks every constraint the real circuit would
/// enforce, then emits a BLAKE2b transcript over the public-input
/// encoding. The output binds the public inputs but hides nothing and is
/// forgeable by anyone who knows them: it is NOT zero-knowledge and NOT
/// sound against forgery. Use it for tests and local development only;
/// production deployments substitute an audited NIZK backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct TranscriptBackend;

impl TranscriptBackend {
    fn transcript(public: &PublicInputs) -> Vec<u8> {
        Params::new()
            .hash_length(PROOF_LEN)
            .personal(DOM_PROOF)
            .hash(&public.to_bytes())
            .as_bytes()
            .to_vec()
    }

    fn check_relation(witness: &SignalWitness) -> Result<(), BackendError> {
        // Mirror of the circuit constraints, evaluated natively.
        let path = MembershipProof {
            root: witness.root,
            leaf_index: witness.leaf_index,
            siblings: witness.siblings.clone(),
        };
        if path.compute_root(witness.commitment()) != witness.root {
            return Err(BackendError::ConstraintUnsatisfied(
                "membership path does not reach the claimed root",
            ));
        }

        // The leaf index must be consistent with the path's side bits.
        let mut index = witness.leaf_index;
        for step in &witness.siblings {
            let expected = match step.side {
                Side::Right => 0,
                Side::Left => 1,
            };
            if index.rem_euclid(2) != expected {
                return Err(BackendError::ConstraintUnsatisfied(
                    "leaf index disagrees with the path sides",
                ));
            }
            index = index.wrapping_div(2);
        }
        if index != 0 {
            return Err(BackendError::ConstraintUnsatisfied(
                "leaf index exceeds the path depth",
            ));
        }
        Ok(())
    }
}

impl SignalBackend for TranscriptBackend {
    fn prove(&self, witness: &SignalWitness) -> Result<Vec<u8>, BackendError> {
        Self::check_relation(witness)?;
        Ok(Self::transcript(&witness.public_inputs()))
    }

    fn verify(&self, proof: &[u8], public: &PublicInputs) -> Result<bool, BackendError> {
        if proof.len() != PROOF_LEN {
            return Ok(false);
        }
        Ok(proof == Self::transcript(public).as_slice())
    }
}
