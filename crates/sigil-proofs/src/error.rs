use thiserror::Error;

/// Errors raised by a proving backend.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BackendError {
    /// The witness does not satisfy the circuit relation.
    #[error("witness does not satisfy the relation: {0}")]
    ConstraintUnsatisfied(&'static str),

    /// The backend failed for an internal reason (resource exhaustion,
    /// malformed parameters, expiry).
    #[error("backend failure: {0}")]
    External(String),
}

/// Errors building a signal proof.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProofError {
    /// The membership proof's leaf does not correspond to the identity's
    /// commitment (or the path does not reproduce its own root).
    #[error("membership proof does not match the identity commitment")]
    MembershipMismatch,

    /// The external prover rejected the witness or failed.
    #[error("proving failed: {0}")]
    ProvingFailure(#[from] BackendError),
}
