use thiserror::Error;

/// Rejection reasons and failures of the verification gate.
///
/// `StaleRoot`, `InvalidProof`, and `DuplicateSignal` are terminal for the
/// attempt that raised them; the gate never retries. `StaleRoot` is the
/// one condition expected to be transient in normal operation: callers
/// refresh the root and rebuild the proof.
#[derive(Debug, Error)]
pub enum GateError {
    /// The submission's root is outside the recognized root window.
    #[error("proof root is not in the recognized root window")]
    StaleRoot,

    /// The proving backend rejected the proof (or failed/expired).
    #[error("proof failed verification")]
    InvalidProof,

    /// The nullifier hash was already accepted in this scope.
    #[error("nullifier already seen in this scope")]
    DuplicateSignal,

    /// Underlying storage failure.
    #[error("gate storage error: {0}")]
    Storage(#[from] sled::Error),

    /// A persisted record failed to (de)serialize.
    #[error("gate codec error: {0}")]
    Codec(String),

    /// The root window lock was poisoned.
    #[error("root window lock poisoned")]
    LockPoisoned,
}

impl From<serde_json::Error> for GateError {
    fn from(e: serde_json::Error) -> Self {
        Self::Codec(e.to_string())
    }
}
