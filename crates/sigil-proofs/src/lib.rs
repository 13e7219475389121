//! Signal proof construction.
//!
//! The proving system itself is an external collaborator: any
//! non-interactive backend implementing [`SignalBackend`] can be plugged
//! in. This crate owns witness assembly, the public-input contract, and
//! the [`build_proof`] entry point that drives a backend. Proof building
//! is a pure, potentially seconds-scale computation; callers wanting
//! timeouts or cancellation wrap it (see `sigil-sdk`).

mod backend;
mod builder;
mod error;
mod witness;

pub use backend::{SignalBackend, TranscriptBackend};
pub use builder::build_proof;
pub use error::{BackendError, ProofError};
pub use witness::SignalWitness;
