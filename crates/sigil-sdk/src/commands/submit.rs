//! Gate submission and log replay.

use sigil_core::schema::signal::{AcceptedSignal, SignalProof};
use sigil_core::scope::Scope;
use sigil_gate::{Accepted, Gate, GateError};
use sigil_proofs::SignalBackend;

/// Submit a signal proof to a gate.
///
/// Thin over [`Gate::verify`]; exists so callers get uniform logging of
/// the accept/reject outcome.
///
/// # Errors
/// Propagates the gate's decision: [`GateError::StaleRoot`],
/// [`GateError::InvalidProof`], [`GateError::DuplicateSignal`], or a
/// storage failure.
pub fn submit_signal<B: SignalBackend>(
    gate: &Gate<B>,
    submission: &SignalProof,
    scope: Scope,
) -> Result<Accepted, GateError> {
    match gate.verify(submission, scope) {
        Ok(accepted) => {
            tracing::info!(seq = accepted.seq, digest = %accepted.signal_digest, "signal accepted");
            Ok(accepted)
        }
        Err(e) => {
            tracing::debug!(error = %e, "signal rejected");
            Err(e)
        }
    }
}

/// Collect the accepted-signal log from `from_seq` onward.
///
/// # Errors
/// Returns a [`GateError`] if a log entry cannot be read or decoded.
pub fn replay_signals<B: SignalBackend>(
    gate: &Gate<B>,
    from_seq: u64,
) -> Result<Vec<AcceptedSignal>, GateError> {
    gate.signals_from(from_seq).collect()
}
