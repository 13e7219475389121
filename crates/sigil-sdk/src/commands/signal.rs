//! Cancellable, timeout-bounded proof building.

use std::time::Duration;

use sigil_core::identity::Identity;
use sigil_core::schema::membership::MembershipProof;
use sigil_core::schema::signal::SignalProof;
use sigil_core::scope::Scope;
use sigil_proofs::{BackendError, ProofError, SignalBackend, build_proof};
use tokio_util::sync::CancellationToken;

/// Options bounding a proof-building run.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Abort with `ProvingFailure` once this much wall time has passed.
    pub timeout: Option<Duration>,
    /// Cooperative cancellation (user abandoned the flow).
    pub cancel: CancellationToken,
}

fn proving_failure(reason: &str) -> ProofError {
    ProofError::ProvingFailure(BackendError::External(reason.to_owned()))
}

/// Build a signal proof on the blocking pool.
///
/// Proof construction is the system's CPU cost center (seconds-scale for
/// real backends), so it runs on `spawn_blocking` and is bounded by the
/// caller's timeout and cancellation token. The builder owns no external
/// resources; an abandoned run leaves no partial state behind.
///
/// # Errors
/// [`ProofError::MembershipMismatch`] or [`ProofError::ProvingFailure`]
/// from the builder; timeout and cancellation also surface as
/// [`ProofError::ProvingFailure`].
pub async fn build_signal<B>(
    identity: Identity,
    membership: MembershipProof,
    scope: Scope,
    payload: Vec<u8>,
    backend: B,
    options: BuildOptions,
) -> Result<SignalProof, ProofError>
where
    B: SignalBackend + 'static,
{
    let handle = tokio::task::spawn_blocking(move || {
        build_proof(&identity, &membership, scope, &payload, &backend)
    });

    let work = async {
        let joined = match options.timeout {
            Some(limit) => match tokio::time::timeout(limit, handle).await {
                Ok(joined) => joined,
                Err(_elapsed) => {
                    tracing::warn!(?limit, "proof construction timed out");
                    return Err(proving_failure("proof construction timed out"));
                }
            },
            None => handle.await,
        };
        match joined {
            Ok(result) => result,
            Err(e) => Err(proving_failure(&format!("proving task failed: {e}"))),
        }
    };

    tokio::select! {
        () = options.cancel.cancelled() => {
            tracing::debug!("proof construction cancelled");
            Err(proving_failure("proof construction cancelled"))
        }
        result = work => result,
    }
}
