//! Workflow logic for the sigil anonymous-signaling protocol.
//!
//! Async orchestration over the core crates: identity derivation from
//! wallet signatures, registration against a tree snapshot, cancellable
//! and timeout-bounded proof building, gate submission, and event
//! tailing. A signal attempt moves Built → Submitted → {Accepted |
//! Rejected}; rejections are terminal here. Retry policy (e.g.
//! refreshing a stale root and rebuilding) belongs to the caller.

/// Workflow commands.
pub mod commands;

/// The fixed challenge string a wallet signs to seed identity derivation.
pub const IDENTITY_CHALLENGE: &str = "Sign this message to create your sigil identity";
