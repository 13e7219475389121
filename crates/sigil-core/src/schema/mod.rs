//! Serialized/public schema models.

/// Identity secrets file model (CLI-owned storage).
pub mod identity_file;
/// Merkle membership proof model.
pub mod membership;
/// Signal proof, public inputs, and accepted-signal models.
pub mod signal;
