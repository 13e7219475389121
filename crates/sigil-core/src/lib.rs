//! Sigil base primitives and schemas.

/// Foundational field/byte primitives and hashing helpers shared across crates.
pub mod base;
/// Deterministic identity derivation from secret material.
pub mod identity;
/// Serialized/public schema models used across the workspace.
pub mod schema;
/// Signaling scopes (epoch/topic contexts).
pub mod scope;
