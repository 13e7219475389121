//! Deterministic identity derivation.
//!
//! An identity is derived from opaque secret material (in practice a wallet
//! signature over a fixed challenge string). Derivation is a pure function:
//! the same material always yields the same identity, so a user can
//! regenerate it from the same signature without re-registering. Only the
//! commitment is ever published; the trapdoor and nullifier secret stay
//! with the session.

use secrecy::{ExposeSecret, SecretSlice};
use thiserror::Error;

use crate::base::{DOM_NULLIFIER_SECRET, DOM_TRAPDOOR, Element, hash_pair, hash_to_element};
use crate::scope::Scope;

/// Errors deriving an identity from secret material.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// The secret material was empty or otherwise unusable.
    #[error("invalid secret material: {0}")]
    InvalidSecretMaterial(&'static str),
}

/// A derived signaling identity.
///
/// Holds the private trapdoor and nullifier secret plus the public
/// commitment `hash_pair(trapdoor, nullifier_secret)`. The struct is
/// immutable; it is meant to live for a single session and is never
/// persisted by the core.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    trapdoor: Element,
    nullifier_secret: Element,
    commitment: Element,
}

impl Identity {
    /// Derive an identity from secret material.
    ///
    /// Trapdoor and nullifier secret are independent domain-tagged
    /// reductions of the material into the field; the commitment binds
    /// both under Poseidon.
    ///
    /// # Errors
    /// Returns [`IdentityError::InvalidSecretMaterial`] if the material is
    /// empty. Derivation has no other failure modes.
    pub fn derive(material: &SecretSlice<u8>) -> Result<Self, IdentityError> {
        let bytes = material.expose_secret();
        if bytes.is_empty() {
            return Err(IdentityError::InvalidSecretMaterial(
                "secret material must not be empty",
            ));
        }

        let trapdoor = hash_to_element(DOM_TRAPDOOR, bytes);
        let nullifier_secret = hash_to_element(DOM_NULLIFIER_SECRET, bytes);
        Ok(Self::from_parts(trapdoor, nullifier_secret))
    }

    /// Reassemble an identity from previously derived secrets.
    ///
    /// Used when a caller has stored its own secrets (e.g. the CLI's
    /// identity file); the commitment is recomputed, never trusted.
    #[must_use]
    pub fn from_parts(trapdoor: Element, nullifier_secret: Element) -> Self {
        let commitment = hash_pair(trapdoor, nullifier_secret);
        Self {
            trapdoor,
            nullifier_secret,
            commitment,
        }
    }

    /// The private trapdoor.
    #[must_use]
    pub const fn trapdoor(&self) -> Element {
        self.trapdoor
    }

    /// The private nullifier secret.
    #[must_use]
    pub const fn nullifier_secret(&self) -> Element {
        self.nullifier_secret
    }

    /// The public identity commitment (the group-tree leaf value).
    #[must_use]
    pub const fn commitment(&self) -> Element {
        self.commitment
    }

    /// The nullifier hash for this identity in the given scope.
    ///
    /// Constant for a fixed (identity, scope) pair across any number of
    /// signal attempts; this is what makes double-signaling detectable.
    #[must_use]
    pub fn nullifier_hash(&self, scope: Scope) -> Element {
        hash_pair(self.nullifier_secret, scope.element())
    }
}
