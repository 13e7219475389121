//! Identity secrets file model.
//!
//! The core never persists identities; this model exists for callers (the
//! CLI) that choose to store their own secrets between sessions. The
//! commitment field is informational only and is recomputed on load.

use serde::{Deserialize, Serialize};

use crate::base::Element;
use crate::identity::Identity;

/// On-disk identity secrets. Handle like key material.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IdentityFile {
    /// The private trapdoor.
    pub trapdoor: Element,
    /// The private nullifier secret.
    pub nullifier_secret: Element,
    /// The public commitment (recomputed, never trusted, on load).
    pub commitment: Element,
}

impl From<&Identity> for IdentityFile {
    fn from(identity: &Identity) -> Self {
        Self {
            trapdoor: identity.trapdoor(),
            nullifier_secret: identity.nullifier_secret(),
            commitment: identity.commitment(),
        }
    }
}

impl From<IdentityFile> for Identity {
    fn from(file: IdentityFile) -> Self {
        Self::from_parts(file.trapdoor, file.nullifier_secret)
    }
}
