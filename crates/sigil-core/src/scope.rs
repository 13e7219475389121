//! Signaling scopes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::base::{DOM_SCOPE, Element, hash_to_element};

/// An application-chosen context value (epoch, topic) a signal and its
/// nullifier are bound to.
///
/// Two signals by the same identity in distinct scopes produce distinct
/// nullifier hashes and are never confused as duplicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope(Element);

impl Scope {
    /// Build a scope from an arbitrary label (e.g. `b"epoch-1"`).
    #[must_use]
    pub fn new(label: &[u8]) -> Self {
        Self(hash_to_element(DOM_SCOPE, label))
    }

    /// Wrap an already-reduced scope element.
    #[must_use]
    pub const fn from_element(element: Element) -> Self {
        Self(element)
    }

    /// The scope's field element.
    #[must_use]
    pub const fn element(&self) -> Element {
        self.0
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
