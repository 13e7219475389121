//! Foundational primitive types and hashing helpers.

mod element;
mod hashing;

pub use element::{ELEMENT_SIZE, Element};
pub use hashing::{DOM_SCOPE, DOM_SIGNAL, hash_pair, hash_to_element, signal_digest};
pub(crate) use hashing::{DOM_NULLIFIER_SECRET, DOM_TRAPDOOR};
