//! Protocol hashing.
//!
//! Two hash domains are used:
//!
//! - Poseidon (P128Pow5T3, rate 2) over the Pallas base field for everything
//!   that must be cheap inside an arithmetic circuit: identity commitments,
//!   group-tree node combination, and nullifier hashes.
//! - BLAKE2b-512 with a 16-byte personal tag for reducing arbitrary byte
//!   strings (secret material, scope labels, signal payloads) into the field.
//!   The reduction policy is fixed: the full 64-byte digest is interpreted
//!   via `FromUniformBytes<64>`, which keeps the bias negligible.

use blake2b_simd::Params;
use ff::FromUniformBytes;
use halo2_gadgets::poseidon::primitives::{self as poseidon, ConstantLength, P128Pow5T3};
use pasta_curves::pallas;

use super::element::Element;

// BLAKE2b personal tags, at most 16 bytes each.
pub(crate) const DOM_TRAPDOOR: &[u8] = b"sigil:trapdoor";
pub(crate) const DOM_NULLIFIER_SECRET: &[u8] = b"sigil:nullsec";
/// Personal tag for scope derivation.
pub const DOM_SCOPE: &[u8] = b"sigil:scope";
/// Personal tag for signal payload digests.
pub const DOM_SIGNAL: &[u8] = b"sigil:signal";

/// Poseidon hash of two field elements.
///
/// This is the single in-circuit hash of the protocol: commitments are
/// `hash_pair(trapdoor, nullifier_secret)`, tree nodes are
/// `hash_pair(left, right)`, and nullifier hashes are
/// `hash_pair(nullifier_secret, scope)`.
#[must_use]
pub fn hash_pair(left: Element, right: Element) -> Element {
    let digest = poseidon::Hash::<pallas::Base, P128Pow5T3, ConstantLength<2>, 3, 2>::init()
        .hash([left.inner(), right.inner()]);
    Element::new(digest)
}

/// Reduce arbitrary bytes into the field under a BLAKE2b personal tag.
#[must_use]
pub fn hash_to_element(personal: &[u8], input: &[u8]) -> Element {
    let hash = Params::new().hash_length(64).personal(personal).hash(input);
    let mut wide = [0_u8; 64];
    wide.copy_from_slice(hash.as_bytes());
    Element::new(pallas::Base::from_uniform_bytes(&wide))
}

/// The public digest binding a signal payload into a proof.
///
/// Two payloads count as "the same signal" exactly when their tagged
/// BLAKE2b-512 digests reduce to the same field element.
#[must_use]
pub fn signal_digest(payload: &[u8]) -> Element {
    hash_to_element(DOM_SIGNAL, payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_pair_is_deterministic_and_order_sensitive() {
        let a = Element::from(1_u64);
        let b = Element::from(2_u64);
        assert_eq!(hash_pair(a, b), hash_pair(a, b));
        assert_ne!(hash_pair(a, b), hash_pair(b, a));
    }

    #[test]
    fn personal_tags_separate_domains() {
        let input = b"same input";
        assert_ne!(
            hash_to_element(DOM_SCOPE, input),
            hash_to_element(DOM_SIGNAL, input)
        );
    }

    #[test]
    fn signal_digest_matches_payload_bytes_only() {
        assert_eq!(signal_digest(b"hello"), signal_digest(b"hello"));
        assert_ne!(signal_digest(b"hello"), signal_digest(b"hello!"));
    }
}
