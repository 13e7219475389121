//! Canonical field element wrapper.
//!
//! All protocol values (commitments, roots, nullifier hashes, digests)
//! are Pallas base field elements with a fixed 32-byte little-endian
//! canonical encoding. Non-canonical encodings are rejected on decode.

use std::fmt;
use std::str::FromStr;

use ff::PrimeField;
use pasta_curves::pallas;

/// Size in bytes of a serialized field element.
pub const ELEMENT_SIZE: usize = 32;

/// A Pallas base field element with canonical byte/hex encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Element(pallas::Base);

impl Element {
    /// The additive identity; also the empty-leaf value of the group tree.
    pub const ZERO: Self = Self(pallas::Base::zero());

    pub(crate) const fn new(inner: pallas::Base) -> Self {
        Self(inner)
    }

    pub(crate) const fn inner(&self) -> pallas::Base {
        self.0
    }

    /// Serialize to the canonical 32-byte little-endian representation.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; ELEMENT_SIZE] {
        self.0.to_repr()
    }

    /// Deserialize from a canonical 32-byte little-endian representation.
    ///
    /// Returns `None` if the bytes are not a canonical encoding of a
    /// Pallas base field element.
    #[must_use]
    pub fn from_bytes(bytes: &[u8; ELEMENT_SIZE]) -> Option<Self> {
        Option::from(pallas::Base::from_repr(*bytes)).map(Self)
    }
}

impl From<u64> for Element {
    fn from(value: u64) -> Self {
        Self(pallas::Base::from(value))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.to_bytes()))
    }
}

/// Errors decoding an [`Element`] from its hex form.
// No `Eq`: `hex::FromHexError` only implements `PartialEq`.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ParseElementError {
    /// The string is not valid hex.
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    /// The decoded bytes are not exactly 32 bytes long.
    #[error("expected {ELEMENT_SIZE} bytes, got {0}")]
    InvalidLength(usize),
    /// The bytes are not a canonical field element encoding.
    #[error("non-canonical pallas base encoding")]
    NonCanonical,
}

impl FromStr for Element {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        let arr: [u8; ELEMENT_SIZE] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ParseElementError::InvalidLength(bytes.len()))?;
        Self::from_bytes(&arr).ok_or(ParseElementError::NonCanonical)
    }
}

impl serde::Serialize for Element {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&hex::encode(self.to_bytes()))
    }
}

impl<'de> serde::Deserialize<'de> for Element {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
