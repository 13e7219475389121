//! The verification gate.
//!
//! The protocol's sole correctness gate: a submitted proof is checked
//! against the recognized root window and the proving backend, then its
//! nullifier hash is recorded atomically with the accept decision. A
//! nullifier is accepted exactly once per scope; the persisted
//! accepted-signal log is a restartable event stream any party can
//! consume from an arbitrary sequence number.

mod error;
mod gate;
mod roots;

pub use error::GateError;
pub use gate::{Accepted, Gate, GateConfig};
pub use roots::RootWindow;
