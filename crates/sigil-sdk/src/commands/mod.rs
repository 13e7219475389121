//! Workflow commands over the core crates.

mod identity;
mod register;
mod signal;
mod submit;

pub use identity::{derive_identity, load_identity_file, read_secret_material, write_identity_file};
pub use register::{load_tree, prove_membership, register_commitment};
pub use signal::{BuildOptions, build_signal};
pub use submit::{replay_signals, submit_signal};
