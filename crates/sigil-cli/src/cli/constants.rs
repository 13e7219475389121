//! Shared constants for CLI.

// -------------------------
// Environment variables
// -------------------------

// Key
pub const SIGIL_SIGNATURE_FILE: &str = "SIGIL_SIGNATURE_FILE";
pub const SIGIL_IDENTITY_FILE: &str = "SIGIL_IDENTITY_FILE";

// Group
pub const SIGIL_TREE_FILE: &str = "SIGIL_TREE_FILE";
pub const SIGIL_TREE_DEPTH: &str = "SIGIL_TREE_DEPTH";
pub const SIGIL_MEMBERSHIP_FILE: &str = "SIGIL_MEMBERSHIP_FILE";

// Signal
pub const SIGIL_SCOPE: &str = "SIGIL_SCOPE";
pub const SIGIL_PAYLOAD_FILE: &str = "SIGIL_PAYLOAD_FILE";
pub const SIGIL_SIGNAL_FILE: &str = "SIGIL_SIGNAL_FILE";
pub const SIGIL_PROOF_TIMEOUT_SECS: &str = "SIGIL_PROOF_TIMEOUT_SECS";

// Gate
pub const SIGIL_GATE_DIR: &str = "SIGIL_GATE_DIR";
pub const SIGIL_ROOT_WINDOW: &str = "SIGIL_ROOT_WINDOW";
pub const SIGIL_FROM_SEQ: &str = "SIGIL_FROM_SEQ";

// -------------------------
// Default values
// -------------------------

pub const DEFAULT_IDENTITY_FILE: &str = "identity.json";
pub const DEFAULT_TREE_FILE: &str = "group.tree";
pub const DEFAULT_MEMBERSHIP_FILE: &str = "membership.json";
pub const DEFAULT_SIGNAL_FILE: &str = "signal.json";
pub const DEFAULT_GATE_DIR: &str = "gate";
pub const DEFAULT_TREE_DEPTH: &str = "20";
