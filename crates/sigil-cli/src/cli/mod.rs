//! Command-line interface for the `sigil` CLI application.

pub mod constants;
pub mod gate;
pub mod group;
pub mod key;
pub mod signal;

use clap::Parser;

pub use self::gate::GateCommands;
pub use self::group::GroupCommands;
pub use self::key::KeyCommands;
pub use self::signal::SignalCommands;

/// Command-line interface definition.
#[derive(Debug, Parser)]
#[command(name = "sigil")]
#[command(about = "Anonymous signaling tools")]
pub struct Cli {
    /// CLI top-level command group.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level command groups.
#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Identity key utilities.
    Key {
        /// Key subcommands.
        #[command(subcommand)]
        command: KeyCommands,
    },
    /// Group tree snapshot utilities.
    Group {
        /// Group subcommands.
        #[command(subcommand)]
        command: GroupCommands,
    },
    /// Signal proof construction.
    Signal {
        /// Signal subcommands.
        #[command(subcommand)]
        command: SignalCommands,
    },
    /// Verification gate commands.
    Gate {
        /// Gate subcommands.
        #[command(subcommand)]
        command: GateCommands,
    },
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use super::*;

    const ONE_HEX: &str = "0100000000000000000000000000000000000000000000000000000000000000";

    #[test]
    fn group_insert_requires_a_member_source() {
        let cli = Cli::try_parse_from(["sigil", "group", "insert"]);
        assert!(cli.is_err());

        let cli = Cli::try_parse_from(["sigil", "group", "insert", "--identity", "identity.json"]);
        assert!(cli.is_ok());

        let cli = Cli::try_parse_from([
            "sigil",
            "group",
            "insert",
            "--identity",
            "identity.json",
            "--commitment",
            ONE_HEX,
        ]);
        assert!(cli.is_err());
    }

    #[test]
    fn signal_prove_requires_a_payload_source() {
        let cli = Cli::try_parse_from([
            "sigil", "signal", "prove", "--leaf", "0", "--scope", "epoch-1",
        ]);
        assert!(cli.is_err());

        let cli = Cli::try_parse_from([
            "sigil", "signal", "prove", "--leaf", "0", "--scope", "epoch-1", "--payload", "hello",
        ]);
        assert!(cli.is_ok());
    }

    #[test]
    fn gate_track_root_accepts_either_source() {
        let cli = Cli::try_parse_from(["sigil", "gate", "track-root"]);
        assert!(cli.is_ok());

        let cli = Cli::try_parse_from(["sigil", "gate", "track-root", "--root", ONE_HEX]);
        assert!(cli.is_ok());
    }
}
