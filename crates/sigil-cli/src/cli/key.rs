//! Identity key subcommands.

use std::path::PathBuf;

use sigil_sdk::IDENTITY_CHALLENGE;
use sigil_sdk::commands::{derive_identity, read_secret_material, write_identity_file};

use super::constants::{DEFAULT_IDENTITY_FILE, SIGIL_IDENTITY_FILE, SIGIL_SIGNATURE_FILE};

/// Arguments for `sigil key derive`.
#[derive(Debug, clap::Args)]
pub struct DeriveArgs {
    /// File holding the wallet signature over the challenge string
    /// printed by `key challenge` (raw bytes or hex).
    #[arg(long, env = SIGIL_SIGNATURE_FILE)]
    pub signature: PathBuf,

    /// Output file for the identity secrets.
    #[arg(long, env = SIGIL_IDENTITY_FILE, default_value = DEFAULT_IDENTITY_FILE)]
    pub output: PathBuf,
}

/// Key command group.
#[derive(Debug, clap::Subcommand)]
pub enum KeyCommands {
    /// Print the challenge string the wallet must sign for `key derive`.
    Challenge,

    /// Derive an identity from a wallet signature and write its secrets file.
    Derive {
        /// Derive arguments.
        #[command(flatten)]
        args: DeriveArgs,
    },
}

#[allow(clippy::print_stdout, reason = "Prints the challenge to stdout for scripting")]
fn print_challenge() {
    println!("{IDENTITY_CHALLENGE}");
}

/// Run a key subcommand.
///
/// # Errors
/// Returns an error if the signature cannot be read or the identity file
/// cannot be written.
pub async fn run(command: KeyCommands) -> eyre::Result<()> {
    match command {
        KeyCommands::Challenge => {
            print_challenge();
            Ok(())
        }
        KeyCommands::Derive { args } => {
            let material = read_secret_material(&args.signature).await?;
            let identity = derive_identity(&material)?;
            write_identity_file(&args.output, &identity).await
        }
    }
}
