//! Signal proof subcommands.

use std::path::PathBuf;
use std::time::Duration;

use clap::ArgGroup;
use eyre::Context as _;
use sigil_core::scope::Scope;
use sigil_proofs::TranscriptBackend;
use sigil_sdk::commands::{BuildOptions, build_signal, load_identity_file, prove_membership};

use super::constants::{
    DEFAULT_IDENTITY_FILE, DEFAULT_SIGNAL_FILE, DEFAULT_TREE_FILE, SIGIL_IDENTITY_FILE,
    SIGIL_PAYLOAD_FILE, SIGIL_PROOF_TIMEOUT_SECS, SIGIL_SCOPE, SIGIL_SIGNAL_FILE, SIGIL_TREE_FILE,
};

/// Arguments for `sigil signal prove`.
#[derive(Debug, clap::Args)]
pub struct ProveArgs {
    /// Identity secrets file.
    #[arg(long, env = SIGIL_IDENTITY_FILE, default_value = DEFAULT_IDENTITY_FILE)]
    pub identity: PathBuf,

    /// Group tree snapshot file.
    #[arg(long, env = SIGIL_TREE_FILE, default_value = DEFAULT_TREE_FILE)]
    pub tree: PathBuf,

    /// The identity's leaf index in the group tree.
    #[arg(long)]
    pub leaf: u64,

    /// Scope label the signal is bound to (e.g. `epoch-1`).
    #[arg(long, env = SIGIL_SCOPE)]
    pub scope: String,

    /// Signal payload given inline.
    #[arg(long)]
    pub payload: Option<String>,

    /// Read the signal payload from a file.
    #[arg(long, env = SIGIL_PAYLOAD_FILE)]
    pub payload_file: Option<PathBuf>,

    /// Abort proof construction after this many seconds.
    #[arg(long, env = SIGIL_PROOF_TIMEOUT_SECS)]
    pub timeout_secs: Option<u64>,

    /// Output file for the signal proof (JSON).
    #[arg(long, env = SIGIL_SIGNAL_FILE, default_value = DEFAULT_SIGNAL_FILE)]
    pub output: PathBuf,
}

/// Signal command group.
#[derive(Debug, clap::Subcommand)]
pub enum SignalCommands {
    /// Build a signal proof ready for gate submission.
    #[command(group(
        ArgGroup::new("payload_input")
            .args(["payload", "payload_file"])
            .multiple(false)
            .required(true)
    ))]
    Prove {
        /// Prove arguments.
        #[command(flatten)]
        args: ProveArgs,
    },
}

/// Run a signal subcommand.
///
/// # Errors
/// Returns an error on I/O failure, a membership mismatch between the
/// identity and the claimed leaf, or a proving failure.
pub async fn run(command: SignalCommands) -> eyre::Result<()> {
    match command {
        SignalCommands::Prove { args } => {
            let identity = load_identity_file(&args.identity).await?;
            let membership = prove_membership(&args.tree, args.leaf).await?;

            let payload = match (args.payload, args.payload_file) {
                (Some(inline), _) => inline.into_bytes(),
                (None, Some(path)) => tokio::fs::read(&path)
                    .await
                    .wrap_err_with(|| format!("Failed to read payload {}", path.display()))?,
                (None, None) => eyre::bail!("either --payload or --payload-file is required"),
            };

            let options = BuildOptions {
                timeout: args.timeout_secs.map(Duration::from_secs),
                ..BuildOptions::default()
            };
            let signal = build_signal(
                identity,
                membership,
                Scope::new(args.scope.as_bytes()),
                payload,
                TranscriptBackend,
                options,
            )
            .await
            .wrap_err("Failed to build signal proof")?;

            let json =
                serde_json::to_vec_pretty(&signal).wrap_err("Failed to serialize signal proof")?;
            tokio::fs::write(&args.output, json)
                .await
                .wrap_err_with(|| {
                    format!("Failed to write signal proof {}", args.output.display())
                })?;
            tracing::info!(
                nullifier = %signal.public.nullifier_hash,
                path = %args.output.display(),
                "wrote signal proof"
            );
            Ok(())
        }
    }
}
