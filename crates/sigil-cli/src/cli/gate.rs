//! Verification gate subcommands.

use std::path::PathBuf;

use clap::ArgGroup;
use eyre::Context as _;
use sigil_core::base::Element;
use sigil_core::schema::signal::{AcceptedSignal, SignalProof};
use sigil_core::scope::Scope;
use sigil_gate::{Gate, GateConfig};
use sigil_proofs::TranscriptBackend;
use sigil_sdk::commands::{load_tree, replay_signals, submit_signal};
use tokio::sync::broadcast::error::RecvError;

use super::constants::{
    DEFAULT_GATE_DIR, DEFAULT_SIGNAL_FILE, DEFAULT_TREE_FILE, SIGIL_FROM_SEQ, SIGIL_GATE_DIR,
    SIGIL_ROOT_WINDOW, SIGIL_SCOPE, SIGIL_SIGNAL_FILE, SIGIL_TREE_FILE,
};

/// Arguments shared by all gate subcommands.
#[derive(Debug, clap::Args)]
pub struct GateArgs {
    /// Directory holding the gate's database.
    #[arg(long, env = SIGIL_GATE_DIR, default_value = DEFAULT_GATE_DIR)]
    pub gate_dir: PathBuf,

    /// Override the recognized-root window size.
    #[arg(long, env = SIGIL_ROOT_WINDOW)]
    pub root_window: Option<usize>,
}

/// Arguments for `sigil gate track-root`.
#[derive(Debug, clap::Args)]
pub struct TrackRootArgs {
    /// Gate arguments.
    #[command(flatten)]
    pub gate: GateArgs,

    /// Track the current root of this tree snapshot.
    #[arg(long, env = SIGIL_TREE_FILE, default_value = DEFAULT_TREE_FILE)]
    pub tree: PathBuf,

    /// Track this root directly (hex), instead of reading a snapshot.
    #[arg(long)]
    pub root: Option<Element>,
}

/// Arguments for `sigil gate submit`.
#[derive(Debug, clap::Args)]
pub struct SubmitArgs {
    /// Gate arguments.
    #[command(flatten)]
    pub gate: GateArgs,

    /// Signal proof file (JSON).
    #[arg(long, env = SIGIL_SIGNAL_FILE, default_value = DEFAULT_SIGNAL_FILE)]
    pub signal: PathBuf,

    /// Scope label the signal was bound to.
    #[arg(long, env = SIGIL_SCOPE)]
    pub scope: String,
}

/// Arguments for `sigil gate replay` and `sigil gate tail`.
#[derive(Debug, clap::Args)]
pub struct ReplayArgs {
    /// Gate arguments.
    #[command(flatten)]
    pub gate: GateArgs,

    /// First sequence number to emit.
    #[arg(long, env = SIGIL_FROM_SEQ, default_value_t = 0)]
    pub from: u64,
}

/// Gate command group.
#[derive(Debug, clap::Subcommand)]
pub enum GateCommands {
    /// Recognize a group root for future submissions.
    #[command(group(
        ArgGroup::new("root_source")
            .args(["tree", "root"])
            .multiple(false)
    ))]
    TrackRoot {
        /// Track-root arguments.
        #[command(flatten)]
        args: TrackRootArgs,
    },

    /// Submit a signal proof for verification.
    Submit {
        /// Submit arguments.
        #[command(flatten)]
        args: SubmitArgs,
    },

    /// Print the accepted-signal log from a sequence number, then exit.
    Replay {
        /// Replay arguments.
        #[command(flatten)]
        args: ReplayArgs,
    },

    /// Print the accepted-signal log, then follow live accepts until Ctrl-C.
    Tail {
        /// Tail arguments.
        #[command(flatten)]
        args: ReplayArgs,
    },
}

fn open_gate(args: &GateArgs) -> eyre::Result<Gate<TranscriptBackend>> {
    let mut config = GateConfig::new(&args.gate_dir);
    if let Some(window) = args.root_window {
        config.root_window = window;
    }
    Gate::open(&config, TranscriptBackend)
        .wrap_err_with(|| format!("Failed to open gate at {}", args.gate_dir.display()))
}

#[allow(clippy::print_stdout, reason = "Prints log records to stdout for scripting")]
fn print_record(record: &AcceptedSignal) -> eyre::Result<()> {
    let json = serde_json::to_string(record).wrap_err("Failed to serialize log record")?;
    println!("{json}");
    Ok(())
}

async fn tail(gate: &Gate<TranscriptBackend>, from: u64) -> eyre::Result<()> {
    // Subscribe before replaying so nothing accepted in between is lost;
    // live events already covered by the replay are skipped by seq.
    let mut rx = gate.subscribe();
    let mut next = from;
    for record in replay_signals(gate, from)? {
        next = record.seq.saturating_add(1);
        print_record(&record)?;
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = rx.recv() => match event {
                Ok(record) if record.seq >= next => {
                    next = record.seq.saturating_add(1);
                    print_record(&record)?;
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "live stream lagged; rerun replay to catch up");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }
    Ok(())
}

/// Run a gate subcommand.
///
/// # Errors
/// Returns an error on storage failure or a rejected submission (stale
/// root, invalid proof, duplicate signal).
pub async fn run(command: GateCommands) -> eyre::Result<()> {
    match command {
        GateCommands::TrackRoot { args } => {
            let root = match args.root {
                Some(root) => root,
                None => load_tree(&args.tree).await?.current_root(),
            };
            let gate = open_gate(&args.gate)?;
            gate.track_root(root)?;
            tracing::info!(%root, "tracked group root");
            Ok(())
        }
        GateCommands::Submit { args } => {
            let bytes = tokio::fs::read(&args.signal)
                .await
                .wrap_err_with(|| format!("Failed to read signal proof {}", args.signal.display()))?;
            let signal: SignalProof =
                serde_json::from_slice(&bytes).wrap_err("Failed to parse signal proof")?;
            let gate = open_gate(&args.gate)?;
            let accepted = submit_signal(&gate, &signal, Scope::new(args.scope.as_bytes()))?;
            tracing::info!(seq = accepted.seq, digest = %accepted.signal_digest, "signal accepted");
            Ok(())
        }
        GateCommands::Replay { args } => {
            let gate = open_gate(&args.gate)?;
            for record in replay_signals(&gate, args.from)? {
                print_record(&record)?;
            }
            Ok(())
        }
        GateCommands::Tail { args } => {
            let gate = open_gate(&args.gate)?;
            tail(&gate, args.from).await
        }
    }
}
