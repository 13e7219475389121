//! Group tree subcommands.

use std::path::PathBuf;

use clap::ArgGroup;
use eyre::Context as _;
use sigil_core::base::Element;
use sigil_sdk::commands::{
    load_identity_file, load_tree, prove_membership, register_commitment,
};

use super::constants::{
    DEFAULT_MEMBERSHIP_FILE, DEFAULT_TREE_DEPTH, DEFAULT_TREE_FILE, SIGIL_IDENTITY_FILE,
    SIGIL_MEMBERSHIP_FILE, SIGIL_TREE_DEPTH, SIGIL_TREE_FILE,
};

/// Arguments for `sigil group insert`.
#[derive(Debug, clap::Args)]
pub struct InsertArgs {
    /// Group tree snapshot file (created on first insert).
    #[arg(long, env = SIGIL_TREE_FILE, default_value = DEFAULT_TREE_FILE)]
    pub tree: PathBuf,

    /// Tree depth used when the snapshot does not exist yet.
    #[arg(long, env = SIGIL_TREE_DEPTH, default_value = DEFAULT_TREE_DEPTH)]
    pub depth: u8,

    /// Identity secrets file whose commitment is inserted.
    #[arg(long, env = SIGIL_IDENTITY_FILE)]
    pub identity: Option<PathBuf>,

    /// Insert this commitment directly (hex).
    #[arg(long)]
    pub commitment: Option<Element>,
}

/// Arguments for `sigil group root`.
#[derive(Debug, clap::Args)]
pub struct RootArgs {
    /// Group tree snapshot file.
    #[arg(long, env = SIGIL_TREE_FILE, default_value = DEFAULT_TREE_FILE)]
    pub tree: PathBuf,
}

/// Arguments for `sigil group prove`.
#[derive(Debug, clap::Args)]
pub struct ProveArgs {
    /// Group tree snapshot file.
    #[arg(long, env = SIGIL_TREE_FILE, default_value = DEFAULT_TREE_FILE)]
    pub tree: PathBuf,

    /// Leaf index to prove membership for.
    #[arg(long)]
    pub leaf: u64,

    /// Output file for the membership proof (JSON).
    #[arg(long, env = SIGIL_MEMBERSHIP_FILE, default_value = DEFAULT_MEMBERSHIP_FILE)]
    pub output: PathBuf,
}

/// Group command group.
#[derive(Debug, clap::Subcommand)]
pub enum GroupCommands {
    /// Insert a member commitment into the group tree snapshot.
    #[command(group(
        ArgGroup::new("member")
            .args(["identity", "commitment"])
            .multiple(false)
            .required(true)
    ))]
    Insert {
        /// Insert arguments.
        #[command(flatten)]
        args: InsertArgs,
    },

    /// Print the current root of the group tree snapshot.
    Root {
        /// Root arguments.
        #[command(flatten)]
        args: RootArgs,
    },

    /// Write a membership proof for a leaf of the snapshot.
    Prove {
        /// Prove arguments.
        #[command(flatten)]
        args: ProveArgs,
    },
}

#[allow(clippy::print_stdout, reason = "Prints the root to stdout for scripting")]
fn print_root(root: Element) {
    println!("{root}");
}

/// Run a group subcommand.
///
/// # Errors
/// Returns an error on I/O failure, snapshot corruption, a full tree, or
/// a leaf that was never inserted.
pub async fn run(command: GroupCommands) -> eyre::Result<()> {
    match command {
        GroupCommands::Insert { args } => {
            let commitment = match (args.identity, args.commitment) {
                (Some(path), _) => load_identity_file(&path).await?.commitment(),
                (None, Some(commitment)) => commitment,
                (None, None) => eyre::bail!("either --identity or --commitment is required"),
            };
            let (index, root) = register_commitment(&args.tree, args.depth, commitment).await?;
            tracing::info!(index, %root, "inserted commitment");
            Ok(())
        }
        GroupCommands::Root { args } => {
            let tree = load_tree(&args.tree).await?;
            print_root(tree.current_root());
            Ok(())
        }
        GroupCommands::Prove { args } => {
            let proof = prove_membership(&args.tree, args.leaf).await?;
            let json =
                serde_json::to_vec_pretty(&proof).wrap_err("Failed to serialize membership proof")?;
            tokio::fs::write(&args.output, json)
                .await
                .wrap_err_with(|| {
                    format!("Failed to write membership proof {}", args.output.display())
                })?;
            tracing::info!(leaf = args.leaf, path = %args.output.display(), "wrote membership proof");
            Ok(())
        }
    }
}
