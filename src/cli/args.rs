//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

use crate::domain::NodeKind;

/// Build and check academic hierarchies (Program → Phase → Block) stored as JSON snapshots
#[derive(Parser, Debug)]
#[command(name = "curtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Snapshot to read.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Forest snapshot (JSON)
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: PathBuf,
}

/// Where to write a changed snapshot.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Write the resulting snapshot here instead of stdout
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a default seed forest
    Seed {
        /// Number of phases (default from config)
        #[arg(long)]
        phases: Option<usize>,
        /// Blocks per phase (default from config)
        #[arg(long)]
        blocks: Option<usize>,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show hierarchy as tree
    Show {
        #[command(flatten)]
        input: InputArgs,
        /// Only the subtree rooted at this node id
        #[arg(long)]
        node: Option<String>,
    },

    /// Check structural rules; exits 65 on the first violation
    Validate {
        #[command(flatten)]
        input: InputArgs,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Count programs, phases and blocks
    Counts {
        #[command(flatten)]
        input: InputArgs,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List all blocks in assignment order
    Blocks {
        #[command(flatten)]
        input: InputArgs,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Append a child node under a parent
    Insert {
        #[command(flatten)]
        input: InputArgs,
        /// Parent node id
        #[arg(long)]
        parent: String,
        /// Kind of the new node (phase or block)
        #[arg(long, value_parser = parse_kind)]
        kind: NodeKind,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Append a new, empty program
    AddProgram {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Rename a node
    Rename {
        #[command(flatten)]
        input: InputArgs,
        /// Node id
        #[arg(long)]
        node: String,
        /// New name (stored verbatim)
        #[arg(long, allow_hyphen_values = true)]
        name: String,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Delete a node and its subtree
    Delete {
        #[command(flatten)]
        input: InputArgs,
        /// Node id
        #[arg(long)]
        node: String,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print effective settings
    Config,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn parse_kind(s: &str) -> Result<NodeKind, String> {
    s.parse::<NodeKind>().map_err(|e| e.to_string())
}
