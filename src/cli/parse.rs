//! CLI parse: clap types for merkdir. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// merkdir - Merkle trees of directories with inclusion proofs
#[derive(Parser)]
#[command(name = "merkdir")]
#[command(about = "Create Merkle trees of your directories and prove file inclusion")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stderr, stdout, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print version information
    Version,
    /// Generate a Merkle tree of a directory
    Gen {
        /// Directory to hash
        dir: PathBuf,
        /// Output tree file
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print the root hash of a tree file
    Root {
        /// Tree file
        file: PathBuf,
        /// Print the hash as hex instead of raw bytes
        #[arg(long)]
        hex: bool,
    },
    /// Generate an inclusion proof for a file in a tree
    Inclusion {
        /// Input tree file
        #[arg(short, long)]
        tree: PathBuf,
        /// File path as stored in the tree
        #[arg(short, long)]
        file: String,
        /// Output path for the proof (otherwise a text explanation is printed)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check whether a file on disk still matches its leaf in the tree
    VerifyFile {
        /// Input tree file
        #[arg(short, long)]
        tree: PathBuf,
        /// Name of the file as stored in the tree
        #[arg(short, long)]
        name: String,
    },
    /// Compute the root hash an inclusion proof and file lead to
    VerifyInclusion {
        /// Inclusion proof file
        #[arg(short, long)]
        proof: PathBuf,
        /// The file being proven
        #[arg(short, long)]
        file: PathBuf,
        /// Print the computed root as hex instead of raw bytes
        #[arg(long)]
        hex: bool,
        /// Trusted root hash (hex) to compare against
        #[arg(long)]
        hash: Option<String>,
    },
    /// Show information about a tree or an inclusion proof
    Info {
        /// Tree file
        tree: PathBuf,
        /// Inclusion proof made from this tree
        #[arg(short, long)]
        proof: Option<PathBuf>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Render a tree as a Graphviz DOT graph
    Dot {
        /// Tree file
        tree: PathBuf,
    },
}
