//! CLI route: single route table and run context. Dispatches to library
//! operations and presentation.

use crate::cli::output::CommandOutput;
use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_proof_explanation, format_proof_info, format_tree_info, format_verdict,
};
use crate::config::{ConfigLoader, MerkdirConfig};
use crate::error::ApiError;
use crate::ingest::generate_tree;
use crate::proof::verify_proof;
use crate::store::{read_proof, read_tree, write_proof, write_tree, FileStatus};
use std::fs::File;
use std::io::{BufReader, IsTerminal};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info};

/// Runtime context for CLI execution: the merged configuration.
pub struct RunContext {
    config: MerkdirConfig,
    color: bool,
}

impl RunContext {
    /// Create run context from an optional explicit config path. Uses ConfigLoader only.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = ConfigLoader::load(config_path.as_deref())?;
        Ok(Self::with_config(config))
    }

    /// Create run context from an already-loaded configuration
    pub fn with_config(config: MerkdirConfig) -> Self {
        Self {
            config,
            color: std::io::stdout().is_terminal(),
        }
    }

    /// Disable or force coloured verdicts
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn config(&self) -> &MerkdirConfig {
        &self.config
    }

    /// Run one command and return what it prints
    pub fn execute(&self, command: &Commands) -> Result<CommandOutput, ApiError> {
        let started = Instant::now();
        let result = self.execute_inner(command);
        match &result {
            Ok(_) => info!(
                ?command,
                duration_ms = started.elapsed().as_millis(),
                "Command finished"
            ),
            Err(e) => error!(?command, error = %e, "Command failed"),
        }
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<CommandOutput, ApiError> {
        match command {
            Commands::Version => Ok(CommandOutput::Text(format!(
                "merkdir {}",
                env!("CARGO_PKG_VERSION")
            ))),
            Commands::Gen { dir, output } => self.handle_gen(dir, output),
            Commands::Root { file, hex } => {
                let tree = read_tree(file)?;
                Ok(hash_output(&tree.root_hash(), *hex))
            }
            Commands::Inclusion { tree, file, output } => {
                self.handle_inclusion(tree, file, output.as_deref())
            }
            Commands::VerifyFile { tree, name } => {
                let tree = read_tree(tree)?;
                let ok = tree.verify_file(name)? == FileStatus::Unchanged;
                let message = if ok {
                    "file is still verified by this Merkle tree"
                } else {
                    "file has changed and is not part of the Merkle tree"
                };
                Ok(CommandOutput::Text(format_verdict(ok, message, self.color)))
            }
            Commands::VerifyInclusion {
                proof,
                file,
                hex,
                hash,
            } => self.handle_verify_inclusion(proof, file, *hex, hash.as_deref()),
            Commands::Info {
                tree,
                proof,
                format,
            } => {
                let tree = read_tree(tree)?;
                let text = match proof {
                    Some(proof_path) => {
                        let proof = read_proof(proof_path)?;
                        let leaf = tree.leaf_for_proof(&proof)?;
                        format_proof_info(&proof, leaf, format)?
                    }
                    None => format_tree_info(&tree, format)?,
                };
                Ok(CommandOutput::Text(text))
            }
            Commands::Dot { tree } => {
                let tree = read_tree(tree)?;
                let mut buf = Vec::new();
                tree.root.write_dot(&mut buf)?;
                Ok(CommandOutput::Bytes(buf))
            }
        }
    }

    fn handle_gen(&self, dir: &Path, output: &Path) -> Result<CommandOutput, ApiError> {
        if !dir.is_dir() {
            return Err(ApiError::InvalidPath(dir.to_path_buf()));
        }
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let tree = runtime.block_on(generate_tree(dir, &self.config.walk, &self.config.ingest))?;
        write_tree(&tree, output)?;
        Ok(CommandOutput::Text(format!(
            "Root hash: {}",
            hex::encode(tree.root_hash())
        )))
    }

    fn handle_inclusion(
        &self,
        tree_path: &Path,
        name: &str,
        output: Option<&Path>,
    ) -> Result<CommandOutput, ApiError> {
        let tree = read_tree(tree_path)?;
        let proof = tree.inclusion_proof(name)?;
        match output {
            Some(path) => {
                write_proof(&proof, path)?;
                Ok(CommandOutput::Empty)
            }
            None => {
                let leaf_hash = tree.leaf(name)?.hash;
                let text = format_proof_explanation(&tree, name, &proof, &leaf_hash)?;
                Ok(CommandOutput::Text(text))
            }
        }
    }

    fn handle_verify_inclusion(
        &self,
        proof_path: &Path,
        file_path: &Path,
        hex_output: bool,
        trusted: Option<&str>,
    ) -> Result<CommandOutput, ApiError> {
        let proof = read_proof(proof_path)?;
        let file = File::open(file_path)?;
        let candidate = verify_proof(&proof, BufReader::new(file))?;

        match trusted {
            Some(hash) => {
                let trusted = hex::decode(hash.trim())
                    .map_err(|e| ApiError::InvalidHash(format!("{}: {}", hash, e)))?;
                let ok = trusted.as_slice() == candidate.as_slice();
                let message = if ok {
                    "proof and file match given root hash"
                } else {
                    "proof and file don't match given root hash"
                };
                Ok(CommandOutput::Text(format_verdict(ok, message, self.color)))
            }
            None => Ok(hash_output(&candidate, hex_output)),
        }
    }
}

fn hash_output(hash: &[u8], hex_output: bool) -> CommandOutput {
    if hex_output {
        CommandOutput::Text(hex::encode(hash))
    } else {
        CommandOutput::Bytes(hash.to_vec())
    }
}
