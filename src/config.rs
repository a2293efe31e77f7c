//! Configuration System
//!
//! Layered configuration for the ingestion pool, the directory walk, and
//! logging. Sources are merged in order: built-in defaults, the global config
//! file, an explicit `--config` file, then `MERKDIR__SECTION__KEY` environment
//! variables.

use crate::ingest::IngestConfig;
use crate::logging::LoggingConfig;
use crate::tree::walker::WalkConfig;
use serde::{Deserialize, Serialize};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MerkdirConfig {
    /// Leaf ingestion pool
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Directory walk
    #[serde(default)]
    pub walk: WalkConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Ingest(String),
    Walk(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Ingest(msg) => write!(f, "Ingest: {}", msg),
            ValidationError::Walk(msg) => write!(f, "Walk: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl MerkdirConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.ingest.validate() {
            errors.push(ValidationError::Ingest(e));
        }

        if self.walk.max_depth == Some(0) {
            errors.push(ValidationError::Walk(
                "max_depth of 0 excludes every file".to_string(),
            ));
        }
        if self.walk.ignore_patterns.iter().any(|p| p.is_empty()) {
            errors.push(ValidationError::Walk(
                "ignore patterns cannot be empty".to_string(),
            ));
        }

        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
