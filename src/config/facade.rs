//! Config loading: merges every source and validates the result.

use super::merge::merge_policy;
use super::sources::{environment, explicit_file, global_file};
use super::MerkdirConfig;
use crate::error::ApiError;
use std::path::Path;
use tracing::debug;

/// Loads [`MerkdirConfig`] from the layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration, optionally with an explicit config file on top of
    /// the global one
    pub fn load(explicit: Option<&Path>) -> Result<MerkdirConfig, ApiError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = match explicit {
            Some(path) => explicit_file::add_to_builder(builder, path)?,
            None => builder,
        };
        let builder = environment::add_to_builder(builder);

        let config: MerkdirConfig = builder.build()?.try_deserialize()?;
        Self::validated(config)
    }

    /// Load defaults plus a single config file, ignoring the global file and
    /// the environment
    pub fn load_from_file(path: &Path) -> Result<MerkdirConfig, ApiError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = explicit_file::add_to_builder(builder, path)?;
        let config: MerkdirConfig = builder.build()?.try_deserialize()?;
        Self::validated(config)
    }

    fn validated(config: MerkdirConfig) -> Result<MerkdirConfig, ApiError> {
        config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        debug!(?config, "Loaded configuration");
        Ok(config)
    }
}
