//! Environment source: MERKDIR__SECTION__KEY, e.g. MERKDIR__INGEST__WORKERS=8

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

/// Add the environment as the highest-priority source.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("MERKDIR")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    )
}
