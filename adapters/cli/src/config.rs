//! Loading game settings from TOML.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use run_from_cats_core::GameConfig;

/// Reads the optional configuration file and applies command-line overrides.
///
/// Without a file the defaults reproduce the classic 5x5 field with one cat.
pub(crate) fn load(path: Option<&Path>, seed: Option<u64>) -> Result<GameConfig> {
    let mut config = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read game config {}", path.display()))?;
            parse(&contents)
                .with_context(|| format!("failed to load game config {}", path.display()))?
        }
        None => GameConfig::default(),
    };

    if seed.is_some() {
        config.seed = seed;
    }
    config
        .validate()
        .context("game configuration cannot produce a field")?;
    Ok(config)
}

/// Parses TOML text into a configuration. Missing keys keep their defaults.
pub(crate) fn parse(contents: &str) -> Result<GameConfig> {
    toml::from_str(contents).context("invalid game config TOML")
}
