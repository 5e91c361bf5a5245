//! Settings loading for the command line.
//!
//! Settings come from an optional TOML file, then `--set key=value` flags on
//! top of it:
//!
//! ```toml
//! # orc.toml
//! [orc]
//! compress = "SNAPPY"
//! stripe.size = 67108864
//!
//! [hive.exec.orc]
//! memory.pool = 0.25
//! ```

use anyhow::{Context, Result};
use orcfile::settings::Settings;
use std::path::Path;

/// Build settings from an optional TOML file and `key=value` overrides.
pub fn load_settings(config: Option<&Path>, overrides: &[String]) -> Result<Settings> {
    let mut settings = match config {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("Failed to load settings file: {}", path.display()))?,
        None => Settings::new(),
    };

    settings
        .apply_pairs(overrides)
        .context("Failed to parse --set override")?;

    Ok(settings)
}
