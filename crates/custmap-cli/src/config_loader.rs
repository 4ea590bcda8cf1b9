//! Configuration loading for CLI commands

use anyhow::{Context, Result};
use custmap_core::config::{CliConfigOverrides, GeocoderSpec, LayeredConfig};
use std::path::{Path, PathBuf};

use crate::cli::Cli;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "custmap.toml";

/// Build the effective configuration: defaults, file, environment, then flags
pub fn load_config(cli: &Cli) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = config_path(cli.config.as_deref()) {
        config = config
            .load_from_file(&path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?;
    }

    let mut config = config.load_from_env();
    config.update_from_cli(overrides(cli));
    Ok(config)
}

/// Explicit paths must exist; the implicit one is optional
fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let implicit = PathBuf::from(DEFAULT_CONFIG_FILE);
            implicit.exists().then_some(implicit)
        }
    }
}

fn overrides(cli: &Cli) -> CliConfigOverrides {
    CliConfigOverrides {
        debounce_ms: cli.debounce_ms,
        max_results: cli.max_results,
        gateway_timeout_ms: cli.timeout_ms,
        geocoder: cli.offline.then_some(GeocoderSpec::Offline),
    }
}
