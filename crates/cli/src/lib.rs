use std::path::Path;

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use wrapgen_core::config::{load_engine_config, load_model, EngineConfig};
use wrapgen_core::graph::ClassMap;

pub mod commands;

/// Command-line overrides applied on top of the engine config file.
#[derive(Debug, Clone, Default)]
pub struct FilterOverrides {
    pub minimal: bool,
    pub target_version: Option<String>,
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects `debug` and the
/// default is `warn`. Safe to call more than once.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Load the engine config (or defaults) and apply command-line overrides.
pub fn resolve_config(
    config_path: Option<&Path>,
    overrides: &FilterOverrides,
) -> Result<EngineConfig> {
    let mut config = match config_path {
        Some(path) => load_engine_config(path)?,
        None => EngineConfig::default(),
    };
    if overrides.minimal {
        config.filter.minimal = true;
    }
    if let Some(version) = &overrides.target_version {
        config.filter.target_version = version.clone();
    }
    Ok(config)
}

/// Load the metadata model and index it as a class graph.
pub fn load_graph(model_path: &Path) -> Result<ClassMap> {
    let model = load_model(model_path)?;
    Ok(ClassMap::new(model))
}
