//! Canopy CLI Library
//!
//! Command implementations for the `canopy` binary. The binary only inspects the content
//! model; rendering is left to the embedding application.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (check, dump)

pub mod cmd;

use std::path::{Path, PathBuf};

pub use canopy_core::Config;
use canopy_generator::{Generator, Site};
use color_eyre::eyre::{Result, WrapErr};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

/// Load the configuration, falling back to defaults when the file does not exist.
pub fn load_config(config_path: &Path) -> Result<Config> {
    if !config_path.exists() {
        tracing::info!(path = %config_path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    Config::load_with_env(config_path)
        .wrap_err_with(|| format!("failed to load {}", config_path.display()))
}

/// Content directory for a configuration, relative to the config file's directory.
pub fn content_dir(config: &Config, config_path: &Path) -> PathBuf {
    let base = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    config.content_dir(base)
}

/// Load the configuration and run one generation pass.
pub fn generate(config_path: &Path) -> Result<Site> {
    let config = load_config(config_path)?;
    let content_dir = content_dir(&config, config_path);

    let generator = Generator::from_config(config).wrap_err("invalid parser configuration")?;
    let site = generator
        .generate(&content_dir)
        .wrap_err("generation failed")?;

    Ok(site)
}
