mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable holding the OMDb API key.
pub const ENV_API_KEY: &str = "OMDB_API_KEY";
/// Environment variable overriding the cache parent directory.
pub const ENV_CACHE_DIR: &str = "USER_CACHE_DIR";
/// Environment variable enabling debug logging when present.
pub const ENV_DEBUG: &str = "DEBUG";

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}

/// Load config from default locations and apply environment overrides.
///
/// The result is not validated; call [`validate_config`] once logging is up.
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    let mut config = match custom_path {
        Some(path) => load_config(path)?,
        None => find_default_config()?,
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    Ok(config)
}

fn find_default_config() -> Result<Config> {
    let default_paths = ["./mediascore.toml", "~/.config/mediascore/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Overlay environment variables onto `config`.
///
/// `lookup` is `std::env::var` in production.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup(ENV_API_KEY) {
        config.omdb_api_key = Some(key);
    }
    if let Some(dir) = lookup(ENV_CACHE_DIR).filter(|d| !d.is_empty()) {
        config.cache_dir = Some(PathBuf::from(shellexpand::tilde(&dir).as_ref()));
    }
    if lookup(ENV_DEBUG).is_some() {
        config.debug = true;
    }
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.api_key().is_none() {
        anyhow::bail!("Please set the {} environment variable", ENV_API_KEY);
    }

    if config.pipeline.queue_size == 0 {
        anyhow::bail!("pipeline.queue_size must be greater than 0");
    }

    if config.pipeline.request_timeout_secs == 0 {
        anyhow::bail!("pipeline.request_timeout_secs must be greater than 0");
    }

    Ok(())
}
