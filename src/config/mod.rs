mod schema;
mod validation;

pub use schema::{Config, SizeRules};
pub use validation::validate_config;

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the config directory path (~/.config/pr-radar/)
pub fn get_config_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Could not determine home directory");
    home.join(".config").join("pr-radar")
}

/// Get the default config file path (~/.config/pr-radar/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file.
///
/// Uses the default path (~/.config/pr-radar/config.yaml) when `path` is
/// None; a missing file at the default path yields the built-in defaults
/// rather than an error, while an explicit path must exist. The result
/// is normalized (lowercased identity keys, sorted ladders) so the
/// engine's preconditions hold; run `validate_config` before using it.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let (config_path, explicit) = match path {
        Some(p) => (p, true),
        None => (get_config_path(), false),
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let mut config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;
    config.normalize();

    Ok(config)
}
