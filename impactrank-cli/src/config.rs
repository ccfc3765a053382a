/// Config file loading and creation for the impactrank CLI.
///
/// Config lives at ~/.config/impactrank/config.toml.
/// All fields are optional — CLI args override config values.
use anyhow::{bail, Context, Result};
use impactrank_core::RankingConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ImpactrankConfig {
    pub store: Option<PathBuf>,
    pub baseline: Option<f64>,
    pub k_factor: Option<f64>,
    pub comparison_weight: Option<f64>,
}

impl ImpactrankConfig {
    /// Engine config with any overrides from the file applied.
    pub fn ranking_config(&self) -> RankingConfig {
        let defaults = RankingConfig::default();
        RankingConfig {
            baseline: self.baseline.unwrap_or(defaults.baseline),
            k_factor: self.k_factor.unwrap_or(defaults.k_factor),
            comparison_weight: self.comparison_weight.unwrap_or(defaults.comparison_weight),
            ..defaults
        }
    }
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# impactrank configuration
# All values here can be overridden by CLI flags.

# Where items and decisions are stored (JSON)
# store = \"/home/me/.config/impactrank/store.json\"

# Impact score every item starts from
# baseline = 1500.0

# Elo K-factor: how far one decision moves a score
# k_factor = 32.0

# Share of rank confidence from comparison coverage (rest is evidence)
# comparison_weight = 0.7
";

fn config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("impactrank"))
}

/// Returns the default config path: ~/.config/impactrank/config.toml
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Returns the default store path: ~/.config/impactrank/store.json
pub fn default_store_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("store.json"))
}

/// Load config from a file path. Returns default (all None) if file doesn't exist.
pub fn load_config(path: &Path) -> Result<ImpactrankConfig> {
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ImpactrankConfig::default()),
        Err(e) => Err(e).with_context(|| format!("Failed to read config at {}", path.display())),
    }
}

/// Create the default config file at `path`. Errors if it already exists.
pub fn create_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("Config file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(path, DEFAULT_CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write config to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg, ImpactrankConfig::default());
        assert_eq!(cfg.ranking_config(), RankingConfig::default());
    }

    #[test]
    fn test_overrides_apply_to_ranking_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "k_factor = 16.0\nstore = \"/tmp/s.json\"\n").unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.store, Some(PathBuf::from("/tmp/s.json")));
        let ranking = cfg.ranking_config();
        assert_eq!(ranking.k_factor, 16.0);
        assert_eq!(ranking.baseline, 1500.0);
    }

    #[test]
    fn test_unknown_field_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "kfactor = 16.0\n").unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_default_template_parses_and_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        create_default_config(&path).unwrap();
        assert_eq!(load_config(&path).unwrap(), ImpactrankConfig::default());
        assert!(create_default_config(&path).is_err());
    }
}
