use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::apportion::ApportionSettings;

/// Run configuration; every table and field is optional
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub apportion: ApportionSettings,
    pub run: RunConfig,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    /// Worker threads; `None` uses the rayon default
    pub threads: Option<usize>,
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apportion::{EXHAUSTIVE_TOLERANCE_KM, SINGLE_POINT_LENGTH_KM};

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.apportion.single_point_km, SINGLE_POINT_LENGTH_KM);
    }

    #[test]
    fn test_partial_override() {
        let config = Config::from_toml(
            r#"
            [apportion]
            two_way_tolerance_km = 0.002

            [run]
            threads = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.apportion.two_way_tolerance_km, 0.002);
        assert_eq!(config.apportion.exhaustive_tolerance_km, EXHAUSTIVE_TOLERANCE_KM);
        assert_eq!(config.run.threads, Some(4));
    }

    #[test]
    fn test_unparseable_config_is_an_error() {
        assert!(Config::from_toml("[apportion\nthreads = ").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blockmiles.toml");
        fs::write(&path, "[apportion]\nsingle_point_km = 0.005\n").unwrap();
        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.apportion.single_point_km, 0.005);
    }
}
