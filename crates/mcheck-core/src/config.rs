//! Harness configuration.
//!
//! Values come from the environment first (`MCHECK_*`), then command-line
//! flags override them.

use crate::error::{HarnessError, Result};
use std::path::PathBuf;

/// Evaluations per fixture when nothing else is configured.
pub const DEFAULT_REPEAT_COUNT: usize = 1000;

pub const ENV_ENGINE: &str = "MCHECK_ENGINE";
pub const ENV_REPEAT: &str = "MCHECK_REPEAT";
pub const ENV_REPORT: &str = "MCHECK_REPORT";

/// Settings for one harness run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Consecutive evaluations per fixture. Only the last result is kept.
    pub repeat_count: usize,

    /// Reference engine manifest.
    pub engine_manifest: Option<PathBuf>,

    /// Where to write the JSON run report, if anywhere.
    pub report_path: Option<PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            repeat_count: DEFAULT_REPEAT_COUNT,
            engine_manifest: None,
            report_path: None,
        }
    }
}

impl HarnessConfig {
    /// Build from `MCHECK_ENGINE`, `MCHECK_REPEAT` and `MCHECK_REPORT`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    ///
    /// Values are parsed but not validated: callers apply their overrides
    /// first and then call [`HarnessConfig::validate`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let repeat_count = match lookup(ENV_REPEAT) {
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                HarnessError::Config(format!("{} must be a positive integer, got '{}'", ENV_REPEAT, raw))
            })?,
            None => DEFAULT_REPEAT_COUNT,
        };

        Ok(Self {
            repeat_count,
            engine_manifest: lookup(ENV_ENGINE).filter(|v| !v.is_empty()).map(PathBuf::from),
            report_path: lookup(ENV_REPORT).filter(|v| !v.is_empty()).map(PathBuf::from),
        })
    }

    pub fn with_repeat_count(mut self, repeat_count: usize) -> Self {
        self.repeat_count = repeat_count;
        self
    }

    pub fn with_engine_manifest(mut self, path: PathBuf) -> Self {
        self.engine_manifest = Some(path);
        self
    }

    pub fn with_report_path(mut self, path: PathBuf) -> Self {
        self.report_path = Some(path);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.repeat_count == 0 {
            return Err(HarnessError::Config(
                "repeat count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = HarnessConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, HarnessConfig::default());
        assert_eq!(config.repeat_count, 1000);
    }

    #[test]
    fn test_env_values() {
        let config = HarnessConfig::from_lookup(lookup(&[
            (ENV_REPEAT, "25"),
            (ENV_ENGINE, "/opt/engine.json"),
            (ENV_REPORT, "out/report.json"),
        ]))
        .unwrap();
        assert_eq!(config.repeat_count, 25);
        assert_eq!(config.engine_manifest, Some(PathBuf::from("/opt/engine.json")));
        assert_eq!(config.report_path, Some(PathBuf::from("out/report.json")));
    }

    #[test]
    fn test_empty_paths_are_unset() {
        let config =
            HarnessConfig::from_lookup(lookup(&[(ENV_ENGINE, ""), (ENV_REPORT, "")])).unwrap();
        assert!(config.engine_manifest.is_none());
        assert!(config.report_path.is_none());
    }

    #[test]
    fn test_invalid_repeat() {
        let err = HarnessConfig::from_lookup(lookup(&[(ENV_REPEAT, "many")])).unwrap_err();
        assert!(err.to_string().contains(ENV_REPEAT));

        let config = HarnessConfig::from_lookup(lookup(&[(ENV_REPEAT, "0")])).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("at least 1"));
    }

    #[test]
    fn test_override_replaces_invalid_env_repeat() {
        let config = HarnessConfig::from_lookup(lookup(&[(ENV_REPEAT, "0")]))
            .unwrap()
            .with_repeat_count(5);
        assert!(config.validate().is_ok());
        assert_eq!(config.repeat_count, 5);
    }

    #[test]
    fn test_builder_overrides() {
        let config = HarnessConfig::default()
            .with_repeat_count(3)
            .with_engine_manifest(PathBuf::from("e.json"))
            .with_report_path(PathBuf::from("r.json"));
        assert_eq!(config.repeat_count, 3);
        assert!(config.validate().is_ok());
        assert!(HarnessConfig::default()
            .with_repeat_count(0)
            .validate()
            .is_err());
    }
}
