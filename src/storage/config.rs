//! Configuration management
//!
//! Defaults for the `bisect` command stored in `config.toml`.
//! Priority: CLI argument > TOOLBELT_* environment variable > config.toml > built-in default

use super::Result;
use crate::core::probe::ProbeOutcome;
use crate::error::{ConfigError, StorageError};
use crate::utils::input::EnvOverrides;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Application configuration
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub bisect: BisectSettings,
}

/// Defaults applied to every `toolbelt bisect` run
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BisectSettings {
    /// Probe outcome the search bounds
    pub expect: ProbeOutcome,
    pub allow_all_expected: bool,
    /// Seconds before a single probe is killed and counted as a failure
    pub probe_timeout_secs: Option<u64>,
    /// Seconds before the whole search is abandoned
    pub overall_timeout_secs: Option<u64>,
    /// Splits `--values` tokens into tuple components
    pub separator: char,
}

impl Default for BisectSettings {
    fn default() -> Self {
        Self {
            expect: ProbeOutcome::Success,
            allow_all_expected: false,
            probe_timeout_secs: None,
            overall_timeout_secs: None,
            separator: ',',
        }
    }
}

impl BisectSettings {
    /// Replace file values with the TOOLBELT_* overrides that are set.
    pub fn with_overrides(mut self, env: &EnvOverrides) -> Self {
        if let Some(expect) = env.expect {
            self.expect = expect;
        }
        if let Some(secs) = env.probe_timeout_secs {
            self.probe_timeout_secs = Some(secs);
        }
        if let Some(secs) = env.overall_timeout_secs {
            self.overall_timeout_secs = Some(secs);
        }
        self
    }
}

impl Config {
    /// Keys accepted by [`Config::set`]
    pub const KEYS: [&'static str; 5] = [
        "bisect.expect",
        "bisect.allow_all_expected",
        "bisect.probe_timeout_secs",
        "bisect.overall_timeout_secs",
        "bisect.separator",
    ];

    /// Load configuration from file
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|e| StorageError::ConfigParseError {
                message: format!("Failed to parse config file: {}", e),
            })?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: Option<PathBuf>) -> Result<()> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::FileIo {
                path: parent.to_string_lossy().to_string(),
                source,
            })?;
        }

        let toml_content = toml::to_string(self).map_err(|e| StorageError::ConfigParseError {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(&config_path, toml_content).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        Ok(())
    }

    /// `~/.config/toolbelt/config.toml`
    pub fn config_file_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().ok_or(StorageError::ConfigDirNotFound)?;

        let app_config_dir = home_dir.join(".config").join("toolbelt");
        Ok(app_config_dir.join("config.toml"))
    }

    /// Set one value by dotted key, e.g. `bisect.expect`.
    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidValue {
            field: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        };
        let settings = &mut self.bisect;

        match key {
            "bisect.expect" => {
                settings.expect = value.parse().map_err(|e: String| invalid(&e))?;
            }
            "bisect.allow_all_expected" => {
                settings.allow_all_expected = value
                    .trim()
                    .parse()
                    .map_err(|_| invalid("expected 'true' or 'false'"))?;
            }
            "bisect.probe_timeout_secs" => {
                settings.probe_timeout_secs = parse_seconds(value).map_err(invalid)?;
            }
            "bisect.overall_timeout_secs" => {
                settings.overall_timeout_secs = parse_seconds(value).map_err(invalid)?;
            }
            "bisect.separator" => {
                let mut chars = value.chars();
                settings.separator = match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_whitespace() && !c.is_control() => c,
                    _ => return Err(invalid("expected a single visible character")),
                };
            }
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Every key with its current value, in [`Config::KEYS`] order
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let settings = &self.bisect;
        let seconds = |secs: Option<u64>| secs.map_or_else(|| "none".to_string(), |s| s.to_string());

        vec![
            (Self::KEYS[0], settings.expect.to_string()),
            (Self::KEYS[1], settings.allow_all_expected.to_string()),
            (Self::KEYS[2], seconds(settings.probe_timeout_secs)),
            (Self::KEYS[3], seconds(settings.overall_timeout_secs)),
            (Self::KEYS[4], settings.separator.to_string()),
        ]
    }
}

/// `none` (or empty) clears the timeout; zero is rejected.
fn parse_seconds(value: &str) -> std::result::Result<Option<u64>, &'static str> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    match value.parse::<u64>() {
        Ok(0) => Err("timeout must be at least 1 second"),
        Ok(secs) => Ok(Some(secs)),
        Err(_) => Err("expected a number of seconds or 'none'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.bisect.expect, ProbeOutcome::Success);
        assert!(!config.bisect.allow_all_expected);
        assert!(config.bisect.probe_timeout_secs.is_none());
        assert_eq!(config.bisect.separator, ',');
    }

    #[test]
    fn test_config_load_save() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set("bisect.expect", "failure").unwrap();
        config.set("bisect.probe_timeout_secs", "5").unwrap();
        config.set("bisect.separator", ":").unwrap();

        config
            .save(Some(config_path.clone()))
            .expect("Failed to save config");

        let loaded_config = Config::load(Some(config_path)).expect("Failed to load config");
        assert_eq!(loaded_config, config);
        assert_eq!(loaded_config.bisect.probe_timeout_secs, Some(5));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let nonexistent_path = temp_dir.path().join("nonexistent.toml");

        let config = Config::load(Some(nonexistent_path)).expect("Failed to load default config");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_partial_file_uses_defaults() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[bisect]\nallow_all_expected = true\n").unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        assert!(config.bisect.allow_all_expected);
        assert_eq!(config.bisect.expect, ProbeOutcome::Success);
        assert_eq!(config.bisect.separator, ',');
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[bisect\nexpect = ").unwrap();

        assert!(matches!(
            Config::load(Some(config_path)),
            Err(StorageError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let file = BisectSettings {
            probe_timeout_secs: Some(5),
            overall_timeout_secs: Some(60),
            ..BisectSettings::default()
        };
        let env = EnvOverrides {
            expect: Some(ProbeOutcome::Failure),
            overall_timeout_secs: Some(10),
            ..EnvOverrides::default()
        };

        let merged = file.clone().with_overrides(&env);
        assert_eq!(merged.expect, ProbeOutcome::Failure);
        assert_eq!(merged.probe_timeout_secs, Some(5));
        assert_eq!(merged.overall_timeout_secs, Some(10));

        assert_eq!(file.clone().with_overrides(&EnvOverrides::default()), file);
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut config = Config::default();

        assert!(matches!(
            config.set("bisect.colour", "blue"),
            Err(ConfigError::UnknownKey { .. })
        ));
        assert!(matches!(
            config.set("bisect.expect", "perhaps"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config.set("bisect.overall_timeout_secs", "0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config.set("bisect.separator", "ab"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_set_clears_timeout() {
        let mut config = Config::default();
        config.set("bisect.overall_timeout_secs", "60").unwrap();
        assert_eq!(config.bisect.overall_timeout_secs, Some(60));

        config.set("bisect.overall_timeout_secs", "none").unwrap();
        assert_eq!(config.bisect.overall_timeout_secs, None);
    }

    #[test]
    fn test_entries_follow_keys() {
        let mut config = Config::default();
        config.set("bisect.allow_all_expected", "true").unwrap();

        let entries = config.entries();
        let keys: Vec<_> = entries.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, Config::KEYS);
        assert_eq!(entries[1].1, "true");
        assert_eq!(entries[2].1, "none");
    }
}
