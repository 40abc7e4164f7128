//! Environment variable overrides
//!
//! Each value is `None` when the variable is unset, empty or does not
//! parse, so callers fall through to the config file.

use crate::core::probe::ProbeOutcome;

/// `bisect` settings taken from TOOLBELT_* variables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvOverrides {
    pub expect: Option<ProbeOutcome>,
    pub probe_timeout_secs: Option<u64>,
    pub overall_timeout_secs: Option<u64>,
}

/// Environment variable configuration reader
pub struct EnvConfigReader;

impl EnvConfigReader {
    pub const EXPECT: &'static str = "TOOLBELT_EXPECT";
    pub const PROBE_TIMEOUT: &'static str = "TOOLBELT_PROBE_TIMEOUT";
    pub const TIMEOUT: &'static str = "TOOLBELT_TIMEOUT";

    /// Read NO_COLOR environment variable
    pub fn read_no_color() -> bool {
        std::env::var("NO_COLOR").is_ok()
    }

    /// Read every TOOLBELT_* override from the process environment
    pub fn read_overrides() -> EnvOverrides {
        Self::overrides_from(|name| std::env::var(name).ok())
    }

    /// Same as [`EnvConfigReader::read_overrides`] over any variable source.
    pub fn overrides_from(lookup: impl Fn(&str) -> Option<String>) -> EnvOverrides {
        let read = |name: &str| {
            lookup(name)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        EnvOverrides {
            expect: read(Self::EXPECT).and_then(|s| s.parse().ok()),
            probe_timeout_secs: read(Self::PROBE_TIMEOUT).and_then(|s| s.parse().ok()),
            overall_timeout_secs: read(Self::TIMEOUT).and_then(|s| s.parse().ok()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn overrides(vars: &[(&str, &str)]) -> EnvOverrides {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvConfigReader::overrides_from(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_read_expect() {
        assert_eq!(
            overrides(&[(EnvConfigReader::EXPECT, "Failure")]).expect,
            Some(ProbeOutcome::Failure)
        );
        assert_eq!(
            overrides(&[(EnvConfigReader::EXPECT, "sometimes")]).expect,
            None
        );
        assert_eq!(overrides(&[]).expect, None);
    }

    #[test]
    fn test_read_probe_timeout() {
        assert_eq!(
            overrides(&[(EnvConfigReader::PROBE_TIMEOUT, " 15 ")]).probe_timeout_secs,
            Some(15)
        );
        assert_eq!(
            overrides(&[(EnvConfigReader::PROBE_TIMEOUT, "soon")]).probe_timeout_secs,
            None
        );
    }

    #[test]
    fn test_read_timeout_empty_is_unset() {
        assert_eq!(
            overrides(&[(EnvConfigReader::TIMEOUT, "")]).overall_timeout_secs,
            None
        );
        assert_eq!(
            overrides(&[(EnvConfigReader::TIMEOUT, "120")]),
            EnvOverrides {
                overall_timeout_secs: Some(120),
                ..EnvOverrides::default()
            }
        );
    }
}
