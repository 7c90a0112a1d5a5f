use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

use crate::rotation::ExclusionSet;

/// Sinks skipped unless the configuration says otherwise.
pub const DEFAULT_EXCLUDED_SINKS: &[&str] =
    &["alsa_output.usb-Blue_Microphones_Yeti_Stereo_Microphone_REV8-00.analog-stereo"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub rotation: RotationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64, // 0 disables the watchdog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(default)]
    pub log_to_file: bool,
    #[serde(default)]
    pub json_logs: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationConfig {
    #[serde(default = "default_excluded_sinks")]
    pub excluded_sinks: Vec<String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_excluded_sinks() -> Vec<String> {
    DEFAULT_EXCLUDED_SINKS.iter().map(|s| s.to_string()).collect()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            timeout_ms: default_timeout_ms(),
            server: None,
            log_to_file: false,
            json_logs: false,
        }
    }
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            excluded_sinks: default_excluded_sinks(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            rotation: RotationConfig::default(),
        }
    }
}

impl GeneralConfig {
    pub fn level(&self) -> Result<Level> {
        match Level::from_str(&self.log_level) {
            Ok(level) => Ok(level),
            Err(_) => bail!("Unknown log level '{}'", self.log_level),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}

impl Config {
    pub fn exclusion_set(&self) -> ExclusionSet {
        self.rotation.excluded_sinks.iter().cloned().collect()
    }

    pub fn validate(&self) -> Result<()> {
        self.general.level()?;
        Ok(())
    }

    /// Problems that do not stop a run but are worth telling the user about.
    ///
    /// Collected rather than logged so the caller can report them once logging is up.
    pub fn warnings(&self) -> Vec<String> {
        self.rotation
            .excluded_sinks
            .iter()
            .enumerate()
            .filter_map(|(i, name)| {
                if name.trim().is_empty() {
                    Some(format!("excluded_sinks[{}] is empty and will never match", i))
                } else if name.trim() != name {
                    Some(format!(
                        "excluded_sinks[{}] has surrounding whitespace; matching is exact",
                        i
                    ))
                } else {
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.general.log_level, "warn");
        assert_eq!(config.general.timeout(), Some(Duration::from_secs(10)));
        assert!(config.general.server.is_none());
        assert_eq!(config.rotation.excluded_sinks.len(), 1);
        assert!(config.exclusion_set().contains(DEFAULT_EXCLUDED_SINKS[0]));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
[general]
timeout_ms = 0
"#,
        )
        .unwrap();

        assert_eq!(config.general.timeout(), None);
        assert_eq!(config.general.log_level, "warn");
        assert_eq!(config.rotation.excluded_sinks, default_excluded_sinks());
    }

    #[test]
    fn test_empty_exclusion_list_is_respected() {
        let config: Config = toml::from_str(
            r#"
[rotation]
excluded_sinks = []
"#,
        )
        .unwrap();

        assert!(config.exclusion_set().is_empty());
    }

    #[test]
    fn test_validate_rejects_unknown_level() {
        let mut config = Config::default();
        config.general.log_level = "loud".to_string();
        assert!(config.validate().is_err());

        config.general.log_level = "debug".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_suspicious_exclusions_are_reported() {
        let mut config = Config::default();
        assert!(config.warnings().is_empty());

        config.rotation.excluded_sinks = vec![
            "hdmi".to_string(),
            "".to_string(),
            " usb ".to_string(),
        ];
        let warnings = config.warnings();

        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("excluded_sinks[1] is empty"));
        assert!(warnings[1].contains("excluded_sinks[2] has surrounding whitespace"));
        assert!(config.validate().is_ok());
    }
}
