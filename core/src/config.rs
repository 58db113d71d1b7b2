//! On-disk configuration for `1i`.
//!
//! Configuration lives in `config.toml` under the 1install config
//! directory. `ONEINSTALL_HOME`, when set, roots every piece of on-disk
//! state (config, telemetry log, shims, registry) under one directory,
//! which is what the integration tests rely on.

use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::error::Result;

pub const ONEINSTALL_HOME_ENV_VAR: &str = "ONEINSTALL_HOME";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backends: BackendConfig,
    #[serde(default)]
    pub behavior: BehaviorConfig,
    #[serde(default)]
    pub shims: ShimConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Priority order for backends (first = highest priority).
    pub priority: Vec<String>,
    /// Backends that should never be used.
    pub disabled: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    pub verbose: bool,
    pub auto_confirm: bool,
    pub create_shims: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShimConfig {
    /// Refresh shim scripts after every install.
    pub auto_refresh: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub enabled: bool,
    /// Permanent anonymous client id, generated on first use.
    pub client_id: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            priority: vec![
                "apt".to_string(),
                "winget".to_string(),
                "brew".to_string(),
                "snap".to_string(),
                "npm".to_string(),
                "pip".to_string(),
            ],
            disabled: Vec::new(),
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            auto_confirm: true,
            create_shims: true,
        }
    }
}

impl Default for ShimConfig {
    fn default() -> Self {
        Self { auto_refresh: true }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            client_id: None,
        }
    }
}

impl Config {
    /// Look up a value by dot-notation key, rendered as a string.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "backends.priority" => Some(self.backends.priority.join(",")),
            "backends.disabled" => Some(self.backends.disabled.join(",")),
            "behavior.verbose" => Some(self.behavior.verbose.to_string()),
            "behavior.auto_confirm" => Some(self.behavior.auto_confirm.to_string()),
            "behavior.create_shims" => Some(self.behavior.create_shims.to_string()),
            "shims.auto_refresh" => Some(self.shims.auto_refresh.to_string()),
            "telemetry.enabled" => Some(self.telemetry.enabled.to_string()),
            "telemetry.client_id" => self.telemetry.client_id.clone(),
            _ => None,
        }
    }

    /// Set a value by dot-notation key from its string form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fn parse_bool(key: &str, value: &str) -> Result<bool> {
            value.parse().map_err(|_| Error::InvalidConfigValue {
                key: key.to_string(),
                expected: "true or false".to_string(),
            })
        }
        fn parse_list(value: &str) -> Vec<String> {
            value
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        }

        match key {
            "backends.priority" => self.backends.priority = parse_list(value),
            "backends.disabled" => self.backends.disabled = parse_list(value),
            "behavior.verbose" => self.behavior.verbose = parse_bool(key, value)?,
            "behavior.auto_confirm" => self.behavior.auto_confirm = parse_bool(key, value)?,
            "behavior.create_shims" => self.behavior.create_shims = parse_bool(key, value)?,
            "shims.auto_refresh" => self.shims.auto_refresh = parse_bool(key, value)?,
            "telemetry.enabled" => self.telemetry.enabled = parse_bool(key, value)?,
            "telemetry.client_id" => self.telemetry.client_id = Some(value.to_string()),
            _ => {
                return Err(Error::UnknownConfigKey {
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn list_keys() -> &'static [&'static str] {
        &[
            "backends.priority",
            "backends.disabled",
            "behavior.verbose",
            "behavior.auto_confirm",
            "behavior.create_shims",
            "shims.auto_refresh",
            "telemetry.enabled",
            "telemetry.client_id",
        ]
    }
}

/// Directory holding config.toml and the telemetry log.
///
/// `ONEINSTALL_HOME` overrides everything; otherwise this is
/// `~/.config/1install`.
pub fn find_oneinstall_home() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(ONEINSTALL_HOME_ENV_VAR) {
        if !home.is_empty() {
            return Ok(PathBuf::from(home));
        }
    }
    let home = dirs::home_dir().ok_or(Error::MissingHome)?;
    Ok(home.join(".config").join("1install"))
}

/// Directory holding generated shims and the shim registry.
///
/// Defaults to `~/.local/share/1install`, unless `ONEINSTALL_HOME` roots
/// everything in one place.
pub fn find_data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(ONEINSTALL_HOME_ENV_VAR) {
        if !home.is_empty() {
            return Ok(PathBuf::from(home));
        }
    }
    let home = dirs::home_dir().ok_or(Error::MissingHome)?;
    Ok(home.join(".local").join("share").join("1install"))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(find_oneinstall_home()?.join("config.toml"))
}

/// Load the config, falling back to defaults when the file is absent.
pub fn load_config() -> Result<Config> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = std::fs::read_to_string(&path)?;
    toml::from_str(&contents).map_err(|source| Error::TomlDeserialize { path, source })
}

pub fn save_config(config: &Config) -> Result<()> {
    let path = config_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = toml::to_string_pretty(config).map_err(|source| Error::TomlSerialize {
        path: path.clone(),
        source,
    })?;
    std::fs::write(&path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_config_prefers_native_backends() {
        let config = Config::default();
        assert!(config.backends.priority.contains(&"apt".to_string()));
        assert!(config.behavior.auto_confirm);
        assert!(config.behavior.create_shims);
    }

    #[test]
    fn get_and_set_round_trip() {
        let mut config = Config::default();
        config.set("behavior.verbose", "true").expect("valid key");
        assert_eq!(config.get("behavior.verbose"), Some("true".to_string()));

        config
            .set("backends.priority", "brew, apt")
            .expect("valid key");
        assert_eq!(
            config.get("backends.priority"),
            Some("brew,apt".to_string())
        );
    }

    #[test]
    fn set_rejects_unknown_keys_and_bad_booleans() {
        let mut config = Config::default();
        assert!(matches!(
            config.set("no.such.key", "1"),
            Err(Error::UnknownConfigKey { .. })
        ));
        assert!(matches!(
            config.set("behavior.verbose", "yes"),
            Err(Error::InvalidConfigValue { .. })
        ));
    }

    #[test]
    fn every_listed_key_is_gettable() {
        let mut config = Config::default();
        config.telemetry.client_id = Some("abc".to_string());
        for key in Config::list_keys() {
            assert!(config.get(key).is_some(), "missing value for {key}");
        }
    }
}
