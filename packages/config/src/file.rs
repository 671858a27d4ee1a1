//! `config.json`: user preferences.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::ConfigError;

pub const CONFIG_FILE: &str = "config.json";

/// Settable configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ConfigKey {
    DefaultWorkspace,
    Editor,
    Browser,
    NoColor,
}

impl ConfigKey {
    pub const ALL: [Self; 4] = [
        Self::DefaultWorkspace,
        Self::Editor,
        Self::Browser,
        Self::NoColor,
    ];

    /// Parse a user-supplied key name.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::UnknownKey`] for anything not in [`Self::ALL`].
    pub fn parse(key: &str) -> Result<Self, ConfigError> {
        key.parse().map_err(|_| ConfigError::UnknownKey {
            key: key.to_string(),
            known: Self::ALL
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}

/// User preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Workspace used by workspace-scoped commands when `--repo` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_workspace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,
    #[serde(default)]
    pub no_color: bool,
}

impl Config {
    #[must_use]
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE)
    }

    /// Load `config.json` from `dir`. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::Io`] if the file exists but cannot be read.
    /// * [`ConfigError::Parse`] if it is not valid JSON.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let path = Self::path_in(dir);
        read_json(&path).map(Option::unwrap_or_default)
    }

    /// Write `config.json` into `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::Io`] on any filesystem failure.
    pub fn save(&self, dir: &Path) -> Result<(), ConfigError> {
        let path = Self::path_in(dir);
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.display().to_string(),
            source,
        })?;

        let mut json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        json.push('\n');

        log::debug!("Writing config to {}", path.display());
        std::fs::write(&path, json).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    #[must_use]
    pub fn get(&self, key: ConfigKey) -> Option<String> {
        match key {
            ConfigKey::DefaultWorkspace => self.default_workspace.clone(),
            ConfigKey::Editor => self.editor.clone(),
            ConfigKey::Browser => self.browser.clone(),
            ConfigKey::NoColor => Some(self.no_color.to_string()),
        }
    }

    /// Set `key`. An empty value clears optional keys.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::InvalidValue`] if `no_color` is not a boolean.
    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<(), ConfigError> {
        let optional = (!value.is_empty()).then(|| value.to_string());
        match key {
            ConfigKey::DefaultWorkspace => self.default_workspace = optional,
            ConfigKey::Editor => self.editor = optional,
            ConfigKey::Browser => self.browser = optional,
            ConfigKey::NoColor => {
                self.no_color = match value.to_ascii_lowercase().as_str() {
                    "true" | "1" | "yes" => true,
                    "false" | "0" | "no" | "" => false,
                    _ => {
                        return Err(ConfigError::InvalidValue {
                            key: key.to_string(),
                            value: value.to_string(),
                            reason: "expected true or false".to_string(),
                        });
                    }
                };
            }
        }
        Ok(())
    }

    /// Every key with its current value.
    #[must_use]
    pub fn entries(&self) -> Vec<(ConfigKey, Option<String>)> {
        ConfigKey::ALL
            .into_iter()
            .map(|key| (key, self.get(key)))
            .collect()
    }
}

/// Read and decode a JSON file, `None` when it does not exist.
pub(crate) fn read_json<T: serde::de::DeserializeOwned>(
    path: &Path,
) -> Result<Option<T>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(None);
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.display().to_string(),
                source,
            });
        }
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), Config::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");

        let mut config = Config::default();
        config.set(ConfigKey::DefaultWorkspace, "acme").unwrap();
        config.set(ConfigKey::NoColor, "yes").unwrap();
        config.save(&nested).unwrap();

        let loaded = Config::load(&nested).unwrap();
        assert_eq!(loaded.default_workspace.as_deref(), Some("acme"));
        assert!(loaded.no_color);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{"editor": "vim", "theme": "dark"}"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.get(ConfigKey::Editor).as_deref(), Some("vim"));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{").unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_key_parsing() {
        assert_eq!(
            ConfigKey::parse("default_workspace").unwrap(),
            ConfigKey::DefaultWorkspace
        );
        let err = ConfigKey::parse("colour").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown configuration key \"colour\" (known keys: default_workspace, editor, browser, no_color)"
        );
    }

    #[test]
    fn test_no_color_requires_boolean() {
        let mut config = Config::default();
        assert!(config.set(ConfigKey::NoColor, "sometimes").is_err());
        config.set(ConfigKey::Editor, "").unwrap();
        assert_eq!(config.editor, None);
    }
}
