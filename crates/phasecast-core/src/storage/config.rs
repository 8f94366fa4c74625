//! TOML-based application configuration.
//!
//! Stores:
//! - Fallback CTA links used when the milestone record has no portal override
//! - The default milestone file for the CLI
//!
//! Configuration is stored at `~/.config/phasecast/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::phase::resolver::{DEFAULT_NOMINATION_PORTAL_URL, DEFAULT_TICKETS_PORTAL_URL};
use crate::phase::CtaLinks;

/// Fallback CTA links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    #[serde(default = "default_nomination_portal")]
    pub nomination_portal: String,
    #[serde(default = "default_tickets_portal")]
    pub tickets_portal: String,
}

/// Where the active event's milestones come from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Path to a `.json` or `.toml` milestone file.
    #[serde(default)]
    pub milestones_path: Option<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/phasecast/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub links: LinksConfig,
    #[serde(default)]
    pub source: SourceConfig,
}

fn default_nomination_portal() -> String {
    DEFAULT_NOMINATION_PORTAL_URL.into()
}
fn default_tickets_portal() -> String {
    DEFAULT_TICKETS_PORTAL_URL.into()
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            nomination_portal: default_nomination_portal(),
            tickets_portal: default_tickets_portal(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    // Whole sections take an inline JSON object.
                    serde_json::Value::Object(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    // Unset optional values are stored as plain strings.
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Link values must be a site path or an absolute http(s) URL.
    fn validate_link(key: &str, value: &str) -> Result<(), ConfigError> {
        if value.starts_with('/') {
            return Ok(());
        }
        match url::Url::parse(value) {
            Ok(u) if u.scheme() == "http" || u.scheme() == "https" => Ok(()),
            Ok(u) => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("unsupported URL scheme '{}'", u.scheme()),
            }),
            Err(e) => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("'{value}' is neither a path nor a URL: {e}"),
            }),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        Self::validate_link("links.nomination_portal", &self.links.nomination_portal)?;
        Self::validate_link("links.tickets_portal", &self.links.tickets_portal)?;
        Ok(())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults there when missing.
    ///
    /// Only a missing file is replaced. Any other read failure is an error
    /// and leaves the file untouched.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config =
                    toml::from_str(&content).map_err(|e| load_failed(e.to_string()))?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no config file, writing defaults");
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(load_failed(e.to_string())),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Update a value by key in memory, validating the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value is invalid.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Fallback links for the resolver.
    pub fn cta_links(&self) -> CtaLinks {
        CtaLinks {
            nomination_portal: self.links.nomination_portal.clone(),
            tickets_portal: self.links.tickets_portal.clone(),
        }
    }

    /// Configured milestone file, if any.
    pub fn milestones_path(&self) -> Option<PathBuf> {
        self.source
            .milestones_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.links.nomination_portal, "/nominations/");
        assert_eq!(parsed.links.tickets_portal, "/tickets/");
        assert!(parsed.source.milestones_path.is_none());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("links.tickets_portal").as_deref(), Some("/tickets/"));
        assert_eq!(cfg.get("source.milestones_path").as_deref(), Some("null"));
        assert!(cfg.get("links.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn apply_updates_links() {
        let mut cfg = Config::default();
        cfg.apply("links.tickets_portal", "https://tickets.example.com/awards")
            .unwrap();
        assert_eq!(cfg.links.tickets_portal, "https://tickets.example.com/awards");
        assert_eq!(
            cfg.cta_links().tickets_portal,
            "https://tickets.example.com/awards"
        );
    }

    #[test]
    fn apply_sets_unset_optional_path() {
        let mut cfg = Config::default();
        cfg.apply("source.milestones_path", "/srv/awards/milestones.toml")
            .unwrap();
        assert_eq!(
            cfg.milestones_path(),
            Some(PathBuf::from("/srv/awards/milestones.toml"))
        );
    }

    #[test]
    fn apply_replaces_whole_section_from_json() {
        let mut cfg = Config::default();
        cfg.apply(
            "links",
            r#"{"nomination_portal": "https://portal.example.com/", "tickets_portal": "/tix/"}"#,
        )
        .unwrap();
        assert_eq!(cfg.links.nomination_portal, "https://portal.example.com/");
        assert_eq!(cfg.links.tickets_portal, "/tix/");

        let err = cfg.apply("links", "not json").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.apply("links.nonexistent_key", "value").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(_)));
    }

    #[test]
    fn apply_rejects_bad_links_and_keeps_previous_value() {
        let mut cfg = Config::default();
        let err = cfg.apply("links.nomination_portal", "not a url").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        let err = cfg
            .apply("links.nomination_portal", "ftp://files.example.com/")
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert_eq!(cfg.links.nomination_portal, "/nominations/");
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.links.tickets_portal, "/tickets/");
        assert!(path.exists());
    }

    #[test]
    fn load_from_unreadable_file_keeps_it_intact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        // Latin-1 byte in a comment: not valid UTF-8.
        let bytes: &[u8] =
            b"# caf\xE9 settings\n[links]\ntickets_portal = \"https://tickets.example.com/\"\n";
        std::fs::write(&path, &bytes).unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::LoadFailed { .. }));
        assert_eq!(std::fs::read(&path).unwrap(), bytes);
    }

    #[test]
    fn load_from_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::LoadFailed { .. }));
        assert!(dir.path().is_dir());
    }

    #[test]
    fn load_from_reads_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[links]\ntickets_portal = \"https://tickets.example.com/\"\n",
        )
        .unwrap();
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.links.tickets_portal, "https://tickets.example.com/");
        assert_eq!(cfg.links.nomination_portal, "/nominations/");
    }

    #[test]
    fn load_from_rejects_invalid_link() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[links]\nnomination_portal = \"nominate\"\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
