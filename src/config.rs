use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

use crate::error::ConfigError;

pub const CONFIG_PATH_ENV: &str = "INKARR_CONFIG";
pub const SERVER_ADDRESS_ENV: &str = "INKARR_SERVER_ADDRESS";
pub const API_KEY_ENV: &str = "INKARR_API_KEY";

/// User settings, persisted as `preferences.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub server_address: String,
    #[serde(default)]
    pub api_key: String,
}

/// Returned by every accepted edit. Settings are read once at startup, so the
/// caller has to tell the user to restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartNotice;

impl fmt::Display for RestartNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Restart to apply changes")
    }
}

/// Immutable view of the settings handed to the source at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceConfig {
    /// Server address without a trailing `/`; empty when unconfigured.
    pub base_url: String,
    pub api_key: Option<String>,
}

impl SourceConfig {
    pub fn new(server_address: &str, api_key: &str) -> Self {
        let address = server_address.trim();
        let base_url = address.trim_end_matches('/').to_string();
        let api_key = Some(api_key.trim().to_string()).filter(|k| !k.is_empty());
        Self { base_url, api_key }
    }
}

impl Preferences {
    /// Read preferences from `path`. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading preferences: {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing preferences: {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating config dir: {}", parent.display()))?;
        }
        let raw = toml::to_string_pretty(self).context("serializing preferences")?;
        fs::write(path, raw).with_context(|| format!("writing preferences: {}", path.display()))
    }

    /// Values from `INKARR_SERVER_ADDRESS` / `INKARR_API_KEY` replace stored ones.
    /// An address override goes through the same validation as an edit.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|k| std::env::var(k).ok())
    }

    fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(addr) = lookup(SERVER_ADDRESS_ENV) {
            let addr = addr.trim();
            validate_address(addr)?;
            self.server_address = addr.to_string();
        }
        if let Some(key) = lookup(API_KEY_ENV) {
            self.api_key = key;
        }
        Ok(self)
    }

    /// Validate and store a new server address. Invalid input leaves the
    /// preferences untouched. Clearing the address needs no restart notice.
    pub fn set_server_address(&mut self, value: &str) -> Result<Option<RestartNotice>, ConfigError> {
        let value = value.trim();
        validate_address(value)?;
        self.server_address = value.to_string();
        info!(address = value, "server address updated");
        Ok((!value.is_empty()).then_some(RestartNotice))
    }

    pub fn set_api_key(&mut self, value: &str) -> RestartNotice {
        self.api_key = value.trim().to_string();
        info!(set = !self.api_key.is_empty(), "api key updated");
        RestartNotice
    }

    pub fn address_summary(&self) -> String {
        if self.server_address.trim().is_empty() {
            "Enter your Inkarr server URL".to_string()
        } else {
            self.server_address.clone()
        }
    }

    pub fn api_key_summary(&self) -> String {
        if self.api_key.trim().is_empty() {
            "Enter your Inkarr API key (optional)".to_string()
        } else {
            "*".repeat(self.api_key.chars().count())
        }
    }

    pub fn snapshot(&self) -> SourceConfig {
        SourceConfig::new(&self.server_address, &self.api_key)
    }
}

/// Blank means "not configured" and is allowed. Anything else must be an
/// absolute http(s) URL without a trailing `/`.
pub fn validate_address(value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Ok(());
    }
    let invalid = || ConfigError::InvalidAddress(value.to_string());
    if value.ends_with('/') {
        return Err(invalid());
    }
    let url = Url::parse(value).map_err(|_| invalid())?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(()),
        _ => Err(invalid()),
    }
}

/// `$INKARR_CONFIG`, or `preferences.toml` in the platform config directory.
pub fn default_config_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from("dev", "inkarr", "inkarr")
        .context("unable to determine config directory for preferences")?;
    Ok(proj.config_dir().join("preferences.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_validation() {
        assert!(validate_address("").is_ok());
        assert!(validate_address("http://192.168.1.100:3000").is_ok());
        assert!(validate_address("https://comics.example.org/inkarr").is_ok());
        assert_eq!(
            validate_address("http://192.168.1.100:3000/"),
            Err(ConfigError::InvalidAddress("http://192.168.1.100:3000/".into()))
        );
        assert!(validate_address("192.168.1.100:3000").is_err());
        assert!(validate_address("not a url").is_err());
        assert!(validate_address("ftp://files.example").is_err());
    }

    #[test]
    fn rejected_address_is_not_stored() {
        let mut prefs = Preferences { server_address: "http://old:3000".into(), ..Default::default() };
        assert!(prefs.set_server_address("http://new:3000/").is_err());
        assert_eq!(prefs.server_address, "http://old:3000");
    }

    #[test]
    fn accepted_changes_carry_restart_notice() {
        let mut prefs = Preferences::default();
        assert_eq!(prefs.set_server_address("http://nas:3000"), Ok(Some(RestartNotice)));
        assert_eq!(prefs.server_address, "http://nas:3000");
        assert_eq!(prefs.set_server_address(""), Ok(None));
        assert_eq!(prefs.set_api_key("secret"), RestartNotice);
        assert_eq!(RestartNotice.to_string(), "Restart to apply changes");
    }

    #[test]
    fn summaries_mask_the_key() {
        let prefs = Preferences { server_address: String::new(), api_key: "abcd".into() };
        assert_eq!(prefs.api_key_summary(), "****");
        assert_eq!(prefs.address_summary(), "Enter your Inkarr server URL");
    }

    #[test]
    fn snapshot_normalizes() {
        let cfg = SourceConfig::new("http://nas:3000/", "  ");
        assert_eq!(cfg.base_url, "http://nas:3000");
        assert_eq!(SourceConfig::new("http://nas:3000//", "").base_url, "http://nas:3000");
        assert_eq!(cfg.api_key, None);
        let cfg = Preferences { server_address: "http://nas:3000".into(), api_key: "k".into() }.snapshot();
        assert_eq!(cfg.api_key.as_deref(), Some("k"));
    }

    #[test]
    fn overrides_replace_stored_values() {
        let prefs = Preferences { server_address: "http://a:1".into(), api_key: "old".into() }
            .with_overrides(|k| (k == SERVER_ADDRESS_ENV).then(|| "http://b:2".to_string()))
            .unwrap();
        assert_eq!(prefs.server_address, "http://b:2");
        assert_eq!(prefs.api_key, "old");
    }

    #[test]
    fn invalid_address_override_is_rejected() {
        let prefs = Preferences { server_address: "http://a:1".into(), api_key: String::new() };
        let err = prefs
            .with_overrides(|k| (k == SERVER_ADDRESS_ENV).then(|| "http://nas:3000//".to_string()))
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidAddress("http://nas:3000//".into()));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.toml");
        assert_eq!(Preferences::load(&path).unwrap(), Preferences::default());

        let prefs = Preferences { server_address: "http://nas:3000".into(), api_key: "k3y".into() };
        prefs.save(&path).unwrap();
        assert_eq!(Preferences::load(&path).unwrap(), prefs);
    }

    #[test]
    fn partial_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.toml");
        fs::write(&path, "server_address = \"http://nas:3000\"\n").unwrap();
        let prefs = Preferences::load(&path).unwrap();
        assert_eq!(prefs.server_address, "http://nas:3000");
        assert_eq!(prefs.api_key, "");
    }
}
